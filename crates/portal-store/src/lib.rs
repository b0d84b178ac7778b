//! Local key-value storage with optional per-entry expiry.
//!
//! Values are stored as JSON text. An entry written with a TTL is wrapped as
//! `{"value": ..., "expireAt": <epoch ms>}` and is deleted on the first read
//! after it lapses.
//!
//! - `backend` - where serialized entries live (memory or a JSON file)
//! - `clock` - time source used for expiry
//! - `store` - the never-failing [`Store`] facade
//! - `session` - typed session keys on top of a store

mod backend;
mod clock;
mod error;
mod session;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StoreError};
pub use session::{
    PERMISSIONS_KEY, ROLE_KEY, SessionStore, TOKEN_EXPIRE_KEY, TOKEN_KEY, TokenState,
    USER_ID_KEY,
};
pub use store::{Lookup, NOMINAL_CAPACITY, StorageUsage, Store};
