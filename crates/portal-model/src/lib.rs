pub mod column;
pub mod envelope;
pub mod error;
pub mod notice;
pub mod record;
pub mod session;
mod value;

pub use column::{ColumnDescriptor, ColumnKind, Constraints, SelectOption};
pub use envelope::{Envelope, TRANSPORT_FAILURE, UNAUTHORIZED};
pub use error::{PortalError, Result};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use record::{Record, RowId};
pub use session::{Role, Session};
pub use value::CellValue;
