//! Table engine: an in-memory row collection with keyword search,
//! single-field sort, 1-based pagination, id-keyed selection and CSV export.
//!
//! Only the source rows are stored. [`TableState::filtered`] and
//! [`TableState::paged`] derive their views on demand, so mutations never
//! leave a stale view behind.

mod error;
mod export;
mod query;
mod table;

pub use error::{Result, TableError};
pub use export::to_csv;
pub use query::{SortDirection, SortSpec, filter_rows, page_count, paginate, sort_rows};
pub use table::{
    DEFAULT_PAGE_SIZE, EXPORT_FAILED_MESSAGE, EXPORT_SUCCEEDED_MESSAGE, PAGE_SIZES, TableOptions,
    TableState,
};
