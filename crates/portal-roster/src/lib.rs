//! Static roster configuration for the entry portal.
//!
//! - `columns` - column layouts of each participant roster
//! - `options` - shared option lists and submission status labels
//! - `forms` - entry form defaults and the category tree
//! - `templates` - bulk upload templates
//! - `import` / `check` - reading roster CSV and checking rows against
//!   column constraints

mod check;
mod columns;
mod error;
mod forms;
mod import;
mod options;
mod templates;

pub use check::{RowIssue, check_row, check_rows};
pub use columns::Roster;
pub use error::{Result, RosterError};
pub use forms::{CategoryNode, EntryForm, SCHOOL_ART_CATEGORIES, category_labels, category_path};
pub use import::{import_csv, import_csv_path};
pub use options::{
    NATIONS, STAGES, SubmissionStatus, YES_NO, batch_options, gender_options, nation_options,
    role_options, roster_gender_options, stage_options, status_label, yes_no_options,
};
pub use templates::Template;
