//! Form engine: working copy versus saved snapshot, per-field rules with
//! first-failure-wins validation, guarded async submission and change
//! subscriptions.
//!
//! Validation is pull-based. Nothing is revalidated until
//! [`FormState::validate_field`] or [`FormState::validate_form`] is called.

mod presets;
mod rule;
mod state;
mod validators;

pub use rule::{Check, FormData, Rule, is_missing};
pub use state::{
    FormState, SUBMIT_FAILED_MESSAGE, SUBMIT_SUCCEEDED_MESSAGE, Subscription,
    VALIDATION_FAILED_MESSAGE,
};
pub use validators::{
    ALLOWED_UPLOAD_TYPES, MAX_UPLOAD_COUNT, MAX_UPLOAD_SIZE, validate_confirm_password,
    validate_email, validate_file_size, validate_file_type, validate_id_card,
    validate_password_strength, validate_phone,
};

/// Rule presets for common portal fields.
pub mod rules {
    pub use crate::presets::{
        confirm_password, email, id_card, length, name, password, phone, required, username,
    };
}
