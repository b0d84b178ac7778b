//! Password change form checks.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Checks, in order: every field filled, confirmation matches, minimum length.
pub fn validate_password_change(form: &PasswordChange) -> Result<()> {
    if [&form.old_password, &form.new_password, &form.confirm_password]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(AuthError::IncompleteForm);
    }
    if form.new_password != form.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    if form.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(old: &str, new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            old_password: old.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn checks_run_in_order() {
        assert_eq!(validate_password_change(&form("", "a", "b")), Err(AuthError::IncompleteForm));
        assert_eq!(validate_password_change(&form("o", "abc", "abd")), Err(AuthError::PasswordMismatch));
        assert_eq!(validate_password_change(&form("o", "abc", "abc")), Err(AuthError::PasswordTooShort));
        assert_eq!(validate_password_change(&form("o", "密码密码密码", "密码密码密码")), Ok(()));
    }
}
