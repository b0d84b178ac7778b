use thiserror::Error;

use crate::password::MIN_PASSWORD_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("account and password are required")]
    MissingCredentials,

    #[error("login rejected: {0}")]
    Rejected(String),

    #[error("password change form is incomplete")]
    IncompleteForm,

    #[error("new password and confirmation differ")]
    PasswordMismatch,

    #[error("new password is shorter than {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => "请输入账号和密码".to_string(),
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            Self::Rejected(_) => "账号或密码错误".to_string(),
            Self::IncompleteForm => "请填写完整信息".to_string(),
            Self::PasswordMismatch => "两次输入的密码不一致".to_string(),
            Self::PasswordTooShort => format!("新密码长度不能少于{MIN_PASSWORD_LENGTH}位"),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_falls_back_to_generic_message() {
        assert_eq!(AuthError::Rejected(" ".into()).user_message(), "账号或密码错误");
        assert_eq!(AuthError::Rejected("账号已停用".into()).user_message(), "账号已停用");
        assert_eq!(AuthError::PasswordTooShort.user_message(), "新密码长度不能少于6位");
    }
}
