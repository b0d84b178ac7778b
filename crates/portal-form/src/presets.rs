//! Ready-made rules for the portal's common fields.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::rule::Rule;

pub(crate) static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Mainland mobile numbers.
pub(crate) static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("Invalid phone regex"));

/// 18-digit resident ID shape; the checksum is checked by
/// [`validate_id_card`](crate::validate_id_card).
pub(crate) static ID_CARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{17}[\dXx]$").expect("Invalid ID card regex"));

pub fn required(message: impl Into<String>) -> Rule {
    Rule::new().required().message(message)
}

pub fn email() -> Rule {
    Rule::new()
        .pattern(EMAIL_REGEX.clone())
        .message("请输入有效的邮箱地址")
}

pub fn phone() -> Rule {
    Rule::new()
        .pattern(PHONE_REGEX.clone())
        .message("请输入有效的手机号")
}

pub fn id_card() -> Rule {
    Rule::new()
        .pattern(ID_CARD_REGEX.clone())
        .message("请输入有效的身份证号")
}

pub fn length(min: usize, max: usize, message: impl Into<String>) -> Rule {
    Rule::new().min(min).max(max).message(message)
}

pub fn password(min_length: usize) -> Vec<Rule> {
    vec![
        required("请输入密码"),
        Rule::new()
            .min(min_length)
            .message(format!("密码长度不能少于{min_length}位")),
    ]
}

/// Requires the value to equal the current value of `password_field`.
pub fn confirm_password(password_field: impl Into<String>) -> Vec<Rule> {
    let password_field = password_field.into();
    vec![
        required("请确认密码"),
        Rule::new().check(move |value, data| {
            let password = data.get(&password_field).unwrap_or(&Value::Null);
            if value == password {
                Ok(())
            } else {
                Err("两次输入的密码不一致".to_string())
            }
        }),
    ]
}

pub fn username() -> Vec<Rule> {
    vec![
        required("请输入用户名"),
        length(3, 20, "用户名长度为3-20位"),
    ]
}

pub fn name() -> Vec<Rule> {
    vec![required("请输入姓名"), length(2, 10, "姓名长度为2-10位")]
}
