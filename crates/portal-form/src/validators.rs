//! Stand-alone value checks used outside rule lists.

use std::sync::LazyLock;

use regex::Regex;

use crate::presets::{EMAIL_REGEX, PHONE_REGEX};

/// Upload size limit.
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

pub const MAX_UPLOAD_COUNT: usize = 5;

pub const ALLOWED_UPLOAD_TYPES: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".pdf", ".doc", ".docx", ".xlsx", ".xls",
];

static ID_CARD_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^\d{15}$)|(^\d{18}$)|(^\d{17}(\d|X|x)$)").expect("Invalid ID card regex")
});

const ID_CARD_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
const ID_CARD_CHECK_CODES: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// 18-digit resident ID number with a valid check character.
///
/// Legacy 15-digit numbers are rejected since they carry no check character.
pub fn validate_id_card(id: &str) -> bool {
    if !ID_CARD_SHAPE.is_match(id) || id.len() != 18 {
        return false;
    }
    let mut sum = 0;
    for (c, weight) in id.chars().take(17).zip(ID_CARD_WEIGHTS) {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += digit * weight;
    }
    let expected = ID_CARD_CHECK_CODES[(sum % 11) as usize];
    id.chars()
        .nth(17)
        .is_some_and(|c| c.to_ascii_uppercase() == expected)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least eight characters drawn from letters, digits and `@$!%*#?&`,
/// with at least one letter and one digit.
pub fn validate_password_strength(password: &str) -> bool {
    const SYMBOLS: &str = "@$!%*#?&";
    password.chars().count() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> bool {
    password == confirm
}

/// Compares the lower-cased extension of `file_name` (with its dot) against
/// `allowed`.
pub fn validate_file_type(file_name: &str, allowed: &[&str]) -> bool {
    let extension = file_name.rsplit('.').next().unwrap_or_default();
    let extension = format!(".{}", extension.to_lowercase());
    allowed.iter().any(|a| a.eq_ignore_ascii_case(&extension))
}

pub fn validate_file_size(size: u64, max_size: u64) -> bool {
    size <= max_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_card_checksum() {
        assert!(validate_id_card("11010519491231002X"));
        assert!(validate_id_card("11010519491231002x"));
        assert!(!validate_id_card("110105194912310021"));
        assert!(!validate_id_card("110105491231002"));
        assert!(!validate_id_card("1101051949123100XX"));
    }

    #[test]
    fn password_strength() {
        assert!(validate_password_strength("abc12345"));
        assert!(validate_password_strength("Pass@word1"));
        assert!(!validate_password_strength("abcdefgh"));
        assert!(!validate_password_strength("12345678"));
        assert!(!validate_password_strength("abc 12345"));
        assert!(!validate_password_strength("ab1"));
    }

    #[test]
    fn file_checks() {
        assert!(validate_file_type("报名表.XLSX", ALLOWED_UPLOAD_TYPES));
        assert!(!validate_file_type("run.exe", ALLOWED_UPLOAD_TYPES));
        assert!(!validate_file_type("noext", ALLOWED_UPLOAD_TYPES));
        assert!(validate_file_size(MAX_UPLOAD_SIZE, MAX_UPLOAD_SIZE));
        assert!(!validate_file_size(MAX_UPLOAD_SIZE + 1, MAX_UPLOAD_SIZE));
    }

    #[test]
    fn phone_and_email() {
        assert!(validate_phone("19912345678"));
        assert!(!validate_phone("1991234567"));
        assert!(validate_email("user@school.edu.cn"));
        assert!(!validate_email("user@school"));
    }
}
