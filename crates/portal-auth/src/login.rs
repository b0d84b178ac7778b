//! Login form and reading identity out of a login response.

use std::time::Duration;

use portal_model::{Envelope, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token lifetime when the user asked to be remembered.
pub const REMEMBER_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Token lifetime otherwise.
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub account: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.account.trim().is_empty() || self.password.trim().is_empty()
    }
}

pub fn token_ttl(remember: bool) -> Duration {
    if remember { REMEMBER_TTL } else { SESSION_TTL }
}

/// Identity extracted from a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub token: String,
    pub role: Role,
    pub user_id: String,
    pub permissions: Vec<String>,
}

/// Reads a login response.
///
/// Succeeds only for code 0 or 200 with a non-empty token. The payload is
/// searched at its top level first, then under a nested `data` object.
pub fn read_grant(envelope: &Envelope<Value>, account: &str) -> Option<Grant> {
    if !matches!(envelope.code, 0 | 200) {
        return None;
    }
    let payload = &envelope.data;
    let token = find_str(payload, &["token", "accessToken"])?;

    let role = find_str(payload, &["role"])
        .and_then(|role| role.parse().ok())
        .or_else(|| account.parse().ok())
        .unwrap_or_default();
    let user_id = find_str(payload, &["userId"])
        .or_else(|| {
            payload
                .pointer("/user/account")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| account.trim().to_string());
    let permissions = layers(payload)
        .find_map(|layer| layer.get("permissions").and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Grant {
        token,
        role,
        user_id,
        permissions,
    })
}

fn layers(payload: &Value) -> impl Iterator<Item = &Value> {
    std::iter::once(payload).chain(payload.get("data"))
}

/// First non-empty string under any of `keys`, top level before nested.
fn find_str(payload: &Value, keys: &[&str]) -> Option<String> {
    layers(payload).find_map(|layer| {
        keys.iter().find_map(|key| {
            layer
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grant(code: i64, data: Value, account: &str) -> Option<Grant> {
        read_grant(&Envelope::new(code, "ok", data), account)
    }

    #[test]
    fn token_locations() {
        assert_eq!(grant(0, json!({"token": "a"}), "u").unwrap().token, "a");
        assert_eq!(grant(200, json!({"accessToken": "b"}), "u").unwrap().token, "b");
        assert_eq!(grant(200, json!({"data": {"token": "c"}}), "u").unwrap().token, "c");
        assert!(grant(200, json!({"token": ""}), "u").is_none());
        assert!(grant(201, json!({"token": "a"}), "u").is_none());
    }

    #[test]
    fn role_falls_back_to_account_then_user() {
        let from_payload = grant(200, json!({"token": "t", "data": {"role": "reviewer"}}), "admin");
        assert_eq!(from_payload.unwrap().role, Role::Reviewer);
        assert_eq!(grant(200, json!({"token": "t"}), "admin").unwrap().role, Role::Admin);
        assert_eq!(grant(200, json!({"token": "t", "role": "root"}), "zhang").unwrap().role, Role::User);
    }

    #[test]
    fn user_id_sources() {
        let with_user = json!({"token": "t", "user": {"account": "s001"}});
        assert_eq!(grant(200, with_user, "x").unwrap().user_id, "s001");
        assert_eq!(grant(200, json!({"token": "t", "userId": "42"}), "x").unwrap().user_id, "42");
        assert_eq!(grant(200, json!({"token": "t"}), " x ").unwrap().user_id, "x");
    }

    #[test]
    fn whitespace_counts_as_blank() {
        assert!(LoginForm::new("admin", "   ").is_blank());
        assert!(LoginForm::new(" ", "x").is_blank());
        assert!(!LoginForm::new("admin", " x ").is_blank());
    }

    #[test]
    fn ttl_depends_on_remember() {
        assert_eq!(token_ttl(true), REMEMBER_TTL);
        assert_eq!(token_ttl(false).as_secs(), 7200);
    }
}
