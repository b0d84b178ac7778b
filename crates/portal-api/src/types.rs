//! Response payloads with a fixed shape.

use serde::{Deserialize, Serialize};

/// Account details returned by login and info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub account: String,
    pub username: Option<String>,
    pub modifier_name: Option<String>,
    pub modifier_contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

/// A work category (painting type, instrument family, film form, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A competition group shared by every submission kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupCategory {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub order: i64,
}
