//! Roles and the logged-in session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// Portal user role. Each role owns a landing route `/{role}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Reviewer,
    Admin,
    Logger,
    Approval,
    #[serde(rename = "logaudit")]
    LogAudit,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::User,
        Role::Reviewer,
        Role::Admin,
        Role::Logger,
        Role::Approval,
        Role::LogAudit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Reviewer => "reviewer",
            Role::Admin => "admin",
            Role::Logger => "logger",
            Role::Approval => "approval",
            Role::LogAudit => "logaudit",
        }
    }

    /// Display label shown in the portal.
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "用户",
            Role::Reviewer => "审核员",
            Role::Admin => "管理员",
            Role::Logger => "日志员",
            Role::Approval => "审批员",
            Role::LogAudit => "日志审计员",
        }
    }

    pub fn landing_route(self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PortalError::InvalidRole(trimmed.to_string()))
    }
}

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub token: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Session {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
