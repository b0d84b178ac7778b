//! Role-based route guard.

use portal_model::Role;
use serde::Serialize;

pub const LOGIN_ROUTE: &str = "/login";
pub const FORBIDDEN_ROUTE: &str = "/403";
pub const NOT_FOUND_ROUTE: &str = "/404";

/// Routes reachable without a session.
pub const ROUTE_WHITE_LIST: [&str; 3] = [LOGIN_ROUTE, FORBIDDEN_ROUTE, NOT_FOUND_ROUTE];

/// Outcome of [`guard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    /// Send the user to the login route, then back to `redirect`.
    Login { redirect: String },
    Forbidden,
}

impl GuardDecision {
    /// Route to replace the current one with, `None` when allowed.
    pub fn target(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::Login { redirect } => Some(format!("{LOGIN_ROUTE}?redirect={redirect}")),
            Self::Forbidden => Some(FORBIDDEN_ROUTE.to_string()),
        }
    }
}

/// Decides whether a user with `role` may open `path`.
///
/// White-listed paths are always allowed. Without a role the user must log
/// in first. An empty `required_roles` admits any logged-in user.
pub fn guard(path: &str, required_roles: &[Role], role: Option<Role>) -> GuardDecision {
    let route = path.split(['?', '#']).next().unwrap_or(path);
    if ROUTE_WHITE_LIST.contains(&route) {
        return GuardDecision::Allow;
    }

    let Some(role) = role else {
        tracing::debug!(path, "no session, redirecting to login");
        return GuardDecision::Login {
            redirect: path.to_string(),
        };
    };

    if required_roles.is_empty() || required_roles.contains(&role) {
        GuardDecision::Allow
    } else {
        tracing::debug!(path, %role, "role not permitted");
        GuardDecision::Forbidden
    }
}
