//! Login session lifecycle for the entry portal.
//!
//! [`AuthContext`] is the single owner of the session: it is restored from
//! the persisted store at startup, written by [`AuthContext::login`] and torn
//! down by [`AuthContext::logout`]. Route changes go to a [`Navigator`] and
//! user-facing messages to a [`portal_model::Notifier`].

mod context;
mod error;
mod guard;
mod login;
mod menu;
mod navigator;
mod password;

pub use context::{
    AuthContext, LOGGED_OUT_MESSAGE, LOGIN_FAILED_MESSAGE, LOGIN_SUCCEEDED_MESSAGE,
    PASSWORD_CHANGED_MESSAGE,
};
pub use error::{AuthError, Result};
pub use guard::{FORBIDDEN_ROUTE, GuardDecision, LOGIN_ROUTE, NOT_FOUND_ROUTE, ROUTE_WHITE_LIST, guard};
pub use login::{Grant, LoginForm, REMEMBER_TTL, SESSION_TTL, read_grant, token_ttl};
pub use menu::{MenuItem, menu_for};
pub use navigator::{Navigator, RouteLog, TracingNavigator};
pub use password::{MIN_PASSWORD_LENGTH, PasswordChange, validate_password_change};
