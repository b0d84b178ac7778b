//! Typed accessors for the persisted login session.

use std::time::Duration;

use portal_model::{Role, Session};

use crate::store::{Lookup, Store};

pub const USER_ID_KEY: &str = "userId";
pub const ROLE_KEY: &str = "role";
pub const TOKEN_KEY: &str = "token";
pub const TOKEN_EXPIRE_KEY: &str = "token_exp";
pub const PERMISSIONS_KEY: &str = "permissions";

/// State of the expiring token entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// No expiring entry was ever written.
    Absent,
    Expired,
    Valid(String),
}

/// Session view over a [`Store`].
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    store: Store,
}

impl SessionStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn set_user_id(&self, user_id: &str) {
        self.store.set(USER_ID_KEY, user_id, None);
    }

    pub fn user_id(&self) -> Option<String> {
        non_empty(self.store.get(USER_ID_KEY, None))
    }

    pub fn set_role(&self, role: Role) {
        self.store.set(ROLE_KEY, &role, None);
    }

    pub fn role(&self) -> Option<Role> {
        self.store.get(ROLE_KEY, None)
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token, None);
    }

    pub fn token(&self) -> Option<String> {
        non_empty(self.store.get(TOKEN_KEY, None))
    }

    pub fn set_permissions(&self, permissions: &[String]) {
        self.store.set(PERMISSIONS_KEY, permissions, None);
    }

    pub fn permissions(&self) -> Vec<String> {
        self.store.get(PERMISSIONS_KEY, Vec::new())
    }

    /// Stores the plain token and, when `ttl` is non-zero, an expiring copy.
    pub fn set_auth_token(&self, token: &str, ttl: Option<Duration>) {
        self.set_token(token);
        if let Some(ttl) = ttl.filter(|ttl| !ttl.is_zero()) {
            self.store.set(TOKEN_EXPIRE_KEY, token, Some(ttl));
        }
    }

    /// Reads the expiring entry. Seeing it expired destroys the whole
    /// session, so later reads and restarts find nothing to revive.
    pub fn token_state(&self) -> TokenState {
        match self.store.lookup::<String>(TOKEN_EXPIRE_KEY) {
            Lookup::Present(token) if !token.is_empty() => TokenState::Valid(token),
            Lookup::Expired => {
                tracing::info!("session token expired, clearing session");
                self.clear_user();
                TokenState::Expired
            }
            _ => TokenState::Absent,
        }
    }

    /// Expiring token when still valid, the plain token when no expiring
    /// entry was written, `None` once the session expired.
    pub fn auth_token(&self) -> Option<String> {
        match self.token_state() {
            TokenState::Valid(token) => Some(token),
            TokenState::Expired => None,
            TokenState::Absent => self.token(),
        }
    }

    pub fn clear_auth_token(&self) {
        self.store.remove(TOKEN_EXPIRE_KEY);
        self.store.remove(TOKEN_KEY);
    }

    /// Removes every session key.
    pub fn clear_user(&self) {
        for key in [USER_ID_KEY, ROLE_KEY, TOKEN_KEY, PERMISSIONS_KEY, TOKEN_EXPIRE_KEY] {
            self.store.remove(key);
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth_token().is_some() && self.user_id().is_some() && self.role().is_some()
    }

    /// Persists a full session.
    pub fn save_session(&self, session: &Session, ttl: Option<Duration>) {
        self.set_user_id(&session.user_id);
        self.set_role(session.role);
        self.set_permissions(&session.permissions);
        self.set_auth_token(&session.token, ttl);
    }

    /// Rebuilds the session from persisted keys, if complete.
    pub fn load_session(&self) -> Option<Session> {
        Some(Session {
            user_id: self.user_id()?,
            role: self.role()?,
            token: self.auth_token()?,
            permissions: self.permissions(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
