//! Where the client gets its bearer credential from.

use portal_store::SessionStore;

/// Supplies the token attached to outgoing requests.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;

    /// Drops the stored credential after the server rejected it.
    fn invalidate(&self);
}

/// Source that never has a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }

    fn invalidate(&self) {}
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        self.auth_token()
    }

    fn invalidate(&self) {
        tracing::info!("clearing stored session after unauthorized response");
        self.clear_user();
    }
}

/// `Authorization` header value for `token`.
///
/// Tokens that already carry a `Bearer ` or `Token ` prefix pass through.
pub fn authorization_value(token: &str, scheme: &str) -> String {
    if token.starts_with("Bearer ") || token.starts_with("Token ") {
        token.to_string()
    } else {
        format!("{scheme} {token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_tokens_pass_through() {
        assert_eq!(authorization_value("Bearer a.b.c", "Token"), "Bearer a.b.c");
        assert_eq!(authorization_value("Token xyz", "Bearer"), "Token xyz");
        assert_eq!(authorization_value("abc", "Token"), "Token abc");
    }

    #[test]
    fn session_store_invalidate_clears_session() {
        let sessions = SessionStore::default();
        sessions.set_user_id("u");
        sessions.set_auth_token("abc", None);
        assert_eq!(TokenSource::token(&sessions).as_deref(), Some("abc"));
        sessions.invalidate();
        assert_eq!(TokenSource::token(&sessions), None);
        assert_eq!(sessions.user_id(), None);
    }
}
