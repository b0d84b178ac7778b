//! The session owner.

use std::sync::Arc;

use portal_api::PortalApi;
use portal_model::{Notice, Notifier, Role, Session};
use portal_store::{SessionStore, TokenState};

use crate::error::AuthError;
use crate::guard::{GuardDecision, LOGIN_ROUTE, guard};
use crate::login::{LoginForm, read_grant, token_ttl};
use crate::navigator::Navigator;
use crate::password::{PasswordChange, validate_password_change};

pub const LOGIN_SUCCEEDED_MESSAGE: &str = "登录成功";
pub const LOGIN_FAILED_MESSAGE: &str = "登录失败，请稍后再试";
pub const LOGGED_OUT_MESSAGE: &str = "已退出登录";
pub const PASSWORD_CHANGED_MESSAGE: &str = "密码修改成功";

/// Owns the login session for the lifetime of the process.
///
/// The [`SessionStore`] is shared with the HTTP client's token source, so a
/// session written here is what outgoing requests authenticate with.
pub struct AuthContext {
    sessions: Arc<SessionStore>,
    api: PortalApi,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    session: Option<Session>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Rebuilds the context from persisted keys.
    ///
    /// A lapsed expiring token wipes the whole persisted session.
    pub fn restore(
        sessions: Arc<SessionStore>,
        api: PortalApi,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = match sessions.token_state() {
            TokenState::Expired => {
                tracing::info!("stored token expired, discarding session");
                sessions.clear_user();
                None
            }
            TokenState::Absent | TokenState::Valid(_) => sessions.load_session(),
        };
        if let Some(session) = &session {
            tracing::debug!(user_id = %session.user_id, role = %session.role, "session restored");
        }

        Self {
            sessions,
            api,
            navigator,
            notifier,
            session,
        }
    }

    pub fn api(&self) -> &PortalApi {
        &self.api
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Logs in and navigates to the role's landing route.
    ///
    /// Failures are posted to the notifier; the return value only tells
    /// whether a session now exists.
    pub async fn login(&mut self, form: &LoginForm, remember: bool) -> bool {
        if form.is_blank() {
            self.warn(&AuthError::MissingCredentials);
            return false;
        }

        let account = form.account.trim();
        let envelope = self.api.auth().login(account, &form.password).await;
        if envelope.is_transport_failure() {
            tracing::warn!(account, message = %envelope.message, "login request failed");
            self.notifier.notify(Notice::error(LOGIN_FAILED_MESSAGE));
            return false;
        }

        let Some(grant) = read_grant(&envelope, account) else {
            let error = AuthError::Rejected(envelope.message);
            tracing::info!(account, code = envelope.code, "{error}");
            self.notifier.notify(Notice::error(error.user_message()));
            return false;
        };

        let session = Session {
            user_id: grant.user_id,
            role: grant.role,
            token: grant.token,
            permissions: grant.permissions,
        };
        self.sessions.save_session(&session, Some(token_ttl(remember)));
        tracing::info!(user_id = %session.user_id, role = %session.role, remember, "logged in");

        let landing = session.role.landing_route();
        self.session = Some(session);
        self.notifier.notify(Notice::success(LOGIN_SUCCEEDED_MESSAGE));
        self.navigator.replace(&landing);
        true
    }

    /// Clears the session locally and returns to the login route. Returns
    /// the token that was in use, if any.
    pub fn logout(&mut self) -> Option<String> {
        let token = self
            .session
            .take()
            .map(|session| session.token)
            .or_else(|| self.sessions.auth_token());
        self.sessions.clear_user();
        tracing::info!("logged out");
        self.notifier.notify(Notice::success(LOGGED_OUT_MESSAGE));
        self.navigator.replace(LOGIN_ROUTE);
        token
    }

    /// [`logout`](Self::logout), then tells the server. The server's answer
    /// does not affect the local outcome.
    pub async fn logout_remote(&mut self) {
        let Some(token) = self.logout() else {
            return;
        };
        let envelope = self.api.auth().logout(&token).await;
        if !envelope.is_success() {
            tracing::warn!(code = envelope.code, message = %envelope.message, "server logout failed");
        }
    }

    /// True while a session is held and its token is still stored.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some() && self.sessions.auth_token().is_some()
    }

    pub fn current_user(&self) -> Option<&Session> {
        self.session.as_ref().filter(|_| self.is_logged_in())
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|session| session.role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.current_user()
            .is_some_and(|session| session.has_permission(permission))
    }

    /// True when the current role is one of `roles`.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|role| roles.contains(&role))
    }

    /// Like [`has_role`](Self::has_role), but an absent or empty list admits
    /// everyone, logged in or not.
    pub fn has_any_role(&self, roles: Option<&[Role]>) -> bool {
        match roles {
            None | Some([]) => true,
            Some(roles) => self.has_role(roles),
        }
    }

    /// Runs the route guard against the current session.
    pub fn guard(&self, path: &str, required_roles: &[Role]) -> GuardDecision {
        guard(path, required_roles, self.role())
    }

    /// Validates a password change and reports the outcome.
    pub fn change_password(&self, form: &PasswordChange) -> bool {
        match validate_password_change(form) {
            Ok(()) => {
                self.notifier.notify(Notice::success(PASSWORD_CHANGED_MESSAGE));
                true
            }
            Err(AuthError::IncompleteForm) => {
                self.warn(&AuthError::IncompleteForm);
                false
            }
            Err(error) => {
                self.notifier.notify(Notice::error(error.user_message()));
                false
            }
        }
    }

    fn warn(&self, error: &AuthError) {
        tracing::debug!("{error}");
        self.notifier.notify(Notice::warning(error.user_message()));
    }
}
