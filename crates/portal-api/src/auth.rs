//! Account endpoints.

use portal_http::{HttpClient, RequestOptions, authorization_value};
use portal_model::Envelope;
use serde_json::{Value, json};

pub const LOGIN_PATH: &str = "/users/login/";
pub const LOGOUT_PATH: &str = "/users/logout/";
pub const INFO_PATH: &str = "/users/info/";

/// Login, logout and account info.
///
/// These calls carry the token explicitly, so they never depend on what the
/// client's token source currently holds.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Posts the credentials without any `Authorization` header.
    ///
    /// The payload is left untyped: deployments disagree on where the token
    /// and role live.
    pub async fn login(&self, account: &str, password: &str) -> Envelope<Value> {
        tracing::debug!(account, "logging in");
        let options = RequestOptions::new()
            .body(json!({ "account": account, "password": password }))
            .skip_auth();
        self.http.post(LOGIN_PATH, options).await
    }

    pub async fn logout(&self, token: &str) -> Envelope<Value> {
        let options = RequestOptions::new()
            .body(json!({ "token": token }))
            .header("Authorization", self.header_for(token));
        self.http.post(LOGOUT_PATH, options).await
    }

    pub async fn info(&self, token: &str) -> Envelope<Value> {
        let options = RequestOptions::new()
            .body(json!({}))
            .header("Authorization", self.header_for(token));
        self.http.post(INFO_PATH, options).await
    }

    fn header_for(&self, token: &str) -> String {
        authorization_value(token, &self.http.config().auth_scheme)
    }
}
