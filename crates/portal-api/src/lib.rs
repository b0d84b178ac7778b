//! Typed access to the portal REST resources.
//!
//! Everything here is a thin layer over [`HttpClient`]: paths, payload
//! shapes and list unwrapping. Calls resolve to envelopes exactly like the
//! client does, so no method returns an error.

mod auth;
mod submission;
mod types;

use portal_http::HttpClient;

pub use auth::{AuthApi, INFO_PATH, LOGIN_PATH, LOGOUT_PATH};
pub use submission::{GROUP_CATEGORIES_PATH, SubmissionApi, SubmissionKind, unwrap_list};
pub use types::{Category, GroupCategory, LoginResponse, UserInfo};

/// Entry point bundling the resource families over one client.
#[derive(Debug, Clone)]
pub struct PortalApi {
    http: HttpClient,
}

impl PortalApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.http)
    }

    pub fn submissions(&self, kind: SubmissionKind) -> SubmissionApi<'_> {
        SubmissionApi::new(&self.http, kind)
    }
}
