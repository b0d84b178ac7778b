//! HTTP client for the entry portal backend.
//!
//! Requests go to a configured base address, carry an `Authorization` header
//! derived from a [`TokenSource`], race a deadline, and always resolve to a
//! `{code, message, data}` [`Envelope`](portal_model::Envelope). Transport
//! failures never surface as errors.

mod client;
mod config;
mod error;
mod options;
mod response;
mod token;

pub use client::{HttpClient, TunnelStatus, join_url};
pub use config::{
    BASE_URL_ENV, DEFAULT_AUTH_SCHEME, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpConfig,
    TUNNEL_CHECK_TIMEOUT, UnauthorizedPolicy,
};
pub use error::{HttpError, Result};
pub use options::RequestOptions;
pub use response::{Normalized, REDIRECT_MESSAGE, UNAUTHORIZED_MESSAGE, normalize, parse_body};
pub use token::{NoToken, TokenSource, authorization_value};

pub use reqwest::Method;
