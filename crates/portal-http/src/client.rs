//! The portal HTTP client.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use portal_model::{Envelope, TRANSPORT_FAILURE};
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::config::{HttpConfig, TUNNEL_CHECK_TIMEOUT, UnauthorizedPolicy};
use crate::error::{HttpError, Result};
use crate::options::RequestOptions;
use crate::response::normalize;
use crate::token::{TokenSource, authorization_value};

/// Body marker of a tunnel provider page for an unknown tunnel.
static TUNNEL_NOT_FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Tunnel.*not found").expect("Invalid tunnel regex"));

/// Result of [`HttpClient::check_tunnel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TunnelStatus {
    pub ok: bool,
    /// HTTP status, or -1 when the probe never got a response.
    pub status: i64,
    pub message: String,
}

/// JSON client for the portal backend.
///
/// Every request method resolves to an [`Envelope`]; transport failures and
/// timeouts come back with code -1 instead of an error.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<HttpConfig>,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client. Redirects are never followed.
    pub fn new(config: HttpConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
            tokens,
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenSource> {
        &self.tokens
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Envelope {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Envelope {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Envelope {
        self.request(Method::PUT, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> Envelope {
        self.request(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Envelope {
        self.request(Method::DELETE, path, options).await
    }

    /// Sends one request and normalizes whatever comes back.
    pub async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Envelope {
        let timeout = options
            .timeout
            .unwrap_or_else(|| self.config.request_timeout());

        let builder = match self.prepare(method.clone(), path, &options) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::error!(%method, path, error = %e, "failed to build request");
                return Envelope::failure(TRANSPORT_FAILURE, e.to_string());
            }
        };

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        // Dropping the future on expiry aborts the connection.
        match tokio::time::timeout(timeout, exchange).await {
            Err(_) => {
                let e = HttpError::Timeout {
                    ms: timeout.as_millis(),
                };
                tracing::warn!(%method, path, "{e}");
                Envelope::failure(TRANSPORT_FAILURE, e.to_string())
            }
            Ok(Err(e)) => {
                tracing::error!(%method, path, error = %e, "request failed");
                Envelope::failure(TRANSPORT_FAILURE, e.to_string())
            }
            Ok(Ok((status, text))) => self.finish(&method, path, status, &text),
        }
    }

    /// Fetches raw bytes; `None` on any failure or non-success status.
    pub async fn download(&self, path: &str) -> Option<Vec<u8>> {
        let timeout = self.config.request_timeout();
        let builder = match self.prepare(Method::GET, path, &RequestOptions::default()) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::error!(path, error = %e, "failed to build download request");
                return None;
            }
        };
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };
        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok((status, bytes))) if status.is_success() => {
                tracing::debug!(path, bytes = bytes.len(), "download finished");
                Some(bytes.to_vec())
            }
            Ok(Ok((status, _))) => {
                tracing::warn!(path, %status, "download failed");
                None
            }
            Ok(Err(e)) => {
                tracing::error!(path, error = %e, "download failed");
                None
            }
            Err(_) => {
                tracing::warn!(path, "download timed out");
                None
            }
        }
    }

    /// Probes the backend address and flags tunnel "not found" pages.
    pub async fn check_tunnel(&self, path: &str) -> TunnelStatus {
        let options = RequestOptions::new().skip_auth();
        let builder = match self.prepare(Method::GET, path, &options) {
            Ok(builder) => builder,
            Err(e) => {
                return TunnelStatus {
                    ok: false,
                    status: TRANSPORT_FAILURE,
                    message: e.to_string(),
                };
            }
        };
        tracing::info!(path, "checking tunnel");
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };
        match tokio::time::timeout(TUNNEL_CHECK_TIMEOUT, exchange).await {
            Ok(Ok((status, text))) => {
                let status = i64::from(status.as_u16());
                if TUNNEL_NOT_FOUND.is_match(&text) {
                    tracing::warn!(status, "tunnel not found");
                    TunnelStatus {
                        ok: false,
                        status,
                        message: "Tunnel not found".to_string(),
                    }
                } else {
                    tracing::info!(status, "tunnel ok");
                    TunnelStatus {
                        ok: true,
                        status,
                        message: "ok".to_string(),
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!(path, error = %e, "tunnel check failed");
                TunnelStatus {
                    ok: false,
                    status: TRANSPORT_FAILURE,
                    message: e.to_string(),
                }
            }
            Err(_) => TunnelStatus {
                ok: false,
                status: TRANSPORT_FAILURE,
                message: HttpError::Timeout {
                    ms: TUNNEL_CHECK_TIMEOUT.as_millis(),
                }
                .to_string(),
            },
        }
    }

    /// Full URL for `path` with `query` appended.
    pub fn url_for(&self, path: &str, query: &[(String, Value)]) -> Result<Url> {
        let joined = join_url(&self.config.base_url, path);
        let mut url = Url::parse(&joined).map_err(|e| HttpError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        let pairs: Vec<(&str, String)> = query
            .iter()
            .filter_map(|(key, value)| query_value(value).map(|v| (key.as_str(), v)))
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.url_for(path, &options.query)?;
        let headers = self.headers(options)?;
        tracing::debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        Ok(builder)
    }

    fn headers(&self, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if options.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| HttpError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        if !options.skip_auth
            && !headers.contains_key(AUTHORIZATION)
            && let Some(token) = self.tokens.token().filter(|t| !t.is_empty())
        {
            let value = authorization_value(&token, &self.config.auth_scheme);
            let value = HeaderValue::from_str(&value)
                .map_err(|_| HttpError::InvalidHeader(AUTHORIZATION.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn finish(&self, method: &Method, path: &str, status: StatusCode, text: &str) -> Envelope {
        let preview: String = text.chars().take(120).collect();
        tracing::debug!(%method, path, status = status.as_u16(), body = %preview, "response received");

        let normalized = normalize(status, text);
        if normalized.unauthorized {
            tracing::warn!(
                %method,
                path,
                status = status.as_u16(),
                message = %normalized.envelope.message,
                "request was not authorized"
            );
            if self.config.unauthorized == UnauthorizedPolicy::ClearSession {
                self.tokens.invalidate();
            }
        }
        normalized.envelope
    }
}

/// Joins a base address and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
