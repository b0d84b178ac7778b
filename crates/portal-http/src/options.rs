use std::time::Duration;

use serde_json::Value;

/// Per-call request settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters; `null` values are dropped.
    pub query: Vec<(String, Value)>,
    pub body: Option<Value>,
    /// Header overrides, applied after the defaults.
    pub headers: Vec<(String, String)>,
    /// Send without an `Authorization` header.
    pub skip_auth: bool,
    /// Overrides the configured deadline.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds every field of a JSON object as a query parameter.
    #[must_use]
    pub fn query_object(mut self, params: &Value) -> Self {
        if let Some(object) = params.as_object() {
            self.query
                .extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
