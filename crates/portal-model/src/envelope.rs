//! The `{code, message, data}` response wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code used for transport failures, timeouts and aborted requests.
pub const TRANSPORT_FAILURE: i64 = -1;

/// Code used for authorization failures, including redirects.
pub const UNAUTHORIZED: i64 = 401;

/// Uniform response shape returned by every HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T: Default> Envelope<T> {
    /// Envelope carrying no data, used for every failure kind.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: T::default(),
        }
    }
}

impl<T> Envelope<T> {
    pub fn new(code: i64, message: impl Into<String>, data: T) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Business success: code 0 or any 2xx code.
    pub fn is_success(&self) -> bool {
        self.code == 0 || (200..300).contains(&self.code)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == UNAUTHORIZED
    }

    pub fn is_transport_failure(&self) -> bool {
        self.code < 0
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            code: self.code,
            message: self.message,
            data: f(self.data),
        }
    }
}

impl Envelope<Value> {
    /// Deserializes `data` into `U`, or `None` if the shape does not match.
    pub fn data_as<U: DeserializeOwned>(&self) -> Option<U> {
        serde_json::from_value(self.data.clone()).ok()
    }

    /// Converts into a typed envelope, substituting `U::default()` for data
    /// that does not match.
    pub fn typed<U: DeserializeOwned + Default>(self) -> Envelope<U> {
        let data = serde_json::from_value(self.data).unwrap_or_default();
        Envelope {
            code: self.code,
            message: self.message,
            data,
        }
    }
}
