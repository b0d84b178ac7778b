//! Route changes requested by the auth flow.

use std::sync::Mutex;

/// Receives navigation requests. The routing layer itself lives elsewhere.
pub trait Navigator: Send + Sync {
    /// Replaces the current route with `path`.
    fn replace(&self, path: &str);
}

/// Logs navigation requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn replace(&self, path: &str) {
        tracing::info!(path, "navigate");
    }
}

/// Remembers every requested route.
#[derive(Debug, Default)]
pub struct RouteLog {
    routes: Mutex<Vec<String>>,
}

impl RouteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent route, if any.
    pub fn current(&self) -> Option<String> {
        self.routes
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }
}

impl Navigator for RouteLog {
    fn replace(&self, path: &str) {
        if let Ok(mut guard) = self.routes.lock() {
            guard.push(path.to_string());
        }
    }
}
