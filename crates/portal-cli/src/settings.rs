//! `PortalConfig` persistence.
//!
//! The config file lives in the platform-specific config folder unless
//! `--config` names another one:
//! - macOS: ~/Library/Application Support/org.entry-portal.Entry Portal/
//! - Windows: %APPDATA%/entry-portal/Entry Portal/config/
//! - Linux: ~/.config/entryportal/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use portal_http::HttpConfig;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "entry-portal";
const APP_NAME: &str = "Entry Portal";
const CONFIG_FILENAME: &str = "config.toml";
const SESSION_FILENAME: &str = "session.json";

/// Everything the binary reads from its config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub http: HttpConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session file; defaults to the platform data folder.
    pub store_path: Option<PathBuf>,
    /// Keep logins for the long token lifetime unless `--remember` says so.
    pub remember: bool,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default config file location.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl PortalConfig {
    /// Loads `path`, or the default location when `None`.
    ///
    /// Falls back to defaults when the file is missing, unreadable or
    /// invalid. The base URL environment override is applied last.
    pub fn load(path: Option<&Path>) -> Self {
        let config = match path.map(Path::to_path_buf).or_else(config_path) {
            Some(path) => Self::read(&path),
            None => {
                tracing::warn!("could not determine config path, using defaults");
                Self::default()
            }
        };
        config.with_env_override()
    }

    fn read(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "invalid config file, using defaults: {e}");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read config file, using defaults: {e}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn with_env_override(mut self) -> Self {
        self.http = self.http.with_env_override();
        self
    }

    /// Where the session store is kept.
    pub fn session_path(&self) -> PathBuf {
        self.session.store_path.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || PathBuf::from(SESSION_FILENAME),
                |dirs| dirs.data_dir().join(SESSION_FILENAME),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[http]\nbase_url = \"https://portal.example\"\n\n[session]\nremember = true\n",
        )
        .unwrap();

        let config = PortalConfig::read(&path);
        assert_eq!(config.http.base_url, "https://portal.example");
        assert_eq!(config.http.timeout_ms, 15_000);
        assert!(config.session.remember);
        assert_eq!(config.session.store_path, None);
    }

    #[test]
    fn test_unreadable_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "http = [").unwrap();
        assert_eq!(PortalConfig::read(&path), PortalConfig::default());
        assert_eq!(PortalConfig::read(&dir.path().join("missing.toml")), PortalConfig::default());
    }

    #[test]
    fn test_session_path_override() {
        let mut config = PortalConfig::default();
        config.session.store_path = Some(PathBuf::from("/tmp/s.json"));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/s.json"));
    }
}
