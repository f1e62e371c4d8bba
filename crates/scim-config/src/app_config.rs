//! Application configuration structures.

use scim_core::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Remote directory connection settings.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "scim-directory".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Connection settings for the remote SCIM directory.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the workspace, e.g. `https://example.cloud.databricks.com`.
    #[serde(default)]
    pub host: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("scim-directory/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl DirectoryConfig {
    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// The token never appears in logs.
impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("host", &self.host)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
