//! Logging initialisation.
//!
//! Library crates only emit `tracing` events; binaries call [`init_logging`]
//! once at startup to install a subscriber.

use crate::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Whether to enable console output at all.
    #[serde(default = "default_console_output")]
    pub console_output: bool,
}

fn default_filter() -> String {
    "info,scim=debug".to_string()
}

fn default_console_output() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            console_output: default_console_output(),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`.
pub fn init_logging(config: &LoggingConfig) -> DirectoryResult<()> {
    if !config.console_output {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| DirectoryError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    debug!(filter = %config.filter, json = config.json, "Logging initialized");
    Ok(())
}
