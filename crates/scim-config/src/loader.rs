//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use scim_core::DirectoryError;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Prefix of environment variables that override file settings,
/// e.g. `SCIM__DIRECTORY__HOST`.
pub const ENV_PREFIX: &str = "SCIM";

/// Selects the `{environment}.toml` layer.
pub const ENVIRONMENT_VAR: &str = "SCIM_ENVIRONMENT";

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local, uncommitted overrides
    /// 4. Environment variables with `SCIM__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, DirectoryError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, None)?;

        Ok(Self { config, config_dir })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, DirectoryError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the directory the configuration was read from.
    #[must_use]
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Loads configuration from the specified directory.
    ///
    /// `env_override` replaces the process environment (and `.env`) as the
    /// source of both `SCIM_ENVIRONMENT` and the `SCIM__` overrides.
    fn load_config(
        config_dir: &str,
        env_override: Option<HashMap<String, String>>,
    ) -> Result<AppConfig, DirectoryError> {
        let environment = match &env_override {
            Some(vars) => vars.get(ENVIRONMENT_VAR).cloned(),
            None => {
                // Load .env file if present
                if let Err(e) = dotenvy::dotenv() {
                    debug!("No .env file found or error loading it: {}", e);
                }
                std::env::var(ENVIRONMENT_VAR).ok()
            }
        }
        .unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (SCIM__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(env_override),
        );

        let config = builder.build().map_err(config_error_to_directory_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_directory_error)?;
        app_config.app.environment = environment;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), DirectoryError> {
        let directory = &config.directory;

        if directory.host.is_empty() {
            return Err(DirectoryError::Configuration("Directory host is required".to_string()));
        }

        let url = url::Url::parse(&directory.host).map_err(|e| {
            DirectoryError::Configuration(format!("Invalid directory host '{}': {}", directory.host, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DirectoryError::Configuration(format!(
                "Directory host must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if directory.token.is_empty() {
            return Err(DirectoryError::Configuration("Directory token is required".to_string()));
        }

        if directory.timeout_secs == 0 {
            return Err(DirectoryError::Configuration(
                "Directory timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn config_error_to_directory_error(err: ConfigError) -> DirectoryError {
    DirectoryError::Configuration(err.to_string())
}
