//! Configuration loader for geoportal-cache
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "GEOPORTAL_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "GEOPORTAL_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "GEOPORTAL";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local overrides (optional)
/// 4. `GEOPORTAL_*` environment variables (highest priority)
///
/// `default.toml` is required whenever the configuration directory exists or
/// was named explicitly. A missing implicit `config/` directory means
/// built-in defaults plus environment variables.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Whether `config_dir` came from `GEOPORTAL_CONFIG_DIR`
    config_dir_explicit: bool,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`GEOPORTAL_CONFIG_DIR`)
    /// - Specific configuration file (`GEOPORTAL_CONFIG_FILE`)
    /// - Application environment (`GEOPORTAL_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `GEOPORTAL_CONFIG_DIR` and `GEOPORTAL_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let env_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && env_dir.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "GEOPORTAL_CONFIG_DIR and GEOPORTAL_CONFIG_FILE cannot both be set. \
                 Use GEOPORTAL_CONFIG_DIR for layered configuration or \
                 GEOPORTAL_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir_explicit: env_dir.is_some(),
            config_dir: env_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load a single configuration file plus environment variable overrides.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_dir_explicit: false,
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment read from `GEOPORTAL_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a required file is not found
    /// - configuration parsing fails
    /// - configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else if !self.config_dir_explicit && !self.config_dir.exists() {
            builder
        } else {
            self.build_layered_config(builder)?
        };

        // GEOPORTAL_HTTP__BASE_URL -> http.base_url
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!("Non UTF-8 configuration path: {}", path.display()))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }

    /// Environment variables with prefix `GEOPORTAL_` map to configuration keys,
    /// with `__` separating nested keys:
    /// - `GEOPORTAL_HTTP__TIMEOUT_SECONDS` -> `http.timeout_seconds`
    /// - `GEOPORTAL_DOMAINS__SUELO__PRECISION` -> `domains.suelo.precision`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}
