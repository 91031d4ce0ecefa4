//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use std::path::Path;

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};

/// Applies CLI overrides on top of file and environment configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the CLI points at
    ///
    /// With `config_path`, that single file is loaded; otherwise the layered
    /// loader reads `GEOPORTAL_CONFIG_DIR` (or `config/`). `environment`
    /// overrides `GEOPORTAL_APP_ENV`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_sources(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match environment {
            Some(environment) => loader.with_environment(environment),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// CLI arguments have the highest priority. The merged settings are
    /// validated again before being returned.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(base_url) = &cli.base_url {
            config.http.base_url = base_url.clone();
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
