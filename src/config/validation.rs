//! Configuration validation logic
//!
//! Validation methods for every configuration section, run after loading and
//! again after CLI overrides are merged.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DomainConfig, FileSettings, HttpConfig, LoggerSettings, Settings, StorageConfig,
};
use crate::domains::Domain;

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Largest coordinate precision an f64 can still represent meaningfully
const MAX_PRECISION: u32 = 15;

impl HttpConfig {
    /// # Validation Rules
    /// - Base URL must use http or https
    /// - Both timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "http.base_url",
                format!(
                    "Invalid base URL '{}'. Expected an http:// or https:// URL.",
                    self.base_url
                ),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl StorageConfig {
    /// Directories are only checked when storage is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.directory.trim().is_empty() {
            return Err(ConfigError::validation(
                "storage.directory",
                "Storage directory is required when storage is enabled.",
            ));
        }

        if self.fallback_directory.trim().is_empty() {
            return Err(ConfigError::validation(
                "storage.fallback_directory",
                "Fallback directory is required when storage is enabled.",
            ));
        }

        Ok(())
    }
}

impl DomainConfig {
    /// # Validation Rules
    /// - Endpoint path must start with `/`
    /// - Cache key, store name and schema version must not be empty
    /// - TTL must be greater than 0 hours
    /// - Precision must not exceed 15 digits
    /// - The allow-list must not be empty unless every property is retained
    pub fn validate(&self, domain: Domain) -> Result<(), ConfigError> {
        let field = |name: &str| format!("domains.{}.{}", domain, name);

        if !self.endpoint_path.starts_with('/') {
            return Err(ConfigError::validation(
                field("endpoint_path"),
                format!(
                    "Endpoint path '{}' must start with '/'.",
                    self.endpoint_path
                ),
            ));
        }

        for (name, value) in [
            ("cache_key", &self.cache_key),
            ("store_name", &self.store_name),
            ("schema_version", &self.schema_version),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::validation(
                    field(name),
                    format!("{} must not be empty.", name),
                ));
            }
        }

        if self.ttl_hours == 0 {
            return Err(ConfigError::validation(
                field("ttl_hours"),
                "TTL must be greater than 0 hours.",
            ));
        }

        if self.precision > MAX_PRECISION {
            return Err(ConfigError::validation(
                field("precision"),
                format!(
                    "Precision {} exceeds the maximum of {} digits.",
                    self.precision, MAX_PRECISION
                ),
            ));
        }

        if !self.retain_all_properties && self.essential_props.is_empty() {
            return Err(ConfigError::validation(
                field("essential_props"),
                "At least one essential property is required unless retain_all_properties is set.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.http.validate()?;
        self.storage.validate()?;
        for domain in Domain::ALL {
            self.domains.get(domain).validate(domain)?;
        }
        Ok(())
    }
}
