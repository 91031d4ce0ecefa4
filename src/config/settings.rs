//! Configuration settings structures for geoportal-cache
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::domains::Domain;
use crate::geo::{OptimizationProfile, PropertyFilter};
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "geoportal-cache".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_base_url() -> String {
    "https://palma.gira360.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/geoportal-cache.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_storage_directory() -> String {
    "data/cache".to_string()
}

fn default_fallback_directory() -> String {
    "data/fallback".to_string()
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_precision() -> u32 {
    6
}

// ============================================================================
// Application
// ============================================================================

/// Application information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Settings for the GeoJSON API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// API origin every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for one request, in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,

    /// Connection establishment timeout, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Primary storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Disk,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Whether fetched collections are cached at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Primary backend type
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding the partitioned disk store
    #[serde(default = "default_storage_directory")]
    pub directory: String,

    /// Directory holding the flat fallback store
    #[serde(default = "default_fallback_directory")]
    pub fallback_directory: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: StorageBackend::default(),
            directory: default_storage_directory(),
            fallback_directory: default_fallback_directory(),
        }
    }
}

// ============================================================================
// Domains
// ============================================================================

/// Fetch and cache settings for one data domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Path appended to `http.base_url`
    pub endpoint_path: String,

    /// Cache key; embeds the schema version
    pub cache_key: String,

    /// Partition of the primary store
    pub store_name: String,

    /// Entries written under another version are never served fresh
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Freshness window in hours
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,

    /// Properties kept by the optimizer
    #[serde(default)]
    pub essential_props: Vec<String>,

    /// Keep every property instead of the allow-list
    #[serde(default)]
    pub retain_all_properties: bool,

    /// Decimal digits kept in coordinates
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Numeric property summed by collection statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_property: Option<String>,
}

impl DomainConfig {
    fn with_defaults(domain: Domain, essential_props: &[&str]) -> Self {
        let name = domain.as_str();
        Self {
            endpoint_path: format!("/{}", name),
            cache_key: format!("{}_data_v1", name),
            store_name: name.to_string(),
            schema_version: default_schema_version(),
            ttl_hours: default_ttl_hours(),
            essential_props: essential_props.iter().map(|p| p.to_string()).collect(),
            retain_all_properties: false,
            precision: default_precision(),
            area_property: None,
        }
    }

    /// Parcels; statistics sum `super_ha`.
    pub fn potreros() -> Self {
        Self {
            area_property: Some("super_ha".to_string()),
            ..Self::with_defaults(Domain::Potreros, &["id", "nombre", "super_ha", "url_drive"])
        }
    }

    /// Forest cover polygons.
    pub fn bosques() -> Self {
        Self {
            area_property: Some("super_ha".to_string()),
            ..Self::with_defaults(
                Domain::Bosques,
                &["id", "nombre", "vegetacion", "area", "super_ha"],
            )
        }
    }

    /// Ranch perimeter.
    pub fn perimetro() -> Self {
        Self::with_defaults(Domain::Perimetro, &["id", "nombre", "area", "perimetro"])
    }

    /// Soil sample points; popups show every attribute.
    pub fn suelo() -> Self {
        Self {
            retain_all_properties: true,
            precision: 5,
            ..Self::with_defaults(Domain::Suelo, &[])
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }

    pub fn profile(&self) -> OptimizationProfile {
        let filter = if self.retain_all_properties {
            PropertyFilter::RetainAll
        } else {
            PropertyFilter::AllowList(self.essential_props.clone())
        };
        OptimizationProfile {
            filter,
            precision: self.precision,
        }
    }
}

/// Per-domain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSettings {
    #[serde(default = "DomainConfig::potreros")]
    pub potreros: DomainConfig,

    #[serde(default = "DomainConfig::bosques")]
    pub bosques: DomainConfig,

    #[serde(default = "DomainConfig::perimetro")]
    pub perimetro: DomainConfig,

    #[serde(default = "DomainConfig::suelo")]
    pub suelo: DomainConfig,
}

impl DomainSettings {
    pub fn get(&self, domain: Domain) -> &DomainConfig {
        match domain {
            Domain::Potreros => &self.potreros,
            Domain::Bosques => &self.bosques,
            Domain::Perimetro => &self.perimetro,
            Domain::Suelo => &self.suelo,
        }
    }

    /// Partition names of every domain, in domain order.
    pub fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Domain::ALL
            .iter()
            .map(|domain| self.get(*domain).store_name.clone())
            .collect();
        names.dedup();
        names
    }
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            potreros: DomainConfig::potreros(),
            bosques: DomainConfig::bosques(),
            perimetro: DomainConfig::perimetro(),
            suelo: DomainConfig::suelo(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = self.console.into_console_config();
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl ConsoleSettings {
    /// Convert ConsoleSettings to ConsoleConfig
    pub fn into_console_config(self) -> ConsoleConfig {
        ConsoleConfig::new(self.enabled, self.colored)
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    /// Parse the format string into LogFormat enum
    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// API client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Cache storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-domain fetch configuration
    #[serde(default)]
    pub domains: DomainSettings,
}
