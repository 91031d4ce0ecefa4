//! Configuration management module for geoportal-cache
//!
//! Layered loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `GEOPORTAL_*` environment variables
//!
//! Without a configuration directory every section falls back to its
//! built-in defaults, so the binary runs against the public API out of the box.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{DomainConfig, DomainSettings, HttpConfig, Settings, StorageBackend, StorageConfig};
