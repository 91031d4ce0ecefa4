//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domains::Domain;

/// Cache-first GeoJSON loader for the Hato La Palma geoportal
#[derive(Parser, Debug)]
#[command(name = "geoportal-cache")]
#[command(about = "Cache-first GeoJSON loader for the Hato La Palma geoportal")]
#[command(long_about = "
geoportal-cache resolves the geoportal's map layers (potreros, bosques,
perimetro, suelo). Each layer is served from the local cache while it is
fresh, refreshed from the API otherwise, and falls back to the last cached
copy when the API cannot be reached.

EXAMPLES:
    # Print the potreros layer as GeoJSON
    geoportal-cache fetch potreros --pretty

    # Load every layer into one file
    geoportal-cache fetch all --output layers.json

    # Show the state of every cache entry
    geoportal-cache info

    # Drop the cached bosques layer
    geoportal-cache purge bosques

    # Parcel count and total surface
    geoportal-cache stats potreros

    # Use a staging API with verbose logging
    geoportal-cache --env staging --base-url https://staging.example.com -v fetch suelo
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load a single TOML file instead of the layered `config/` directory.
    /// GEOPORTAL_* environment variables still override its values.
    ///
    /// Example: --config /etc/geoportal-cache/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// API origin override
    ///
    /// Replaces `http.base_url` from the configuration.
    ///
    /// Example: --base-url http://localhost:8080
    #[arg(long, value_name = "URL", value_parser = super::validation::validate_base_url)]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a layer and print it as GeoJSON
    ///
    /// Serves the cached copy while it is fresh, otherwise refreshes it from
    /// the API. With `all`, the four layers load concurrently and are printed
    /// as one object keyed by layer name.
    ///
    /// Examples:
    ///   geoportal-cache fetch bosques
    ///   geoportal-cache fetch all --output layers.json --pretty
    Fetch {
        /// Layer to resolve, or `all`
        #[arg(value_enum)]
        target: FetchTarget,

        /// Write the GeoJSON to FILE instead of stdout
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_output_path)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show cache state for one layer or all of them
    Info {
        /// Layer to inspect; all layers when omitted
        #[arg(value_parser = super::validation::validate_domain)]
        domain: Option<Domain>,
    },

    /// Delete cached layers
    ///
    /// Examples:
    ///   geoportal-cache purge suelo
    ///   geoportal-cache purge --all
    Purge {
        /// Layer to purge
        #[arg(value_parser = super::validation::validate_domain, required_unless_present = "all")]
        domain: Option<Domain>,

        /// Purge every layer
        #[arg(long, conflicts_with = "domain")]
        all: bool,
    },

    /// Feature count and total surface of a layer
    Stats {
        /// Layer to summarize
        #[arg(value_parser = super::validation::validate_domain)]
        domain: Domain,
    },
}

/// Target of the fetch command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchTarget {
    Potreros,
    Bosques,
    Perimetro,
    Suelo,
    All,
}

impl FetchTarget {
    /// The single domain, or `None` for `all`
    pub fn domain(self) -> Option<Domain> {
        match self {
            FetchTarget::Potreros => Some(Domain::Potreros),
            FetchTarget::Bosques => Some(Domain::Bosques),
            FetchTarget::Perimetro => Some(Domain::Perimetro),
            FetchTarget::Suelo => Some(Domain::Suelo),
            FetchTarget::All => None,
        }
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
