//! geoportal-cache library
//!
//! Cache-first loading of the geoportal's GeoJSON layers: fresh entries come
//! from local storage, stale ones are refreshed from the API, and the last
//! cached copy stands in whenever the API cannot be reached.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod domains;
pub mod error;
pub mod external;
pub mod geo;
pub mod logger;
pub mod services;
pub mod store;

pub use domains::Domain;
pub use error::{AppError, AppResult};
pub use services::GeoDataService;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
