//! The four geoportal data domains and their fetch/admin operations.
//!
//! Every domain goes through the same [`DomainFetcher`]; what differs is
//! the [`DomainConfig`](crate::config::DomainConfig) it is called with.

mod admin;
mod fetcher;

pub use admin::{CacheAdmin, CacheInfo};
pub use fetcher::DomainFetcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Map layer backed by one API endpoint and one store partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Grazing parcels
    Potreros,
    /// Forest cover
    Bosques,
    /// Ranch perimeter
    Perimetro,
    /// Soil samples
    Suelo,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Potreros,
        Domain::Bosques,
        Domain::Perimetro,
        Domain::Suelo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Potreros => "potreros",
            Domain::Bosques => "bosques",
            Domain::Perimetro => "perimetro",
            Domain::Suelo => "suelo",
        }
    }
}

impl FromStr for Domain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation {
                field: "domain".to_string(),
                reason: format!(
                    "unknown domain '{}', expected one of: potreros, bosques, perimetro, suelo",
                    s
                ),
            })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
