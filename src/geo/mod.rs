//! GeoJSON model, payload optimizer and collection statistics.

pub mod optimizer;
pub mod stats;
pub mod types;

pub use optimizer::{
    OptimizationProfile, OptimizationReport, PropertyFilter, optimize, optimize_with_report,
};
pub use stats::CollectionStats;
pub use types::{Coordinates, Feature, FeatureCollection, Geometry, GeometryKind};
