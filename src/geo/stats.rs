//! Summary statistics over a feature collection.

use serde::Serialize;
use serde_json::Value;

use super::types::FeatureCollection;

/// Feature count and summed surface of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub feature_count: usize,
    /// Sum of the area property in hectares, when the domain has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_area_ha: Option<f64>,
}

impl CollectionStats {
    /// Compute statistics, summing `area_property` over every feature.
    ///
    /// Missing or non-numeric area values count as zero.
    pub fn compute(collection: &FeatureCollection, area_property: Option<&str>) -> Self {
        let total_area_ha = area_property.map(|name| {
            collection
                .features
                .iter()
                .map(|feature| numeric(feature.properties.get(name)))
                .sum()
        });

        Self {
            feature_count: collection.len(),
            total_area_ha,
        }
    }
}

fn numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
