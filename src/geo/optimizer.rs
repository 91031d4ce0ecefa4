//! Payload optimizer.
//!
//! Strips non-essential attributes and rounds coordinate precision before a
//! collection is persisted, keeping stored entries small.

use serde_json::{Map, Value};

use super::types::{Feature, FeatureCollection};

/// Which feature properties survive optimization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyFilter {
    /// Keep every property.
    RetainAll,
    /// Keep only the named properties.
    AllowList(Vec<String>),
}

impl PropertyFilter {
    fn apply(&self, properties: &Map<String, Value>) -> Map<String, Value> {
        match self {
            PropertyFilter::RetainAll => properties.clone(),
            PropertyFilter::AllowList(names) => properties
                .iter()
                .filter(|(name, _)| names.iter().any(|allowed| allowed == *name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

/// Per-domain optimization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationProfile {
    pub filter: PropertyFilter,
    /// Decimal digits kept in every coordinate.
    pub precision: u32,
}

/// Size statistics for one optimization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationReport {
    pub original_bytes: usize,
    pub optimized_bytes: usize,
    pub reduction_percent: f64,
}

impl OptimizationReport {
    fn new(original_bytes: usize, optimized_bytes: usize) -> Self {
        let reduction_percent = if original_bytes == 0 {
            0.0
        } else {
            (original_bytes as f64 - optimized_bytes as f64) / original_bytes as f64 * 100.0
        };
        Self {
            original_bytes,
            optimized_bytes,
            reduction_percent,
        }
    }
}

/// Optimize a collection according to `profile`.
pub fn optimize(raw: &FeatureCollection, profile: &OptimizationProfile) -> FeatureCollection {
    FeatureCollection::new(
        raw.features
            .iter()
            .map(|feature| optimize_feature(feature, profile))
            .collect(),
    )
}

/// Optimize a collection and measure how much smaller it got.
pub fn optimize_with_report(
    raw: &FeatureCollection,
    profile: &OptimizationProfile,
) -> (FeatureCollection, OptimizationReport) {
    let optimized = optimize(raw, profile);
    let report = OptimizationReport::new(raw.serialized_size(), optimized.serialized_size());
    (optimized, report)
}

fn optimize_feature(feature: &Feature, profile: &OptimizationProfile) -> Feature {
    Feature {
        kind: feature.kind.clone(),
        // Identity, not an attribute: never filtered.
        id: feature.id.clone(),
        geometry: feature
            .geometry
            .as_ref()
            .map(|geometry| geometry.rounded(profile.precision)),
        properties: profile.filter.apply(&feature.properties),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::types::{Coordinates, Geometry, GeometryKind};
    use proptest::prelude::*;
    use serde_json::json;

    fn allow(names: &[&str]) -> OptimizationProfile {
        OptimizationProfile {
            filter: PropertyFilter::AllowList(names.iter().map(|n| n.to_string()).collect()),
            precision: 6,
        }
    }

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn polygon(coordinates: Vec<[f64; 2]>) -> Geometry {
        Geometry::new(
            GeometryKind::Polygon,
            Coordinates::Nested(vec![Coordinates::Nested(
                coordinates
                    .into_iter()
                    .map(|[x, y]| Coordinates::Position(vec![x, y]))
                    .collect(),
            )]),
        )
    }

    #[test]
    fn test_feature_id_is_not_filtered_by_allow_list() {
        let mut feature = Feature::new(None, props(json!({"id": 1, "nombre": "A"})));
        feature.id = Some(json!("potrero-1"));
        let raw = FeatureCollection::new(vec![feature]);

        let optimized = optimize(&raw, &allow(&["nombre"]));

        assert_eq!(optimized.features[0].id, Some(json!("potrero-1")));
        assert_eq!(
            optimized.features[0].properties,
            props(json!({"nombre": "A"}))
        );
    }

    #[test]
    fn test_allow_list_keeps_only_essential_properties() {
        let raw = FeatureCollection::new(vec![Feature::new(
            None,
            props(json!({"id": 1, "nombre": "A", "extra": "drop me"})),
        )]);

        let optimized = optimize(&raw, &allow(&["id", "nombre"]));

        assert_eq!(
            optimized.features[0].properties,
            props(json!({"id": 1, "nombre": "A"}))
        );
    }

    #[test]
    fn test_retain_all_keeps_every_property() {
        let properties = props(json!({"id": 7, "fertilidad": "alta", "ph": 5.4, "mo": 2.1}));
        let raw = FeatureCollection::new(vec![Feature::new(None, properties.clone())]);
        let profile = OptimizationProfile {
            filter: PropertyFilter::RetainAll,
            precision: 5,
        };

        let optimized = optimize(&raw, &profile);
        assert_eq!(optimized.features[0].properties, properties);
    }

    #[test]
    fn test_polygon_coordinates_rounded_to_six_decimals() {
        let raw = FeatureCollection::new(vec![Feature::new(
            Some(polygon(vec![[9.1234567, -68.3456789]])),
            Map::new(),
        )]);

        let optimized = optimize(&raw, &allow(&["id"]));
        let geometry = optimized.features[0].geometry.as_ref().unwrap();

        assert_eq!(
            geometry.coordinates,
            Coordinates::Nested(vec![Coordinates::Nested(vec![Coordinates::Position(
                vec![9.123457, -68.345679]
            )])])
        );
    }

    #[test]
    fn test_multipolygon_and_point_rounded_uniformly() {
        let multi = Geometry::new(
            GeometryKind::MultiPolygon,
            Coordinates::Nested(vec![Coordinates::Nested(vec![Coordinates::Nested(vec![
                Coordinates::Position(vec![1.1234564, 2.9999999]),
            ])])]),
        );
        let point = Geometry::new(
            GeometryKind::Point,
            Coordinates::Position(vec![1.1234564, 2.9999999]),
        );
        let raw = FeatureCollection::new(vec![
            Feature::new(Some(multi), Map::new()),
            Feature::new(Some(point), Map::new()),
        ]);

        let optimized = optimize(&raw, &allow(&[]));

        assert_eq!(
            optimized.features[0].geometry.as_ref().unwrap().coordinates,
            Coordinates::Nested(vec![Coordinates::Nested(vec![Coordinates::Nested(vec![
                Coordinates::Position(vec![1.123456, 3.0]),
            ])])])
        );
        assert_eq!(
            optimized.features[1].geometry.as_ref().unwrap().coordinates,
            Coordinates::Position(vec![1.123456, 3.0])
        );
    }

    #[test]
    fn test_report_measures_reduction() {
        let raw = FeatureCollection::new(vec![Feature::new(
            Some(polygon(vec![[9.123456789, -68.123456789]])),
            props(json!({"id": 1, "descripcion": "a fairly long description that gets dropped"})),
        )]);

        let (optimized, report) = optimize_with_report(&raw, &allow(&["id"]));

        assert_eq!(optimized.len(), 1);
        assert!(report.optimized_bytes < report.original_bytes);
        assert!(report.reduction_percent > 0.0 && report.reduction_percent < 100.0);
    }

    #[test]
    fn test_report_handles_empty_input() {
        let report = OptimizationReport::new(0, 0);
        assert_eq!(report.reduction_percent, 0.0);
    }

    fn arb_feature() -> impl Strategy<Value = Feature> {
        (
            prop::collection::vec((-180.0f64..180.0, -90.0f64..90.0), 1..8),
            prop::collection::btree_map("[a-z_]{1,8}", any::<i32>(), 0..6),
        )
            .prop_map(|(ring, properties)| {
                let geometry = polygon(ring.into_iter().map(|(x, y)| [x, y]).collect());
                let properties = properties
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect();
                Feature::new(Some(geometry), properties)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Re-optimizing already optimized data leaves its structure alone.
        #[test]
        fn prop_optimize_is_idempotent_on_structure(
            features in prop::collection::vec(arb_feature(), 0..10),
            keep in prop::collection::vec("[a-z_]{1,8}", 0..4),
        ) {
            let raw = FeatureCollection::new(features);
            let profile = OptimizationProfile {
                filter: PropertyFilter::AllowList(keep),
                precision: 6,
            };

            let once = optimize(&raw, &profile);
            let twice = optimize(&once, &profile);

            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.features.iter().zip(twice.features.iter()) {
                let keys_a: Vec<_> = a.properties.keys().collect();
                let keys_b: Vec<_> = b.properties.keys().collect();
                prop_assert_eq!(keys_a, keys_b);
            }
        }

        /// Rounding never changes how many positions a geometry has.
        #[test]
        fn prop_rounding_preserves_position_count(feature in arb_feature(), precision in 0u32..10) {
            let geometry = feature.geometry.unwrap();
            let rounded = geometry.rounded(precision);
            prop_assert_eq!(
                geometry.coordinates.position_count(),
                rounded.coordinates.position_count()
            );
        }
    }
}
