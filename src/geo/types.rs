//! GeoJSON data types served by the domain endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

/// GeoJSON allows `"properties": null`; treat it as an empty mapping.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Supported geometry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

/// Coordinate tree of a geometry.
///
/// A position is a flat list of numbers; every other level is a list of
/// nested coordinate trees. This keeps Point, Polygon and MultiPolygon in
/// one representation so transforms apply regardless of nesting depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
    Position(Vec<f64>),
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// Round every numeric leaf to `precision` decimal digits.
    ///
    /// Order of rings and positions is preserved.
    pub fn rounded(&self, precision: u32) -> Self {
        match self {
            Coordinates::Position(values) => Coordinates::Position(
                values
                    .iter()
                    .map(|value| round_to(*value, precision))
                    .collect(),
            ),
            Coordinates::Nested(children) => Coordinates::Nested(
                children
                    .iter()
                    .map(|child| child.rounded(precision))
                    .collect(),
            ),
        }
    }

    /// Number of positions in the tree.
    pub fn position_count(&self) -> usize {
        match self {
            Coordinates::Position(_) => 1,
            Coordinates::Nested(children) => children.iter().map(Self::position_count).sum(),
        }
    }
}

/// Round a single value to `precision` decimal digits.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Coordinates,
}

impl Geometry {
    pub fn new(kind: GeometryKind, coordinates: Coordinates) -> Self {
        Self { kind, coordinates }
    }

    pub fn rounded(&self, precision: u32) -> Self {
        Self {
            kind: self.kind,
            coordinates: self.coordinates.rounded(precision),
        }
    }
}

/// One geometry plus its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry,
            properties,
        }
    }
}

/// Ordered set of features; the unit every domain fetch returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parse and validate a response body.
    ///
    /// The body must be a JSON object whose `features` member is an array,
    /// and every feature must carry a supported geometry.
    pub fn from_slice(body: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| AppError::SchemaValidation {
            reason: format!("response body is not valid JSON: {}", e),
        })?;

        match value.get("features") {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(AppError::SchemaValidation {
                    reason: "`features` is not an array".to_string(),
                });
            }
            None => {
                return Err(AppError::SchemaValidation {
                    reason: "expected a GeoJSON object with `features`".to_string(),
                });
            }
        }

        serde_json::from_value(value).map_err(|e| AppError::SchemaValidation {
            reason: format!("malformed feature: {}", e),
        })
    }

    /// Size of the compact JSON serialization in bytes.
    pub fn serialized_size(&self) -> usize {
        serde_json::to_vec(self).map(|bytes| bytes.len()).unwrap_or(0)
    }
}
