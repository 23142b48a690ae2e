//! # Feature Model
//!
//! Decoded vector tile features as the mesh generators consume them, plus
//! the per-tile context shared read-only by every feature of a tile.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A property value attached to a feature.
///
/// Deserializes from plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Numeric value
    Number(f64),
    /// String value
    Text(String),
    /// Boolean value
    Bool(bool),
}

impl PropertyValue {
    /// Numeric view of the value. Text is parsed, booleans are not numbers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tile_mesh::PropertyValue;
    ///
    /// assert_eq!(PropertyValue::Number(12.0).as_f64(), Some(12.0));
    /// assert_eq!(PropertyValue::Text(" 7.5 ".into()).as_f64(), Some(7.5));
    /// assert_eq!(PropertyValue::Bool(true).as_f64(), None);
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Geometry type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Point features produce no mesh.
    Point,
    /// Every ring is an open polyline.
    Line,
    /// Rings are outer boundaries (clockwise) and holes (counter-clockwise).
    Polygon,
}

/// A decoded feature: rings of tile-local points plus properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier, also used to seed per-feature randomness.
    pub id: u64,
    /// Geometry type.
    pub kind: GeometryKind,
    /// Point rings in tile-local units, `y` up.
    pub rings: Vec<Vec<DVec3>>,
    /// Attribute map.
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Feature {
    /// Creates a feature with no rings and no properties.
    pub fn new(id: u64, kind: GeometryKind) -> Self {
        Self {
            id,
            kind,
            rings: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Adds a ring.
    pub fn with_ring(mut self, ring: Vec<DVec3>) -> Self {
        self.rings.push(ring);
        self
    }

    /// Sets a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Numeric value of a property, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(PropertyValue::as_f64)
    }

    /// Total point count across all rings.
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

/// Per-tile values every generator reads but never writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileContext {
    /// Local units per normalized tile unit.
    pub scale: f64,
    /// Tile extent in normalized units.
    pub size: DVec2,
    /// Offset of the feature inside the tile, in local units.
    pub position_in_tile: DVec3,
}

impl Default for TileContext {
    fn default() -> Self {
        Self {
            scale: 1.0,
            size: DVec2::ONE,
            position_in_tile: DVec3::ZERO,
        }
    }
}

impl TileContext {
    /// Creates a context with no feature offset.
    pub fn new(scale: f64, size: DVec2) -> Self {
        Self {
            scale,
            size,
            position_in_tile: DVec3::ZERO,
        }
    }

    /// Position of a local point relative to the tile's bottom-left
    /// corner, in `0..1` for points inside the tile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::{DVec2, DVec3};
    /// use tile_mesh::TileContext;
    ///
    /// let tile = TileContext::new(2.0, DVec2::splat(100.0));
    /// assert_eq!(tile.normalized(DVec3::ZERO), DVec2::splat(0.5));
    /// assert_eq!(tile.normalized(DVec3::new(-100.0, 7.0, 100.0)), DVec2::new(0.0, 1.0));
    /// ```
    pub fn normalized(&self, point: DVec3) -> DVec2 {
        let local = DVec2::new(
            point.x + self.position_in_tile.x,
            point.z + self.position_in_tile.z,
        );
        (local / self.scale + self.size / 2.0) / self.size
    }

    /// Side length of the tile in local units.
    #[inline]
    pub fn local_size(&self) -> f64 {
        self.size.x * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_from_json() {
        let feature: Feature = serde_json::from_str(
            r#"{
                "id": 7,
                "kind": "polygon",
                "rings": [[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0]]],
                "properties": {"height": 12.5, "min_height": "2", "name": "hall", "underground": false}
            }"#,
        )
        .expect("valid feature json");

        assert_eq!(feature.kind, GeometryKind::Polygon);
        assert_eq!(feature.point_count(), 3);
        assert_eq!(feature.number("height"), Some(12.5));
        assert_eq!(feature.number("min_height"), Some(2.0));
        assert_eq!(feature.number("name"), None);
        assert_eq!(feature.number("underground"), None);
        assert_eq!(feature.number("missing"), None);
    }

    #[test]
    fn test_builder_helpers() {
        let feature = Feature::new(1, GeometryKind::Line)
            .with_ring(vec![DVec3::ZERO, DVec3::X])
            .with_property("ele", 40.0)
            .with_property("class", "path");
        assert_eq!(feature.rings.len(), 1);
        assert_eq!(feature.number("ele"), Some(40.0));
        assert_eq!(
            feature.properties.get("class"),
            Some(&PropertyValue::Text("path".into()))
        );
    }

    #[test]
    fn test_normalized_applies_offset() {
        let tile = TileContext {
            scale: 1.0,
            size: DVec2::splat(10.0),
            position_in_tile: DVec3::new(5.0, 0.0, -5.0),
        };
        assert_eq!(tile.normalized(DVec3::ZERO), DVec2::new(1.0, 0.0));
        assert_eq!(tile.local_size(), 10.0);
    }
}
