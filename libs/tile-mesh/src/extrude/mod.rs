//! # Height Extrusion
//!
//! Raises a roof to its resolved height and hangs a wall quad under every
//! boundary edge the polygon builder recorded.
//!
//! ## Height Resolution
//!
//! In priority order:
//!
//! 1. A forced height from the options, scaled to tile units
//! 2. The height property (clamped into `height_range` when set), minus the
//!    `min_height` property
//! 3. The `ele` property
//!
//! A feature with none of these resolves to zero height and gets no walls.
//!
//! ## Wall Layout
//!
//! Every boundary edge `v1 -> v2` produces four vertices `v1, v2, v1 - h,
//! v2 - h` with the outward edge normal and UVs `(0,0) (d,0) (0,-h) (d,-h)`
//! where `d` is the edge length, so textures tile seamlessly along walls.

mod floors;
mod walls;

pub use floors::{BuildingModule, FloorExtruder, FloorOptions, WallBatch, WallTemplate};

pub(crate) use walls::push_wall_quad;

use crate::error::{require_positive, MeshError, Result};
use crate::feature::Feature;
use crate::mesh_data::MeshData;
use crate::polygon::chamfer_rings;
use serde::{Deserialize, Serialize};

/// Property holding the base height of a feature.
pub const MIN_HEIGHT_PROPERTY: &str = "min_height";

/// Property holding an elevation used when no height is given.
pub const ELEVATION_PROPERTY: &str = "ele";

/// Which parts of an extruded feature are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrusionGeometry {
    /// Raised roof plus walls.
    #[default]
    RoofAndSide,
    /// Raised roof, no walls.
    RoofOnly,
    /// Walls under the roof outline, roof left in place.
    SideOnly,
}

/// How a slanted roof is leveled before the walls are hung.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofLevel {
    /// Every vertex keeps its slant and rises by the same amount.
    #[default]
    Slanted,
    /// Flat roof at the highest vertex; walls grow to reach the lowest.
    Highest,
    /// Flat roof at the lowest vertex; walls keep the resolved height.
    Lowest,
}

/// Extrusion options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionOptions {
    /// Generated parts.
    pub geometry: ExtrusionGeometry,
    /// Property read for the feature height.
    pub property_name: String,
    /// Height used for every feature, ignoring properties.
    pub force_height: Option<f64>,
    /// Clamp applied to the height property, `(min, max)`.
    pub height_range: Option<(f64, f64)>,
    /// Roof leveling.
    pub roof_level: RoofLevel,
    /// Put walls in their own submesh.
    pub separate_submesh: bool,
    /// Bevel the roof rim by this many tile units.
    pub chamfer: Option<f64>,
}

impl Default for ExtrusionOptions {
    fn default() -> Self {
        Self {
            geometry: ExtrusionGeometry::RoofAndSide,
            property_name: "height".to_string(),
            force_height: None,
            height_range: None,
            roof_level: RoofLevel::Slanted,
            separate_submesh: false,
            chamfer: None,
        }
    }
}

impl ExtrusionOptions {
    /// Checks that every numeric option is usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(h) = self.force_height {
            if !h.is_finite() {
                return Err(MeshError::invalid_options(format!(
                    "force_height must be finite, got {h}"
                )));
            }
        }
        if let Some((min, max)) = self.height_range {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(MeshError::invalid_options(format!(
                    "height_range ({min}, {max}) must be finite with min <= max"
                )));
            }
        }
        if let Some(offset) = self.chamfer {
            require_positive("chamfer", offset)?;
        }
        Ok(())
    }
}

/// Wall height and base offset for one feature, in tile units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedHeight {
    /// Distance from the roof down to the wall bottom.
    pub height: f64,
    /// Distance from the ground up to the wall bottom.
    pub min_height: f64,
}

/// Resolves the extrusion height of `feature`.
///
/// # Example
///
/// ```rust
/// use tile_mesh::extrude::{resolve_height, ExtrusionOptions};
/// use tile_mesh::{Feature, GeometryKind};
///
/// let feature = Feature::new(1, GeometryKind::Polygon)
///     .with_property("height", 20.0)
///     .with_property("min_height", 5.0);
/// let resolved = resolve_height(&feature, &ExtrusionOptions::default(), 2.0);
/// assert_eq!(resolved.height, 30.0);
/// assert_eq!(resolved.min_height, 10.0);
/// ```
pub fn resolve_height(feature: &Feature, options: &ExtrusionOptions, scale: f64) -> ResolvedHeight {
    if let Some(forced) = options.force_height {
        return ResolvedHeight {
            height: forced * scale,
            min_height: 0.0,
        };
    }

    if let Some(mut height) = feature.number(&options.property_name) {
        if let Some((low, high)) = options.height_range {
            height = height.clamp(low, high);
        }
        let min = feature.number(MIN_HEIGHT_PROPERTY).unwrap_or(0.0);
        return ResolvedHeight {
            height: (height - min) * scale,
            min_height: min * scale,
        };
    }

    ResolvedHeight {
        height: feature.number(ELEVATION_PROPERTY).unwrap_or(0.0) * scale,
        min_height: 0.0,
    }
}

/// Extrudes roofs into buildings.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rand::{rngs::StdRng, SeedableRng};
/// use tile_mesh::extrude::{Extruder, ExtrusionOptions};
/// use tile_mesh::polygon::{PolygonBuilder, PolygonScratch};
/// use tile_mesh::{Feature, GeometryKind, MeshData, TileContext};
///
/// let feature = Feature::new(1, GeometryKind::Polygon)
///     .with_ring(vec![
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(0.0, 0.0, 1.0),
///         DVec3::new(1.0, 0.0, 1.0),
///         DVec3::new(1.0, 0.0, 0.0),
///     ])
///     .with_property("height", 3.0);
///
/// let mut md = MeshData::new();
/// PolygonBuilder::new(Default::default(), &Default::default()).build(
///     &feature.rings,
///     &TileContext::default(),
///     &mut StdRng::seed_from_u64(0),
///     &mut md,
///     &mut PolygonScratch::default(),
/// );
///
/// let extruder = Extruder::new(ExtrusionOptions::default()).unwrap();
/// extruder.extrude(&feature, &mut md, 1.0).unwrap();
/// assert_eq!(md.vertex_count(), 4 + 4 * 4);
/// assert_eq!(md.triangle_count(), 2 + 4 * 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Extruder {
    options: ExtrusionOptions,
}

impl Extruder {
    /// Creates an extruder after validating the options.
    pub fn new(options: ExtrusionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Returns the options in use.
    pub fn options(&self) -> &ExtrusionOptions {
        &self.options
    }

    /// Resolves the feature's height and extrudes the roof in `md`.
    ///
    /// Returns the height actually used for walls, which grows by the roof
    /// slant when the roof is leveled to its highest vertex.
    pub fn extrude(&self, feature: &Feature, md: &mut MeshData, scale: f64) -> Result<ResolvedHeight> {
        let resolved = resolve_height(feature, &self.options, scale);
        self.extrude_with_height(md, resolved)
    }

    /// Extrudes the roof in `md` with an already resolved height.
    pub fn extrude_with_height(&self, md: &mut MeshData, resolved: ResolvedHeight) -> Result<ResolvedHeight> {
        if md.is_empty() {
            return Ok(resolved);
        }

        let mut height = resolved.height;
        if self.options.geometry != ExtrusionGeometry::SideOnly {
            height = self.raise_roof(md, resolved);
        }

        if let Some(offset) = self.options.chamfer {
            chamfer_rings(md, offset)?;
        }

        if self.options.geometry != ExtrusionGeometry::RoofOnly && height > 0.0 {
            let submesh = if self.options.separate_submesh {
                md.push_submesh()
            } else {
                0
            };

            let edges = md.edges().to_vec();
            md.reserve(edges.len() * 4, 0);
            md.submesh_mut(submesh).reserve(edges.len() * 6);
            for [a, b] in edges {
                let (v1, v2) = (md.vertices()[a as usize], md.vertices()[b as usize]);
                push_wall_quad(md, submesh, v1, v2, height, 0.0);
            }
            tracing::trace!(walls = md.edges().len(), height, submesh, "walls extruded");
        }

        Ok(ResolvedHeight {
            height,
            min_height: resolved.min_height,
        })
    }

    /// Lifts every vertex to roof level, returning the wall height.
    fn raise_roof(&self, md: &mut MeshData, resolved: ResolvedHeight) -> f64 {
        let lift = resolved.min_height + resolved.height;

        if self.options.roof_level == RoofLevel::Slanted {
            for v in md.vertices_mut() {
                v.y += lift;
            }
            return resolved.height;
        }

        let (min_y, max_y) = md
            .vertices()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v.y), hi.max(v.y)));
        let (level, height) = match self.options.roof_level {
            RoofLevel::Lowest => (min_y, resolved.height),
            RoofLevel::Slanted | RoofLevel::Highest => (max_y, resolved.height + (max_y - min_y)),
        };
        for v in md.vertices_mut() {
            v.y = level + lift;
        }
        height
    }
}
