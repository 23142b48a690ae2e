//! # Tile Pipeline
//!
//! Runs every feature of a tile through the generators:
//!
//! ```text
//! Polygon → roof (or closed outline) → terrain snap → extrusion
//! Line    → ribbon                   → terrain snap → extrusion
//! Point   → nothing
//! ```
//!
//! ## Parallelism
//!
//! Features are independent. [`TilePipeline::build_tile`] fans them out
//! over the rayon pool; each worker owns one [`FeatureScratch`] and each
//! feature gets its own [`MeshData`]. Randomness is seeded per feature from
//! the pipeline seed and the feature id, so output never depends on
//! scheduling.

use crate::error::Result;
use crate::extrude::{ExtrusionOptions, Extruder, FloorExtruder, WallBatch};
use crate::feature::{Feature, GeometryKind, TileContext};
use crate::line::{LineScratch, LineStyle, LineTessellator};
use crate::mesh_data::MeshData;
use crate::polygon::{PolygonBuilder, PolygonOptions, PolygonScratch};
use crate::terrain::{snap_to_terrain, HeightQuery};
use config::constants::MeshConfig;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Pipeline options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Roof building.
    pub polygon: PolygonOptions,
    /// Height extrusion; `None` leaves meshes flat.
    pub extrusion: Option<ExtrusionOptions>,
    /// Ribbon styling for lines and outlines.
    pub line: LineStyle,
    /// Draw polygons as closed ribbons along their rings instead of roofs.
    pub outlines: bool,
    /// Apply the terrain query when one is supplied.
    pub snap_to_terrain: bool,
    /// Base seed for per-feature randomness.
    pub seed: u64,
}

/// Per-worker reusable buffers.
#[derive(Debug, Default)]
pub struct FeatureScratch {
    polygon: PolygonScratch,
    line: LineScratch,
}

/// Output for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMesh {
    /// Id of the source feature.
    pub id: u64,
    /// Roof or ribbon with any flat walls.
    pub mesh: MeshData,
    /// Floor walls, when a floor extruder is attached.
    pub walls: Vec<WallBatch>,
}

/// Builds meshes for whole tiles.
///
/// Immutable after construction and shared by reference across workers.
///
/// # Example
///
/// ```rust
/// use glam::{DVec2, DVec3};
/// use tile_mesh::pipeline::{PipelineOptions, TilePipeline};
/// use tile_mesh::{Feature, GeometryKind, TileContext};
///
/// let pipeline = TilePipeline::new(PipelineOptions::default(), Default::default()).unwrap();
/// let road = Feature::new(1, GeometryKind::Line)
///     .with_ring(vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)]);
///
/// let tile = TileContext::new(1.0, DVec2::splat(100.0));
/// let meshes = pipeline.build_tile(&[road], &tile, None).unwrap();
/// assert_eq!(meshes.len(), 1);
/// assert!(meshes[0].mesh.triangle_count() > 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TilePipeline {
    options: PipelineOptions,
    builder: PolygonBuilder,
    tessellator: LineTessellator,
    extruder: Option<Extruder>,
    floors: Option<FloorExtruder>,
}

impl TilePipeline {
    /// Creates a pipeline, validating the line style and extrusion options.
    pub fn new(options: PipelineOptions, config: MeshConfig) -> Result<Self> {
        let tessellator = LineTessellator::new(options.line, &config)?;
        let extruder = options.extrusion.clone().map(Extruder::new).transpose()?;
        Ok(Self {
            builder: PolygonBuilder::new(options.polygon.clone(), &config),
            tessellator,
            extruder,
            floors: None,
            options,
        })
    }

    /// Extrudes polygons with floor templates instead of flat walls.
    pub fn with_floors(mut self, floors: FloorExtruder) -> Self {
        self.floors = Some(floors);
        self
    }

    /// Returns the options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Builds one feature.
    ///
    /// Point features and degenerate geometry give an empty mesh.
    pub fn build_feature(
        &self,
        feature: &Feature,
        tile: &TileContext,
        scratch: &mut FeatureScratch,
        terrain: Option<&dyn HeightQuery>,
    ) -> Result<FeatureMesh> {
        let mut rng = StdRng::seed_from_u64(self.options.seed ^ feature.id);
        let mut md = MeshData::new();

        match feature.kind {
            GeometryKind::Point => {}
            GeometryKind::Line => {
                self.tessellator
                    .tessellate_feature(feature, tile, false, &mut md, &mut scratch.line);
            }
            GeometryKind::Polygon if self.options.outlines => {
                self.tessellator
                    .tessellate_feature(feature, tile, true, &mut md, &mut scratch.line);
            }
            GeometryKind::Polygon => {
                self.builder
                    .build(&feature.rings, tile, &mut rng, &mut md, &mut scratch.polygon);
            }
        }

        if let Some(query) = terrain.filter(|_| self.options.snap_to_terrain && !md.is_empty()) {
            snap_to_terrain(&mut md, tile, query);
        }

        let walls = match (&self.floors, &self.extruder) {
            (Some(floors), _) if feature.kind == GeometryKind::Polygon && !self.options.outlines => {
                floors.extrude(feature, &mut md, tile.scale, &mut rng)
            }
            (_, Some(extruder)) => {
                extruder.extrude(feature, &mut md, tile.scale)?;
                Vec::new()
            }
            _ => Vec::new(),
        };

        tracing::trace!(
            id = feature.id,
            kind = ?feature.kind,
            vertices = md.vertex_count(),
            triangles = md.triangle_count(),
            wall_batches = walls.len(),
            "feature built"
        );

        Ok(FeatureMesh {
            id: feature.id,
            mesh: md,
            walls,
        })
    }

    /// Builds every feature of a tile in parallel.
    ///
    /// The result holds one entry per feature, in input order.
    pub fn build_tile(
        &self,
        features: &[Feature],
        tile: &TileContext,
        terrain: Option<&(dyn HeightQuery + Sync)>,
    ) -> Result<Vec<FeatureMesh>> {
        let meshes = features
            .par_iter()
            .map_init(FeatureScratch::default, |scratch, feature| {
                self.build_feature(feature, tile, scratch, terrain.map(|t| t as &dyn HeightQuery))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            features = features.len(),
            vertices = meshes.iter().map(|m| m.mesh.vertex_count()).sum::<usize>(),
            wall_batches = meshes.iter().map(|m| m.walls.len()).sum::<usize>(),
            "tile built"
        );

        Ok(meshes)
    }
}
