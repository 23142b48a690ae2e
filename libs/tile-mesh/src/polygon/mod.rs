//! # Polygon Mesh Builder
//!
//! Turns a polygon feature's rings into a flat roof: vertices in the
//! shared buffer, triangles in submesh 0, UVs per the configured mapping,
//! and one boundary edge per ring side for the wall extruder.
//!
//! ## Ring Grouping
//!
//! Earcut handles one outer ring with holes, but a feature may hold
//! several polygons. Rings are walked in order and a clockwise ring starts
//! a new group once the current group has rings; counter-clockwise rings
//! join the current group as holes.
//!
//! ## Orientation
//!
//! Roof triangles face `+Y` under the right-handed cross product. Boundary
//! edges run against the ring direction so that
//! [`wall_normal`](crate::geometry::wall_normal) points out of the polygon.

mod chamfer;
mod uv;

pub use chamfer::chamfer_rings;
pub use uv::{map_uvs, AtlasEntity, AtlasInfo, TextureRect, UvMapping};

use crate::feature::TileContext;
use crate::geometry::{is_clockwise, strip_closing_point};
use crate::mesh_data::{MeshData, Vertex};
use config::constants::MeshConfig;
use earcut::{EarcutOptions, Triangulator};
use glam::{DVec2, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Roof building options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonOptions {
    /// UV generation mode.
    pub uv_mapping: UvMapping,
    /// Atlas used by the atlas UV modes.
    pub atlas: AtlasInfo,
}

/// Reusable buffers for [`PolygonBuilder::build`].
///
/// Owned by one worker and passed in by reference; nothing is shared.
#[derive(Debug, Default)]
pub struct PolygonScratch {
    triangulator: Triangulator,
    flat: Vec<f64>,
    holes: Vec<usize>,
    triangles: Vec<usize>,
    uvs: Vec<DVec2>,
}

/// Builds flat roofs from polygon rings.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rand::{rngs::StdRng, SeedableRng};
/// use tile_mesh::polygon::{PolygonBuilder, PolygonOptions, PolygonScratch};
/// use tile_mesh::{MeshData, TileContext};
///
/// let builder = PolygonBuilder::new(PolygonOptions::default(), &Default::default());
/// let ring = vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(1.0, 0.0, 1.0),
///     DVec3::new(1.0, 0.0, 0.0),
/// ];
///
/// let mut md = MeshData::new();
/// let mut rng = StdRng::seed_from_u64(0);
/// builder.build(&[ring], &TileContext::default(), &mut rng, &mut md, &mut PolygonScratch::default());
/// assert_eq!(md.triangle_count(), 2);
/// assert_eq!(md.edges().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonBuilder {
    options: PolygonOptions,
    earcut: EarcutOptions,
}

impl PolygonBuilder {
    /// Creates a builder.
    pub fn new(options: PolygonOptions, config: &MeshConfig) -> Self {
        Self {
            options,
            earcut: EarcutOptions {
                hash_threshold: config.earcut_hash_threshold,
            },
        }
    }

    /// Returns the options in use.
    pub fn options(&self) -> &PolygonOptions {
        &self.options
    }

    /// Appends the roof of `rings` to `md`.
    ///
    /// Rings with fewer than three points after dropping a closing
    /// duplicate are skipped. No rings means no output.
    pub fn build<R: Rng>(
        &self,
        rings: &[Vec<DVec3>],
        tile: &TileContext,
        rng: &mut R,
        md: &mut MeshData,
        scratch: &mut PolygonScratch,
    ) {
        if *scratch.triangulator.options() != self.earcut {
            scratch.triangulator = Triangulator::new(self.earcut);
        }
        scratch.flat.clear();
        scratch.holes.clear();

        let first_vertex = md.vertex_count();
        let point_count: usize = rings.iter().map(Vec::len).sum();
        md.reserve(point_count, point_count.saturating_sub(2) * 3);

        let mut group_start = first_vertex;
        for ring in rings {
            let ring = strip_closing_point(ring);
            let n = ring.len();
            if n < 3 {
                continue;
            }

            let base = md.vertex_count();
            if is_clockwise(ring) && !scratch.flat.is_empty() {
                Self::triangulate_group(group_start, md, scratch);
            }
            if scratch.flat.is_empty() {
                group_start = base;
            } else {
                scratch.holes.push(scratch.flat.len() / 2);
            }

            for (j, &point) in ring.iter().enumerate() {
                md.add_edge((base + (j + 1) % n) as u32, (base + j) as u32);
                md.push_vertex(Vertex::new(point));
                scratch.flat.extend_from_slice(&[point.x, point.z]);
            }
            md.add_contour(base..base + n);
        }
        Self::triangulate_group(group_start, md, scratch);

        let added = md.vertex_count() - first_vertex;
        if added == 0 {
            return;
        }

        scratch.uvs.clear();
        scratch.uvs.resize(added, DVec2::ZERO);
        map_uvs(
            self.options.uv_mapping,
            &self.options.atlas,
            tile,
            rng,
            &md.vertices()[first_vertex..],
            &mut scratch.uvs,
        );
        if let Some(channel) = md.uvs_mut(0) {
            channel[first_vertex..].copy_from_slice(&scratch.uvs);
        }

        tracing::trace!(
            vertices = added,
            triangles = md.submeshes().first().map_or(0, |s| s.len() / 3),
            "roof built"
        );
    }

    /// Triangulates the rings collected so far and clears the group.
    fn triangulate_group(start: usize, md: &mut MeshData, scratch: &mut PolygonScratch) {
        if scratch.flat.is_empty() {
            return;
        }

        scratch.triangles.clear();
        scratch
            .triangulator
            .triangulate(&scratch.flat, &scratch.holes, 2, &mut scratch.triangles);

        // Earcut winds counter-clockwise in (x, z); swap to face up.
        let submesh = md.submesh_mut(0);
        submesh.reserve(scratch.triangles.len());
        for tri in scratch.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| (start + i) as u32);
            submesh.extend_from_slice(&[a, c, b]);
        }

        scratch.flat.clear();
        scratch.holes.clear();
    }
}

#[cfg(test)]
mod tests;
