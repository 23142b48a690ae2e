//! # Terrain Snapping
//!
//! Hook for the terrain layer: every vertex is offset by the height the
//! query returns at its normalized tile position. Height sampling itself
//! lives outside this crate.

use crate::feature::TileContext;
use crate::mesh_data::MeshData;

/// Samples terrain height at a normalized tile position.
///
/// Implemented for any `Fn(f64, f64) -> f64`, so closures work directly.
///
/// # Example
///
/// ```rust
/// use tile_mesh::terrain::HeightQuery;
///
/// let slope = |nx: f64, _nz: f64| nx * 10.0;
/// assert_eq!(slope.query_height(0.5, 0.0), 5.0);
/// ```
pub trait HeightQuery {
    /// Height at `(nx, nz)`, both in `0..1` inside the tile.
    fn query_height(&self, nx: f64, nz: f64) -> f64;
}

impl<F> HeightQuery for F
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn query_height(&self, nx: f64, nz: f64) -> f64 {
        self(nx, nz)
    }
}

/// Adds the terrain height under each vertex of `md` to its `y`.
///
/// One query per vertex; the mesh topology is untouched.
pub fn snap_to_terrain(md: &mut MeshData, tile: &TileContext, query: &dyn HeightQuery) {
    for v in md.vertices_mut() {
        let n = tile.normalized(*v);
        v.y += query.query_height(n.x, n.y);
    }
    tracing::trace!(vertices = md.vertex_count(), "snapped to terrain");
}
