//! # Roof UV Mapping
//!
//! Texture coordinates for triangulated roofs: tiled world space,
//! satellite projection across the tile, or a rectangle of a texture atlas.

use crate::feature::TileContext;
use crate::geometry::planar;
use glam::{DVec2, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How roof UVs are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvMapping {
    /// Raw `(x, z)`, tiling once per local unit.
    #[default]
    Tiled,
    /// Position across the tile in `0..1`, for satellite imagery.
    Satellite,
    /// Stretched over a randomly chosen atlas roof rectangle.
    Atlas,
    /// Same mapping as [`UvMapping::Atlas`]; colouring is left to the
    /// render layer.
    AtlasWithPalette,
}

/// A rectangle in normalized texture space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureRect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl TextureRect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Maps `t` in `0..1` on both axes into the rectangle.
    #[inline]
    pub fn lerp(&self, t: DVec2) -> DVec2 {
        DVec2::new(self.x + t.x * self.width, self.y + t.y * self.height)
    }
}

/// One texture of an atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasEntity {
    /// Where the texture sits in the atlas.
    pub texture_rect: TextureRect,
}

/// Atlas textures available to roofs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasInfo {
    /// Roof textures; one is picked per feature.
    pub roofs: Vec<AtlasEntity>,
}

/// Fills `out` with UVs for `positions` under `mapping`.
///
/// `rng` is only consulted by the atlas modes.
pub fn map_uvs<R: Rng>(
    mapping: UvMapping,
    atlas: &AtlasInfo,
    tile: &TileContext,
    rng: &mut R,
    positions: &[DVec3],
    out: &mut [DVec2],
) {
    match mapping {
        UvMapping::Tiled => tiled(positions, out),
        UvMapping::Satellite => {
            for (uv, &p) in out.iter_mut().zip(positions) {
                *uv = tile.normalized(p);
            }
        }
        UvMapping::Atlas | UvMapping::AtlasWithPalette => {
            if atlas.roofs.is_empty() {
                tracing::trace!("empty roof atlas, using tiled uvs");
                tiled(positions, out);
                return;
            }
            let entity = atlas.roofs[rng.gen_range(0..atlas.roofs.len())];
            atlas_uvs(&entity.texture_rect, positions, out);
        }
    }
}

fn tiled(positions: &[DVec3], out: &mut [DVec2]) {
    for (uv, &p) in out.iter_mut().zip(positions) {
        *uv = planar(p);
    }
}

/// Rotates the roof so its first edge runs along `+X`, then stretches the
/// bounding box of the rotated points over `rect`.
fn atlas_uvs(rect: &TextureRect, positions: &[DVec3], out: &mut [DVec2]) {
    let Some(&first) = positions.first() else {
        return;
    };

    // v0 - v1 maps to +X
    let direction = positions
        .get(1)
        .map(|&second| planar(first) - planar(second))
        .and_then(|d| d.try_normalize())
        .unwrap_or(DVec2::X);
    // Rotation by the inverse of the direction's angle
    let rotate = |p: DVec3| {
        let rel = planar(p) - planar(first);
        DVec2::new(
            rel.x * direction.x + rel.y * direction.y,
            rel.y * direction.x - rel.x * direction.y,
        )
    };

    let mut min = DVec2::splat(f64::MAX);
    let mut max = DVec2::splat(f64::MIN);
    for (uv, &p) in out.iter_mut().zip(positions) {
        let r = rotate(p);
        min = min.min(r);
        max = max.max(r);
        *uv = r;
    }

    let extent = max - min;
    for uv in out.iter_mut().take(positions.len()) {
        let t = DVec2::new(
            if extent.x > 0.0 { (uv.x - min.x) / extent.x } else { 0.0 },
            if extent.y > 0.0 { (uv.y - min.y) / extent.y } else { 0.0 },
        );
        *uv = rect.lerp(t);
    }
}
