//! Vertical wall quads shared by the flat extruder and the floor fallback.

use crate::geometry::wall_normal;
use crate::mesh_data::{MeshData, Vertex};
use glam::{DVec2, DVec3};

/// Appends one wall quad hanging `height` below the edge `top1 -> top2`.
///
/// `v_offset` shifts the V coordinate down so stacked quads continue the
/// texture of the quad above. Vertices are `top1, top2, bottom1, bottom2`
/// with UVs `(0, -o), (d, -o), (0, -o - h), (d, -o - h)`.
pub(crate) fn push_wall_quad(
    md: &mut MeshData,
    submesh: usize,
    top1: DVec3,
    top2: DVec3,
    height: f64,
    v_offset: f64,
) {
    let normal = wall_normal(top1, top2);
    let tangent = (top2 - top1).normalize_or_zero();
    let length = top1.distance(top2);
    let drop = DVec3::new(0.0, height, 0.0);
    let (v_top, v_bottom) = (-v_offset, -v_offset - height);

    let wall = |position: DVec3, uv: DVec2| {
        Vertex::new(position)
            .with_normal(normal)
            .with_tangent(tangent)
            .with_uv(uv)
    };

    let i = md.push_vertex(wall(top1, DVec2::new(0.0, v_top)));
    md.push_vertex(wall(top2, DVec2::new(length, v_top)));
    md.push_vertex(wall(top1 - drop, DVec2::new(0.0, v_bottom)));
    md.push_vertex(wall(top2 - drop, DVec2::new(length, v_bottom)));

    md.add_triangle(submesh, i, i + 1, i + 2);
    md.add_triangle(submesh, i + 1, i + 3, i + 2);
}
