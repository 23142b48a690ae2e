//! # Roof Chamfer
//!
//! Bevels the rim of a roof. Every ring vertex becomes three: the inset
//! corner raised by the chamfer offset, a point set back along the
//! incoming side and a point set forward along the outgoing side. The
//! roof moves onto the raised inset points, the rim is closed with corner
//! and side strip triangles, and the boundary edges are replaced by the
//! lower rim of the bevel.

use crate::error::{require_positive, MeshError, Result};
use crate::geometry::{face_up, line_intersection, perpendicular, planar_distance, UP};
use crate::mesh_data::MeshData;
use glam::{DVec2, DVec3, DVec4};

/// Inset corner points further than this many offsets from the corner are
/// replaced by the averaged offset direction.
const MAX_INSET_FACTOR: f64 = 10.0;

fn flat(v: DVec3) -> DVec3 {
    DVec3::new(v.x, 0.0, v.z)
}

/// Chamfers every ring recorded in `md`'s contours by `offset`.
///
/// The contours must cover the vertex buffer exactly and in order, which
/// holds for a roof fresh out of the polygon builder. Empty meshes are
/// left alone.
pub fn chamfer_rings(md: &mut MeshData, offset: f64) -> Result<()> {
    if md.is_empty() || md.contours().is_empty() {
        return Ok(());
    }
    require_positive("chamfer offset", offset)?;

    let n = md.vertex_count();
    let mut covered = 0;
    for span in md.contours() {
        if span.start != covered || span.end <= span.start {
            return Err(MeshError::validation(format!(
                "contour {span:?} does not continue from vertex {covered}"
            )));
        }
        covered = span.end;
    }
    if covered != n {
        return Err(MeshError::validation(format!(
            "contours cover {covered} of {n} vertices"
        )));
    }

    let positions = md.vertices().to_vec();
    let mut vertices = Vec::with_capacity(n * 3);
    let mut normals = Vec::with_capacity(n * 3);
    let mut tangents = Vec::with_capacity(n * 3);
    let mut uvs: Vec<Vec<DVec2>> = (0..md.uv_channel_count())
        .map(|_| Vec::with_capacity(n * 3))
        .collect();

    let contours = md.contours().to_vec();
    for span in &contours {
        let m = span.len();
        for k in 0..m {
            let c = span.start + k;
            let before = positions[span.start + (k + m - 1) % m];
            let cur = positions[c];
            let after = positions[span.start + (k + 1) % m];

            let v1 = -flat(cur - before).normalize_or_zero() * offset;
            let n1 = perpendicular(v1);
            let v2 = -flat(after - cur).normalize_or_zero() * offset;
            let n2 = perpendicular(v2);

            let inset = line_intersection(before + n1, cur + n1, cur + n2, after + n2)
                .filter(|&poi| planar_distance(poi, cur + n1) <= MAX_INSET_FACTOR * offset)
                .unwrap_or_else(|| flat(cur) + (n1 + n2).normalize_or_zero() * offset);

            let tangent: DVec4 = (v1 - v2).normalize_or_zero().extend(1.0);
            vertices.extend_from_slice(&[
                DVec3::new(inset.x, cur.y + offset, inset.z),
                cur + v1,
                cur - v2,
            ]);
            normals.extend_from_slice(&[
                UP,
                (-n1).normalize_or_zero(),
                (-n2).normalize_or_zero(),
            ]);
            tangents.extend_from_slice(&[tangent; 3]);
            for (channel, out) in uvs.iter_mut().enumerate() {
                let uv = md.uvs(channel).map_or(DVec2::ZERO, |values| values[c]);
                out.extend_from_slice(&[uv; 3]);
            }
        }
    }

    for submesh in md.submeshes_mut() {
        for index in submesh.iter_mut() {
            *index *= 3;
        }
    }

    md.clear_edges();
    for span in &contours {
        let m = span.len();
        for k in 0..m {
            let c = (span.start + k) as u32;
            let a = (span.start + (k + 1) % m) as u32;
            for tri in [
                [3 * c, 3 * c + 1, 3 * c + 2],
                [3 * a, 3 * c + 2, 3 * a + 1],
                [3 * c, 3 * c + 2, 3 * a],
            ] {
                let [x, y, z] = face_up(&vertices, tri);
                md.add_triangle(0, x, y, z);
            }
            md.add_edge(3 * c + 2, 3 * c + 1);
            md.add_edge(3 * a + 1, 3 * c + 2);
        }
    }

    md.replace_vertices(vertices, normals, tangents, uvs);
    for span in md.contours_mut() {
        *span = span.start * 3..span.end * 3;
    }
    Ok(())
}
