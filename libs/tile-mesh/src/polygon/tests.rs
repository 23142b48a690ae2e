//! # Polygon Builder Tests

use super::*;
use crate::geometry::wall_normal;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

/// Clockwise square under `is_clockwise`, an outer ring.
fn outer_square(x0: f64, z0: f64, size: f64) -> Vec<DVec3> {
    vec![
        p(x0, z0),
        p(x0, z0 + size),
        p(x0 + size, z0 + size),
        p(x0 + size, z0),
    ]
}

/// Counter-clockwise square, a hole.
fn hole_square(x0: f64, z0: f64, size: f64) -> Vec<DVec3> {
    let mut ring = outer_square(x0, z0, size);
    ring.reverse();
    ring
}

fn build(rings: &[Vec<DVec3>]) -> MeshData {
    let builder = PolygonBuilder::new(PolygonOptions::default(), &MeshConfig::default());
    let mut md = MeshData::new();
    let mut rng = StdRng::seed_from_u64(3);
    builder.build(
        rings,
        &TileContext::default(),
        &mut rng,
        &mut md,
        &mut PolygonScratch::default(),
    );
    md
}

/// Face normals (unnormalized) of submesh 0.
fn face_normals(md: &MeshData) -> Vec<DVec3> {
    md.submeshes()[0]
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| md.vertices()[i as usize]);
            (b - a).cross(c - a)
        })
        .collect()
}

fn roof_area(md: &MeshData) -> f64 {
    face_normals(md).iter().map(|n| n.length() / 2.0).sum()
}

// =============================================================================
// ROOF TRIANGULATION
// =============================================================================

#[test]
fn test_unit_square_roof() {
    let md = build(&[outer_square(0.0, 0.0, 1.0)]);
    assert_eq!(md.vertex_count(), 4);
    assert_eq!(md.triangle_count(), 2);
    assert_relative_eq!(roof_area(&md), 1.0, epsilon = 1e-12);
    assert!(md.normals().iter().all(|&n| n == DVec3::Y));
    assert_eq!(md.contours(), &[0..4]);
    assert!(md.validate().is_ok());
}

#[test]
fn test_roof_faces_up() {
    let md = build(&[outer_square(0.0, 0.0, 3.0), hole_square(1.0, 1.0, 1.0)]);
    for n in face_normals(&md) {
        assert!(n.y > 0.0, "roof triangle faces down: {n:?}");
    }
}

#[test]
fn test_square_with_hole() {
    let md = build(&[outer_square(0.0, 0.0, 1.0), hole_square(0.25, 0.25, 0.5)]);
    assert_eq!(md.vertex_count(), 8);
    assert_eq!(md.triangle_count(), 8);
    assert_relative_eq!(roof_area(&md), 0.75, epsilon = 1e-12);
    assert_eq!(md.edges().len(), 8);
    assert_eq!(md.contours(), &[0..4, 4..8]);
}

#[test]
fn test_two_outer_rings_are_separate_groups() {
    let md = build(&[outer_square(0.0, 0.0, 1.0), outer_square(5.0, 0.0, 2.0)]);
    assert_eq!(md.triangle_count(), 4);
    assert_relative_eq!(roof_area(&md), 5.0, epsilon = 1e-12);

    // No triangle mixes the two rings
    for tri in md.submeshes()[0].chunks_exact(3) {
        let first_ring = tri.iter().filter(|&&i| i < 4).count();
        assert!(first_ring == 0 || first_ring == 3, "triangle {tri:?} spans rings");
    }
}

#[test]
fn test_closing_point_and_degenerate_rings() {
    let mut closed = outer_square(0.0, 0.0, 1.0);
    closed.push(closed[0]);
    let md = build(&[closed, vec![p(9.0, 9.0), p(9.0, 10.0)]]);
    assert_eq!(md.vertex_count(), 4);
    assert_eq!(md.edges().len(), 4);

    let md = build(&[]);
    assert!(md.is_empty());
    let md = build(&[vec![p(0.0, 0.0), p(1.0, 0.0)]]);
    assert!(md.is_empty());
}

#[test]
fn test_appends_after_existing_vertices() {
    let builder = PolygonBuilder::new(PolygonOptions::default(), &MeshConfig::default());
    let mut md = build(&[outer_square(0.0, 0.0, 1.0)]);
    let mut rng = StdRng::seed_from_u64(0);
    builder.build(
        &[outer_square(3.0, 3.0, 1.0)],
        &TileContext::default(),
        &mut rng,
        &mut md,
        &mut PolygonScratch::default(),
    );
    assert_eq!(md.vertex_count(), 8);
    assert_eq!(md.triangle_count(), 4);
    assert!(md.submeshes()[0][6..].iter().all(|&i| i >= 4));
    assert_eq!(md.contours(), &[0..4, 4..8]);
    assert!(md.validate().is_ok());
}

// =============================================================================
// BOUNDARY EDGES
// =============================================================================

#[test]
fn test_edges_face_outward() {
    let md = build(&[outer_square(0.0, 0.0, 4.0), hole_square(1.0, 1.0, 2.0)]);
    let center = p(2.0, 2.0);
    for (n, &[a, b]) in md.edges().iter().enumerate() {
        let (v1, v2) = (md.vertices()[a as usize], md.vertices()[b as usize]);
        let normal = wall_normal(v1, v2);
        let outward = (v1 + v2) / 2.0 - center;
        // Outer walls face away from the centre, hole walls face into it
        let sign = if n < 4 { 1.0 } else { -1.0 };
        assert!(sign * normal.dot(outward) > 0.0, "edge {a}->{b} faces inward");
    }
}

#[test]
fn test_tiled_uvs_follow_positions() {
    let md = build(&[outer_square(2.0, 3.0, 1.0)]);
    let uvs = md.uvs(0).expect("channel 0");
    for (uv, v) in uvs.iter().zip(md.vertices()) {
        assert_eq!(*uv, DVec2::new(v.x, v.z));
    }
}

#[test]
fn test_atlas_uvs_depend_only_on_seed() {
    let options = PolygonOptions {
        uv_mapping: UvMapping::Atlas,
        atlas: AtlasInfo {
            roofs: (0..4)
                .map(|k| AtlasEntity {
                    texture_rect: TextureRect::new(k as f64 * 0.25, 0.0, 0.25, 1.0),
                })
                .collect(),
        },
    };
    let builder = PolygonBuilder::new(options, &MeshConfig::default());
    let run = |seed| {
        let mut md = MeshData::new();
        let mut rng = StdRng::seed_from_u64(seed);
        builder.build(
            &[outer_square(0.0, 0.0, 1.0)],
            &TileContext::default(),
            &mut rng,
            &mut md,
            &mut PolygonScratch::default(),
        );
        md
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_options_from_json() {
    let options: PolygonOptions = serde_json::from_str(
        r#"{"uv_mapping": "atlas", "atlas": {"roofs": [{"texture_rect": {"x": 0.0, "y": 0.5, "width": 0.5, "height": 0.5}}]}}"#,
    )
    .expect("valid options");
    assert_eq!(options.uv_mapping, UvMapping::Atlas);
    assert_eq!(options.atlas.roofs[0].texture_rect.y, 0.5);

    let defaults: PolygonOptions = serde_json::from_str("{}").expect("defaults");
    assert_eq!(defaults, PolygonOptions::default());
}

// =============================================================================
// CHAMFER
// =============================================================================

#[test]
fn test_chamfer_square() {
    let mut md = build(&[outer_square(0.0, 0.0, 10.0)]);
    chamfer_rings(&mut md, 1.0).expect("roof contours cover the mesh");

    assert_eq!(md.vertex_count(), 12);
    // Roof plus one corner and two strip triangles per vertex
    assert_eq!(md.triangle_count(), 2 + 4 * 3);
    assert_eq!(md.edges().len(), 8);
    assert_eq!(md.contours(), &[0..12]);
    assert!(md.validate().is_ok());

    // Corner (0, 0) is insets to (1, 1) and raised by the offset
    let inset = md.vertices()[0];
    assert_relative_eq!(inset.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(inset.y, 1.0, epsilon = 1e-12);
    assert_relative_eq!(inset.z, 1.0, epsilon = 1e-12);
    assert_eq!(md.normals()[0], DVec3::Y);

    // Rim points stay at roof height on the original outline
    assert_eq!(md.vertices()[1], p(1.0, 0.0));
    assert_eq!(md.vertices()[2], p(0.0, 1.0));

    for n in face_normals(&md) {
        assert!(n.y >= 0.0, "bevel triangle faces down: {n:?}");
    }
}

#[test]
fn test_chamfer_edges_face_outward() {
    let mut md = build(&[outer_square(0.0, 0.0, 10.0)]);
    chamfer_rings(&mut md, 0.5).expect("valid roof");
    let center = p(5.0, 5.0);
    for &[a, b] in md.edges() {
        let (v1, v2) = (md.vertices()[a as usize], md.vertices()[b as usize]);
        let outward = (v1 + v2) / 2.0 - center;
        assert!(wall_normal(v1, v2).dot(outward) > 0.0);
        assert_eq!(v1.y, 0.0);
    }
}

#[test]
fn test_chamfer_rejects_foreign_vertices() {
    let mut md = build(&[outer_square(0.0, 0.0, 1.0)]);
    md.push_vertex(crate::mesh_data::Vertex::new(p(9.0, 9.0)));
    assert!(chamfer_rings(&mut md, 0.2).is_err());

    let mut md = build(&[outer_square(0.0, 0.0, 1.0)]);
    assert!(chamfer_rings(&mut md, 0.0).is_err());

    let mut empty = MeshData::new();
    assert!(chamfer_rings(&mut empty, 0.2).is_ok());
    assert!(empty.is_empty());
}
