//! # MeshData Tests

use super::*;

fn triangle() -> MeshData {
    let mut md = MeshData::new();
    let a = md.push_vertex(Vertex::new(DVec3::ZERO).with_uv(DVec2::new(0.0, 0.0)));
    let b = md.push_vertex(Vertex::new(DVec3::Z).with_uv(DVec2::new(0.0, 1.0)));
    let c = md.push_vertex(Vertex::new(DVec3::X).with_uv(DVec2::new(1.0, 0.0)));
    md.add_triangle(0, a, b, c);
    md.add_edge(b, a);
    md.add_contour(0..3);
    md
}

#[test]
fn test_new_is_empty() {
    let md = MeshData::new();
    assert!(md.is_empty());
    assert_eq!(md.uv_channel_count(), 1);
    assert!(md.submeshes().is_empty());
    assert!(md.validate().is_ok());
}

#[test]
fn test_push_vertex_keeps_arrays_parallel() {
    let mut md = MeshData::new();
    md.add_uv_channel(Vec::new()).expect("empty channel on empty mesh");
    let index = md.push_vertex(
        Vertex::new(DVec3::new(1.0, 2.0, 3.0))
            .with_normal(DVec3::X)
            .with_tangent(DVec3::Y)
            .with_uv(DVec2::new(0.5, 0.25)),
    );
    assert_eq!(index, 0);
    assert_eq!(md.normals(), &[DVec3::X]);
    assert_eq!(md.tangents(), &[DVec4::new(0.0, 1.0, 0.0, 1.0)]);
    assert_eq!(md.uvs(0), Some(&[DVec2::new(0.5, 0.25)][..]));
    assert_eq!(md.uvs(1), Some(&[DVec2::ZERO][..]));
    assert!(md.validate().is_ok());
}

#[test]
fn test_add_triangle_creates_submeshes() {
    let mut md = triangle();
    md.add_triangle(2, 0, 1, 2);
    assert_eq!(md.submeshes().len(), 3);
    assert!(md.submeshes()[1].is_empty());
    assert_eq!(md.triangle_count(), 2);
    assert_eq!(md.push_submesh(), 3);
}

#[test]
fn test_uv_channel_length_mismatch() {
    let mut md = triangle();
    let err = md.add_uv_channel(vec![DVec2::ZERO; 2]).unwrap_err();
    assert!(matches!(
        err,
        MeshError::UvChannelLength {
            expected: 3,
            actual: 2
        }
    ));
}

#[test]
fn test_validate_rejects_bad_indices() {
    let mut md = triangle();
    md.add_triangle(0, 0, 1, 7);
    assert!(matches!(md.validate(), Err(MeshError::Validation { .. })));

    let mut md = triangle();
    md.add_edge(0, 3);
    assert!(md.validate().is_err());

    let mut md = triangle();
    md.submesh_mut(0).push(1);
    assert!(md.validate().is_err());

    let mut md = triangle();
    md.add_contour(2..5);
    assert!(md.validate().is_err());
}

#[test]
fn test_append_offsets_indices() {
    let mut md = triangle();
    let other = triangle();
    md.append(&other);

    assert_eq!(md.vertex_count(), 6);
    assert_eq!(md.submeshes()[0], vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(md.edges(), &[[1, 0], [4, 3]]);
    assert_eq!(md.contours(), &[0..3, 3..6]);
    assert!(md.validate().is_ok());
}

#[test]
fn test_append_zero_fills_missing_channels() {
    let mut md = triangle();
    let mut other = triangle();
    other
        .add_uv_channel(vec![DVec2::ONE; 3])
        .expect("channel matches vertex count");
    md.append(&other);

    assert_eq!(md.uv_channel_count(), 2);
    let second = md.uvs(1).expect("second channel");
    assert_eq!(&second[..3], &[DVec2::ZERO; 3]);
    assert_eq!(&second[3..], &[DVec2::ONE; 3]);
    assert!(md.validate().is_ok());
}

#[test]
fn test_clear_keeps_single_channel() {
    let mut md = triangle();
    md.add_uv_channel(vec![DVec2::ONE; 3]).expect("matching channel");
    md.clear();
    assert!(md.is_empty());
    assert_eq!(md.uv_channel_count(), 1);
    assert!(md.edges().is_empty());
    assert!(md.contours().is_empty());
    assert!(md.validate().is_ok());
}

#[test]
fn test_f32_exports() {
    let md = triangle();
    assert_eq!(md.vertices_f32(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    assert_eq!(md.normals_f32().len(), 9);
    assert_eq!(md.tangents_f32()[..4], [0.0, 0.0, 1.0, 1.0]);
    assert_eq!(md.uvs_f32(0), Some(vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0]));
    assert_eq!(md.uvs_f32(1), None);
    assert_eq!(md.indices_u32(0), Some(vec![0, 1, 2]));
    assert_eq!(md.indices_u32(1), None);
}
