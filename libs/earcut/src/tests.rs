//! # Earcut Tests
//!
//! Triangle counts, winding, area conservation and degenerate input.

use super::*;
use approx::assert_relative_eq;
use proptest::prelude::*;
use std::f64::consts::TAU;

/// Doubled signed area of every emitted triangle, y-up frame.
fn triangle_areas(data: &[f64], triangles: &[usize]) -> Vec<f64> {
    triangles
        .chunks_exact(3)
        .map(|t| {
            let (ax, ay) = (data[t[0] * 2], data[t[0] * 2 + 1]);
            let (bx, by) = (data[t[1] * 2], data[t[1] * 2 + 1]);
            let (cx, cy) = (data[t[2] * 2], data[t[2] * 2 + 1]);
            (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
        })
        .collect()
}

fn total_area(data: &[f64], triangles: &[usize]) -> f64 {
    triangle_areas(data, triangles).iter().map(|a| a.abs() / 2.0).sum()
}

fn circle(n: usize, radius: f64) -> Vec<[f64; 2]> {
    (0..n)
        .map(|k| {
            let t = TAU * k as f64 / n as f64;
            [radius * t.cos(), radius * t.sin()]
        })
        .collect()
}

fn unit_square_with_hole() -> FlatPolygon {
    let outer = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let hole = vec![[0.25, 0.25], [0.25, 0.75], [0.75, 0.75], [0.75, 0.25]];
    flatten(&[outer, hole])
}

// =============================================================================
// BASIC SHAPES
// =============================================================================

#[test]
fn test_unit_square() {
    let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let triangles = earcut(&square, &[], 2);
    assert_eq!(triangles.len(), 6);
    assert_relative_eq!(total_area(&square, &triangles), 1.0);
}

#[test]
fn test_square_with_hole() {
    let flat = unit_square_with_hole();
    let triangles = earcut(&flat.vertices, &flat.holes, flat.dim);
    assert_eq!(triangles.len() / 3, 8);
    assert_relative_eq!(total_area(&flat.vertices, &triangles), 0.75, epsilon = 1e-12);
    assert!(deviation(&flat.vertices, &flat.holes, 2, &triangles) < 1e-12);

    // No orphan vertices
    for v in 0..flat.vertex_count() {
        assert!(triangles.contains(&v), "vertex {v} unused");
    }
}

#[test]
fn test_concave_polygon() {
    // An L shape
    let l = [0.0, 0.0, 2.0, 0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.0, 2.0];
    let triangles = earcut(&l, &[], 2);
    assert_eq!(triangles.len() / 3, 4);
    assert_relative_eq!(total_area(&l, &triangles), 3.0, epsilon = 1e-12);
}

#[test]
fn test_extra_dimensions_ignored() {
    let square = [0.0, 0.0, 9.0, 1.0, 0.0, 9.0, 1.0, 1.0, 9.0, 0.0, 1.0, 9.0];
    let triangles = earcut(&square, &[], 3);
    assert_eq!(triangles.len(), 6);
    assert!(triangles.iter().all(|&i| i < 4));
}

// =============================================================================
// WINDING
// =============================================================================

#[test]
fn test_triangles_follow_normalized_winding() {
    let ccw = [0.0, 0.0, 3.0, 0.0, 3.0, 2.0, 1.0, 3.0, 0.0, 2.0];
    let mut cw = Vec::new();
    for pair in ccw.chunks_exact(2).rev() {
        cw.extend_from_slice(pair);
    }

    for data in [&ccw[..], &cw[..]] {
        let triangles = earcut(data, &[], 2);
        assert_eq!(triangles.len() / 3, 3);
        for area in triangle_areas(data, &triangles) {
            assert!(area > 0.0, "triangle wound against the outer contour");
        }
    }
}

// =============================================================================
// DEGENERATE INPUT
// =============================================================================

#[test]
fn test_empty_and_short_input() {
    assert!(earcut(&[], &[], 2).is_empty());
    assert!(earcut(&[0.0, 0.0], &[], 2).is_empty());
    assert!(earcut(&[0.0, 0.0, 1.0, 1.0], &[], 2).is_empty());
    assert!(earcut(&[0.0, 0.0, 1.0], &[], 2).is_empty());
    assert!(earcut(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0], &[], 1).is_empty());
}

#[test]
fn test_collinear_points_yield_nothing() {
    let line = [0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0];
    assert!(earcut(&line, &[], 2).is_empty());
}

#[test]
fn test_closing_duplicate_is_dropped() {
    let closed = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
    let triangles = earcut(&closed, &[], 2);
    assert_eq!(triangles.len() / 3, 2);
    assert_relative_eq!(total_area(&closed, &triangles), 1.0);
}

#[test]
fn test_self_intersecting_bow_tie_does_not_panic() {
    let bow_tie = [0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 0.0, 2.0];
    let triangles = earcut(&bow_tie, &[], 2);
    assert_eq!(triangles.len() % 3, 0);
    assert!(triangles.iter().all(|&i| i < 4));
}

#[test]
fn test_invalid_hole_indices_are_ignored() {
    let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let triangles = earcut(&square, &[0, 9], 2);
    assert_eq!(triangles.len(), 6);
}

#[test]
fn test_single_point_hole_is_kept() {
    let outer = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
    let flat = flatten(&[outer, vec![[2.0, 2.0]]]);
    let triangles = earcut(&flat.vertices, &flat.holes, 2);
    assert!(triangles.contains(&4), "steiner point must be used");
    assert_relative_eq!(total_area(&flat.vertices, &triangles), 16.0, epsilon = 1e-9);
}

// =============================================================================
// Z-ORDER INDEX
// =============================================================================

#[test]
fn test_large_polygon_is_indexed() {
    let ring = circle(200, 10.0);
    let flat = flatten(&[ring]);
    assert!(EarcutOptions::default().uses_index(flat.vertices.len(), 2));

    let triangles = earcut(&flat.vertices, &flat.holes, 2);
    assert_eq!(triangles.len() / 3, 198);
    assert!(deviation(&flat.vertices, &flat.holes, 2, &triangles) < 1e-9);
}

#[test]
fn test_indexed_and_linear_agree_on_area() {
    let mut outer = circle(120, 20.0);
    outer.reverse();
    let hole = circle(40, 5.0);
    let flat = flatten(&[outer, hole]);

    let indexed = earcut_with(&flat.vertices, &flat.holes, 2, EarcutOptions { hash_threshold: 0 });
    let linear = earcut_with(
        &flat.vertices,
        &flat.holes,
        2,
        EarcutOptions {
            hash_threshold: usize::MAX,
        },
    );

    assert_eq!(indexed.len(), linear.len());
    assert_relative_eq!(
        total_area(&flat.vertices, &indexed),
        total_area(&flat.vertices, &linear),
        epsilon = 1e-9
    );
}

#[test]
fn test_triangulator_reuse() {
    let mut triangulator = Triangulator::default();
    let mut out = Vec::new();

    let big = flatten(&[circle(100, 3.0)]);
    triangulator.triangulate(&big.vertices, &[], 2, &mut out);
    assert_eq!(out.len() / 3, 98);

    out.clear();
    let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    triangulator.triangulate(&square, &[], 2, &mut out);
    assert_eq!(out.len(), 6);
}

// =============================================================================
// PROPERTIES
// =============================================================================

/// Star-shaped outer ring plus up to three disjoint square holes near the
/// centre. Returns the rings and the expected polygon area.
fn star_with_holes(corners: &[(f64, f64)], hole_count: usize, phase: f64) -> (Vec<Vec<[f64; 2]>>, f64) {
    let n = corners.len();
    let outer: Vec<[f64; 2]> = corners
        .iter()
        .enumerate()
        .map(|(k, &(jitter, radius))| {
            let t = TAU * (k as f64 + jitter) / n as f64;
            [radius * t.cos(), radius * t.sin()]
        })
        .collect();

    let flat_outer: Vec<f64> = outer.iter().flatten().copied().collect();
    let mut area = signed_area(&flat_outer, 0, flat_outer.len(), 2).abs() / 2.0;

    let mut rings = vec![outer];
    let half = 0.4;
    for m in 0..hole_count {
        let t = phase + TAU * m as f64 / 3.0;
        let (cx, cy) = (2.5 * t.cos(), 2.5 * t.sin());
        rings.push(vec![
            [cx - half, cy - half],
            [cx + half, cy - half],
            [cx + half, cy + half],
            [cx - half, cy + half],
        ]);
        area -= (2.0 * half) * (2.0 * half);
    }
    (rings, area)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_area_is_conserved(
        corners in prop::collection::vec((0.0f64..0.5, 5.0f64..10.0), 8..40),
        hole_count in 0usize..=3,
        phase in 0.0f64..TAU,
    ) {
        let (rings, expected) = star_with_holes(&corners, hole_count, phase);
        let flat = flatten(&rings);
        let triangles = earcut(&flat.vertices, &flat.holes, 2);

        let n_total = flat.vertex_count() + 2 * hole_count;
        prop_assert_eq!(triangles.len() / 3, n_total - 2);
        prop_assert!(triangles.iter().all(|&i| i < flat.vertex_count()));
        prop_assert!((total_area(&flat.vertices, &triangles) - expected).abs() < 1e-9 * expected.max(1.0));
        for area in triangle_areas(&flat.vertices, &triangles) {
            prop_assert!(area >= -1e-12);
        }
    }
}
