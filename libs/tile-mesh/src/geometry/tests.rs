//! # Geometry Tests

use super::*;
use approx::assert_relative_eq;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

#[test]
fn test_perpendicular_is_orthogonal_and_flat() {
    let v = DVec3::new(3.0, 5.0, 4.0);
    let n = perpendicular(v);
    assert_eq!(n.y, 0.0);
    assert_relative_eq!(n.x * v.x + n.z * v.z, 0.0);
}

#[test]
fn test_line_intersection_parallel() {
    assert!(line_intersection(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)).is_none());
}

#[test]
fn test_line_intersection_outside_segments() {
    // Lines intersect beyond both segments
    let hit = line_intersection(p(0.0, 0.0), p(1.0, 1.0), p(4.0, 0.0), p(3.0, 1.0));
    let hit = hit.expect("lines are not parallel");
    assert_relative_eq!(hit.x, 2.0);
    assert_relative_eq!(hit.z, 2.0);
}

#[test]
fn test_is_clockwise_both_windings() {
    let cw = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
    let mut ccw = cw;
    ccw.reverse();
    assert!(is_clockwise(&cw));
    assert!(!is_clockwise(&ccw));
    assert!(!is_clockwise(&[]));
}

#[test]
fn test_strip_closing_point() {
    let closed = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)];
    assert_eq!(strip_closing_point(&closed).len(), 3);
    assert_eq!(strip_closing_point(&closed[..3]).len(), 3);
    assert_eq!(strip_closing_point(&closed[..1]).len(), 1);
    assert!(strip_closing_point(&[]).is_empty());
}

#[test]
fn test_face_up_flips_downward_triangle() {
    let positions = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)];
    // (0,0) -> (1,0) -> (0,1) in x/z has a downward right-handed normal
    assert_eq!(face_up(&positions, [0, 1, 2]), [0, 2, 1]);
    assert_eq!(face_up(&positions, [0, 2, 1]), [0, 2, 1]);
}

#[test]
fn test_wall_normal_points_outside_clockwise_ring() {
    // Clockwise ring; its first boundary edge runs from ring[1] to ring[0]
    // along the x = 0 side.
    let ring = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
    let n = wall_normal(ring[1], ring[0]);
    assert_relative_eq!(n.x, -1.0);
    assert_relative_eq!(n.z, 0.0);
    assert_eq!(wall_normal(ring[0], ring[0]), DVec3::ZERO);
}

#[test]
fn test_is_on_tile_edge() {
    let half = 50.0;
    assert!(is_on_tile_edge(p(50.0, 0.0), p(50.0, 10.0), half, 0.001));
    assert!(is_on_tile_edge(p(-3.0, -50.0), p(8.0, -50.0005), half, 0.001));
    // Opposite borders
    assert!(!is_on_tile_edge(p(50.0, 0.0), p(-50.0, 0.0), half, 0.001));
    // Interior
    assert!(!is_on_tile_edge(p(10.0, 0.0), p(50.0, 0.0), half, 0.001));
}
