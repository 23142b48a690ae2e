//! # Geometry Primitives
//!
//! Helpers on tile-local points. Points are `(x, y, z)` with `y` the
//! vertical axis, so every planar computation here works on `x` and `z`.

use config::constants::EPSILON;
use glam::{DVec2, DVec3};

/// Upward unit vector.
pub const UP: DVec3 = DVec3::Y;

/// Perpendicular of `v` in the horizontal plane, rotated a quarter turn
/// counter-clockwise when `x` points east and `z` points north.
///
/// The vertical component is dropped.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use tile_mesh::geometry::perpendicular;
///
/// assert_eq!(perpendicular(DVec3::X), DVec3::Z);
/// assert_eq!(perpendicular(DVec3::Z), -DVec3::X);
/// ```
#[inline]
pub fn perpendicular(v: DVec3) -> DVec3 {
    DVec3::new(-v.z, 0.0, v.x)
}

/// Projects a point onto the horizontal plane as `(x, z)`.
#[inline]
pub fn planar(p: DVec3) -> DVec2 {
    DVec2::new(p.x, p.z)
}

/// Horizontal distance between two points.
#[inline]
pub fn planar_distance(a: DVec3, b: DVec3) -> f64 {
    planar(a).distance(planar(b))
}

/// Intersection of the infinite lines `p1 -> p2` and `p3 -> p4` in the
/// horizontal plane, or `None` when they are parallel.
///
/// The returned point has `y = 0`.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use tile_mesh::geometry::line_intersection;
///
/// let hit = line_intersection(
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(2.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, -1.0),
///     DVec3::new(1.0, 0.0, 1.0),
/// );
/// assert_eq!(hit, Some(DVec3::new(1.0, 0.0, 0.0)));
/// ```
pub fn line_intersection(p1: DVec3, p2: DVec3, p3: DVec3, p4: DVec3) -> Option<DVec3> {
    let d12 = planar(p2) - planar(p1);
    let d34 = planar(p4) - planar(p3);

    let denominator = d12.y * d34.x - d12.x * d34.y;
    if denominator.abs() < EPSILON {
        return None;
    }

    let t = ((p1.x - p3.x) * d34.y + (p3.z - p1.z) * d34.x) / denominator;
    Some(DVec3::new(p1.x + d12.x * t, 0.0, p1.z + d12.y * t))
}

/// Winding test used to tell outer rings from holes.
///
/// Sums `(x2 - x1) * (z2 + z1)` over the ring edges; a positive sum is
/// clockwise. Vector tile outer rings are clockwise and holes are
/// counter-clockwise under this test.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use tile_mesh::geometry::is_clockwise;
///
/// let ring = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(1.0, 0.0, 1.0),
///     DVec3::new(1.0, 0.0, 0.0),
/// ];
/// assert!(is_clockwise(&ring));
/// ```
pub fn is_clockwise(ring: &[DVec3]) -> bool {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let v1 = ring[i];
        let v2 = ring[(i + 1) % n];
        sum += (v2.x - v1.x) * (v2.z + v1.z);
    }
    sum > 0.0
}

/// Returns the ring without a trailing point that repeats the first.
#[inline]
pub fn strip_closing_point(ring: &[DVec3]) -> &[DVec3] {
    match ring {
        [first, .., last] if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Orders a triangle so its right-handed normal points up (`+Y`).
///
/// Triangles that are vertical or degenerate are returned unchanged.
pub fn face_up(positions: &[DVec3], tri: [u32; 3]) -> [u32; 3] {
    let [a, b, c] = tri.map(|i| positions[i as usize]);
    if (b - a).cross(c - a).y < 0.0 {
        [tri[0], tri[2], tri[1]]
    } else {
        tri
    }
}

/// Outward wall normal for a boundary edge `v1 -> v2`.
///
/// Boundary edges run against the ring direction, which places the
/// outside of the polygon on the normal side. Zero-length edges yield
/// a zero normal.
#[inline]
pub fn wall_normal(v1: DVec3, v2: DVec3) -> DVec3 {
    let d = v2 - v1;
    DVec3::new(d.z, 0.0, -d.x).normalize_or_zero()
}

/// Whether both points of a segment lie on the same tile border.
///
/// `half_size` is half the tile's side length in local units; a point is
/// on a border when `|x|` or `|z|` is within `tolerance` of it.
pub fn is_on_tile_edge(p1: DVec3, p2: DVec3, half_size: f64, tolerance: f64) -> bool {
    let on = |v: f64| (v.abs() - half_size).abs() < tolerance;
    (on(p1.x) && on(p2.x) && p1.x.signum() == p2.x.signum())
        || (on(p1.z) && on(p2.z) && p1.z.signum() == p2.z.signum())
}

#[cfg(test)]
mod tests;
