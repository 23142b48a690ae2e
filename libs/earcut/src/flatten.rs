//! Conversion from nested rings to the flat layout the triangulator reads,
//! and a quality measure for triangulation output.

use crate::ring::signed_area;

/// Rings flattened into one coordinate array plus hole start indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPolygon {
    /// Interleaved `x, y` coordinates of every ring.
    pub vertices: Vec<f64>,
    /// Vertex index at which each hole ring starts.
    pub holes: Vec<usize>,
    /// Coordinates per vertex, always 2.
    pub dim: usize,
}

impl FlatPolygon {
    /// Number of vertices across all rings.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.dim.max(1)
    }
}

/// Flattens an outer ring followed by its holes.
///
/// Empty rings are skipped so they never produce zero-length holes.
///
/// # Example
///
/// ```rust
/// use earcut::flatten;
///
/// let outer = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
/// let hole = vec![[1.0, 1.0], [1.0, 2.0], [2.0, 2.0]];
/// let flat = flatten(&[outer, hole]);
/// assert_eq!(flat.holes, vec![4]);
/// assert_eq!(flat.vertex_count(), 7);
/// ```
pub fn flatten<R: AsRef<[[f64; 2]]>>(rings: &[R]) -> FlatPolygon {
    let total: usize = rings.iter().map(|r| r.as_ref().len()).sum();
    let mut flat = FlatPolygon {
        vertices: Vec::with_capacity(total * 2),
        holes: Vec::with_capacity(rings.len().saturating_sub(1)),
        dim: 2,
    };

    let mut seen_outer = false;
    for ring in rings {
        let ring = ring.as_ref();
        if ring.is_empty() {
            continue;
        }
        if seen_outer {
            flat.holes.push(flat.vertex_count());
        }
        seen_outer = true;
        for point in ring {
            flat.vertices.extend_from_slice(point);
        }
    }
    flat
}

/// Relative difference between the polygon's area and the summed area of
/// its triangles. Zero for a perfect triangulation.
///
/// # Example
///
/// ```rust
/// use earcut::{deviation, earcut};
///
/// let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
/// let triangles = earcut(&square, &[], 2);
/// assert!(deviation(&square, &[], 2, &triangles) < 1e-12);
/// ```
pub fn deviation(data: &[f64], hole_indices: &[usize], dim: usize, triangles: &[usize]) -> f64 {
    if dim < 2 {
        return 0.0;
    }
    let outer_len = hole_indices.first().map_or(data.len(), |&h| h * dim);
    let mut polygon_area = signed_area(data, 0, outer_len, dim).abs();
    for (n, &hole) in hole_indices.iter().enumerate() {
        let start = hole * dim;
        let end = hole_indices.get(n + 1).map_or(data.len(), |&next| next * dim);
        polygon_area -= signed_area(data, start, end, dim).abs();
    }

    let mut triangles_area = 0.0;
    for tri in triangles.chunks_exact(3) {
        let (a, b, c) = (tri[0] * dim, tri[1] * dim, tri[2] * dim);
        triangles_area += ((data[a] - data[c]) * (data[b + 1] - data[a + 1])
            - (data[a] - data[b]) * (data[c + 1] - data[a + 1]))
            .abs();
    }

    if polygon_area == 0.0 && triangles_area == 0.0 {
        0.0
    } else {
        ((triangles_area - polygon_area) / polygon_area).abs()
    }
}
