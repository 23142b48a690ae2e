//! # Earcut
//!
//! Ear clipping triangulation of polygons with holes.
//!
//! ## Algorithm
//!
//! 1. Link the outer contour into a circular list with positive signed area
//!    and every hole with negative signed area.
//! 2. Bridge each hole into the outer ring from its leftmost vertex.
//! 3. For large inputs, thread a Z-order sorted list through the nodes so
//!    ear tests only visit nearby vertices.
//! 4. Clip ears. When a full lap finds none, escalate: filter collinear
//!    points, cure local self-intersections, then split along a diagonal.
//!
//! Nodes live in an index-addressed arena; nothing is freed until the next
//! call, so splicing never invalidates a reference.
//!
//! ## Usage
//!
//! ```rust
//! use earcut::{earcut, flatten};
//!
//! let outer = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let hole = vec![[0.25, 0.25], [0.25, 0.75], [0.75, 0.75], [0.75, 0.25]];
//! let flat = flatten(&[outer, hole]);
//! let triangles = earcut(&flat.vertices, &flat.holes, flat.dim);
//! assert_eq!(triangles.len() / 3, 8);
//! ```

mod arena;
mod clip;
mod flatten;
mod holes;
mod ring;
mod triangulator;
mod zorder;

pub use flatten::{deviation, flatten, FlatPolygon};
pub use ring::signed_area;
pub use triangulator::{EarcutOptions, Triangulator};

/// Triangulates a flat coordinate array with default options.
///
/// See [`Triangulator::triangulate`] for the meaning of the arguments.
///
/// # Example
///
/// ```rust
/// use earcut::earcut;
///
/// let triangle = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
/// assert_eq!(earcut(&triangle, &[], 2), vec![1, 2, 0]);
/// ```
pub fn earcut(data: &[f64], hole_indices: &[usize], dim: usize) -> Vec<usize> {
    earcut_with(data, hole_indices, dim, EarcutOptions::default())
}

/// Triangulates with explicit options.
pub fn earcut_with(data: &[f64], hole_indices: &[usize], dim: usize, options: EarcutOptions) -> Vec<usize> {
    let mut triangles = Vec::new();
    Triangulator::new(options).triangulate(data, hole_indices, dim, &mut triangles);
    triangles
}

#[cfg(test)]
mod tests;
