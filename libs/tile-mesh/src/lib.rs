//! # Tile Mesh
//!
//! Mesh generation for decoded vector tile features.
//!
//! ## Architecture
//!
//! ```text
//! Feature rings → polygon (roof) ─┐
//!                                 ├→ terrain snap → extrude → MeshData
//! Feature rings → line (ribbon) ──┘
//! ```
//!
//! Every generator appends to a caller-owned [`MeshData`]. Nothing is
//! shared between features, so a tile's features run in parallel through
//! [`pipeline::TilePipeline`].
//!
//! ## Conventions
//!
//! - Points are `(x, y, z)` with `y` up; rings lie in the `x`/`z` plane
//! - Outer rings are clockwise, holes counter-clockwise
//! - Positions are `f64`; buffers are exported as `f32` at the boundary
//! - Degenerate input produces less output, never an error
//!
//! ## Example
//!
//! ```rust
//! use glam::{DVec2, DVec3};
//! use tile_mesh::extrude::ExtrusionOptions;
//! use tile_mesh::pipeline::{PipelineOptions, TilePipeline};
//! use tile_mesh::{Feature, GeometryKind, TileContext};
//!
//! let options = PipelineOptions {
//!     extrusion: Some(ExtrusionOptions::default()),
//!     ..Default::default()
//! };
//! let pipeline = TilePipeline::new(options, Default::default()).unwrap();
//!
//! let house = Feature::new(1, GeometryKind::Polygon)
//!     .with_ring(vec![
//!         DVec3::new(0.0, 0.0, 0.0),
//!         DVec3::new(0.0, 0.0, 10.0),
//!         DVec3::new(10.0, 0.0, 10.0),
//!         DVec3::new(10.0, 0.0, 0.0),
//!     ])
//!     .with_property("height", 6.0);
//!
//! let tile = TileContext::new(1.0, DVec2::splat(100.0));
//! let meshes = pipeline.build_tile(&[house], &tile, None).unwrap();
//! let mesh = &meshes[0].mesh;
//! assert_eq!(mesh.triangle_count(), 2 + 4 * 2);
//! assert_eq!(mesh.vertices_f32().len(), mesh.vertex_count() * 3);
//! ```

pub mod error;
pub mod extrude;
pub mod feature;
pub mod geometry;
pub mod line;
pub mod mesh_data;
pub mod pipeline;
pub mod polygon;
pub mod terrain;

pub use error::{MeshError, Result};
pub use feature::{Feature, GeometryKind, PropertyValue, TileContext};
pub use mesh_data::{MeshData, Vertex};
pub use pipeline::{FeatureMesh, FeatureScratch, PipelineOptions, TilePipeline};
