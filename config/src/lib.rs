//! # Config Crate
//!
//! Centralized configuration constants for vector tile mesh generation.
//! Every empirical threshold used by the triangulator, the line tessellator
//! and the wall extruder lives here so that callers working at a different
//! coordinate scale can tune them instead of patching algorithms.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{MeshConfig, EARCUT_HASH_THRESHOLD, SHARP_CORNER_OFFSET};
//!
//! // Z-order indexing kicks in above this many coordinates per dimension
//! let coords = 2 * 100;
//! assert!(coords > EARCUT_HASH_THRESHOLD * 2);
//!
//! // Rescale the sharp corner guard for a tile four times smaller
//! let cfg = MeshConfig::default().with_sharp_corner_offset(SHARP_CORNER_OFFSET / 4.0);
//! assert!(cfg.is_ok());
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Tunable Defaults**: Empirical values are defaults, not guarantees
//! - **Dependency Free**: Usable from every crate in the workspace

pub mod constants;
