//! # Configuration Constants
//!
//! Centralized constants for vector tile mesh generation. Triangulation
//! thresholds, line join limits, batching ceilings and wall subdivision
//! defaults are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Triangulation**: Ear clipping spatial index parameters
//! - **Lines**: Stroke width and join/corner limits
//! - **Walls**: Extrusion subdivision and batching limits

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Tolerance used when deciding whether a line segment runs along the tile
/// border.
///
/// # Example
///
/// ```rust
/// use config::constants::TILE_EDGE_TOLERANCE;
///
/// let half_size = 50.0_f64;
/// let x = 49.9995_f64;
/// assert!((x.abs() - half_size).abs() < TILE_EDGE_TOLERANCE);
/// ```
pub const TILE_EDGE_TOLERANCE: f64 = 0.001;

// =============================================================================
// TRIANGULATION CONSTANTS
// =============================================================================

/// Coordinate count multiplier above which the ear clipper builds a Z-order
/// index.
///
/// A polygon with `coords.len() > EARCUT_HASH_THRESHOLD * dim` is indexed.
/// Smaller polygons are cheaper to scan linearly.
///
/// # Example
///
/// ```rust
/// use config::constants::EARCUT_HASH_THRESHOLD;
///
/// let dim = 2;
/// let square = [0.0_f64; 8];
/// assert!(square.len() <= EARCUT_HASH_THRESHOLD * dim);
/// ```
pub const EARCUT_HASH_THRESHOLD: usize = 80;

/// Grid resolution of the Z-order curve.
///
/// Coordinates are mapped onto `0..=Z_ORDER_RESOLUTION` before their bits
/// are interleaved, so each axis uses 15 bits.
///
/// # Example
///
/// ```rust
/// use config::constants::Z_ORDER_RESOLUTION;
///
/// assert!(Z_ORDER_RESOLUTION < f64::from(1_u32 << 15));
/// ```
pub const Z_ORDER_RESOLUTION: f64 = 32767.0;

// =============================================================================
// LINE CONSTANTS
// =============================================================================

/// Default full ribbon width in tile units (before tile scaling).
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_LINE_WIDTH;
///
/// let half_width = DEFAULT_LINE_WIDTH / 2.0;
/// assert_eq!(half_width, 0.5);
/// ```
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Default miter limit. A miter join whose miter length exceeds this value
/// is downgraded to a bevel.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MITER_LIMIT;
///
/// // A right angle corner has a miter length of sqrt(2)
/// assert!(std::f64::consts::SQRT_2 < DEFAULT_MITER_LIMIT);
/// ```
pub const DEFAULT_MITER_LIMIT: f64 = 2.0;

/// Default round limit. Round joins flatter than this become miters.
pub const DEFAULT_ROUND_LIMIT: f64 = 1.05;

/// Miter length below which a configured bevel join is drawn as a miter
/// instead. A bevel that short would not be visible.
///
/// # Example
///
/// ```rust
/// use config::constants::BEVEL_MITER_LIMIT;
///
/// let nearly_straight = 1.0 / (5.0_f64.to_radians()).cos();
/// assert!(nearly_straight < BEVEL_MITER_LIMIT);
/// ```
pub const BEVEL_MITER_LIMIT: f64 = 1.05;

/// Miter length above which bevels are flipped and round joins stop being
/// approximated by pie slices.
pub const FLIP_BEVEL_MITER_LIMIT: f64 = 2.0;

/// Miter length above which two segments are treated as parallel when
/// flipping a bevel.
pub const PARALLEL_MITER_LIMIT: f64 = 100.0;

/// Distance from a sharp corner at which an extra vertex is inserted.
///
/// Tied to the coordinate range of a map tile; rescale it together with the
/// tile size.
///
/// # Example
///
/// ```rust
/// use config::constants::SHARP_CORNER_OFFSET;
///
/// let segment_length = 40.0;
/// assert!(segment_length > 2.0 * SHARP_CORNER_OFFSET);
/// ```
pub const SHARP_CORNER_OFFSET: f64 = 15.0;

/// Turn angle (degrees) above which a corner counts as sharp.
///
/// # Example
///
/// ```rust
/// use config::constants::{cos_half_angle, SHARP_CORNER_ANGLE_DEGREES};
///
/// let threshold = cos_half_angle(SHARP_CORNER_ANGLE_DEGREES);
/// assert!((threshold - 0.7934).abs() < 1e-4);
/// ```
pub const SHARP_CORNER_ANGLE_DEGREES: f64 = 75.0;

// =============================================================================
// WALL CONSTANTS
// =============================================================================

/// Maximum vertex count of a single render batch.
///
/// Keeps every batch addressable with 16-bit indices.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_BATCH_VERTICES;
///
/// assert!(MAX_BATCH_VERTICES <= u16::MAX as usize);
/// ```
pub const MAX_BATCH_VERTICES: usize = 60_000;

/// Default upper bound on the number of sections a wall edge is split into.
pub const DEFAULT_MAX_EDGE_SECTIONS: usize = 40;

/// Default preferred wall section length in tile units.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_EDGE_SECTION_LENGTH;
///
/// let edge = 35.0;
/// let sections = (edge / DEFAULT_EDGE_SECTION_LENGTH).floor();
/// assert_eq!(sections, 3.0);
/// ```
pub const DEFAULT_EDGE_SECTION_LENGTH: f64 = 10.0;

/// Leftover edge length (in tile units) above which wall sections are
/// centered along the edge.
pub const CENTERING_MIN_REMAINDER: f64 = 2.0;

/// Section length (in tile units) above which the full window segment
/// template is used instead of the narrow alternative.
pub const MIN_SEGMENT_SECTION_LENGTH: f64 = 3.0;

/// Horizontal overscale applied to stamped wall templates so adjacent
/// sections overlap slightly.
pub const TEMPLATE_OVERLAP: f64 = 1.01;

/// Default storey height of upper floors, in world units.
pub const DEFAULT_FLOOR_HEIGHT: f64 = 3.0;

/// Default height of the ground floor, in world units.
pub const DEFAULT_FIRST_FLOOR_HEIGHT: f64 = 4.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Cosine of half of a turn angle given in degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::cos_half_angle;
///
/// assert!((cos_half_angle(180.0)).abs() < 1e-12);
/// assert_eq!(cos_half_angle(0.0), 1.0);
/// ```
#[inline]
pub fn cos_half_angle(degrees: f64) -> f64 {
    (degrees / 2.0).to_radians().cos()
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Immutable snapshot of the tunable generation thresholds, shared read-only
/// by every worker of a tile pass.
///
/// # Examples
/// ```
/// use config::constants::MeshConfig;
/// let config = MeshConfig::default();
/// assert_eq!(config.max_batch_vertices, 60_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshConfig {
    /// Coordinate count multiplier that enables Z-order indexing.
    pub earcut_hash_threshold: usize,
    /// Distance from a sharp corner at which an extra vertex is inserted.
    pub sharp_corner_offset: f64,
    /// Turn angle in degrees above which a corner counts as sharp.
    pub sharp_corner_angle_degrees: f64,
    /// Vertex ceiling of a single wall batch.
    pub max_batch_vertices: usize,
}

impl MeshConfig {
    /// Builds a configuration, rejecting values the algorithms cannot use.
    ///
    /// # Examples
    /// ```
    /// use config::constants::MeshConfig;
    /// let cfg = MeshConfig::new(40, 7.5, 75.0, 30_000).expect("valid config");
    /// assert_eq!(cfg.earcut_hash_threshold, 40);
    /// assert!(MeshConfig::new(40, -1.0, 75.0, 30_000).is_err());
    /// ```
    pub fn new(
        earcut_hash_threshold: usize,
        sharp_corner_offset: f64,
        sharp_corner_angle_degrees: f64,
        max_batch_vertices: usize,
    ) -> Result<Self, ConfigError> {
        if !sharp_corner_offset.is_finite() || sharp_corner_offset < 0.0 {
            return Err(ConfigError::InvalidCornerOffset(sharp_corner_offset));
        }
        if !(sharp_corner_angle_degrees > 0.0 && sharp_corner_angle_degrees < 180.0) {
            return Err(ConfigError::InvalidCornerAngle(sharp_corner_angle_degrees));
        }
        if max_batch_vertices < 4 || max_batch_vertices > u16::MAX as usize {
            return Err(ConfigError::InvalidBatchSize(max_batch_vertices));
        }
        Ok(Self {
            earcut_hash_threshold,
            sharp_corner_offset,
            sharp_corner_angle_degrees,
            max_batch_vertices,
        })
    }

    /// Returns a copy with a different sharp corner offset, validated.
    pub fn with_sharp_corner_offset(self, offset: f64) -> Result<Self, ConfigError> {
        Self::new(
            self.earcut_hash_threshold,
            offset,
            self.sharp_corner_angle_degrees,
            self.max_batch_vertices,
        )
    }

    /// Cosine of half the sharp corner angle, the value compared against a
    /// join's `cos_half_angle`.
    #[inline]
    pub fn cos_half_sharp_corner(&self) -> f64 {
        cos_half_angle(self.sharp_corner_angle_degrees)
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            earcut_hash_threshold: EARCUT_HASH_THRESHOLD,
            sharp_corner_offset: SHARP_CORNER_OFFSET,
            sharp_corner_angle_degrees: SHARP_CORNER_ANGLE_DEGREES,
            max_batch_vertices: MAX_BATCH_VERTICES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when the sharp corner offset is negative or not finite.
    InvalidCornerOffset(f64),
    /// Raised when the sharp corner angle is outside `(0, 180)` degrees.
    InvalidCornerAngle(f64),
    /// Raised when the batch ceiling cannot hold a quad or overflows 16 bits.
    InvalidBatchSize(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCornerOffset(value) => {
                write!(f, "sharp_corner_offset must be finite and >= 0: {value}")
            }
            ConfigError::InvalidCornerAngle(value) => {
                write!(f, "sharp_corner_angle_degrees must be in (0, 180): {value}")
            }
            ConfigError::InvalidBatchSize(value) => {
                write!(f, "max_batch_vertices must be in 4..=65535: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
