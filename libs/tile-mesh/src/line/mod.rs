//! # Line Tessellation
//!
//! Turns polylines into flat ribbons with styled joins and caps.
//!
//! ## Ribbon Layout
//!
//! The walk emits vertex pairs across the centerline: the left rail at
//! `+normal` (UV `u = 1`) and the right rail at `-normal` (`u = 0`), with
//! `v` the distance walked so far. Consecutive pairs form quads. Joins add
//! extra pairs or pie-slice fans around the corner; caps extend the ends.
//!
//! ## Join Resolution
//!
//! Joins are chosen per vertex from the half-angle of the turn by
//! [`resolve_join`], independently of emission, so the cascade can be
//! tested on its own.

mod join;
mod tessellator;

pub use join::{miter_length, resolve_join, JoinRole, ResolvedJoin};
pub use tessellator::{LineScratch, LineTessellator};

use crate::error::{MeshError, Result};
use config::constants::{DEFAULT_LINE_WIDTH, DEFAULT_MITER_LIMIT, DEFAULT_ROUND_LIMIT};
use serde::{Deserialize, Serialize};

/// How two segments meet at an inner vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// Extend both rails to their intersection.
    Miter,
    /// Cut the corner with one triangle.
    Bevel,
    /// Fill the corner with a fan.
    #[default]
    Round,
}

/// How a line ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapType {
    /// Stop flush with the end point.
    Butt,
    /// Extend by half the width.
    Square,
    /// Close with a three step fan.
    #[default]
    Round,
}

/// Line styling, immutable for a tessellation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// Full ribbon width in world units, multiplied by the tile scale.
    pub width: f64,
    /// Miter length above which a miter join becomes a bevel.
    pub miter_limit: f64,
    /// Miter length below which a round join becomes a miter.
    pub round_limit: f64,
    /// Join at inner vertices.
    pub join: JoinType,
    /// Cap at both ends of open lines.
    pub cap: CapType,
    /// Vertical offset added to every ribbon vertex.
    pub push_up: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            miter_limit: DEFAULT_MITER_LIMIT,
            round_limit: DEFAULT_ROUND_LIMIT,
            join: JoinType::Round,
            cap: CapType::Round,
            push_up: 0.0,
        }
    }
}

impl LineStyle {
    /// Checks that the style can be tessellated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tile_mesh::line::LineStyle;
    ///
    /// assert!(LineStyle::default().validate().is_ok());
    /// let thin = LineStyle { width: 0.0, ..Default::default() };
    /// assert!(thin.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("miter_limit", self.miter_limit),
            ("round_limit", self.round_limit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MeshError::invalid_style(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if !self.push_up.is_finite() {
            return Err(MeshError::invalid_style(format!(
                "push_up must be finite, got {}",
                self.push_up
            )));
        }
        Ok(())
    }
}
