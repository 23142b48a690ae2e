//! # Mesh Errors
//!
//! Error types for mesh generation.
//!
//! Degenerate geometry is never an error here: empty rings, collinear
//! points and zero-length polylines simply produce less output. These
//! variants cover invalid configuration and broken buffer invariants.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur during mesh generation.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Invalid tunable thresholds
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Line style values that cannot be tessellated
    #[error("Invalid line style: {message}")]
    InvalidStyle { message: String },

    /// Extrusion or floor options out of range
    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    /// Wall segment template with inconsistent buffers
    #[error("Invalid wall template: {message}")]
    InvalidTemplate { message: String },

    /// Mesh buffer invariant broken
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// UV channel does not match the vertex count
    #[error("UV channel has {actual} entries, expected {expected}")]
    UvChannelLength { expected: usize, actual: usize },
}

impl MeshError {
    /// Creates an invalid style error.
    pub fn invalid_style(message: impl Into<String>) -> Self {
        Self::InvalidStyle {
            message: message.into(),
        }
    }

    /// Creates an invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Creates an invalid template error.
    pub fn invalid_template(message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MeshError>;

/// Fails with [`MeshError::InvalidOptions`] unless `value` is finite and
/// strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_options(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}
