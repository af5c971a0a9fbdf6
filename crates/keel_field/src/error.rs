//! Error types for the field engine

use thiserror::Error;

/// Field engine errors
#[derive(Debug, Error)]
pub enum FieldError {
    /// Mass outside the valid range for a particle
    #[error("particle mass must be finite and positive, got {0}")]
    InvalidMass(f64),
}

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldError>;
