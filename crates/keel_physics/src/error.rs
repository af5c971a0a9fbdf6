//! Error types for the physics core

use thiserror::Error;

use crate::body::BodyId;

/// Physics system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Rigid body not found in the world
    #[error("rigid body not found: {0:?}")]
    BodyNotFound(BodyId),

    /// A body with the same id is already registered
    #[error("duplicate body id: {0:?}")]
    DuplicateBody(BodyId),

    /// Mass outside the valid range for a dynamic body
    #[error("mass must be finite and positive, got {0}")]
    InvalidMass(f64),

    /// Shape with non-positive or non-finite dimensions
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Invalid configuration
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
