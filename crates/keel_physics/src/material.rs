//! Physics materials defining surface properties

use serde::{Deserialize, Serialize};

use crate::shape::Shape;

/// Physics material attached to a rigid body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Material {
    /// Density for mass-from-volume derivation (kg/m³)
    pub density: f64,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f64,
    /// Friction coefficient. Stored for hosts and custom resolvers; the
    /// built-in single-normal impulse resolver does not consult it.
    pub friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            restitution: 0.0,
            friction: 0.5,
        }
    }
}

impl Material {
    /// Create a new material
    pub fn new(density: f64, restitution: f64, friction: f64) -> Self {
        Self::default()
            .with_density(density)
            .with_restitution(restitution)
            .with_friction(friction)
    }

    /// Frictionless ice-like material
    pub fn ice() -> Self {
        Self {
            density: 0.9,
            restitution: 0.05,
            friction: 0.05,
        }
    }

    /// Bouncy rubber-like material
    pub fn rubber() -> Self {
        Self {
            density: 1.1,
            restitution: 0.8,
            friction: 0.8,
        }
    }

    /// Metal material
    pub fn metal() -> Self {
        Self {
            density: 7.8,
            restitution: 0.2,
            friction: 0.3,
        }
    }

    /// Wood material
    pub fn wood() -> Self {
        Self {
            density: 0.6,
            restitution: 0.3,
            friction: 0.5,
        }
    }

    /// Stone/concrete material
    pub fn stone() -> Self {
        Self {
            density: 2.5,
            restitution: 0.1,
            friction: 0.7,
        }
    }

    /// Set density (clamped positive)
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density.max(0.001);
        self
    }

    /// Set restitution (clamped to [0, 1])
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set friction (clamped non-negative)
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Mass of a shape filled with this material.
    pub fn mass_for(&self, shape: &Shape) -> f64 {
        self.density * shape.volume()
    }
}
