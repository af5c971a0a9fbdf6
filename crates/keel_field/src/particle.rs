//! Point-mass particles

use keel_math::Vec3;

use crate::error::{FieldError, Result};

/// A point mass advanced by the field engine.
///
/// No orientation and no collision shape; the radius only sizes the sphere
/// displaced for buoyancy. Forces accumulate for one step and are zeroed by
/// integration, matching the rigid-body core's single-step semantics.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position in world space
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    mass: f64,
    /// Radius of the sphere displaced by fluids
    pub radius: f64,
    /// Linear air-drag coefficient
    pub drag: f64,
    force: Vec3,
}

impl Particle {
    /// Create a particle. Rejects non-finite or non-positive mass.
    pub fn new(position: Vec3, mass: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(FieldError::InvalidMass(mass));
        }
        Ok(Self {
            position,
            velocity: Vec3::ZERO,
            mass,
            radius: 0.1,
            drag: 0.0,
            force: Vec3::ZERO,
        })
    }

    /// Set initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set displaced-sphere radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    /// Set air-drag coefficient
    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag.max(0.0);
        self
    }

    /// Particle mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Volume of the displaced sphere
    pub fn volume(&self) -> f64 {
        std::f64::consts::PI * self.radius.powi(3) * 4.0 / 3.0
    }

    /// Accumulate a force for the current step
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Semi-implicit Euler step; accumulated force is consumed.
    pub(crate) fn integrate(&mut self, dt: f64) {
        let acceleration = self.force / self.mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        self.force = Vec3::ZERO;
    }
}
