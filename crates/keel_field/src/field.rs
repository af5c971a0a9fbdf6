//! Radial force fields

use keel_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Distance floor for the inverse-square well, keeping the singularity at
/// the center out of the force magnitude.
const MIN_WELL_DISTANCE: f64 = 0.1;

/// A radial influence source acting on particles within its radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForceField {
    /// Inverse-square attraction toward a point
    GravityWell {
        position: Vec3,
        radius: f64,
        strength: f64,
    },
    /// Exponential-falloff push away from a point
    Repulsor {
        position: Vec3,
        radius: f64,
        strength: f64,
        /// Length scale of the exponential decay
        falloff: f64,
    },
    /// Swirl around an axis with an inward radial pull
    Vortex {
        position: Vec3,
        radius: f64,
        axis: Vec3,
        strength: f64,
        pull: f64,
    },
}

impl ForceField {
    /// Create a gravity well
    pub fn gravity_well(position: Vec3, radius: f64, strength: f64) -> Self {
        Self::GravityWell {
            position,
            radius,
            strength,
        }
    }

    /// Create a repulsor with unit falloff length
    pub fn repulsor(position: Vec3, radius: f64, strength: f64) -> Self {
        Self::Repulsor {
            position,
            radius,
            strength,
            falloff: 1.0,
        }
    }

    /// Create a vortex swirling around `axis`
    pub fn vortex(position: Vec3, radius: f64, axis: Vec3, strength: f64, pull: f64) -> Self {
        Self::Vortex {
            position,
            radius,
            axis: axis.normalize(),
            strength,
            pull,
        }
    }

    /// Center of influence
    pub fn position(&self) -> Vec3 {
        match self {
            Self::GravityWell { position, .. }
            | Self::Repulsor { position, .. }
            | Self::Vortex { position, .. } => *position,
        }
    }

    /// Influence radius
    pub fn radius(&self) -> f64 {
        match self {
            Self::GravityWell { radius, .. }
            | Self::Repulsor { radius, .. }
            | Self::Vortex { radius, .. } => *radius,
        }
    }

    /// Whether the particle is inside the influence radius
    pub fn affects(&self, particle: &Particle) -> bool {
        particle.position.distance(self.position()) <= self.radius()
    }

    /// Shape-specific force on a particle. Callers gate on [`affects`];
    /// the force itself does not re-check the radius.
    ///
    /// [`affects`]: ForceField::affects
    pub fn force(&self, particle: &Particle) -> Vec3 {
        match self {
            Self::GravityWell {
                position, strength, ..
            } => {
                let delta = *position - particle.position;
                let distance = delta.length().max(MIN_WELL_DISTANCE);
                delta.normalize_or_zero() * (strength * particle.mass() / (distance * distance))
            }
            Self::Repulsor {
                position,
                strength,
                falloff,
                ..
            } => {
                let delta = particle.position - *position;
                let distance = delta.length();
                let direction = if distance > 0.0 {
                    delta / distance
                } else {
                    // A particle sitting exactly on the center still gets
                    // pushed somewhere.
                    Vec3::X
                };
                direction * (strength * (-distance / falloff).exp())
            }
            Self::Vortex {
                position,
                axis,
                strength,
                pull,
                ..
            } => {
                let radial = particle.position - *position;
                let planar = radial - *axis * radial.dot(*axis);
                let outward = planar.normalize_or_zero();
                if outward == Vec3::ZERO {
                    // On the axis there is no tangent direction.
                    return Vec3::ZERO;
                }
                axis.cross(outward) * *strength - outward * *pull
            }
        }
    }
}
