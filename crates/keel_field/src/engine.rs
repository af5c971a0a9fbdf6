//! Caller-owned point-mass engine

use keel_math::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::field::ForceField;
use crate::particle::Particle;

/// A horizontal fluid volume below `surface_height`, applying buoyancy and
/// linear drag to submerged particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidRegion {
    /// World-space height of the fluid surface
    pub surface_height: f64,
    /// Fluid density (kg/m³)
    pub density: f64,
    /// Linear drag coefficient while submerged
    pub drag: f64,
}

impl FluidRegion {
    /// Create a fluid region
    pub fn new(surface_height: f64, density: f64, drag: f64) -> Self {
        Self {
            surface_height,
            density,
            drag: drag.max(0.0),
        }
    }

    /// Water at rest with mild drag
    pub fn water(surface_height: f64) -> Self {
        Self::new(surface_height, 1000.0, 0.5)
    }

    /// Fraction of the particle's displaced sphere below the surface,
    /// in [0, 1].
    pub fn submersion(&self, particle: &Particle) -> f64 {
        let depth = self.surface_height - particle.position.y;
        if depth <= 0.0 {
            return 0.0;
        }
        if particle.radius > 0.0 {
            (depth / (2.0 * particle.radius)).min(1.0)
        } else {
            1.0
        }
    }

    /// Archimedes buoyancy plus drag, both scaled by submersion depth.
    pub fn force(&self, gravity: Vec3, particle: &Particle) -> Vec3 {
        let fraction = self.submersion(particle);
        if fraction == 0.0 {
            return Vec3::ZERO;
        }
        let buoyancy = -gravity * (self.density * particle.volume() * fraction);
        let drag = -particle.velocity * (self.drag * fraction);
        buoyancy + drag
    }
}

/// Point-mass simulation: gravity, air drag, force fields, fluids.
///
/// Explicitly constructed and caller-owned; hosts that share one engine
/// pass it down instead of reaching for a global.
#[derive(Debug)]
pub struct FieldEngine {
    gravity: Vec3,
    particles: Vec<Particle>,
    fields: Vec<ForceField>,
    fluids: Vec<FluidRegion>,
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldEngine {
    /// Create an engine with standard downward gravity
    pub fn new() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            particles: Vec::new(),
            fields: Vec::new(),
            fluids: Vec::new(),
        }
    }

    /// Create an engine with no ambient gravity
    pub fn zero_gravity() -> Self {
        Self {
            gravity: Vec3::ZERO,
            ..Self::new()
        }
    }

    /// Set ambient gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Ambient gravity
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Add a particle and return its index
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        let slot = self.particles.len();
        self.particles.push(particle);
        debug!("added particle #{slot}");
        slot
    }

    /// Add a force field and return its index
    pub fn add_field(&mut self, field: ForceField) -> usize {
        let slot = self.fields.len();
        self.fields.push(field);
        slot
    }

    /// Add a fluid region and return its index
    pub fn add_fluid(&mut self, fluid: FluidRegion) -> usize {
        let slot = self.fluids.len();
        self.fluids.push(fluid);
        slot
    }

    /// Get a particle by index
    pub fn particle(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    /// Get a mutable particle by index
    pub fn particle_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.particles.get_mut(slot)
    }

    /// All particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// All force fields
    pub fn fields(&self) -> &[ForceField] {
        &self.fields
    }

    /// Advance every particle by `dt`: gravity, air drag, in-range field
    /// forces, fluid buoyancy and drag, then semi-implicit Euler.
    pub fn step(&mut self, dt: f64) {
        debug_assert!(dt.is_finite(), "non-finite dt corrupts particle state");
        let gravity = self.gravity;
        for particle in &mut self.particles {
            let mut force = gravity * particle.mass();
            force -= particle.velocity * particle.drag;

            for field in &self.fields {
                if field.affects(particle) {
                    force += field.force(particle);
                }
            }
            for fluid in &self.fluids {
                force += fluid.force(gravity, particle);
            }

            particle.apply_force(force);
            particle.integrate(dt);
        }
    }
}
