//! Keel Field - Radial Force Fields and Point-Mass Simulation
//!
//! A deliberately lighter companion to `keel_physics`: particles are point
//! masses with no orientation or collision response, advanced by ambient
//! gravity, air drag, radial force fields (gravity wells, repulsors,
//! vortices) and fluid buoyancy.
//!
//! The [`FieldEngine`] is plain owned state; construct one per simulation
//! and pass it where it is needed.
//!
//! ```
//! use keel_field::prelude::*;
//! use keel_math::Vec3;
//!
//! let mut engine = FieldEngine::zero_gravity();
//! engine.add_field(ForceField::gravity_well(Vec3::ZERO, 50.0, 10.0));
//! let p = engine.add_particle(Particle::new(Vec3::new(5.0, 0.0, 0.0), 1.0).unwrap());
//!
//! engine.step(1.0 / 60.0);
//! assert!(engine.particle(p).unwrap().velocity.x < 0.0);
//! ```

pub mod engine;
pub mod error;
pub mod field;
pub mod particle;

pub mod prelude {
    //! Common imports for field functionality
    pub use crate::engine::{FieldEngine, FluidRegion};
    pub use crate::error::{FieldError, Result};
    pub use crate::field::ForceField;
    pub use crate::particle::Particle;
}

pub use prelude::*;
