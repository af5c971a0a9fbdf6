//! Keel Physics - Rigid-Body Dynamics Core
//!
//! Discrete-time rigid-body simulation: force accumulation, semi-implicit
//! Euler integration, pairwise collision detection with impulse-based
//! resolution, and iterative distance-constraint relaxation.
//!
//! # Features
//!
//! - Rigid body dynamics (static, dynamic, per-body enable flag)
//! - Sphere and box collision shapes with support-point queries
//! - Physics materials (density, restitution, friction)
//! - Fixed-distance constraints with Baumgarte stabilization
//! - Contact events, poll- or channel-based
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                 PhysicsWorld                   │
//! │  ┌───────────┐  ┌─────────────┐  ┌──────────┐  │
//! │  │  bodies   │  │ constraints │  │  events  │  │
//! │  └───────────┘  └─────────────┘  └──────────┘  │
//! │  update(dt):                                   │
//! │    gravity → integrate → collide → constrain   │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use keel_physics::prelude::*;
//! use keel_math::Vec3;
//!
//! let mut world = PhysicsWorld::default();
//!
//! let ball = world
//!     .add_body(
//!         RigidBody::new(BodyId::new(1), Shape::sphere(0.5), Material::rubber(), 1.0)
//!             .unwrap()
//!             .with_position(Vec3::new(0.0, 10.0, 0.0)),
//!     )
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     world.update(1.0 / 60.0);
//! }
//!
//! assert!(world.body(ball).unwrap().position().y < 10.0);
//! ```

pub mod body;
pub mod config;
pub mod constraint;
pub mod error;
pub mod events;
pub mod material;
pub mod shape;
pub mod sync;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyId, RigidBody};
    pub use crate::config::PhysicsConfig;
    pub use crate::constraint::{Constraint, DistanceConstraint};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::ContactEvent;
    pub use crate::material::Material;
    pub use crate::shape::Shape;
    pub use crate::sync::SharedWorld;
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
