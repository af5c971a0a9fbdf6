//! Physics world - main simulation container

use std::collections::HashMap;

use crossbeam_channel::Receiver;
use keel_math::Vec3;
use log::{debug, trace};

use crate::body::{BodyId, RigidBody};
use crate::config::PhysicsConfig;
use crate::constraint::{Constraint, DistanceConstraint};
use crate::error::{PhysicsError, Result};
use crate::events::{ContactEvent, EventCollector};

/// The main physics world containing all simulation state.
///
/// Single-threaded and synchronous: `update` runs the whole
/// force/integrate/collide/constrain pipeline to completion. Hosts that
/// step from another thread wrap the world in [`crate::sync::SharedWorld`].
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: Vec<RigidBody>,
    index: HashMap<BodyId, usize>,
    constraints: Vec<Constraint>,
    events: EventCollector,
}

impl PhysicsWorld {
    /// Create a physics world from a validated configuration.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            index: HashMap::new(),
            constraints: Vec::new(),
            events: EventCollector::new(),
        })
    }

    /// Current configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Set gravity
    pub fn set_gravity(&mut self, gravity: Vec3) -> Result<()> {
        if !gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite".into()));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    /// Current gravity
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Set the nominal timestep
    pub fn set_time_step(&mut self, time_step: f64) -> Result<()> {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {time_step}"
            )));
        }
        self.config.time_step = time_step;
        Ok(())
    }

    /// Set constraint solver iterations per step
    pub fn set_solver_iterations(&mut self, iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".into(),
            ));
        }
        self.config.solver_iterations = iterations;
        Ok(())
    }

    // ==================== Rigid bodies ====================

    /// Add a body to the world. Ids are caller-assigned and must be unique
    /// within the world.
    pub fn add_body(&mut self, body: RigidBody) -> Result<BodyId> {
        let id = body.id();
        if self.index.contains_key(&id) {
            return Err(PhysicsError::DuplicateBody(id));
        }
        self.index.insert(id, self.bodies.len());
        self.bodies.push(body);
        debug!("added body {id:?} ({} total)", self.bodies.len());
        Ok(id)
    }

    /// Remove a body. Constraints referencing it are dropped with it, so no
    /// constraint ever solves against a dangling id.
    pub fn remove_body(&mut self, id: BodyId) -> Result<RigidBody> {
        let slot = self
            .index
            .remove(&id)
            .ok_or(PhysicsError::BodyNotFound(id))?;
        let body = self.bodies.swap_remove(slot);
        if slot < self.bodies.len() {
            let moved = self.bodies[slot].id();
            self.index.insert(moved, slot);
        }

        let before = self.constraints.len();
        self.constraints.retain(|c| !c.references(id));
        let dropped = before - self.constraints.len();
        debug!("removed body {id:?}, dropped {dropped} constraints");
        Ok(body)
    }

    /// Get a body by id
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.index.get(&id).map(|&slot| &self.bodies[slot])
    }

    /// Get a mutable body by id
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let slot = *self.index.get(&id)?;
        Some(&mut self.bodies[slot])
    }

    /// All bodies, in insertion-then-swap order
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // ==================== Constraints ====================

    /// Add a constraint and return its index
    pub fn add_constraint(&mut self, constraint: Constraint) -> usize {
        let slot = self.constraints.len();
        self.constraints.push(constraint);
        debug!("added constraint #{slot}");
        slot
    }

    /// Link two bodies at their centers, rest distance measured from their
    /// current positions.
    pub fn add_distance_constraint(&mut self, a: BodyId, b: BodyId) -> Result<usize> {
        let body_a = self.body(a).ok_or(PhysicsError::BodyNotFound(a))?;
        let body_b = self.body(b).ok_or(PhysicsError::BodyNotFound(b))?;
        let constraint = DistanceConstraint::between(body_a, body_b, Vec3::ZERO, Vec3::ZERO);
        Ok(self.add_constraint(Constraint::Distance(constraint)))
    }

    /// Remove a constraint by index
    pub fn remove_constraint(&mut self, slot: usize) -> Option<Constraint> {
        if slot < self.constraints.len() {
            Some(self.constraints.remove(slot))
        } else {
            None
        }
    }

    /// All constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    // ==================== Events ====================

    /// Contacts resolved during the last `update`
    pub fn contacts(&self) -> &[ContactEvent] {
        self.events.contacts()
    }

    /// Open a channel receiving every future contact event
    pub fn subscribe(&mut self) -> Receiver<ContactEvent> {
        self.events.subscribe()
    }

    // ==================== Simulation ====================

    /// Advance the simulation by `dt` seconds: apply gravity, integrate
    /// every body, resolve pairwise collisions, then relax constraints.
    pub fn update(&mut self, dt: f64) {
        debug_assert!(dt.is_finite(), "non-finite dt corrupts all body state");
        self.events.clear();

        let gravity = self.config.gravity;
        for body in &mut self.bodies {
            if body.is_enabled() && !body.is_static() {
                body.apply_force(gravity * body.mass());
            }
        }

        for body in &mut self.bodies {
            body.integrate(dt);
        }

        self.collision_pass();

        for _ in 0..self.config.solver_iterations {
            self.constraint_pass(dt);
        }

        trace!(
            "stepped dt={dt}: {} bodies, {} contacts, {} constraints",
            self.bodies.len(),
            self.events.contacts().len(),
            self.constraints.len()
        );
    }

    /// Pairwise O(n²) narrow phase over enabled bodies. No broad phase.
    fn collision_pass(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                {
                    let a = &self.bodies[i];
                    let b = &self.bodies[j];
                    if !a.is_enabled() || !b.is_enabled() {
                        continue;
                    }
                    if a.is_static() && b.is_static() {
                        continue;
                    }
                    if !a.shape().intersects(a.position(), b.shape(), b.position()) {
                        continue;
                    }
                }
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                if let Some(event) = resolve_collision(a, b) {
                    self.events.emit(event);
                }
            }
        }
    }

    /// One Gauss-Seidel-style relaxation sweep over every constraint.
    fn constraint_pass(&mut self, dt: f64) {
        let bodies = &mut self.bodies;
        let index = &self.index;
        for constraint in &self.constraints {
            match constraint {
                Constraint::Distance(c) => {
                    let (Some(&slot_a), Some(&slot_b)) =
                        (index.get(&c.body_a), index.get(&c.body_b))
                    else {
                        continue;
                    };
                    if slot_a == slot_b {
                        continue;
                    }
                    let (a, b) = pair_mut(bodies, slot_a, slot_b);
                    c.solve(a, b, dt);
                }
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default()).expect("default config is valid")
    }
}

/// Disjoint mutable references to two bodies.
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        let a = &mut tail[0];
        (a, &mut head[j])
    }
}

/// Resolve a detected intersection with a single impulse along the
/// center-to-center direction.
///
/// The normal is an approximation: it ignores the real contact geometry
/// and is exact only for sphere-sphere pairs. One point, one normal, no
/// friction term.
fn resolve_collision(a: &mut RigidBody, b: &mut RigidBody) -> Option<ContactEvent> {
    let normal = (b.position() - a.position()).normalize_or_zero();
    if normal == Vec3::ZERO {
        // Coincident centers: no usable contact direction.
        return None;
    }

    let velocity_along_normal = (b.linear_velocity() - a.linear_velocity()).dot(normal);
    if velocity_along_normal > 0.0 {
        // Already separating.
        return None;
    }

    let inv_mass_sum = a.inv_mass() + b.inv_mass();
    if inv_mass_sum == 0.0 {
        return None;
    }

    let restitution = a.material().restitution.min(b.material().restitution);
    let magnitude = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * magnitude;

    a.apply_linear_impulse(-impulse);
    b.apply_linear_impulse(impulse);

    Some(ContactEvent {
        body_a: a.id(),
        body_b: b.id(),
        normal,
        impulse: magnitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::shape::Shape;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DT: f64 = 1.0 / 60.0;

    fn zero_gravity_world() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig::default().with_gravity(Vec3::ZERO)).unwrap()
    }

    fn sphere(id: u64, position: Vec3, restitution: f64) -> RigidBody {
        RigidBody::new(
            BodyId::new(id),
            Shape::sphere(1.0),
            Material::default().with_restitution(restitution),
            1.0,
        )
        .unwrap()
        .with_position(position)
    }

    #[test]
    fn new_world_is_empty() {
        let world = PhysicsWorld::default();
        assert_eq!(world.body_count(), 0);
        assert!(world.constraints().is_empty());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PhysicsConfig::default().with_solver_iterations(0);
        assert!(PhysicsWorld::new(config).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut world = PhysicsWorld::default();
        world.add_body(sphere(1, Vec3::ZERO, 0.0)).unwrap();
        let result = world.add_body(sphere(1, Vec3::new(5.0, 0.0, 0.0), 0.0));
        assert!(matches!(result, Err(PhysicsError::DuplicateBody(_))));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn setters_validate_arguments() {
        let mut world = PhysicsWorld::default();
        assert!(world.set_gravity(Vec3::new(0.0, f64::NAN, 0.0)).is_err());
        assert!(world.set_time_step(-1.0).is_err());
        assert!(world.set_solver_iterations(0).is_err());
        assert!(world.set_gravity(Vec3::new(0.0, -3.7, 0.0)).is_ok());
        assert_relative_eq!(world.gravity().y, -3.7);
    }

    #[test]
    fn gravity_accelerates_free_body() {
        let mut world = PhysicsWorld::default();
        let id = world
            .add_body(sphere(1, Vec3::new(0.0, 10.0, 0.0), 0.0))
            .unwrap();

        for _ in 0..60 {
            world.update(DT);
        }

        let body = world.body(id).unwrap();
        // After one simulated second the velocity is exactly g·t; the
        // position overshoots the analytic -4.905 by ½g·dt·t.
        assert_relative_eq!(body.linear_velocity().y, -9.81, epsilon = 1e-9);
        let expected_drop = 9.81 * DT * DT * (60.0 * 61.0 / 2.0);
        assert_relative_eq!(body.position().y, 10.0 - expected_drop, epsilon = 1e-9);
    }

    #[test]
    fn elastic_equal_mass_head_on_swaps_velocities() {
        let mut world = zero_gravity_world();
        let a = world
            .add_body(sphere(1, Vec3::ZERO, 1.0).with_linear_velocity(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let b = world
            .add_body(sphere(2, Vec3::new(1.5, 0.0, 0.0), 1.0))
            .unwrap();

        world.update(DT);

        assert_abs_diff_eq!(world.body(a).unwrap().linear_velocity().x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(world.body(b).unwrap().linear_velocity().x, 1.0, epsilon = 1e-9);
        assert_eq!(world.contacts().len(), 1);
    }

    #[test]
    fn inelastic_equal_mass_head_on_shares_velocity() {
        let mut world = zero_gravity_world();
        let a = world
            .add_body(sphere(1, Vec3::ZERO, 0.0).with_linear_velocity(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let b = world
            .add_body(sphere(2, Vec3::new(1.5, 0.0, 0.0), 0.0))
            .unwrap();

        world.update(DT);

        let va = world.body(a).unwrap().linear_velocity().x;
        let vb = world.body(b).unwrap().linear_velocity().x;
        assert_abs_diff_eq!(va, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(va, vb, epsilon = 1e-9);
    }

    #[test]
    fn separating_pair_is_left_alone() {
        let mut world = zero_gravity_world();
        let a = world
            .add_body(sphere(1, Vec3::ZERO, 1.0).with_linear_velocity(Vec3::new(-1.0, 0.0, 0.0)))
            .unwrap();
        world
            .add_body(sphere(2, Vec3::new(1.5, 0.0, 0.0), 1.0))
            .unwrap();

        world.update(DT);

        assert_relative_eq!(world.body(a).unwrap().linear_velocity().x, -1.0);
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn static_body_never_moves() {
        let mut world = PhysicsWorld::default();
        let floor = world
            .add_body(
                RigidBody::fixed(
                    BodyId::new(1),
                    Shape::from_size(20.0, 1.0, 20.0),
                    Material::default(),
                )
                .unwrap()
                .with_position(Vec3::new(0.0, -0.5, 0.0)),
            )
            .unwrap();
        world
            .add_body(sphere(2, Vec3::new(0.0, 3.0, 0.0), 0.5))
            .unwrap();

        for _ in 0..300 {
            world.update(DT);
        }

        let body = world.body(floor).unwrap();
        assert_eq!(body.position(), Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn falling_sphere_bounces_off_static_floor() {
        let mut world = PhysicsWorld::default();
        world
            .add_body(
                RigidBody::fixed(
                    BodyId::new(1),
                    Shape::from_size(20.0, 1.0, 20.0),
                    Material::default().with_restitution(1.0),
                )
                .unwrap()
                .with_position(Vec3::new(0.0, -0.5, 0.0)),
            )
            .unwrap();
        // Effective restitution is min(1.0, 0.9) = 0.9.
        let ball = world
            .add_body(sphere(2, Vec3::new(0.0, 3.0, 0.0), 0.9))
            .unwrap();

        let mut bounced = false;
        for _ in 0..600 {
            world.update(DT);
            if world.body(ball).unwrap().linear_velocity().y > 0.1 {
                bounced = true;
                break;
            }
        }
        assert!(bounced, "sphere should rebound from the floor");
    }

    #[test]
    fn disabled_body_is_excluded_from_simulation() {
        let mut world = PhysicsWorld::default();
        let id = world
            .add_body(sphere(1, Vec3::new(0.0, 5.0, 0.0), 0.0).with_enabled(false))
            .unwrap();
        // Overlapping enabled body; the pair must not resolve.
        world
            .add_body(sphere(2, Vec3::new(0.5, 5.0, 0.0), 0.0))
            .unwrap();

        for _ in 0..30 {
            world.update(DT);
        }

        let body = world.body(id).unwrap();
        assert_eq!(body.position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn distance_constraint_relaxes_toward_rest_length() {
        let mut world = zero_gravity_world();
        // Small spheres: the pair stays out of collision range, so only the
        // constraint acts on it.
        let small = |id: u64, position: Vec3| {
            RigidBody::new(
                BodyId::new(id),
                Shape::sphere(0.25),
                Material::default(),
                1.0,
            )
            .unwrap()
            .with_position(position)
        };
        let a = world.add_body(small(1, Vec3::ZERO)).unwrap();
        let b = world
            .add_body(small(2, Vec3::new(2.5, 0.0, 0.0)))
            .unwrap();
        world.add_constraint(Constraint::Distance(
            DistanceConstraint::new(a, b, 2.0).with_rest_distance(2.0),
        ));

        let separation = |world: &PhysicsWorld| {
            world
                .body(a)
                .unwrap()
                .position()
                .distance(world.body(b).unwrap().position())
        };

        // The velocity-level bias behaves like an undamped spring: the
        // error shrinks monotonically until the pair first crosses the rest
        // length, then rings. Track the closest approach.
        let mut previous_error = separation(&world) - 2.0;
        let mut crossed = false;
        let mut best_error = previous_error.abs();
        for _ in 0..600 {
            world.update(DT);
            let error = separation(&world) - 2.0;
            if error <= 0.0 {
                crossed = true;
            }
            if !crossed {
                assert!(
                    error <= previous_error + 1e-9,
                    "error grew before first crossing: {previous_error} -> {error}"
                );
                previous_error = error;
            }
            best_error = best_error.min(error.abs());
        }

        assert!(crossed, "pair never reached the rest length");
        assert!(best_error < 0.05, "closest approach {best_error} too far");
    }

    #[test]
    fn removing_a_body_drops_its_constraints() {
        let mut world = zero_gravity_world();
        let a = world.add_body(sphere(1, Vec3::ZERO, 0.0)).unwrap();
        let b = world
            .add_body(sphere(2, Vec3::new(4.0, 0.0, 0.0), 0.0))
            .unwrap();
        world.add_distance_constraint(a, b).unwrap();
        assert_eq!(world.constraints().len(), 1);

        world.remove_body(b).unwrap();
        assert!(world.constraints().is_empty());

        // Stepping afterwards must be safe and leave the survivor alone.
        for _ in 0..10 {
            world.update(DT);
        }
        assert_eq!(world.body(a).unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn remove_body_keeps_index_consistent() {
        let mut world = zero_gravity_world();
        let a = world.add_body(sphere(1, Vec3::ZERO, 0.0)).unwrap();
        let b = world
            .add_body(sphere(2, Vec3::new(4.0, 0.0, 0.0), 0.0))
            .unwrap();
        let c = world
            .add_body(sphere(3, Vec3::new(8.0, 0.0, 0.0), 0.0))
            .unwrap();

        world.remove_body(a).unwrap();
        assert!(world.body(a).is_none());
        assert_relative_eq!(world.body(b).unwrap().position().x, 4.0);
        assert_relative_eq!(world.body(c).unwrap().position().x, 8.0);
        assert!(matches!(
            world.remove_body(a),
            Err(PhysicsError::BodyNotFound(_))
        ));
    }

    #[test]
    fn contact_events_reach_subscribers() {
        let mut world = zero_gravity_world();
        let receiver = world.subscribe();
        world
            .add_body(sphere(1, Vec3::ZERO, 1.0).with_linear_velocity(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        world
            .add_body(sphere(2, Vec3::new(1.5, 0.0, 0.0), 1.0))
            .unwrap();

        world.update(DT);

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.body_a, BodyId::new(1));
        assert_eq!(event.body_b, BodyId::new(2));
        assert_relative_eq!(event.normal.x, 1.0, epsilon = 1e-9);
        assert!(event.impulse > 0.0);
    }
}
