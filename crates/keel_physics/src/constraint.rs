//! Bilateral constraints solved by iterative relaxation

use keel_math::Vec3;

use crate::body::{BodyId, RigidBody};

/// Default positional-error feedback gain (Baumgarte bias).
pub const DEFAULT_BIAS_FACTOR: f64 = 0.2;

/// Default fraction of the corrective impulse applied per solver iteration.
pub const DEFAULT_RELAXATION: f64 = 0.8;

/// A constraint between two bodies.
///
/// Closed set; dispatch is a match rather than a trait object so new
/// constraint kinds extend the enum and every solve site in one place.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Keeps two anchor points at a fixed distance.
    Distance(DistanceConstraint),
}

impl Constraint {
    /// Whether this constraint involves the given body.
    pub fn references(&self, id: BodyId) -> bool {
        match self {
            Constraint::Distance(c) => c.body_a == id || c.body_b == id,
        }
    }
}

/// Fixed-distance constraint between anchor points on two bodies.
///
/// Holds body ids, not bodies: the world resolves ids at solve time and a
/// constraint whose body has been removed simply stops doing anything.
#[derive(Debug, Clone)]
pub struct DistanceConstraint {
    /// First body
    pub body_a: BodyId,
    /// Second body
    pub body_b: BodyId,
    /// Anchor offset from body A's center (world-aligned translation)
    pub anchor_a: Vec3,
    /// Anchor offset from body B's center
    pub anchor_b: Vec3,
    /// Distance the solver relaxes the anchors toward
    pub rest_distance: f64,
    /// Positional-error feedback gain
    pub bias_factor: f64,
    /// Fraction of the corrective impulse applied per iteration
    pub relaxation: f64,
}

impl DistanceConstraint {
    /// Create a constraint with an explicit rest distance and centered
    /// anchors.
    pub fn new(body_a: BodyId, body_b: BodyId, rest_distance: f64) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            rest_distance,
            bias_factor: DEFAULT_BIAS_FACTOR,
            relaxation: DEFAULT_RELAXATION,
        }
    }

    /// Create a constraint whose rest distance is measured from the bodies'
    /// current poses.
    pub fn between(a: &RigidBody, b: &RigidBody, anchor_a: Vec3, anchor_b: Vec3) -> Self {
        let rest_distance = (b.position() + anchor_b).distance(a.position() + anchor_a);
        Self {
            body_a: a.id(),
            body_b: b.id(),
            anchor_a,
            anchor_b,
            rest_distance,
            bias_factor: DEFAULT_BIAS_FACTOR,
            relaxation: DEFAULT_RELAXATION,
        }
    }

    /// Set anchor offsets
    pub fn with_anchors(mut self, anchor_a: Vec3, anchor_b: Vec3) -> Self {
        self.anchor_a = anchor_a;
        self.anchor_b = anchor_b;
        self
    }

    /// Set the rest distance
    pub fn with_rest_distance(mut self, rest_distance: f64) -> Self {
        self.rest_distance = rest_distance;
        self
    }

    /// Set the bias factor
    pub fn with_bias_factor(mut self, bias_factor: f64) -> Self {
        self.bias_factor = bias_factor;
        self
    }

    /// Set the relaxation factor
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// One relaxation pass: nudge both velocities along the anchor axis in
    /// proportion to the current distance error (velocity-level Baumgarte
    /// bias, not exact positional projection). Converges toward the rest
    /// distance over repeated iterations and frames.
    pub(crate) fn solve(&self, a: &mut RigidBody, b: &mut RigidBody, _dt: f64) {
        if !a.is_enabled() || !b.is_enabled() {
            return;
        }

        let world_a = a.position() + self.anchor_a;
        let world_b = b.position() + self.anchor_b;
        let delta = world_b - world_a;
        let distance = delta.length();
        if distance <= keel_math::EPSILON {
            // Coincident anchors: no direction to correct along.
            return;
        }

        let inv_mass_sum = a.inv_mass() + b.inv_mass();
        if inv_mass_sum == 0.0 {
            return;
        }

        let bias = (distance - self.rest_distance) * self.bias_factor;
        let normal = delta / distance;
        let impulse = bias / inv_mass_sum;

        let correction = normal * (impulse * self.relaxation);
        a.apply_linear_impulse(correction);
        b.apply_linear_impulse(-correction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::shape::Shape;
    use approx::assert_relative_eq;

    fn body_at(id: u64, position: Vec3) -> RigidBody {
        RigidBody::new(
            BodyId::new(id),
            Shape::sphere(0.5),
            Material::default(),
            1.0,
        )
        .unwrap()
        .with_position(position)
    }

    #[test]
    fn between_measures_rest_from_current_poses() {
        let a = body_at(0, Vec3::ZERO);
        let b = body_at(1, Vec3::new(3.0, 4.0, 0.0));
        let constraint = DistanceConstraint::between(&a, &b, Vec3::ZERO, Vec3::ZERO);
        assert_relative_eq!(constraint.rest_distance, 5.0);
        assert_relative_eq!(constraint.bias_factor, DEFAULT_BIAS_FACTOR);
        assert_relative_eq!(constraint.relaxation, DEFAULT_RELAXATION);
    }

    #[test]
    fn solve_pulls_stretched_pair_together() {
        let mut a = body_at(0, Vec3::ZERO);
        let mut b = body_at(1, Vec3::new(3.0, 0.0, 0.0));
        let constraint = DistanceConstraint::new(a.id(), b.id(), 2.0);

        constraint.solve(&mut a, &mut b, 1.0 / 60.0);

        // Stretched by 1.0: A accelerates toward B, B toward A.
        assert!(a.linear_velocity().x > 0.0);
        assert!(b.linear_velocity().x < 0.0);
        assert_relative_eq!(a.linear_velocity().x, -b.linear_velocity().x);
    }

    #[test]
    fn solve_pushes_compressed_pair_apart() {
        let mut a = body_at(0, Vec3::ZERO);
        let mut b = body_at(1, Vec3::new(1.0, 0.0, 0.0));
        let constraint = DistanceConstraint::new(a.id(), b.id(), 2.0);

        constraint.solve(&mut a, &mut b, 1.0 / 60.0);

        assert!(a.linear_velocity().x < 0.0);
        assert!(b.linear_velocity().x > 0.0);
    }

    #[test]
    fn coincident_anchors_skip() {
        let mut a = body_at(0, Vec3::ZERO);
        let mut b = body_at(1, Vec3::ZERO);
        let constraint = DistanceConstraint::new(a.id(), b.id(), 2.0);

        constraint.solve(&mut a, &mut b, 1.0 / 60.0);

        assert_eq!(a.linear_velocity(), Vec3::ZERO);
        assert_eq!(b.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn static_partner_takes_no_correction() {
        let mut anchor = RigidBody::fixed(
            BodyId::new(0),
            Shape::sphere(0.5),
            Material::default(),
        )
        .unwrap();
        let mut swinging = body_at(1, Vec3::new(3.0, 0.0, 0.0));
        let constraint = DistanceConstraint::new(anchor.id(), swinging.id(), 2.0);

        constraint.solve(&mut anchor, &mut swinging, 1.0 / 60.0);

        assert_eq!(anchor.linear_velocity(), Vec3::ZERO);
        assert!(swinging.linear_velocity().x < 0.0);
    }

    #[test]
    fn references_matches_both_ends() {
        let constraint =
            Constraint::Distance(DistanceConstraint::new(BodyId::new(3), BodyId::new(7), 1.0));
        assert!(constraint.references(BodyId::new(3)));
        assert!(constraint.references(BodyId::new(7)));
        assert!(!constraint.references(BodyId::new(4)));
    }
}
