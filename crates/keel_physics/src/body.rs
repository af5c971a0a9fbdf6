//! Rigid body state, mass properties, and integration

use keel_math::{Mat3, Mat4, Quat, Vec3};

use crate::error::{PhysicsError, Result};
use crate::material::Material;
use crate::shape::Shape;

/// Handle identifying a rigid body within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u64);

impl BodyId {
    /// Create from a raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// A simulated rigid body: pose, velocities, accumulated loads, and the
/// mass properties derived from its shape.
///
/// Force and torque accumulate for a single step and are zeroed by
/// `integrate`. The orientation stays unit length across every mutation,
/// and the world-space inverse inertia tensor is refreshed whenever
/// orientation, mass, or shape changes.
#[derive(Debug, Clone)]
pub struct RigidBody {
    id: BodyId,
    position: Vec3,
    orientation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    force: Vec3,
    torque: Vec3,
    mass: f64,
    inv_mass: f64,
    inertia_body: Mat3,
    inv_inertia_world: Mat3,
    shape: Shape,
    material: Material,
    is_static: bool,
    is_enabled: bool,
}

impl RigidBody {
    /// Create a dynamic body.
    ///
    /// Rejects non-finite or non-positive mass and degenerate shapes at the
    /// construction site rather than letting them poison the solver.
    pub fn new(id: BodyId, shape: Shape, material: Material, mass: f64) -> Result<Self> {
        shape.validate()?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let mut body = Self {
            id,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass,
            inv_mass: 1.0 / mass,
            inertia_body: Mat3::ZERO,
            inv_inertia_world: Mat3::ZERO,
            shape,
            material,
            is_static: false,
            is_enabled: true,
        };
        body.refresh_mass_properties();
        Ok(body)
    }

    /// Create a static body: infinite effective mass, never integrated,
    /// never pushed by collisions.
    pub fn fixed(id: BodyId, shape: Shape, material: Material) -> Result<Self> {
        shape.validate()?;
        Ok(Self {
            id,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass: f64::INFINITY,
            inv_mass: 0.0,
            inertia_body: Mat3::ZERO,
            inv_inertia_world: Mat3::ZERO,
            shape,
            material,
            is_static: true,
            is_enabled: true,
        })
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set orientation (normalized)
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.set_orientation(orientation);
        self
    }

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set angular velocity
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Set whether the body participates in simulation
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Body-space inertia tensor
    pub fn inertia(&self) -> Mat3 {
        self.inertia_body
    }

    /// World-space inverse inertia tensor, `R · I⁻¹ · Rᵀ` for the current
    /// orientation
    pub fn inverse_inertia_world(&self) -> Mat3 {
        self.inv_inertia_world
    }

    /// Homogeneous transform (translation · rotation) for rendering and
    /// collision consumers
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_quat(self.orientation)
    }

    // ==================== Mutators ====================

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set orientation; the stored quaternion is re-normalized and the
    /// world inertia tensor refreshed.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
        self.refresh_world_inertia();
    }

    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }

    /// Change the mass and re-derive the inertia tensor.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        if self.is_static {
            return Ok(());
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
        self.refresh_mass_properties();
        Ok(())
    }

    /// Change the shape and re-derive the inertia tensor.
    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        shape.validate()?;
        self.shape = shape;
        self.refresh_mass_properties();
        Ok(())
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    // ==================== Loads ====================

    /// Accumulate a force through the center of mass. No-op for static or
    /// disabled bodies.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static || !self.is_enabled {
            return;
        }
        self.force += force;
    }

    /// Accumulate a force acting at a world-space point; the offset from
    /// the center of mass contributes torque.
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        if self.is_static || !self.is_enabled {
            return;
        }
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    /// Accumulate a torque. No-op for static or disabled bodies.
    pub fn apply_torque(&mut self, torque: Vec3) {
        if self.is_static || !self.is_enabled {
            return;
        }
        self.torque += torque;
    }

    /// Instantaneous momentum change: `velocity += impulse / mass`. No-op
    /// for static or disabled bodies.
    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        if self.is_static || !self.is_enabled {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
    }

    // ==================== Integration ====================

    /// Advance the body by `dt` under the accumulated loads.
    ///
    /// Semi-implicit Euler: velocity first, then position with the new
    /// velocity. Orientation uses the first-order step
    /// `normalize(q + ½·(0,ω)·q·dt)`, which drifts at large |ω|·dt but is
    /// exact enough at frame-rate steps. Accumulators are zeroed on the way
    /// out, so forces never persist across frames.
    pub fn integrate(&mut self, dt: f64) {
        debug_assert!(dt.is_finite(), "non-finite dt corrupts body state");
        if self.is_static || !self.is_enabled {
            return;
        }

        let linear_acceleration = self.force * self.inv_mass;
        self.linear_velocity += linear_acceleration * dt;
        self.position += self.linear_velocity * dt;

        let angular_acceleration = self.inv_inertia_world * self.torque;
        self.angular_velocity += angular_acceleration * dt;

        let derivative = Quat::pure(self.angular_velocity) * self.orientation * 0.5;
        self.orientation = (self.orientation + derivative * dt).normalize();

        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        self.refresh_world_inertia();
    }

    // ==================== Mass properties ====================

    /// Re-derive the body-space inertia tensor from shape and mass, then
    /// the world-space inverse.
    fn refresh_mass_properties(&mut self) {
        if self.is_static {
            self.inertia_body = Mat3::ZERO;
            self.inv_inertia_world = Mat3::ZERO;
            return;
        }
        self.inertia_body = shape_inertia(&self.shape, self.mass);
        self.refresh_world_inertia();
    }

    /// `R · I_body⁻¹ · Rᵀ` — orientation-dependent, so this runs after
    /// every orientation change.
    fn refresh_world_inertia(&mut self) {
        if self.is_static {
            self.inv_inertia_world = Mat3::ZERO;
            return;
        }
        let d = self.inertia_body.diagonal();
        let inv_body = Mat3::from_diagonal(Vec3::new(1.0 / d.x, 1.0 / d.y, 1.0 / d.z));
        let rotation = self.orientation.to_mat3();
        self.inv_inertia_world = rotation * inv_body * rotation.transpose();
    }
}

/// Body-space inertia tensor of a solid shape of the given mass.
fn shape_inertia(shape: &Shape, mass: f64) -> Mat3 {
    match shape {
        Shape::Sphere { radius } => {
            Mat3::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
        }
        Shape::Box { half_extents } => {
            let size = *half_extents * 2.0;
            let k = mass / 12.0;
            Mat3::from_diagonal(Vec3::new(
                k * (size.y * size.y + size.z * size.z),
                k * (size.x * size.x + size.z * size.z),
                k * (size.x * size.x + size.y * size.y),
            ))
        }
    }
}
