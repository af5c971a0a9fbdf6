//! Collision shapes

use keel_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Geometric volume attached to a rigid body.
///
/// Shapes carry only their dimensions; queries take the world-space center
/// of each shape, so the geometry itself never goes stale against the
/// owning body's pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    /// Sphere with radius
    Sphere { radius: f64 },
    /// Box with half-extents
    Box { half_extents: Vec3 },
}

impl Shape {
    /// Create a sphere shape
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f64, hy: f64, hz: f64) -> Self {
        Self::Box {
            half_extents: Vec3::new(hx, hy, hz),
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f64, height: f64, depth: f64) -> Self {
        Self::cuboid(width * 0.5, height * 0.5, depth * 0.5)
    }

    /// Check the dimensions are positive and finite.
    pub(crate) fn validate(&self) -> Result<()> {
        let ok = match self {
            Self::Sphere { radius } => radius.is_finite() && *radius > 0.0,
            Self::Box { half_extents } => {
                half_extents.is_finite()
                    && half_extents.x > 0.0
                    && half_extents.y > 0.0
                    && half_extents.z > 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(PhysicsError::InvalidShape(format!("{self:?}")))
        }
    }

    /// Enclosed volume
    pub fn volume(&self) -> f64 {
        match self {
            Self::Sphere { radius } => std::f64::consts::PI * radius.powi(3) * 4.0 / 3.0,
            Self::Box { half_extents } => {
                8.0 * half_extents.x * half_extents.y * half_extents.z
            }
        }
    }

    /// Farthest point of the shape along `direction`, for GJK-style queries.
    ///
    /// A zero direction falls back to the +X extremum rather than erroring:
    /// degenerate directions arise from legitimate coincident states.
    pub fn support_point(&self, center: Vec3, direction: Vec3) -> Vec3 {
        match self {
            Self::Sphere { radius } => {
                let dir = direction.normalize_or_zero();
                if dir == Vec3::ZERO {
                    center + Vec3::new(*radius, 0.0, 0.0)
                } else {
                    center + dir * *radius
                }
            }
            Self::Box { half_extents } => {
                center
                    + Vec3::new(
                        if direction.x >= 0.0 {
                            half_extents.x
                        } else {
                            -half_extents.x
                        },
                        if direction.y >= 0.0 {
                            half_extents.y
                        } else {
                            -half_extents.y
                        },
                        if direction.z >= 0.0 {
                            half_extents.z
                        } else {
                            -half_extents.z
                        },
                    )
            }
        }
    }

    /// Test whether two shapes placed at the given centers overlap.
    ///
    /// Boxes are treated as axis-aligned regardless of the owning body's
    /// orientation. Known limitation of the narrow phase; pair it with the
    /// center-normal resolver in `world` which cannot exploit oriented
    /// contact data anyway.
    pub fn intersects(&self, center: Vec3, other: &Shape, other_center: Vec3) -> bool {
        match (self, other) {
            (Self::Sphere { radius: ra }, Self::Sphere { radius: rb }) => {
                center.distance(other_center) <= ra + rb
            }
            (Self::Box { half_extents: ha }, Self::Box { half_extents: hb }) => {
                let delta = (other_center - center).abs();
                delta.x <= ha.x + hb.x && delta.y <= ha.y + hb.y && delta.z <= ha.z + hb.z
            }
            (Self::Box { half_extents }, Self::Sphere { radius }) => {
                sphere_box_overlap(other_center, *radius, center, *half_extents)
            }
            (Self::Sphere { radius }, Self::Box { half_extents }) => {
                sphere_box_overlap(center, *radius, other_center, *half_extents)
            }
        }
    }
}

/// Closest-point test: clamp the sphere center to the box, compare against
/// the radius.
fn sphere_box_overlap(
    sphere_center: Vec3,
    radius: f64,
    box_center: Vec3,
    half_extents: Vec3,
) -> bool {
    let local = sphere_center - box_center;
    let closest = local.max(-half_extents).min(half_extents);
    (local - closest).length_squared() <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_volume() {
        let sphere = Shape::sphere(2.0);
        assert_relative_eq!(sphere.volume(), 32.0 * std::f64::consts::PI / 3.0);
    }

    #[test]
    fn box_volume_is_product_of_sides() {
        let shape = Shape::from_size(2.0, 3.0, 4.0);
        assert_relative_eq!(shape.volume(), 24.0);
    }

    #[test]
    fn spheres_overlap_within_radius_sum() {
        let a = Shape::sphere(1.0);
        let b = Shape::sphere(1.0);
        assert!(a.intersects(Vec3::ZERO, &b, Vec3::new(1.5, 0.0, 0.0)));
        assert!(a.intersects(Vec3::ZERO, &b, Vec3::new(2.0, 0.0, 0.0)));
        assert!(!a.intersects(Vec3::ZERO, &b, Vec3::new(2.1, 0.0, 0.0)));
    }

    #[test]
    fn boxes_overlap_per_axis() {
        let a = Shape::cuboid(1.0, 1.0, 1.0);
        let b = Shape::cuboid(1.0, 1.0, 1.0);
        assert!(a.intersects(Vec3::ZERO, &b, Vec3::new(1.9, 0.0, 0.0)));
        assert!(!a.intersects(Vec3::ZERO, &b, Vec3::new(2.5, 0.0, 0.0)));
        // Separation on a single axis is enough to reject.
        assert!(!a.intersects(Vec3::ZERO, &b, Vec3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn sphere_touches_box_corner() {
        let sphere = Shape::sphere(1.0);
        let cube = Shape::cuboid(1.0, 1.0, 1.0);
        // Corner at (1,1,1); sphere center along the diagonal just in reach.
        let near = Vec3::new(1.5, 1.5, 1.5);
        let far = Vec3::new(2.0, 2.0, 2.0);
        assert!(sphere.intersects(near, &cube, Vec3::ZERO));
        assert!(!sphere.intersects(far, &cube, Vec3::ZERO));
    }

    #[test]
    fn sphere_support_point_follows_direction() {
        let sphere = Shape::sphere(2.0);
        let p = sphere.support_point(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn sphere_support_point_zero_direction_fallback() {
        let sphere = Shape::sphere(2.0);
        let p = sphere.support_point(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn box_support_point_picks_matching_corner() {
        let shape = Shape::cuboid(1.0, 2.0, 3.0);
        let p = shape.support_point(Vec3::ZERO, Vec3::new(1.0, -1.0, 0.5));
        assert_eq!(p, Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn validation_rejects_degenerate_dimensions() {
        assert!(Shape::sphere(0.0).validate().is_err());
        assert!(Shape::sphere(f64::NAN).validate().is_err());
        assert!(Shape::cuboid(1.0, -1.0, 1.0).validate().is_err());
        assert!(Shape::sphere(1.0).validate().is_ok());
    }
}
