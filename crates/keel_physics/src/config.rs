//! Physics configuration

use keel_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 in Y)
    pub gravity: Vec3,

    /// Fixed timestep the host is expected to drive `update` with.
    /// Informational: `update` always integrates with the dt it is given.
    pub time_step: f64,

    /// Constraint relaxation iterations per step
    pub solver_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            time_step: 1.0 / 60.0,
            solver_iterations: 10,
        }
    }
}

impl PhysicsConfig {
    /// Configuration for high-precision simulation
    pub fn high_precision() -> Self {
        Self {
            time_step: 1.0 / 120.0,
            solver_iterations: 20,
            ..Default::default()
        }
    }

    /// Configuration for fast simulation (lower quality)
    pub fn fast() -> Self {
        Self {
            time_step: 1.0 / 30.0,
            solver_iterations: 4,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the nominal timestep
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set solver iterations
    pub fn with_solver_iterations(mut self, iterations: usize) -> Self {
        self.solver_iterations = iterations;
        self
    }

    /// Check the configuration against the ranges the solver assumes.
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(
                "gravity must be finite".into(),
            ));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = PhysicsConfig::default().with_solver_iterations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_time_step() {
        assert!(PhysicsConfig::default()
            .with_time_step(0.0)
            .validate()
            .is_err());
        assert!(PhysicsConfig::default()
            .with_time_step(f64::NAN)
            .validate()
            .is_err());
    }
}
