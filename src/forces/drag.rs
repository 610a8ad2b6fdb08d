use crate::core::SimulationConfig;
use crate::math::{Vector2, EPSILON};

/// Air resistance on per-step velocities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirDrag {
    /// Exponential decay rate (1/s)
    linear_rate: f32,

    /// Quadratic coefficient (1/px)
    quadratic_coefficient: f32,
}

impl AirDrag {
    /// Creates a new drag with the given coefficients
    pub fn new(linear_rate: f32, quadratic_coefficient: f32) -> Self {
        Self {
            linear_rate: linear_rate.max(0.0),
            quadratic_coefficient: quadratic_coefficient.max(0.0),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.air_damping, config.quadratic_drag)
    }

    /// Damps a per-step velocity over a sub-step of length `dt`.
    ///
    /// The exponential part depends only on elapsed time, so splitting a
    /// frame into more sub-steps gives the same overall decay. The quadratic
    /// part is `v / (1 + c |v| dt)` with `|v|` the per-step displacement.
    pub fn apply(&self, velocity: Vector2, dt: f32) -> Vector2 {
        let mut v = velocity * (-self.linear_rate * dt).exp();
        let speed = v.length();
        if speed > EPSILON {
            v /= 1.0 + self.quadratic_coefficient * speed * dt;
        }
        v
    }
}
