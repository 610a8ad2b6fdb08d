use crate::bodies::Point;
use crate::forces::{AirDrag, Gravity};
use crate::integration::Integrator;

/// Position Verlet with drag and a per-step displacement cap.
///
/// Velocity is never stored: it is read back as `position - previous`, damped,
/// accelerated, clamped and written forward again.
#[derive(Debug, Clone)]
pub struct VerletIntegrator {
    /// Gravity for the current room
    pub gravity: Gravity,

    /// Air resistance
    pub drag: AirDrag,

    /// Largest displacement a point may make in one sub-step (px)
    pub max_step: f32,

    /// Point driven by the pointer instead of integrated
    pub pinned: Option<usize>,
}

impl VerletIntegrator {
    /// Creates a new Verlet integrator
    pub fn new(gravity: Gravity, drag: AirDrag, max_step: f32) -> Self {
        Self {
            gravity,
            drag,
            max_step,
            pinned: None,
        }
    }

    /// Excludes a point from integration
    pub fn with_pinned(mut self, pinned: Option<usize>) -> Self {
        self.pinned = pinned;
        self
    }
}

impl Integrator for VerletIntegrator {
    fn integrate(&mut self, points: &mut [Point], dt: f32) {
        let dt_sq = dt * dt;
        let gravity = self.gravity.as_vector();

        for (index, point) in points.iter_mut().enumerate() {
            if self.pinned == Some(index) {
                point.clear_force();
                continue;
            }

            let acceleration = point.force * point.inverse_mass() + gravity;
            let mut velocity = self.drag.apply(point.velocity(), dt);
            velocity += acceleration * dt_sq;
            velocity = velocity.clamp_length(self.max_step);

            point.previous = point.position;
            point.position += velocity;
            point.clear_force();
        }
    }

    fn name(&self) -> &str {
        "Verlet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;
    use approx::assert_relative_eq;

    fn integrator(max_step: f32) -> VerletIntegrator {
        VerletIntegrator::new(Gravity::new(1000.0), AirDrag::new(0.0, 0.0), max_step)
    }

    #[test]
    fn resting_point_starts_to_fall() {
        let mut points = vec![Point::new(Vector2::new(0.0, 0.0), 1.0)];
        integrator(100.0).integrate(&mut points, 0.01);
        assert_relative_eq!(points[0].position.y, 0.1, epsilon = 1e-6);
        assert_relative_eq!(points[0].velocity().y, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn displacement_is_capped() {
        let mut points = vec![Point::new(Vector2::new(0.0, 0.0), 1.0)];
        points[0].set_velocity(Vector2::new(50.0, 0.0));
        integrator(5.0).integrate(&mut points, 0.01);
        assert_relative_eq!(points[0].velocity().length(), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn pinned_point_is_left_alone() {
        let mut points = vec![
            Point::new(Vector2::new(0.0, 0.0), 1.0),
            Point::new(Vector2::new(10.0, 0.0), 1.0),
        ];
        points[0].apply_force(Vector2::new(100.0, 0.0));
        let mut verlet = integrator(100.0).with_pinned(Some(0));
        verlet.integrate(&mut points, 0.01);
        assert_eq!(points[0].position, Vector2::new(0.0, 0.0));
        assert!(points[0].force.is_zero());
        assert!(points[1].position.y > 0.0);
    }

    #[test]
    fn force_is_divided_by_mass() {
        let mut points = vec![
            Point::new(Vector2::new(0.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 2.0),
        ];
        for point in &mut points {
            point.apply_force(Vector2::new(200.0, 0.0));
        }
        let mut verlet = VerletIntegrator::new(Gravity::new(0.0), AirDrag::new(0.0, 0.0), 100.0);
        verlet.integrate(&mut points, 0.1);
        assert_relative_eq!(points[0].position.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(points[1].position.x, 1.0, epsilon = 1e-5);
    }
}
