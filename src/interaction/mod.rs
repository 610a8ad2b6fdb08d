mod tracker;

pub use self::tracker::VelocityTracker;

use tracing::debug;

use crate::bodies::Point;
use crate::core::room::Interior;
use crate::core::SimulationConfig;
use crate::error::PhysicsError;
use crate::math::{clamp, Vector2, EPSILON};
use crate::Result;

/// An active drag
#[derive(Debug, Clone)]
pub struct DragState {
    /// The grabbed point
    pub index: usize,

    /// Where the pointer wants the point, already clamped to the room
    pub target: Vector2,

    /// Pointer history for the throw estimate
    pub tracker: VelocityTracker,

    /// Simulation time the grab started
    pub started_at: f64,
}

/// How a release was distributed over the figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseImpulse {
    /// The point that was let go
    pub index: usize,

    /// Throw velocity after blending with the pointer history (px/s)
    pub velocity: Vector2,

    /// Velocity change shared by every point (px/s)
    pub linear: Vector2,

    /// Spin about the center of mass (rad/s, positive turns +x toward +y)
    pub angular: f32,

    /// Center of mass the spin was applied about
    pub center_of_mass: Vector2,
}

/// Grab, drag and release of a single point
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    drag: Option<DragState>,
    post_release_steps: u32,
}

impl InteractionController {
    /// Creates an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the grabbed point, if any
    #[inline]
    pub fn grabbed(&self) -> Option<usize> {
        self.drag.as_ref().map(|d| d.index)
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn get_drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// True while dragging or during the relaxation window after a release
    #[inline]
    pub fn is_agitated(&self) -> bool {
        self.drag.is_some() || self.post_release_steps > 0
    }

    /// Sub-steps left in the relaxation window after a release
    pub fn get_post_release_steps(&self) -> u32 {
        self.post_release_steps
    }

    /// Grabs a point and holds it where it is
    pub fn start_grab(&mut self, points: &mut [Point], index: usize, time: f64, window: f32) -> Result<()> {
        let count = points.len();
        let point = points
            .get_mut(index)
            .ok_or(PhysicsError::PointOutOfBounds { index, count })?;

        point.previous = point.position;
        let mut tracker = VelocityTracker::new(window);
        tracker.record(time, point.position);

        debug!(index, position = %point.position, "grab started");
        self.drag = Some(DragState {
            index,
            target: point.position,
            tracker,
            started_at: time,
        });
        Ok(())
    }

    /// Moves the drag target; returns false if nothing is grabbed
    pub fn drag_to(&mut self, position: Vector2, bounds: &Interior, time: f64) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if !position.is_finite() {
            return true;
        }
        drag.target = bounds.clamp(position);
        drag.tracker.record(time, drag.target);
        true
    }

    /// Holds the grabbed point on its target with zero velocity
    pub fn pin(&self, points: &mut [Point]) {
        if let Some(drag) = &self.drag {
            if let Some(point) = points.get_mut(drag.index) {
                point.teleport(drag.target);
            }
        }
    }

    /// Counts the post-release window down by one sub-step
    pub fn tick(&mut self) {
        if self.drag.is_none() {
            self.post_release_steps = self.post_release_steps.saturating_sub(1);
        }
    }

    /// Drops the grab without throwing
    pub fn cancel(&mut self) {
        self.drag = None;
        self.post_release_steps = 0;
    }

    /// Lets go of the grabbed point and throws the whole figure.
    ///
    /// `velocity` is the host's pointer velocity in px/s. It is blended with
    /// the tracked pointer history, then split into a translation of the
    /// center of mass and a spin that makes up the rest of the throw at the
    /// grabbed point. Every point receives `linear + omega x r`.
    pub fn release(
        &mut self,
        points: &mut [Point],
        velocity: Vector2,
        time: f64,
        body_height: f32,
        fixed_step: f32,
        config: &SimulationConfig,
    ) -> Option<ReleaseImpulse> {
        let drag = self.drag.take()?;
        let index = drag.index;
        self.post_release_steps = config.post_release_substeps;

        let supplied = if velocity.is_finite() { velocity } else { Vector2::zero() };
        let throw = match drag.tracker.estimate(time) {
            Some(tracked) => supplied.lerp(&tracked, config.tracker_blend),
            None => supplied,
        };

        // The grabbed point was pinned, so its leftover velocity is meaningless
        if let Some(point) = points.get_mut(index) {
            point.previous = point.position;
        }

        let (center_of_mass, total_mass) = mass_center(points);
        if total_mass <= 0.0 || fixed_step <= 0.0 {
            return None;
        }

        let linear = (throw * config.linear_fraction)
            .clamp_length(config.max_linear_throw_per_height * body_height);
        let residual = throw - linear;

        let arm = points[index].position - center_of_mass;
        let arm_sq = arm.length_squared();
        let angular = if arm_sq > EPSILON {
            let max = config.max_angular_throw;
            clamp(arm.cross(&residual) / arm_sq, -max, max)
        } else {
            0.0
        };

        let max_change = config.max_point_throw_per_height * body_height;
        for point in points.iter_mut() {
            let r = point.position - center_of_mass;
            let change = (linear + Vector2::new(-angular * r.y, angular * r.x)).clamp_length(max_change);
            let current = point.velocity() / fixed_step;
            point.set_velocity((current + change) * fixed_step);
        }

        debug!(
            index,
            vx = throw.x,
            vy = throw.y,
            angular,
            "released"
        );

        Some(ReleaseImpulse {
            index,
            velocity: throw,
            linear,
            angular,
            center_of_mass,
        })
    }
}

fn mass_center(points: &[Point]) -> (Vector2, f32) {
    let total: f32 = points.iter().map(Point::mass).sum();
    if total <= 0.0 {
        return (Vector2::zero(), 0.0);
    }
    let weighted = points
        .iter()
        .fold(Vector2::zero(), |acc, p| acc + p.position * p.mass());
    (weighted / total, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Room;
    use approx::assert_relative_eq;

    const STEP: f32 = 1.0 / 120.0;

    fn rod() -> Vec<Point> {
        vec![
            Point::new(Vector2::new(100.0, 100.0), 1.0),
            Point::new(Vector2::new(100.0, 140.0), 1.0),
            Point::new(Vector2::new(100.0, 180.0), 1.0),
        ]
    }

    #[test]
    fn grab_out_of_range_fails() {
        let mut points = rod();
        let mut controller = InteractionController::new();
        assert_eq!(
            controller.start_grab(&mut points, 7, 0.0, 0.09),
            Err(PhysicsError::PointOutOfBounds { index: 7, count: 3 })
        );
        assert!(!controller.is_dragging());
    }

    #[test]
    fn drag_target_is_clamped_and_pinned() {
        let mut points = rod();
        let bounds = Room::default().bounds();
        let mut controller = InteractionController::new();
        controller.start_grab(&mut points, 0, 0.0, 0.09).unwrap();
        assert!(controller.drag_to(Vector2::new(-500.0, 50.0), &bounds, 0.01));

        controller.pin(&mut points);
        assert_eq!(points[0].position, Vector2::new(bounds.left, 50.0));
        assert!(points[0].velocity().is_zero());
    }

    #[test]
    fn drag_without_grab_is_ignored() {
        let mut controller = InteractionController::new();
        assert!(!controller.drag_to(Vector2::zero(), &Room::default().bounds(), 0.0));
    }

    #[test]
    fn release_spins_the_figure_about_its_center() {
        let mut points = rod();
        let config = SimulationConfig::default();
        let mut controller = InteractionController::new();
        controller.start_grab(&mut points, 0, 0.0, 0.09).unwrap();

        let impulse = controller
            .release(&mut points, Vector2::new(300.0, 0.0), 0.0, 330.0, STEP, &config)
            .unwrap();

        assert_relative_eq!(impulse.linear.x, 180.0, epsilon = 1e-3);
        // Top of a vertical rod thrown to the right spins counter-clockwise on screen
        assert!(impulse.angular < 0.0);
        let top = points[0].velocity().x / STEP;
        let bottom = points[2].velocity().x / STEP;
        assert!(top > impulse.linear.x);
        assert!(bottom < impulse.linear.x);
        assert_eq!(controller.get_post_release_steps(), config.post_release_substeps);
    }

    #[test]
    fn release_conserves_linear_share_of_momentum() {
        let mut points = rod();
        points[2].set_mass(2.0);
        let config = SimulationConfig::default();
        let mut controller = InteractionController::new();
        controller.start_grab(&mut points, 0, 0.0, 0.09).unwrap();
        let impulse = controller
            .release(&mut points, Vector2::new(200.0, -100.0), 0.0, 330.0, STEP, &config)
            .unwrap();

        let momentum = points
            .iter()
            .fold(Vector2::zero(), |acc, p| acc + p.velocity() / STEP * p.mass());
        let total_mass: f32 = points.iter().map(Point::mass).sum();
        assert_relative_eq!(momentum, impulse.linear * total_mass, epsilon = 0.5);
    }

    #[test]
    fn release_without_grab_does_nothing() {
        let mut points = rod();
        let mut controller = InteractionController::new();
        let config = SimulationConfig::default();
        assert!(controller
            .release(&mut points, Vector2::new(1.0, 0.0), 0.0, 330.0, STEP, &config)
            .is_none());
    }
}
