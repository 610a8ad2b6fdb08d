use crate::bodies::{Point, SegmentFlags};
use crate::constraints::{Constraint, SolverContext};
use crate::math::{EPSILON, LENGTH_EPSILON};

/// Keeps two points at the separation they had in the bind pose
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceConstraint {
    /// The two endpoints
    points: [usize; 2],

    /// The desired distance between the endpoints
    rest_length: f32,

    /// 1 is rigid, lower values behave like soft tissue
    stiffness: f32,

    /// Rendering and damping flags
    flags: SegmentFlags,
}

impl DistanceConstraint {
    /// Creates a new distance constraint
    pub fn new(a: usize, b: usize, rest_length: f32, stiffness: f32, flags: SegmentFlags) -> Self {
        Self {
            points: [a, b],
            rest_length: rest_length.max(LENGTH_EPSILON),
            stiffness: stiffness.clamp(0.0, 1.0),
            flags,
        }
    }

    #[inline]
    pub fn a(&self) -> usize {
        self.points[0]
    }

    #[inline]
    pub fn b(&self) -> usize {
        self.points[1]
    }

    pub fn get_rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn get_stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn get_flags(&self) -> SegmentFlags {
        self.flags
    }

    /// Returns true if the segment is drawn and can be picked
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(SegmentFlags::VISIBLE)
    }

    /// Current length of the segment
    pub fn current_length(&self, points: &[Point]) -> f32 {
        points[self.a()].position.distance(&points[self.b()].position)
    }
}

impl Constraint for DistanceConstraint {
    fn get_points(&self) -> &[usize] {
        &self.points
    }

    fn solve(&self, points: &mut [Point], context: &SolverContext) {
        let (i, j) = (self.a(), self.b());
        let delta = points[j].position - points[i].position;
        let length = delta.length().max(LENGTH_EPSILON);

        let scale = (length - self.rest_length) / length * self.stiffness * context.stiffness_scale;
        let offset = (delta * scale).clamp_length(context.correction_cap);

        let w_i = context.weight(points, i);
        let w_j = context.weight(points, j);
        let total = w_i + w_j;
        if total <= EPSILON {
            return;
        }

        points[i].position += offset * (w_i / total);
        points[j].position -= offset * (w_j / total);
    }

    fn violation(&self, points: &[Point]) -> f32 {
        (self.current_length(points) - self.rest_length).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;
    use approx::assert_relative_eq;

    fn pair(mass_a: f32, mass_b: f32) -> Vec<Point> {
        vec![
            Point::new(Vector2::new(0.0, 0.0), mass_a),
            Point::new(Vector2::new(20.0, 0.0), mass_b),
        ]
    }

    #[test]
    fn rigid_constraint_restores_length() {
        let mut points = pair(1.0, 1.0);
        let constraint = DistanceConstraint::new(0, 1, 10.0, 1.0, SegmentFlags::default());
        constraint.solve(&mut points, &SolverContext::default());
        assert_relative_eq!(constraint.current_length(&points), 10.0, epsilon = 1e-4);
        assert_relative_eq!(points[0].position.x, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn heavier_point_moves_less() {
        let mut points = pair(3.0, 1.0);
        let constraint = DistanceConstraint::new(0, 1, 10.0, 1.0, SegmentFlags::default());
        constraint.solve(&mut points, &SolverContext::default());
        let moved_a = points[0].position.x.abs();
        let moved_b = (20.0 - points[1].position.x).abs();
        assert!(moved_a < moved_b);
        assert_relative_eq!(moved_a * 3.0, moved_b, epsilon = 1e-3);
    }

    #[test]
    fn pinned_point_passes_correction_to_partner() {
        let mut points = pair(1.0, 1.0);
        let constraint = DistanceConstraint::new(0, 1, 10.0, 1.0, SegmentFlags::default());
        let context = SolverContext { pinned: Some(0), ..SolverContext::default() };
        constraint.solve(&mut points, &context);
        assert_eq!(points[0].position, Vector2::new(0.0, 0.0));
        assert_relative_eq!(points[1].position.x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn correction_is_capped() {
        let mut points = pair(1.0, 1.0);
        let constraint = DistanceConstraint::new(0, 1, 10.0, 1.0, SegmentFlags::default());
        let context = SolverContext { correction_cap: 2.0, ..SolverContext::default() };
        constraint.solve(&mut points, &context);
        assert_relative_eq!(constraint.current_length(&points), 18.0, epsilon = 1e-3);
    }

    #[test]
    fn coincident_points_stay_finite() {
        let mut points = vec![
            Point::new(Vector2::new(5.0, 5.0), 1.0),
            Point::new(Vector2::new(5.0, 5.0), 1.0),
        ];
        let constraint = DistanceConstraint::new(0, 1, 10.0, 1.0, SegmentFlags::default());
        constraint.solve(&mut points, &SolverContext::default());
        assert!(points.iter().all(Point::is_finite));
    }
}
