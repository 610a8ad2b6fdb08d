use crate::bodies::Point;

/// Per-sub-step parameters shared by every constraint in a solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverContext {
    /// Multiplier applied on top of each constraint's own stiffness
    pub stiffness_scale: f32,

    /// Largest positional correction per constraint and iteration (px)
    pub correction_cap: f32,

    /// Largest angular correction per hinge and iteration (radians)
    pub max_angle_correction: f32,

    /// Point held by the pointer; it never moves during solving
    pub pinned: Option<usize>,
}

impl SolverContext {
    /// Inverse mass used for the correction split, zero for the pinned point
    #[inline]
    pub fn weight(&self, points: &[Point], index: usize) -> f32 {
        if self.pinned == Some(index) {
            0.0
        } else {
            points[index].inverse_mass()
        }
    }
}

impl Default for SolverContext {
    fn default() -> Self {
        Self {
            stiffness_scale: 1.0,
            correction_cap: f32::INFINITY,
            max_angle_correction: 2.0,
            pinned: None,
        }
    }
}

/// Base trait for positional constraints between points
pub trait Constraint: Send + Sync {
    /// Returns the indices of the points involved in the constraint
    fn get_points(&self) -> &[usize];

    /// Checks if the constraint involves a specific point
    fn involves_point(&self, index: usize) -> bool {
        self.get_points().contains(&index)
    }

    /// Moves the points toward satisfying the constraint
    fn solve(&self, points: &mut [Point], context: &SolverContext);

    /// How far the constraint is from being satisfied (px or radians)
    fn violation(&self, points: &[Point]) -> f32;
}
