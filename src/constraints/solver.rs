use tracing::trace;

use crate::bodies::Point;
use crate::constraints::{Constraint, DistanceConstraint, HingeConstraint, SolverContext};

/// Iterative relaxation over the skeleton's distances and hinges.
///
/// Each iteration runs every distance constraint and then every hinge, so
/// joint limits are re-imposed while lengths are still being restored.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    /// Number of relaxation iterations
    pub iterations: u32,

    /// Parameters handed to every constraint
    pub context: SolverContext,
}

impl ConstraintSolver {
    /// Creates a new solver
    pub fn new(iterations: u32, context: SolverContext) -> Self {
        Self { iterations, context }
    }

    /// Relaxes all constraints in place
    pub fn solve(
        &self,
        points: &mut [Point],
        distances: &[DistanceConstraint],
        hinges: &[HingeConstraint],
    ) {
        trace!(
            iterations = self.iterations,
            distances = distances.len(),
            hinges = hinges.len(),
            "relaxing constraints"
        );

        for _ in 0..self.iterations {
            for constraint in distances {
                constraint.solve(points, &self.context);
            }
            for hinge in hinges {
                hinge.solve(points, &self.context);
            }
        }
    }

    /// Largest remaining length error over all distance constraints
    pub fn max_distance_error(points: &[Point], distances: &[DistanceConstraint]) -> f32 {
        distances
            .iter()
            .map(|c| c.violation(points))
            .fold(0.0, f32::max)
    }
}
