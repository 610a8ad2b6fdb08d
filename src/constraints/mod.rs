mod constraint;
mod distance;
mod hinge;
mod solver;

pub use self::constraint::{Constraint, SolverContext};
pub use self::distance::DistanceConstraint;
pub use self::hinge::HingeConstraint;
pub use self::solver::ConstraintSolver;
