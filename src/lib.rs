pub mod math;
pub mod core;
pub mod bodies;
pub mod skeleton;
pub mod constraints;
pub mod integration;
pub mod forces;
pub mod collision;
pub mod interaction;
pub mod recovery;

/// Re-export common types for easier usage
pub use crate::core::{Simulation, SimulationConfig, Room, Energy, SimulationEvent};
pub use crate::bodies::{Point, SegmentFlags, WallMaterial};
pub use crate::skeleton::{Anchors, BodyMetrics, Skeleton};
pub use crate::interaction::ReleaseImpulse;
pub use crate::recovery::{RecoveryPhase, RestState};
pub use crate::math::Vector2;

/// Error types for the ragdoll engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Point \"{0}\" already defined")]
        DuplicatePoint(String),

        #[error("Unknown point \"{0}\"")]
        UnknownPoint(String),

        #[error("Point index {index} out of bounds (count: {count})")]
        PointOutOfBounds { index: usize, count: usize },

        #[error("Invalid room: {0}")]
        InvalidRoom(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Simulation stability error: {0}")]
        SimulationError(String),
    }
}

/// Result type for ragdoll engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
