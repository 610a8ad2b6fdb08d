pub mod world;
pub mod config;
pub mod room;
pub mod storage;
pub mod events;
pub mod energy;
mod scheduler;

pub use self::world::Simulation;
pub use self::config::SimulationConfig;
pub use self::room::{Interior, Room};
pub use self::storage::PointStore;
pub use self::events::{EventQueue, SimulationEvent};
pub use self::energy::Energy;
pub use self::scheduler::FixedStepScheduler;
