mod gravity;
mod drag;

pub use self::gravity::Gravity;
pub use self::drag::AirDrag;
