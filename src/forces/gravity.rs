use crate::core::{Room, SimulationConfig};
use crate::math::Vector2;

/// Downward acceleration scaled to the room, in px/s^2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    acceleration: f32,
}

impl Gravity {
    /// Creates a new gravity with the given acceleration
    pub fn new(acceleration: f32) -> Self {
        Self { acceleration: acceleration.max(0.0) }
    }

    /// Gravity for a room: taller rooms fall faster so the motion reads the same
    pub fn for_room(room: &Room, config: &SimulationConfig) -> Self {
        Self::new(config.min_gravity.max((room.height * config.gravity_per_height).round()))
    }

    /// Gets the current gravity acceleration
    pub fn get_acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Gravity as a screen-space vector (y down)
    #[inline]
    pub fn as_vector(&self) -> Vector2 {
        Vector2::new(0.0, self.acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_has_a_floor() {
        let config = SimulationConfig::default();
        let small = Gravity::for_room(&Room::new(0.0, 0.0, 300.0, 200.0, 4.0), &config);
        assert_eq!(small.get_acceleration(), 1000.0);

        let tall = Gravity::for_room(&Room::new(0.0, 0.0, 800.0, 900.0, 4.0), &config);
        assert_eq!(tall.get_acceleration(), 1800.0);
    }
}
