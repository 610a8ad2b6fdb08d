#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface response of the room walls
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct WallMaterial {
    /// Fraction of the normal velocity kept (and reversed) on impact, 0-1
    pub restitution: f32,

    /// Fraction of the tangential velocity removed on impact, 0-1
    pub friction: f32,
}

impl WallMaterial {
    /// Creates a new wall material with the specified properties
    pub fn new(restitution: f32, friction: f32) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.clamp(0.0, 1.0),
        }
    }

    /// Multiplier applied to the tangential velocity on impact
    #[inline]
    pub fn tangential_retention(&self) -> f32 {
        1.0 - self.friction
    }
}

impl Default for WallMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.15, // Low bounce
            friction: 0.9,     // Feet and hands should grip
        }
    }
}
