use crate::error::PhysicsError;
use crate::math::{clamp, Vector2};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Gap kept between the inner face of a wall and the usable interior
pub const INTERIOR_MARGIN: f32 = 1.0;

/// The rectangle the figure lives in, as drawn by the host
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Room {
    /// Left edge of the outer rectangle
    pub x: f32,

    /// Top edge of the outer rectangle
    pub y: f32,

    /// Outer width
    pub width: f32,

    /// Outer height
    pub height: f32,

    /// Stroke thickness of the walls
    pub wall_thickness: f32,
}

/// Axis-aligned region a point may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interior {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Room {
    /// Creates a new room
    pub fn new(x: f32, y: f32, width: f32, height: f32, wall_thickness: f32) -> Self {
        Self { x, y, width, height, wall_thickness }
    }

    /// Checks that the room is finite and leaves a non-empty interior
    pub fn validate(&self) -> Result<()> {
        let values = [self.x, self.y, self.width, self.height, self.wall_thickness];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidRoom(format!("non-finite geometry {:?}", self)));
        }
        if self.wall_thickness < 0.0 {
            return Err(PhysicsError::InvalidRoom(format!(
                "negative wall thickness {}", self.wall_thickness
            )));
        }
        let interior = self.interior(INTERIOR_MARGIN);
        if interior.width() <= 0.0 || interior.height() <= 0.0 {
            return Err(PhysicsError::InvalidRoom(format!(
                "{}x{} room with {} px walls has no interior",
                self.width, self.height, self.wall_thickness
            )));
        }
        Ok(())
    }

    /// Interior inset by the wall thickness plus `margin`
    pub fn interior(&self, margin: f32) -> Interior {
        let inset = self.wall_thickness + margin;
        Interior {
            left: self.x + inset,
            right: self.x + self.width - inset,
            top: self.y + inset,
            bottom: self.y + self.height - inset,
        }
    }

    /// Interior used by collision and clamping
    #[inline]
    pub fn bounds(&self) -> Interior {
        self.interior(INTERIOR_MARGIN)
    }

    /// The y coordinate of the floor surface
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.bounds().bottom
    }

    /// Horizontal center of the room
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(0.0, 0.0, 400.0, 600.0, 4.0)
    }
}

impl Interior {
    /// Clamps a position into the interior
    #[inline]
    pub fn clamp(&self, p: Vector2) -> Vector2 {
        Vector2::new(
            clamp(p.x, self.left, self.right),
            clamp(p.y, self.top, self.bottom),
        )
    }

    /// Returns true if `p` lies inside the interior, allowing `epsilon` of slack
    #[inline]
    pub fn contains(&self, p: Vector2, epsilon: f32) -> bool {
        p.x >= self.left - epsilon
            && p.x <= self.right + epsilon
            && p.y >= self.top - epsilon
            && p.y <= self.bottom + epsilon
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
