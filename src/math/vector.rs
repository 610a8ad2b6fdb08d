use nalgebra as na;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::fmt;

use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A 2D vector in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Points right
    #[inline]
    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Points down the screen
    #[inline]
    pub fn unit_y() -> Self {
        Self::new(0.0, 1.0)
    }

    #[inline]
    pub fn dot(&self, rhs: &Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// z component of the 3D cross product; positive when `rhs` lies
    /// clockwise on screen
    #[inline]
    pub fn cross(&self, rhs: &Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction; degenerate vectors come back as is
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= crate::math::EPSILON {
            return *self;
        }
        *self / len
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        crate::math::approx_zero(self.length_squared())
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Shrinks the vector to at most `max_length`; never lengthens it
    #[inline]
    pub fn clamp_length(&self, max_length: f32) -> Self {
        let len = self.length();
        if len <= max_length {
            return *self;
        }
        *self * (max_length / (len + crate::math::EPSILON))
    }

    #[inline]
    pub fn to_nalgebra(&self) -> na::Vector2<f32> {
        na::Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_nalgebra(v: &na::Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }

    /// Rotates by `angle` radians; positive angles turn +x toward +y
    #[inline]
    pub fn rotated(&self, angle: f32) -> Self {
        let rotation = na::Rotation2::new(angle);
        Self::from_nalgebra(&(rotation * self.to_nalgebra()))
    }

    #[inline]
    pub fn distance(&self, to: &Self) -> f32 {
        (*to - *self).length()
    }

    #[inline]
    pub fn distance_squared(&self, to: &Self) -> f32 {
        (*to - *self).length_squared()
    }

    /// `self` at `t = 0`, `to` at `t = 1`
    #[inline]
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        *self + (*to - *self) * t
    }

    /// Direction in radians, in [-PI, PI]
    #[inline]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Quarter turn of the vector, +x toward +y
    #[inline]
    pub fn perpendicular(&self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl AbsDiffEq for Vector2 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Vector2 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Vector2 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl $assign_trait for Vector2 {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    };
}

macro_rules! scaled {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait<f32> for Vector2 {
            type Output = Self;

            #[inline]
            fn $method(self, k: f32) -> Self {
                Self::new(self.x $op k, self.y $op k)
            }
        }

        impl $assign_trait<f32> for Vector2 {
            #[inline]
            fn $assign_method(&mut self, k: f32) {
                *self = *self $op k;
            }
        }
    };
}

componentwise!(Add, add, AddAssign, add_assign, +);
componentwise!(Sub, sub, SubAssign, sub_assign, -);
scaled!(Mul, mul, MulAssign, mul_assign, *);
scaled!(Div, div, DivAssign, div_assign, /);

impl Mul<Vector2> for f32 {
    type Output = Vector2;

    #[inline]
    fn mul(self, v: Vector2) -> Vector2 {
        v * self
    }
}

impl Neg for Vector2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_turns_x_toward_y() {
        let rotated = Vector2::unit_x().rotated(FRAC_PI_2);
        assert_abs_diff_eq!(rotated, Vector2::unit_y(), epsilon = 1e-6);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vector2::new(3.0, -4.0);
        assert_relative_eq!(v.rotated(1.234).length(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn clamp_length_only_shrinks() {
        let v = Vector2::new(30.0, 40.0);
        assert_relative_eq!(v.clamp_length(10.0).length(), 10.0, epsilon = 1e-4);
        assert_eq!(v.clamp_length(100.0), v);
    }
}
