mod vector;
mod segment;

pub use vector::Vector2;
pub use segment::{closest_on_segment, segment_distance};

use std::f32::consts::PI;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Floor applied to divisor lengths so degenerate segments never divide by zero
pub const LENGTH_EPSILON: f32 = 1.0e-5;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Clamps a value between a minimum and maximum value
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Cubic ease-out: fast start, gentle arrival at 1.0
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - clamp(t, 0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Wraps an angle into (-PI, PI]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let two_pi = 2.0 * PI;
    let wrapped = angle % two_pi;
    if wrapped > PI {
        wrapped - two_pi
    } else if wrapped <= -PI {
        wrapped + two_pi
    } else {
        wrapped
    }
}

/// Signed angle that rotates `from` onto `to`, in (-PI, PI]
#[inline]
pub fn signed_angle(from: Vector2, to: Vector2) -> f32 {
    normalize_angle(from.cross(&to).atan2(from.dot(&to)))
}
