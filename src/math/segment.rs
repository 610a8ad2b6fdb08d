use crate::math::{clamp, Vector2};

/// Closest point on segment `a`-`b` to `p`, with its parameter `t` in [0, 1].
///
/// A zero-length segment collapses to `a` with `t = 0`.
#[inline]
pub fn closest_on_segment(p: Vector2, a: Vector2, b: Vector2) -> (Vector2, f32) {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq <= crate::math::EPSILON {
        return (a, 0.0);
    }
    let t = clamp((p - a).dot(&ab) / length_sq, 0.0, 1.0);
    (a + ab * t, t)
}

/// Distance from `p` to segment `a`-`b`
#[inline]
pub fn segment_distance(p: Vector2, a: Vector2, b: Vector2) -> f32 {
    let (closest, _) = closest_on_segment(p, a, b);
    p.distance(&closest)
}
