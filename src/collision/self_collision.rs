use crate::bodies::Point;
use crate::core::SimulationConfig;
use crate::math::{closest_on_segment, Vector2, EPSILON};
use crate::skeleton::{Anchors, BodyMetrics};

/// A cheap overlap test between one body point and a body part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelfCollisionShape {
    /// Keep `point` at least `radius` away from `center`
    Circle { point: usize, center: usize, radius: f32, weight_other: f32 },

    /// Keep `point` at least `radius` away from segment `a`-`b`
    Capsule { point: usize, a: usize, b: usize, radius: f32, weight_other: f32 },
}

/// Pushes `point` out of the circle around `center`.
///
/// The point takes the whole push and the center moves back by
/// `weight_other` of it. Returns true if the two overlapped.
pub fn separate_point_circle(
    points: &mut [Point],
    point: usize,
    center: usize,
    radius: f32,
    cap: f32,
    weight_other: f32,
    pinned: Option<usize>,
) -> bool {
    let c = points[center].position;
    let Some(push) = overlap_push(points[point].position, c, radius, cap) else {
        return false;
    };

    let (own, other) = split(point, &[center], weight_other, pinned);
    points[point].position += push * own;
    points[center].position -= push * other;
    true
}

/// Pushes `point` out of the capsule around segment `a`-`b`.
///
/// The reaction is shared by the segment endpoints according to where the
/// closest point lies. Returns true if the two overlapped.
pub fn separate_point_capsule(
    points: &mut [Point],
    point: usize,
    a: usize,
    b: usize,
    radius: f32,
    cap: f32,
    weight_other: f32,
    pinned: Option<usize>,
) -> bool {
    let (closest, t) = closest_on_segment(points[point].position, points[a].position, points[b].position);
    let Some(push) = overlap_push(points[point].position, closest, radius, cap) else {
        return false;
    };

    let (own, other) = split(point, &[a, b], weight_other, pinned);
    points[point].position += push * own;
    if pinned != Some(a) {
        points[a].position -= push * (other * (1.0 - t));
    }
    if pinned != Some(b) {
        points[b].position -= push * (other * t);
    }
    true
}

// Separation vector that moves `p` out to `radius` from `center`, capped
fn overlap_push(p: Vector2, center: Vector2, radius: f32, cap: f32) -> Option<Vector2> {
    let delta = p - center;
    let distance = delta.length();
    if distance >= radius {
        return None;
    }
    let direction = if distance > EPSILON {
        delta / distance
    } else {
        Vector2::new(0.0, -1.0)
    };
    Some(direction * (radius - distance).min(cap))
}

// Shares of the push for the point and the other body part
fn split(point: usize, others: &[usize], weight_other: f32, pinned: Option<usize>) -> (f32, f32) {
    match pinned {
        Some(index) if index == point => (0.0, 1.0),
        Some(index) if others.len() == 1 && others[0] == index => (1.0, 0.0),
        _ => (1.0, weight_other),
    }
}

/// The fixed set of overlaps checked every sub-step
#[derive(Debug, Clone, Default)]
pub struct SelfCollision {
    shapes: Vec<SelfCollisionShape>,
}

impl SelfCollision {
    /// Shoulders against the head and hands against the torso
    pub fn for_skeleton(anchors: &Anchors, metrics: &BodyMetrics, config: &SimulationConfig) -> Self {
        let limb = metrics.limb_radius;
        let mut shapes = Vec::with_capacity(4);
        for shoulder in anchors.shoulders.iter() {
            shapes.push(SelfCollisionShape::Circle {
                point: shoulder,
                center: anchors.head,
                radius: metrics.head_radius + limb,
                weight_other: config.shoulder_head_weight,
            });
        }
        for hand in anchors.hands.iter() {
            shapes.push(SelfCollisionShape::Capsule {
                point: hand,
                a: anchors.torso_top,
                b: anchors.torso_bottom,
                radius: limb * config.hand_torso_radius_scale,
                weight_other: config.hand_torso_weight,
            });
        }
        Self { shapes }
    }

    /// Separates every overlapping pair; returns how many overlapped
    pub fn resolve(&self, points: &mut [Point], cap: f32, pinned: Option<usize>) -> usize {
        let mut overlaps = 0;
        for shape in &self.shapes {
            let hit = match *shape {
                SelfCollisionShape::Circle { point, center, radius, weight_other } => {
                    separate_point_circle(points, point, center, radius, cap, weight_other, pinned)
                }
                SelfCollisionShape::Capsule { point, a, b, radius, weight_other } => {
                    separate_point_capsule(points, point, a, b, radius, cap, weight_other, pinned)
                }
            };
            if hit {
                overlaps += 1;
            }
        }
        overlaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_overlap_is_separated() {
        let mut points = vec![
            Point::new(Vector2::new(4.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 1.0),
        ];
        let hit = separate_point_circle(&mut points, 0, 1, 10.0, 100.0, 0.0, None);
        assert!(hit);
        assert_relative_eq!(points[0].position.x, 10.0, epsilon = 1e-5);
        assert_eq!(points[1].position, Vector2::zero());
    }

    #[test]
    fn circle_push_is_capped_and_shared() {
        let mut points = vec![
            Point::new(Vector2::new(4.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 1.0),
        ];
        separate_point_circle(&mut points, 0, 1, 10.0, 2.0, 0.5, None);
        assert_relative_eq!(points[0].position.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(points[1].position.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn separated_points_are_untouched() {
        let mut points = vec![
            Point::new(Vector2::new(40.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 1.0),
        ];
        assert!(!separate_point_circle(&mut points, 0, 1, 10.0, 2.0, 0.5, None));
        assert_eq!(points[0].position, Vector2::new(40.0, 0.0));
    }

    #[test]
    fn capsule_pushes_away_from_segment() {
        let mut points = vec![
            Point::new(Vector2::new(2.0, 5.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 10.0), 1.0),
        ];
        let hit = separate_point_capsule(&mut points, 0, 1, 2, 4.0, 100.0, 0.0, None);
        assert!(hit);
        assert_relative_eq!(points[0].position, Vector2::new(4.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn pinned_point_pushes_the_other_side() {
        let mut points = vec![
            Point::new(Vector2::new(4.0, 0.0), 1.0),
            Point::new(Vector2::new(0.0, 0.0), 1.0),
        ];
        separate_point_circle(&mut points, 0, 1, 10.0, 100.0, 0.2, Some(0));
        assert_eq!(points[0].position, Vector2::new(4.0, 0.0));
        assert_relative_eq!(points[1].position.x, -6.0, epsilon = 1e-5);
    }
}
