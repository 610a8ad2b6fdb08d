use crate::bodies::{Point, SegmentFlags};
use crate::constraints::{Constraint, DistanceConstraint};
use crate::math::{clamp, normalize_angle, Vector2};

// Rotations smaller than this are not worth applying
const MIN_ROTATION: f32 = 1.0e-4;

/// Counter-rotates segments to bleed off numerical spin
#[derive(Debug, Clone)]
pub struct RotationalDamper {
    /// Fraction of the segment's turn per step that is undone
    pub gain: f32,

    /// Largest counter-rotation per segment and step (radians)
    pub cap: f32,

    /// Gain multiplier for segments touching a wall
    pub contact_gain: f32,

    /// Extra multiplier when both endpoints touch
    pub double_contact_boost: f32,

    /// Share of the rotation applied to a touching endpoint
    pub contact_share: f32,
}

impl RotationalDamper {
    /// Damps the turn rate of every rotation-damped segment
    pub fn damp_angles(&self, points: &mut [Point], segments: &[DistanceConstraint], pinned: Option<usize>) {
        for segment in segments {
            if !self.applies_to(segment, pinned) {
                continue;
            }
            let (a, b) = (segment.a(), segment.b());
            let turn = segment_turn(&points[a], &points[b]);
            let rotation = clamp(-self.gain * turn, -self.cap, self.cap);
            if rotation.abs() < MIN_ROTATION {
                continue;
            }
            rotate_about_midpoint(points, a, b, rotation, 1.0, 1.0);
        }
    }

    /// Stronger damping for segments with an endpoint on a wall.
    ///
    /// A touching endpoint only follows part of the rotation so the free end
    /// swings instead of the contact skating along the wall.
    pub fn damp_contacts(&self, points: &mut [Point], segments: &[DistanceConstraint], pinned: Option<usize>) {
        for segment in segments {
            if !self.applies_to(segment, pinned) {
                continue;
            }
            let (a, b) = (segment.a(), segment.b());
            let a_touches = points[a].in_contact();
            let b_touches = points[b].in_contact();
            if !a_touches && !b_touches {
                continue;
            }

            let boost = if a_touches && b_touches { self.double_contact_boost } else { 1.0 };
            let gain = self.gain * self.contact_gain * boost;
            let turn = segment_turn(&points[a], &points[b]);
            let rotation = clamp(-gain * turn, -self.cap, self.cap);
            if rotation.abs() < MIN_ROTATION {
                continue;
            }

            let (share_a, share_b) = match (a_touches, b_touches) {
                (true, false) => (self.contact_share, 1.0),
                (false, true) => (1.0, self.contact_share),
                _ => (1.0, 1.0),
            };
            rotate_about_midpoint(points, a, b, rotation, share_a, share_b);
        }
    }

    fn applies_to(&self, segment: &DistanceConstraint, pinned: Option<usize>) -> bool {
        segment.get_flags().contains(SegmentFlags::ROTATION_DAMPED)
            && pinned.map_or(true, |index| !segment.involves_point(index))
    }
}

/// Change of a segment's orientation over the last sub-step, in (-PI, PI]
pub fn segment_turn(a: &Point, b: &Point) -> f32 {
    let now = (b.position - a.position).angle();
    let before = (b.previous - a.previous).angle();
    normalize_angle(now - before)
}

// Rotates both endpoints about the segment midpoint; `share` blends each
// endpoint between its rotated and original offset
fn rotate_about_midpoint(points: &mut [Point], a: usize, b: usize, angle: f32, share_a: f32, share_b: f32) {
    let mid = (points[a].position + points[b].position) * 0.5;
    for (index, share) in [(a, share_a), (b, share_b)] {
        let offset = points[index].position - mid;
        let rotated = offset.rotated(angle);
        points[index].position = mid + blend(offset, rotated, share);
    }
}

#[inline]
fn blend(from: Vector2, to: Vector2, share: f32) -> Vector2 {
    from.lerp(&to, share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn damper() -> RotationalDamper {
        RotationalDamper {
            gain: 0.45,
            cap: 0.6,
            contact_gain: 1.1,
            double_contact_boost: 1.6,
            contact_share: 0.3,
        }
    }

    // A horizontal segment that turned by `turn` radians in the last step
    fn spinning_segment(turn: f32) -> Vec<Point> {
        let mut a = Point::new(Vector2::new(-10.0, 0.0), 1.0);
        let mut b = Point::new(Vector2::new(10.0, 0.0), 1.0);
        a.previous = Vector2::new(-10.0, 0.0).rotated(-turn);
        b.previous = Vector2::new(10.0, 0.0).rotated(-turn);
        vec![a, b]
    }

    #[test]
    fn spin_is_reduced_and_length_kept() {
        let mut points = spinning_segment(0.1);
        let segments = vec![DistanceConstraint::new(0, 1, 20.0, 1.0, SegmentFlags::default())];

        damper().damp_angles(&mut points, &segments, None);

        let turn = segment_turn(&points[0], &points[1]);
        assert_relative_eq!(turn, 0.1 * (1.0 - 0.45), epsilon = 1e-4);
        assert_relative_eq!(points[0].position.distance(&points[1].position), 20.0, epsilon = 1e-3);
    }

    #[test]
    fn undamped_segments_are_skipped() {
        let mut points = spinning_segment(0.1);
        let segments = vec![DistanceConstraint::new(0, 1, 20.0, 1.0, SegmentFlags::SOFT)];
        damper().damp_angles(&mut points, &segments, None);
        assert_relative_eq!(segment_turn(&points[0], &points[1]), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn segments_on_the_pinned_point_are_skipped() {
        let mut points = spinning_segment(0.1);
        let segments = vec![DistanceConstraint::new(0, 1, 20.0, 1.0, SegmentFlags::default())];
        damper().damp_angles(&mut points, &segments, Some(1));
        assert_relative_eq!(segment_turn(&points[0], &points[1]), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn touching_endpoint_moves_less() {
        let mut points = spinning_segment(0.1);
        points[0].mark_contact(Vector2::new(0.0, -1.0), 2);
        let before = [points[0].position, points[1].position];
        let segments = vec![DistanceConstraint::new(0, 1, 20.0, 1.0, SegmentFlags::default())];

        damper().damp_contacts(&mut points, &segments, None);

        let moved_a = points[0].position.distance(&before[0]);
        let moved_b = points[1].position.distance(&before[1]);
        assert!(moved_a < moved_b);
    }
}
