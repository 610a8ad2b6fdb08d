use crate::bodies::Point;
use crate::constraints::{Constraint, SolverContext};
use crate::error::PhysicsError;
use crate::math::{clamp, normalize_angle, signed_angle, Vector2, EPSILON};
use crate::Result;

/// Limits the angle between two segments that share a pivot.
///
/// The angle is measured from the pivot->anchor arm to the pivot->limb arm
/// and expressed relative to the bind pose, so `[min, max]` is a range of
/// deviation from rest rather than an absolute angle.
#[derive(Debug, Clone, PartialEq)]
pub struct HingeConstraint {
    /// Pivot, anchor and limb indices
    points: [usize; 3],

    /// Signed anchor-to-limb angle in the bind pose
    rest_angle: f32,

    /// Smallest allowed deviation from rest
    min_angle: f32,

    /// Largest allowed deviation from rest
    max_angle: f32,

    /// Fraction of the violation removed per solve
    stiffness: f32,
}

impl HingeConstraint {
    /// Creates a new hinge, failing if the range is empty
    pub fn new(
        pivot: usize,
        anchor: usize,
        limb: usize,
        rest_angle: f32,
        min_angle: f32,
        max_angle: f32,
        stiffness: f32,
    ) -> Result<Self> {
        if !(min_angle < max_angle) {
            return Err(PhysicsError::InvalidParameter(format!(
                "hinge range [{}, {}] is empty", min_angle, max_angle
            )));
        }
        Ok(Self {
            points: [pivot, anchor, limb],
            rest_angle: normalize_angle(rest_angle),
            min_angle,
            max_angle,
            stiffness: stiffness.clamp(0.0, 1.0),
        })
    }

    #[inline]
    pub fn pivot(&self) -> usize {
        self.points[0]
    }

    #[inline]
    pub fn anchor(&self) -> usize {
        self.points[1]
    }

    #[inline]
    pub fn limb(&self) -> usize {
        self.points[2]
    }

    pub fn get_rest_angle(&self) -> f32 {
        self.rest_angle
    }

    /// Allowed relative range as (min, max)
    pub fn get_limits(&self) -> (f32, f32) {
        (self.min_angle, self.max_angle)
    }

    pub fn get_stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Current deviation from the rest angle, in (-PI, PI]
    pub fn relative_angle(&self, points: &[Point]) -> f32 {
        let (anchor_arm, limb_arm) = self.arms(points);
        normalize_angle(signed_angle(anchor_arm, limb_arm) - self.rest_angle)
    }

    fn arms(&self, points: &[Point]) -> (Vector2, Vector2) {
        let pivot = points[self.pivot()].position;
        (
            points[self.anchor()].position - pivot,
            points[self.limb()].position - pivot,
        )
    }
}

impl Constraint for HingeConstraint {
    fn get_points(&self) -> &[usize] {
        &self.points
    }

    fn solve(&self, points: &mut [Point], context: &SolverContext) {
        let (anchor_arm, limb_arm) = self.arms(points);
        if anchor_arm.length_squared() <= EPSILON || limb_arm.length_squared() <= EPSILON {
            return;
        }

        let relative = normalize_angle(signed_angle(anchor_arm, limb_arm) - self.rest_angle);
        let boundary = if relative < self.min_angle {
            self.min_angle
        } else if relative > self.max_angle {
            self.max_angle
        } else {
            return;
        };

        let limit = context.max_angle_correction;
        let correction = clamp(boundary - relative, -limit, limit) * self.stiffness;

        let w_anchor = context.weight(points, self.anchor());
        let w_limb = context.weight(points, self.limb());
        let total = w_anchor + w_limb;
        if total <= EPSILON {
            return;
        }

        // Rotating both arms about the pivot keeps their lengths intact
        let pivot = points[self.pivot()].position;
        if w_limb > 0.0 {
            points[self.limb()].position = pivot + limb_arm.rotated(correction * w_limb / total);
        }
        if w_anchor > 0.0 {
            points[self.anchor()].position = pivot + anchor_arm.rotated(-correction * w_anchor / total);
        }
    }

    fn violation(&self, points: &[Point]) -> f32 {
        let relative = self.relative_angle(points);
        if relative < self.min_angle {
            self.min_angle - relative
        } else if relative > self.max_angle {
            relative - self.max_angle
        } else {
            0.0
        }
    }
}
