//! Blending the figure back toward its bind pose, standing where it lies.

use crate::core::room::Interior;
use crate::math::Vector2;
use crate::skeleton::Skeleton;

// Share of the velocity kept by a point after each blend step
const BLEND_VELOCITY_KEEP: f32 = 0.2;

/// Translation that puts the bind pose's feet under the current feet and on
/// the floor, keeping the whole pose at least `margin` away from the side walls
pub fn assist_offset(skeleton: &Skeleton, bounds: &Interior, margin: f32) -> Vector2 {
    let feet = skeleton.anchors.feet;
    let points = &skeleton.points;
    let bind = &skeleton.bind_pose;

    let foot_center = (points[feet.left].position.x + points[feet.right].position.x) * 0.5;
    let bind_center = (bind[feet.left].x + bind[feet.right].x) * 0.5;
    let bind_feet_y = bind[feet.left].y.max(bind[feet.right].y);

    let (min_x, max_x) = bind
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let low = bounds.left + margin + (bind_center - min_x);
    let high = bounds.right - margin - (max_x - bind_center);
    let center = if low <= high {
        foot_center.clamp(low, high)
    } else {
        (bounds.left + bounds.right) * 0.5
    };

    Vector2::new(center - bind_center, bounds.bottom - bind_feet_y)
}

/// Moves every point `amount` (0-1) of the way toward its shifted bind
/// position and bleeds off most of its velocity
pub fn blend_toward_bind_pose(skeleton: &mut Skeleton, bounds: &Interior, margin: f32, amount: f32) {
    let offset = assist_offset(skeleton, bounds, margin);
    let Skeleton { points, bind_pose, .. } = skeleton;
    for (point, rest) in points.iter_mut().zip(bind_pose.iter()) {
        let target = bounds.clamp(*rest + offset);
        let velocity = point.velocity();
        point.position = point.position.lerp(&target, amount);
        point.previous = point.position - velocity * BLEND_VELOCITY_KEEP;
    }
}

/// Places every point exactly on its shifted bind position, at rest
pub fn snap_to_bind_pose(skeleton: &mut Skeleton, bounds: &Interior, margin: f32) {
    let offset = assist_offset(skeleton, bounds, margin);
    let Skeleton { points, bind_pose, .. } = skeleton;
    for (point, rest) in points.iter_mut().zip(bind_pose.iter()) {
        point.teleport(bounds.clamp(*rest + offset));
    }
}
