//! Body-part generators. Each one places the points of one part relative to
//! where its parent attaches.

use crate::math::Vector2;
use crate::skeleton::{BodyMetrics, Side, SkeletonBuilder};
use crate::Result;

const HEAD_MASS: f32 = 0.82;
const NECK_MASS: f32 = 0.65;
const TORSO_TOP_MASS: f32 = 1.1;
const TORSO_BOTTOM_MASS: f32 = 1.3;
const SHOULDER_MASS: f32 = 0.92;
const ELBOW_MASS: f32 = 0.72;
const HAND_MASS: f32 = 0.68;
const HIP_MASS: f32 = 1.04;
const KNEE_MASS: f32 = 0.94;
const FOOT_MASS: f32 = 1.12;

/// Spine endpoints, the top one `torso` above the bottom one
pub fn add_torso(builder: &mut SkeletonBuilder, center_x: f32, bottom_y: f32, metrics: &BodyMetrics) -> Result<()> {
    let top_y = bottom_y - metrics.torso_length;
    builder.add_point("torso_top", Vector2::new(center_x, top_y), TORSO_TOP_MASS)?;
    builder.add_point("torso_bottom", Vector2::new(center_x, bottom_y), TORSO_BOTTOM_MASS)?;
    Ok(())
}

/// Neck point straight above the torso top
pub fn add_neck(builder: &mut SkeletonBuilder, metrics: &BodyMetrics) -> Result<()> {
    let top = builder.position_of("torso_top")?;
    builder.add_point("neck", top - Vector2::new(0.0, metrics.neck_length), NECK_MASS)?;
    Ok(())
}

/// Head center one and a half radii above the neck
pub fn add_head(builder: &mut SkeletonBuilder, metrics: &BodyMetrics) -> Result<()> {
    let neck = builder.position_of("neck")?;
    builder.add_point("head", neck - Vector2::new(0.0, metrics.head_radius * 1.5), HEAD_MASS)?;
    Ok(())
}

/// Shoulder, elbow and hand hanging from the torso top, splayed slightly outward
pub fn add_arm(builder: &mut SkeletonBuilder, side: Side, metrics: &BodyMetrics) -> Result<()> {
    let top = builder.position_of("torso_top")?;
    let out = side.sign();
    let splay = metrics.head_radius * 0.2;

    let shoulder = Vector2::new(
        top.x + out * metrics.shoulder_width * 0.5,
        top.y + metrics.head_radius * 0.25,
    );
    let elbow = Vector2::new(shoulder.x + out * splay, shoulder.y + metrics.upper_arm);
    let hand = Vector2::new(elbow.x + out * splay, elbow.y + metrics.forearm);

    builder.add_point(&side.key("shoulder"), shoulder, SHOULDER_MASS)?;
    builder.add_point(&side.key("elbow"), elbow, ELBOW_MASS)?;
    builder.add_point(&side.key("hand"), hand, HAND_MASS)?;
    Ok(())
}

/// Hip, knee and foot below the torso bottom
pub fn add_leg(builder: &mut SkeletonBuilder, side: Side, metrics: &BodyMetrics) -> Result<()> {
    let bottom = builder.position_of("torso_bottom")?;
    let out = side.sign();
    let splay = metrics.head_radius * 0.1;

    let hip = Vector2::new(bottom.x + out * metrics.hip_width * 0.5, bottom.y);
    let knee = Vector2::new(hip.x + out * splay, hip.y + metrics.upper_leg);
    let foot = Vector2::new(knee.x + out * splay, knee.y + metrics.lower_leg);

    builder.add_point(&side.key("hip"), hip, HIP_MASS)?;
    builder.add_point(&side.key("knee"), knee, KNEE_MASS)?;
    builder.add_point(&side.key("foot"), foot, FOOT_MASS)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Room, SimulationConfig};

    #[test]
    fn parts_need_their_parent() {
        let metrics = BodyMetrics::for_room(&Room::default(), &SimulationConfig::default());
        let mut builder = SkeletonBuilder::new();
        assert!(add_arm(&mut builder, Side::Left, &metrics).is_err());
    }

    #[test]
    fn arms_mirror_each_other() {
        let metrics = BodyMetrics::for_room(&Room::default(), &SimulationConfig::default());
        let mut builder = SkeletonBuilder::new();
        add_torso(&mut builder, 100.0, 300.0, &metrics).unwrap();
        add_arm(&mut builder, Side::Left, &metrics).unwrap();
        add_arm(&mut builder, Side::Right, &metrics).unwrap();

        let left = builder.position_of("hand_l").unwrap();
        let right = builder.position_of("hand_r").unwrap();
        assert!((left.x - 100.0 + right.x - 100.0).abs() < 1e-4);
        assert_eq!(left.y, right.y);
    }
}
