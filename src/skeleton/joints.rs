//! Joint wiring: the distance links and angle limits between body parts.

use std::f32::consts::PI;

use crate::bodies::SegmentFlags;
use crate::skeleton::{Side, SkeletonBuilder};
use crate::Result;

fn bone() -> SegmentFlags {
    SegmentFlags::VISIBLE | SegmentFlags::ROTATION_DAMPED
}

fn brace() -> SegmentFlags {
    SegmentFlags::ROTATION_DAMPED
}

/// Hinge limits for the left side; the right side is mirrored
fn sided(side: Side, min: f32, max: f32) -> (f32, f32) {
    match side {
        Side::Left => (min, max),
        Side::Right => (-max, -min),
    }
}

pub fn add_spine(builder: &mut SkeletonBuilder) -> Result<()> {
    builder.add_distance("torso_top", "torso_bottom", 0.97, bone())?;
    Ok(())
}

pub fn add_neck_joint(builder: &mut SkeletonBuilder) -> Result<()> {
    builder.add_distance("torso_top", "neck", 0.96, bone())?;
    builder.add_distance("neck", "head", 0.96, bone())?;
    builder.add_hinge("neck", "torso_top", "head", (-0.35 * PI, 0.35 * PI), 0.5)?;
    Ok(())
}

pub fn add_shoulder(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    let shoulder = side.key("shoulder");
    builder.add_distance("torso_top", &shoulder, 0.94, bone())?;
    builder.add_hinge(&shoulder, "torso_top", &side.key("elbow"), (-0.85 * PI, 0.85 * PI), 0.45)?;
    Ok(())
}

pub fn add_elbow(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    let elbow = side.key("elbow");
    builder.add_distance(&side.key("shoulder"), &elbow, 0.93, bone())?;
    builder.add_hinge(
        &elbow,
        &side.key("shoulder"),
        &side.key("hand"),
        sided(side, -0.1 * PI, 0.85 * PI),
        0.5,
    )?;
    Ok(())
}

pub fn add_wrist(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    builder.add_distance(&side.key("elbow"), &side.key("hand"), 0.9, bone())?;
    Ok(())
}

pub fn add_hip(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    let hip = side.key("hip");
    builder.add_distance("torso_bottom", &hip, 0.95, bone())?;
    builder.add_hinge(&hip, "torso_bottom", &side.key("knee"), sided(side, -0.55 * PI, 0.95 * PI), 0.5)?;
    Ok(())
}

pub fn add_knee(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    let knee = side.key("knee");
    builder.add_distance(&side.key("hip"), &knee, 0.94, bone())?;
    builder.add_hinge(&knee, &side.key("hip"), &side.key("foot"), sided(side, -0.12 * PI, 0.92 * PI), 0.52)?;
    Ok(())
}

pub fn add_ankle(builder: &mut SkeletonBuilder, side: Side) -> Result<()> {
    builder.add_distance(&side.key("knee"), &side.key("foot"), 0.92, bone())?;
    Ok(())
}

/// Hidden shoulder-to-shoulder link
pub fn add_clavicle(builder: &mut SkeletonBuilder) -> Result<()> {
    builder.add_distance("shoulder_l", "shoulder_r", 0.9, brace())?;
    Ok(())
}

/// Hidden hip-to-hip link
pub fn add_pelvis(builder: &mut SkeletonBuilder) -> Result<()> {
    builder.add_distance("hip_l", "hip_r", 0.9, brace())?;
    Ok(())
}

/// Hidden neck-to-shoulder links
pub fn add_trapezius(builder: &mut SkeletonBuilder) -> Result<()> {
    builder.add_distance("neck", "shoulder_l", 0.7, brace())?;
    builder.add_distance("neck", "shoulder_r", 0.7, brace())?;
    Ok(())
}

/// Soft diagonals that keep the torso from shearing flat
pub fn add_soft_tissue(builder: &mut SkeletonBuilder) -> Result<()> {
    let pairs = [
        ("torso_top", "hip_l"),
        ("torso_top", "hip_r"),
        ("shoulder_l", "torso_bottom"),
        ("shoulder_r", "torso_bottom"),
        ("shoulder_l", "hip_r"),
        ("shoulder_r", "hip_l"),
    ];
    for (a, b) in pairs {
        builder.add_distance(a, b, 0.45, SegmentFlags::SOFT)?;
    }
    Ok(())
}
