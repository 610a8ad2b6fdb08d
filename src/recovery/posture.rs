//! Pure checks on the current pose. None of these mutate the points.

use crate::bodies::Point;
use crate::collision::segment_turn;
use crate::constraints::DistanceConstraint;
use crate::core::{Room, SimulationConfig};
use crate::skeleton::{Anchors, BodyMetrics, Skeleton};

/// How far above the floor a point may be and still count as touching it
pub fn contact_tolerance(metrics: &BodyMetrics, config: &SimulationConfig) -> f32 {
    (metrics.head_radius * config.contact_tolerance_ratio).max(config.min_contact_tolerance)
}

/// Number of lower-body anchors within `tolerance` of the floor
pub fn floor_contacts(points: &[Point], anchors: &Anchors, floor_y: f32, tolerance: f32) -> usize {
    anchors
        .lower_body()
        .iter()
        .filter_map(|&index| points.get(index))
        .filter(|p| floor_y - p.position.y <= tolerance)
        .count()
}

/// At least two lower-body contacts and no lower-body point moving faster
/// than `max_step_speed` px per sub-step
pub fn is_ground_stable(points: &[Point], anchors: &Anchors, floor_y: f32, tolerance: f32, max_step_speed: f32) -> bool {
    let slow = anchors
        .lower_body()
        .iter()
        .filter_map(|&index| points.get(index))
        .all(|p| {
            let v = p.velocity();
            v.x.abs() <= max_step_speed && v.y.abs() <= max_step_speed
        });
    slow && floor_contacts(points, anchors, floor_y, tolerance) >= 2
}

/// Average point speed and average segment turn both below their limits,
/// given per sub-step
pub fn is_calm(points: &[Point], segments: &[DistanceConstraint], max_speed: f32, max_turn: f32) -> bool {
    if points.is_empty() {
        return true;
    }
    let speed = points.iter().map(|p| p.velocity().length()).sum::<f32>() / points.len() as f32;
    if speed >= max_speed {
        return false;
    }
    if segments.is_empty() {
        return true;
    }
    let turn = segments
        .iter()
        .map(|s| segment_turn(&points[s.a()], &points[s.b()]).abs())
        .sum::<f32>()
        / segments.len() as f32;
    turn < max_turn
}

/// True when the figure is calm and resting on the floor.
///
/// `dt` is the sub-step length the per-second thresholds are converted with.
pub fn is_sleeping(skeleton: &Skeleton, room: &Room, config: &SimulationConfig, dt: f32) -> bool {
    let points = skeleton.points.as_slice();
    let tolerance = contact_tolerance(&skeleton.metrics, config);
    is_ground_stable(points, &skeleton.anchors, room.floor_y(), tolerance, config.ground_stable_speed * dt)
        && is_calm(
            points,
            &skeleton.distances,
            config.sleep_speed * dt,
            config.sleep_angular_speed * dt,
        )
}

/// Torso at its rest length, close to vertical, and the head above it
pub fn is_upright(skeleton: &Skeleton, config: &SimulationConfig) -> bool {
    let points = &skeleton.points;
    let anchors = &skeleton.anchors;
    let metrics = &skeleton.metrics;

    let top = points[anchors.torso_top].position;
    let bottom = points[anchors.torso_bottom].position;
    let head = points[anchors.head].position;

    let torso = top.distance(&bottom);
    let length_ok = (torso - metrics.torso_length).abs() < metrics.torso_length * config.upright_torso_tolerance;
    let vertical_ok = (top.x - bottom.x).abs() < metrics.head_radius * config.upright_lean_ratio;
    let head_above = head.y < top.y - metrics.head_radius * config.upright_head_ratio;

    length_ok && vertical_ok && head_above
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    fn lay_flat(skeleton: &mut Skeleton, room: &Room) {
        let floor = room.floor_y();
        for (index, point) in skeleton.points.iter_mut().enumerate() {
            point.teleport(Vector2::new(60.0 + index as f32 * 12.0, floor));
        }
    }

    #[test]
    fn bind_pose_is_upright() {
        let room = Room::default();
        let config = SimulationConfig::default();
        let skeleton = Skeleton::build_for_room(&room, &config).unwrap();
        assert!(is_upright(&skeleton, &config));
    }

    #[test]
    fn flat_figure_is_not_upright_but_touches_the_floor() {
        let room = Room::default();
        let config = SimulationConfig::default();
        let mut skeleton = Skeleton::build_for_room(&room, &config).unwrap();
        lay_flat(&mut skeleton, &room);

        assert!(!is_upright(&skeleton, &config));
        let tolerance = contact_tolerance(&skeleton.metrics, &config);
        assert_eq!(
            floor_contacts(skeleton.points.as_slice(), &skeleton.anchors, room.floor_y(), tolerance),
            7
        );
    }

    #[test]
    fn spawned_figure_is_not_sleeping() {
        let room = Room::default();
        let config = SimulationConfig::default();
        let skeleton = Skeleton::build_for_room(&room, &config).unwrap();
        // Feet start well above the floor
        assert!(!is_sleeping(&skeleton, &room, &config, config.fixed_step));
    }

    #[test]
    fn moving_points_are_not_calm() {
        let room = Room::default();
        let config = SimulationConfig::default();
        let mut skeleton = Skeleton::build_for_room(&room, &config).unwrap();
        lay_flat(&mut skeleton, &room);
        assert!(is_sleeping(&skeleton, &room, &config, config.fixed_step));

        for point in skeleton.points.iter_mut() {
            point.set_velocity(Vector2::new(2.0, 0.0));
        }
        assert!(!is_sleeping(&skeleton, &room, &config, config.fixed_step));
    }
}
