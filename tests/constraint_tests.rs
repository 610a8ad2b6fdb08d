use std::f32::consts::PI;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ragdoll_engine::collision::BoundsResolver;
use ragdoll_engine::constraints::{Constraint, ConstraintSolver, DistanceConstraint, SolverContext};
use ragdoll_engine::error::PhysicsError;
use ragdoll_engine::skeleton::SkeletonBuilder;
use ragdoll_engine::{
    Point, Room, SegmentFlags, Simulation, SimulationConfig, Skeleton, Vector2, WallMaterial,
};

#[test]
fn test_distance_constraint_converges() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let rest = rng.gen_range(10.0..120.0);
        let mut points = vec![
            Point::new(Vector2::new(100.0, 100.0), rng.gen_range(0.5..2.0)),
            Point::new(
                Vector2::new(100.0 + rng.gen_range(-150.0..150.0), 100.0 + rng.gen_range(-150.0..150.0)),
                rng.gen_range(0.5..2.0),
            ),
        ];
        let link = DistanceConstraint::new(0, 1, rest, 1.0, SegmentFlags::default());
        let solver = ConstraintSolver::new(40, SolverContext::default());
        solver.solve(&mut points, std::slice::from_ref(&link), &[]);

        assert!(link.violation(&points) < rest * 0.005, "error {} for rest {}", link.violation(&points), rest);
    }
}

#[test]
fn test_capped_corrections_still_converge() {
    let mut points = vec![
        Point::new(Vector2::new(0.0, 0.0), 1.0),
        Point::new(Vector2::new(200.0, 0.0), 1.0),
    ];
    let link = DistanceConstraint::new(0, 1, 50.0, 1.0, SegmentFlags::default());
    let context = SolverContext {
        correction_cap: 6.0,
        ..SolverContext::default()
    };
    let solver = ConstraintSolver::new(40, context);
    solver.solve(&mut points, std::slice::from_ref(&link), &[]);
    assert_relative_eq!(link.current_length(&points), 50.0, epsilon = 0.25);
}

#[test]
fn test_hinges_end_within_limits() {
    let room = Room::default();
    let skeleton = Skeleton::build_for_room(&room, &SimulationConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    for hinge in &skeleton.hinges {
        for _ in 0..10 {
            let mut points = skeleton.points.as_slice().to_vec();
            let pivot = points[hinge.pivot()].position;
            let arm = points[hinge.limb()].position - pivot;
            points[hinge.limb()].position = pivot + arm.rotated(rng.gen_range(-0.95 * PI..0.95 * PI));

            for _ in 0..60 {
                hinge.solve(&mut points, &SolverContext::default());
            }

            let (min, max) = hinge.get_limits();
            let relative = hinge.relative_angle(&points);
            assert!(
                relative >= min - 1e-3 && relative <= max + 1e-3,
                "relative angle {} outside [{}, {}]",
                relative,
                min,
                max
            );
        }
    }
}

#[test]
fn test_pinned_member_is_not_moved_by_hinge() {
    let room = Room::default();
    let skeleton = Skeleton::build_for_room(&room, &SimulationConfig::default()).unwrap();
    let hinge = &skeleton.hinges[0];
    let mut points = skeleton.points.as_slice().to_vec();
    let pivot = points[hinge.pivot()].position;
    let arm = points[hinge.limb()].position - pivot;
    points[hinge.limb()].position = pivot + arm.rotated(0.9 * PI);
    let pinned = points[hinge.limb()].position;

    let context = SolverContext {
        pinned: Some(hinge.limb()),
        ..SolverContext::default()
    };
    hinge.solve(&mut points, &context);
    assert_eq!(points[hinge.limb()].position, pinned);
}

#[test]
fn test_bounds_contain_random_points() {
    let room = Room::new(10.0, 20.0, 500.0, 400.0, 5.0);
    let bounds = room.bounds();
    let resolver = BoundsResolver {
        material: WallMaterial::default(),
        contact_frames: 2,
        max_impact_speed: 30.0,
        floor_band: 1.5,
        floor_rest_speed: 0.3,
        floor_vertical_damping: 0.25,
    };
    let mut rng = StdRng::seed_from_u64(3);

    let mut points: Vec<Point> = (0..200)
        .map(|_| {
            let position = Vector2::new(rng.gen_range(-300.0..900.0), rng.gen_range(-300.0..900.0));
            let mut point = Point::new(position, 1.0);
            point.set_velocity(Vector2::new(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0)));
            point
        })
        .collect();
    let speeds: Vec<f32> = points.iter().map(|p| p.velocity().length()).collect();

    resolver.apply_bounds(&mut points, &bounds, None);

    for (point, before) in points.iter().zip(speeds) {
        assert!(bounds.contains(point.position, 1e-4));
        assert!(point.velocity().length() <= before + 1e-3);
    }
}

#[test]
fn test_builder_rejects_bad_topology() {
    let mut builder = SkeletonBuilder::new();
    builder.add_point("hip", Vector2::new(0.0, 0.0), 1.0).unwrap();
    builder.add_point("knee", Vector2::new(0.0, 40.0), 1.0).unwrap();

    assert_eq!(
        builder.add_point("hip", Vector2::new(5.0, 5.0), 1.0),
        Err(PhysicsError::DuplicatePoint("hip".to_string()))
    );
    assert_eq!(
        builder.add_distance("hip", "ankle", 1.0, SegmentFlags::default()),
        Err(PhysicsError::UnknownPoint("ankle".to_string()))
    );
    assert!(matches!(
        builder.add_hinge("knee", "hip", "knee", (0.5, 0.1), 0.5),
        Err(PhysicsError::InvalidParameter(_))
    ));
    assert_eq!(builder.point_count(), 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let room = Room::default();
    let config = SimulationConfig::default().with_fixed_step(0.0);
    assert!(matches!(
        Simulation::with_config(&room, config),
        Err(PhysicsError::InvalidParameter(_))
    ));
}

#[test]
fn test_random_interaction_never_breaks_the_figure() {
    let room = Room::new(0.0, 0.0, 420.0, 560.0, 4.0);
    let bounds = room.bounds();
    let mut sim = Simulation::new(&room).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let count = sim.get_points().len();

    for frame in 0..900 {
        if !sim.is_dragging() && rng.gen_bool(0.03) {
            let index = rng.gen_range(0..count);
            sim.start_grab(index).unwrap();
        } else if sim.is_dragging() {
            if rng.gen_bool(0.08) {
                let velocity = Vector2::new(rng.gen_range(-4000.0..4000.0), rng.gen_range(-4000.0..4000.0));
                assert!(sim.release(velocity).is_some());
            } else {
                let target = Vector2::new(rng.gen_range(-200.0..700.0), rng.gen_range(-200.0..800.0));
                sim.drag_to(target, &room);
            }
        }
        if rng.gen_bool(0.01) {
            sim.notify_user_action();
        }

        let dt = if frame % 97 == 0 { 0.5 } else { rng.gen_range(0.0..0.04) };
        sim.simulate(dt, &room).unwrap();

        for point in sim.get_points() {
            assert!(point.is_finite());
            assert!(bounds.contains(point.position, 1e-3), "point escaped to {:?}", point.position);
        }
    }
}
