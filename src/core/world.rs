use tracing::{debug, error, trace, warn};

use crate::bodies::Point;
use crate::collision::{BoundsResolver, RotationalDamper, SelfCollision};
use crate::constraints::{ConstraintSolver, DistanceConstraint, HingeConstraint, SolverContext};
use crate::core::{Energy, EventQueue, FixedStepScheduler, Room, SimulationConfig, SimulationEvent};
use crate::error::PhysicsError;
use crate::forces::{AirDrag, Gravity};
use crate::integration::{Integrator, VerletIntegrator};
use crate::interaction::{DragState, InteractionController, ReleaseImpulse};
use crate::math::{segment_distance, Vector2};
use crate::recovery::{self, RecoveryPhase, RecoveryStateMachine, RestState, StepInfo};
use crate::skeleton::{Anchors, BodyMetrics, Skeleton};
use crate::Result;

/// One ragdoll in one room.
///
/// Owns the skeleton and every piece of per-figure state. Several
/// simulations can live side by side; nothing is shared between them.
#[derive(Debug)]
pub struct Simulation {
    /// Tuning constants
    config: SimulationConfig,

    /// Room the skeleton was built for
    room: Room,

    /// Points, constraints and bind pose
    skeleton: Skeleton,

    /// Overlap checks between body parts
    self_collision: SelfCollision,

    /// Splits frame deltas into fixed sub-steps
    scheduler: FixedStepScheduler,

    /// Grab and throw
    interaction: InteractionController,

    /// Rest detection and stand assist
    recovery: RecoveryStateMachine,

    /// Events waiting for the host
    events: EventQueue,

    /// Gravity for the current room
    gravity: Gravity,

    /// Elapsed simulation time in seconds
    time: f64,
}

impl Simulation {
    /// Creates a simulation with the default tuning and builds the figure
    pub fn new(room: &Room) -> Result<Self> {
        Self::with_config(room, SimulationConfig::default())
    }

    /// Creates a simulation with the given tuning and builds the figure
    pub fn with_config(room: &Room, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let skeleton = Skeleton::build_for_room(room, &config)?;
        let self_collision = SelfCollision::for_skeleton(&skeleton.anchors, &skeleton.metrics, &config);

        let mut events = EventQueue::new(config.event_capacity);
        events.push(SimulationEvent::Rebuilt { recovered: false });

        Ok(Self {
            scheduler: FixedStepScheduler::new(config.fixed_step, config.max_frame_time, config.max_substeps),
            gravity: Gravity::for_room(room, &config),
            room: *room,
            skeleton,
            self_collision,
            interaction: InteractionController::new(),
            recovery: RecoveryStateMachine::new(0.0),
            events,
            time: 0.0,
            config,
        })
    }

    /// Rebuilds the figure for `room`, dropping any drag and recovery state
    pub fn build(&mut self, room: &Room) -> Result<()> {
        self.rebuild(room, false)
    }

    /// Advances the simulation by a frame of `dt` seconds.
    ///
    /// Returns the number of fixed sub-steps that ran. A room that differs
    /// from the one the figure was built for triggers a rebuild first.
    pub fn simulate(&mut self, dt: f32, room: &Room) -> Result<u32> {
        room.validate()?;
        if *room != self.room {
            debug!(width = room.width, height = room.height, "room changed");
            self.rebuild(room, false)?;
        }
        self.gravity = Gravity::for_room(room, &self.config);

        let steps = self.scheduler.advance(dt);
        let fixed_step = self.scheduler.get_fixed_step();
        for _ in 0..steps {
            self.step(fixed_step)?;
        }

        trace!(dt, steps, "simulated frame");
        Ok(steps)
    }

    /// Point to grab for a pointer at `position`, if any is close enough.
    ///
    /// The head counts from its outline; visible segments pick their nearer
    /// endpoint.
    pub fn nearest_grabbable(&self, position: Vector2) -> Option<usize> {
        if !position.is_finite() {
            return None;
        }
        let points = self.skeleton.points.as_slice();
        let head = self.skeleton.anchors.head;

        let mut best = head;
        let mut best_distance = points[head].position.distance(&position) - self.skeleton.metrics.head_radius;

        for segment in self.skeleton.visible_segments() {
            let a = points[segment.a()].position;
            let b = points[segment.b()].position;
            let distance = segment_distance(position, a, b);
            if distance < best_distance {
                best_distance = distance;
                best = if a.distance_squared(&position) < b.distance_squared(&position) {
                    segment.a()
                } else {
                    segment.b()
                };
            }
        }

        (best_distance <= self.config.grab_threshold).then_some(best)
    }

    /// Grabs the point at `index`
    pub fn start_grab(&mut self, index: usize) -> Result<()> {
        self.interaction.start_grab(
            self.skeleton.points.as_mut_slice(),
            index,
            self.time,
            self.config.throw_window,
        )?;
        self.recovery.notify_user_action(self.time, &mut self.events);
        self.events.push(SimulationEvent::GrabStarted { index });
        Ok(())
    }

    /// Moves the grabbed point toward `target`, clamped to the room interior.
    ///
    /// Returns false if nothing is grabbed.
    pub fn drag_to(&mut self, target: Vector2, room: &Room) -> bool {
        self.interaction.drag_to(target, &room.bounds(), self.time)
    }

    /// Lets go of the grabbed point with the pointer velocity in px/s
    pub fn release(&mut self, velocity: Vector2) -> Option<ReleaseImpulse> {
        let impulse = self.interaction.release(
            self.skeleton.points.as_mut_slice(),
            velocity,
            self.time,
            self.skeleton.metrics.body_height,
            self.config.fixed_step,
            &self.config,
        )?;
        self.recovery.notify_user_action(self.time, &mut self.events);
        self.events.push(SimulationEvent::Released {
            index: impulse.index,
            velocity: impulse.velocity,
        });
        Some(impulse)
    }

    /// Restarts the idle timer and interrupts a running stand assist
    pub fn notify_user_action(&mut self) {
        self.recovery.notify_user_action(self.time, &mut self.events);
    }

    pub fn get_points(&self) -> &[Point] {
        self.skeleton.points.as_slice()
    }

    /// Direct access for posing the figure; velocities are `position - previous`
    pub fn get_points_mut(&mut self) -> &mut [Point] {
        self.skeleton.points.as_mut_slice()
    }

    pub fn get_distance_constraints(&self) -> &[DistanceConstraint] {
        &self.skeleton.distances
    }

    pub fn get_hinge_constraints(&self) -> &[HingeConstraint] {
        &self.skeleton.hinges
    }

    /// Segments the host should draw
    pub fn visible_segments(&self) -> impl Iterator<Item = &DistanceConstraint> {
        self.skeleton.visible_segments()
    }

    pub fn get_anchors(&self) -> &Anchors {
        &self.skeleton.anchors
    }

    pub fn get_metrics(&self) -> &BodyMetrics {
        &self.skeleton.metrics
    }

    pub fn get_bind_pose(&self) -> &[Vector2] {
        &self.skeleton.bind_pose
    }

    pub fn get_skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Kinetic and potential energy of the figure
    pub fn get_energies(&self) -> Energy {
        Energy::measure(
            self.skeleton.points.as_slice(),
            self.gravity.get_acceleration(),
            self.room.floor_y(),
            self.config.fixed_step,
        )
    }

    /// True if the figure is calm and resting on the floor right now
    pub fn is_sleeping(&self) -> bool {
        recovery::is_sleeping(&self.skeleton, &self.room, &self.config, self.config.fixed_step)
    }

    pub fn is_upright(&self) -> bool {
        recovery::is_upright(&self.skeleton, &self.config)
    }

    /// Lower-body points touching the floor
    pub fn floor_contacts(&self) -> usize {
        let tolerance = recovery::contact_tolerance(&self.skeleton.metrics, &self.config);
        recovery::floor_contacts(
            self.skeleton.points.as_slice(),
            &self.skeleton.anchors,
            self.room.floor_y(),
            tolerance,
        )
    }

    pub fn has_floor_contact(&self) -> bool {
        self.floor_contacts() > 0
    }

    pub fn recovery_phase(&self) -> RecoveryPhase {
        self.recovery.phase()
    }

    pub fn rest_state(&self) -> RestState {
        self.recovery.rest_state()
    }

    pub fn grabbed(&self) -> Option<usize> {
        self.interaction.grabbed()
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// The active drag with its target and velocity history
    pub fn get_drag_state(&self) -> Option<&DragState> {
        self.interaction.get_drag()
    }

    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Takes every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        self.events.drain()
    }

    pub fn get_room(&self) -> &Room {
        &self.room
    }

    pub fn get_time(&self) -> f64 {
        self.time
    }

    pub fn get_gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    fn rebuild(&mut self, room: &Room, recovered: bool) -> Result<()> {
        let skeleton = Skeleton::build_for_room(room, &self.config)?;
        self.self_collision = SelfCollision::for_skeleton(&skeleton.anchors, &skeleton.metrics, &self.config);
        self.skeleton = skeleton;
        self.room = *room;
        self.gravity = Gravity::for_room(room, &self.config);
        self.interaction.cancel();
        self.recovery.reset(self.time);
        self.scheduler.reset();

        debug!(recovered, width = room.width, height = room.height, "rebuilt skeleton");
        self.events.push(SimulationEvent::Rebuilt { recovered });
        Ok(())
    }

    // One fixed sub-step
    fn step(&mut self, dt: f32) -> Result<()> {
        let config = &self.config;
        let height = self.room.height;
        let pinned = self.interaction.grabbed();
        let agitated = self.interaction.is_agitated();
        let assisting = self.recovery.is_assisting();
        let points = self.skeleton.points.as_mut_slice();

        self.interaction.pin(points);

        let speed_boost = if agitated { config.post_release_speed_boost } else { 1.0 };
        let mut integrator = VerletIntegrator::new(
            self.gravity,
            AirDrag::from_config(config),
            config.max_speed_per_height * height * dt * speed_boost,
        )
        .with_pinned(pinned);
        integrator.integrate(points, dt);

        let mut iterations = config.solver_iterations;
        if assisting {
            iterations += config.assist_extra_iterations;
        }
        if agitated {
            iterations += config.post_release_extra_iterations;
        }
        let stiffness_scale = if assisting {
            config.assist_stiffness_scale
        } else if agitated {
            config.post_release_stiffness_scale
        } else {
            config.base_stiffness_scale
        };
        let correction_boost = if agitated { config.post_release_correction_boost } else { 1.0 };
        let correction_cap = config.correction_cap_per_height * height * correction_boost;

        let solver = ConstraintSolver::new(
            iterations,
            SolverContext {
                stiffness_scale,
                correction_cap,
                max_angle_correction: config.max_hinge_correction,
                pinned,
            },
        );
        solver.solve(points, &self.skeleton.distances, &self.skeleton.hinges);

        let bounds = BoundsResolver {
            material: config.wall,
            contact_frames: config.contact_frames,
            max_impact_speed: config.max_impact_speed_per_height * height * dt,
            floor_band: config.floor_rest_band,
            floor_rest_speed: config.floor_rest_speed * dt,
            floor_vertical_damping: config.floor_vertical_damping,
        };
        let hits = bounds.apply_bounds(points, &self.room.bounds(), pinned);
        BoundsResolver::decay_contacts(points);

        let damper = RotationalDamper {
            gain: config.rotation_damping,
            cap: config.rotation_cap,
            contact_gain: config.contact_rotation_gain,
            double_contact_boost: config.double_contact_boost,
            contact_share: config.contact_endpoint_share,
        };
        damper.damp_angles(points, &self.skeleton.distances, pinned);
        damper.damp_contacts(points, &self.skeleton.distances, pinned);

        let overlaps = self.self_collision.resolve(points, correction_cap, pinned);
        trace!(integrator = integrator.name(), iterations, hits, overlaps, "sub-step");

        let info = StepInfo {
            time: self.time,
            dt,
            agitated,
        };
        self.recovery
            .evaluate(&mut self.skeleton, &self.room, &self.config, info, &mut self.events);

        self.sanitize()?;
        self.interaction.tick();
        self.time += f64::from(dt);
        Ok(())
    }

    // Rebuilds on non-finite coordinates; otherwise keeps every point inside
    // the room and under the hard speed cap
    fn sanitize(&mut self) -> Result<()> {
        if !self.skeleton.points.all_finite() {
            warn!(time = self.time, "non-finite coordinates, rebuilding skeleton");
            let room = self.room;
            return self.rebuild(&room, true).map_err(|e| {
                error!(error = %e, "rebuild after numerical fault failed");
                PhysicsError::SimulationError(e.to_string())
            });
        }

        let bounds = self.room.bounds();
        let max_speed = self.config.sanitize_speed_per_height * self.room.height * self.config.fixed_step;
        for point in self.skeleton.points.iter_mut() {
            point.position = bounds.clamp(point.position);
            let velocity = point.velocity();
            if velocity.length() > max_speed {
                point.set_velocity(velocity.clamp_length(max_speed));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn new_simulation_reports_a_build() {
        let mut sim = Simulation::new(&Room::default()).unwrap();
        assert_eq!(sim.drain_events(), vec![SimulationEvent::Rebuilt { recovered: false }]);
        assert_eq!(sim.get_points().len(), 16);
        assert_relative_eq!(sim.get_gravity().get_acceleration(), 1200.0);
    }

    #[test]
    fn accessors_describe_the_built_figure() {
        let room = Room::default();
        let sim = Simulation::new(&room).unwrap();
        let skeleton = sim.get_skeleton();

        assert_eq!(sim.get_distance_constraints().len(), skeleton.distances.len());
        assert_eq!(sim.get_hinge_constraints().len(), skeleton.hinges.len());
        assert!(sim.visible_segments().count() < sim.get_distance_constraints().len());
        assert!(sim.get_hinge_constraints().iter().all(|h| h.get_stiffness() > 0.0));
        assert!(sim.get_distance_constraints().iter().all(|d| d.get_stiffness() > 0.0));
        assert_eq!(sim.get_events().len(), 1);
        assert_eq!(sim.get_config(), &SimulationConfig::default());
        assert!(!sim.has_floor_contact());
    }

    #[test]
    fn frames_become_fixed_substeps() {
        let room = Room::default();
        let mut sim = Simulation::new(&room).unwrap();
        assert_eq!(sim.simulate(FRAME, &room).unwrap(), 2);
        assert_eq!(sim.simulate(1.0, &room).unwrap(), 6);
        assert_eq!(sim.simulate(f32::NAN, &room).unwrap(), 0);
        assert_relative_eq!(sim.get_time(), 8.0 / 120.0, epsilon = 1e-6);
    }

    #[test]
    fn invalid_room_is_an_error() {
        let mut sim = Simulation::new(&Room::default()).unwrap();
        let broken = Room::new(0.0, 0.0, 4.0, 4.0, 4.0);
        assert!(matches!(sim.simulate(FRAME, &broken), Err(PhysicsError::InvalidRoom(_))));
    }

    #[test]
    fn head_is_grabbable_from_its_outline() {
        let sim = Simulation::new(&Room::default()).unwrap();
        let head = sim.get_anchors().head;
        let radius = sim.get_metrics().head_radius;
        let center = sim.get_points()[head].position;

        assert_eq!(sim.nearest_grabbable(center - Vector2::new(0.0, radius + 5.0)), Some(head));
        assert_eq!(sim.nearest_grabbable(Vector2::new(10.0, 10.0)), None);
    }

    #[test]
    fn grab_pins_the_point_through_a_frame() {
        let room = Room::default();
        let mut sim = Simulation::new(&room).unwrap();
        let hand = sim.get_anchors().hands.left;
        sim.start_grab(hand).unwrap();
        let target = Vector2::new(120.0, 200.0);
        assert!(sim.drag_to(target, &room));
        sim.simulate(FRAME, &room).unwrap();

        assert_eq!(sim.get_points()[hand].position, target);
        assert_eq!(sim.grabbed(), Some(hand));
        let drag = sim.get_drag_state().unwrap();
        assert_eq!(drag.target, target);
        assert_eq!(drag.started_at, 0.0);
        let events = sim.drain_events();
        assert!(events.contains(&SimulationEvent::GrabStarted { index: hand }));
    }

    #[test]
    fn non_finite_coordinates_trigger_a_rebuild() {
        let room = Room::default();
        let mut sim = Simulation::new(&room).unwrap();
        sim.drain_events();
        sim.get_points_mut()[3].position = Vector2::new(f32::NAN, 0.0);
        sim.simulate(FRAME, &room).unwrap();

        assert!(sim.get_points().iter().all(Point::is_finite));
        assert!(sim.drain_events().contains(&SimulationEvent::Rebuilt { recovered: true }));
    }
}
