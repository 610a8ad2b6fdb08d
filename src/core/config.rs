use crate::bodies::WallMaterial;
use crate::error::PhysicsError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Every tuning constant of the simulation.
///
/// Rates are per second and lengths scale with the room or body height, so
/// the same record behaves alike at any sub-step length and window size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Length of one physics sub-step in seconds
    pub fixed_step: f32,

    /// Longest frame delta accepted by `simulate`
    pub max_frame_time: f32,

    /// Upper bound on sub-steps per frame
    pub max_substeps: u32,

    /// Lower bound on gravitational acceleration (px/s^2)
    pub min_gravity: f32,

    /// Gravity as a multiple of room height per second squared
    pub gravity_per_height: f32,

    /// Exponential velocity decay rate (1/s)
    pub air_damping: f32,

    /// Quadratic drag coefficient (1/px)
    pub quadratic_drag: f32,

    /// Integrator speed cap in room heights per second
    pub max_speed_per_height: f32,

    /// Speed cap multiplier while dragging or just after a release
    pub post_release_speed_boost: f32,

    /// Base number of relaxation iterations per sub-step
    pub solver_iterations: u32,

    /// Extra iterations while the stand assist runs
    pub assist_extra_iterations: u32,

    /// Extra iterations while dragging or just after a release
    pub post_release_extra_iterations: u32,

    /// Global stiffness multiplier in normal motion
    pub base_stiffness_scale: f32,

    /// Global stiffness multiplier while dragging or just after a release
    pub post_release_stiffness_scale: f32,

    /// Global stiffness multiplier while the stand assist runs
    pub assist_stiffness_scale: f32,

    /// Largest correction per constraint and iteration, in room heights
    pub correction_cap_per_height: f32,

    /// Correction cap multiplier while dragging or just after a release
    pub post_release_correction_boost: f32,

    /// Sub-steps of boosted solving after a release
    pub post_release_substeps: u32,

    /// Largest hinge correction per solve (radians)
    pub max_hinge_correction: f32,

    /// Wall restitution and friction
    pub wall: WallMaterial,

    /// Sub-steps a wall contact stays active
    pub contact_frames: u8,

    /// Post-impact speed cap in room heights per second
    pub max_impact_speed_per_height: f32,

    /// Distance from the floor inside which the resting rule applies (px)
    pub floor_rest_band: f32,

    /// Horizontal speed below which a point on the floor stops sliding (px/s)
    pub floor_rest_speed: f32,

    /// Vertical velocity multiplier inside the floor band
    pub floor_vertical_damping: f32,

    /// Rotational damping gain
    pub rotation_damping: f32,

    /// Largest counter-rotation per segment and sub-step (radians)
    pub rotation_cap: f32,

    /// Gain multiplier of the contact damping pass
    pub contact_rotation_gain: f32,

    /// Extra multiplier when both endpoints touch a wall
    pub double_contact_boost: f32,

    /// Share of the rotation applied to an endpoint in contact
    pub contact_endpoint_share: f32,

    /// Limb thickness as a fraction of head radius
    pub limb_radius_ratio: f32,

    /// Smallest limb thickness (px)
    pub min_limb_radius: f32,

    /// Share of a shoulder/head separation taken by the head
    pub shoulder_head_weight: f32,

    /// Share of a hand/torso separation taken by the torso
    pub hand_torso_weight: f32,

    /// Hand clearance around the torso as a fraction of limb radius
    pub hand_torso_radius_scale: f32,

    /// Largest pointer-to-body distance that still grabs (px)
    pub grab_threshold: f32,

    /// Pointer history window for the throw estimate (s)
    pub throw_window: f32,

    /// Weight of the tracked estimate against the host-supplied velocity
    pub tracker_blend: f32,

    /// Fraction of the release velocity turned into translation
    pub linear_fraction: f32,

    /// Cap on the translational throw in body heights per second
    pub max_linear_throw_per_height: f32,

    /// Cap on the throw spin (rad/s)
    pub max_angular_throw: f32,

    /// Cap on any single point's velocity change in body heights per second
    pub max_point_throw_per_height: f32,

    /// Hard speed cap of the sanitize pass in room heights per second
    pub sanitize_speed_per_height: f32,

    /// Average point speed below which a sub-step counts as calm (px/s)
    pub sleep_speed: f32,

    /// Average segment turn rate below which a sub-step counts as calm (rad/s)
    pub sleep_angular_speed: f32,

    /// Lower-body speed below which a floor contact counts as stable (px/s)
    pub ground_stable_speed: f32,

    /// Consecutive calm sub-steps needed to fall asleep
    pub calm_frames: u32,

    /// Extra damping rate while settling on the ground (1/s)
    pub settling_damping: f32,

    /// Floor contact tolerance as a fraction of head radius
    pub contact_tolerance_ratio: f32,

    /// Smallest floor contact tolerance (px)
    pub min_contact_tolerance: f32,

    /// Length of the stand assist blend (s)
    pub assist_duration: f32,

    /// Idle time required before the assist may start (s)
    pub assist_idle_delay: f32,

    /// Time after an assist ends before another may start (s)
    pub assist_cooldown: f32,

    /// Per sub-step blend gain at full progress
    pub assist_gain: f32,

    /// Gap kept between the recentered feet and the side walls (px)
    pub assist_side_margin: f32,

    /// Allowed relative torso length error for the upright check
    pub upright_torso_tolerance: f32,

    /// Allowed torso lean as a fraction of head radius
    pub upright_lean_ratio: f32,

    /// Required head clearance above the torso as a fraction of head radius
    pub upright_head_ratio: f32,

    /// Height above the floor the feet spawn at, in room heights
    pub spawn_lift: f32,

    /// Events kept before the oldest are dropped
    pub event_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 120.0,
            max_frame_time: 0.05,
            max_substeps: 8,
            min_gravity: 1000.0,
            gravity_per_height: 2.0,
            air_damping: 0.9,
            quadratic_drag: 0.006,
            max_speed_per_height: 1.2,
            post_release_speed_boost: 2.6,
            solver_iterations: 12,
            assist_extra_iterations: 4,
            post_release_extra_iterations: 4,
            base_stiffness_scale: 0.85,
            post_release_stiffness_scale: 0.95,
            assist_stiffness_scale: 1.0,
            correction_cap_per_height: 0.010,
            post_release_correction_boost: 4.0,
            post_release_substeps: 10,
            max_hinge_correction: 2.0,
            wall: WallMaterial::default(),
            contact_frames: 2,
            max_impact_speed_per_height: 3.0,
            floor_rest_band: 1.5,
            floor_rest_speed: 40.0,
            floor_vertical_damping: 0.25,
            rotation_damping: 0.45,
            rotation_cap: 0.6,
            contact_rotation_gain: 1.1,
            double_contact_boost: 1.6,
            contact_endpoint_share: 0.3,
            limb_radius_ratio: 0.42,
            min_limb_radius: 3.0,
            shoulder_head_weight: 0.2,
            hand_torso_weight: 0.15,
            hand_torso_radius_scale: 0.9,
            grab_threshold: 18.0,
            throw_window: 0.09,
            tracker_blend: 0.5,
            linear_fraction: 0.6,
            max_linear_throw_per_height: 3.0,
            max_angular_throw: 12.0,
            max_point_throw_per_height: 4.5,
            sanitize_speed_per_height: 3.5,
            sleep_speed: 8.0,
            sleep_angular_speed: 2.4,
            ground_stable_speed: 120.0,
            calm_frames: 14,
            settling_damping: 14.0, // ~0.89 per sub-step at 120 Hz
            contact_tolerance_ratio: 0.2,
            min_contact_tolerance: 2.0,
            assist_duration: 0.56,
            assist_idle_delay: 0.6,
            assist_cooldown: 0.9,
            assist_gain: 0.35,
            assist_side_margin: 20.0,
            upright_torso_tolerance: 0.06,
            upright_lean_ratio: 0.7,
            upright_head_ratio: 0.6,
            spawn_lift: 0.12,
            event_capacity: 256,
        }
    }
}

impl SimulationConfig {
    /// Sets the sub-step length
    pub fn with_fixed_step(mut self, fixed_step: f32) -> Self {
        self.fixed_step = fixed_step;
        self
    }

    /// Sets the sub-step cap per frame
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Sets the base solver iteration count
    pub fn with_solver_iterations(mut self, iterations: u32) -> Self {
        self.solver_iterations = iterations;
        self
    }

    /// Sets the air damping rate
    pub fn with_air_damping(mut self, air_damping: f32) -> Self {
        self.air_damping = air_damping;
        self
    }

    /// Sets the wall material
    pub fn with_wall(mut self, wall: WallMaterial) -> Self {
        self.wall = wall;
        self
    }

    /// Sets the stand assist duration
    pub fn with_assist_duration(mut self, duration: f32) -> Self {
        self.assist_duration = duration;
        self
    }

    /// Sets the grab threshold
    pub fn with_grab_threshold(mut self, threshold: f32) -> Self {
        self.grab_threshold = threshold;
        self
    }

    /// Rejects values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("fixed_step", self.fixed_step),
            ("max_frame_time", self.max_frame_time),
            ("min_gravity", self.min_gravity),
            ("max_speed_per_height", self.max_speed_per_height),
            ("correction_cap_per_height", self.correction_cap_per_height),
            ("max_hinge_correction", self.max_hinge_correction),
            ("max_impact_speed_per_height", self.max_impact_speed_per_height),
            ("grab_threshold", self.grab_threshold),
            ("throw_window", self.throw_window),
            ("sanitize_speed_per_height", self.sanitize_speed_per_height),
            ("assist_duration", self.assist_duration),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}", name, value
                )));
            }
        }

        let unit = [
            ("base_stiffness_scale", self.base_stiffness_scale),
            ("post_release_stiffness_scale", self.post_release_stiffness_scale),
            ("assist_stiffness_scale", self.assist_stiffness_scale),
            ("wall.restitution", self.wall.restitution),
            ("wall.friction", self.wall.friction),
            ("floor_vertical_damping", self.floor_vertical_damping),
            ("contact_endpoint_share", self.contact_endpoint_share),
            ("shoulder_head_weight", self.shoulder_head_weight),
            ("hand_torso_weight", self.hand_torso_weight),
            ("tracker_blend", self.tracker_blend),
            ("linear_fraction", self.linear_fraction),
            ("assist_gain", self.assist_gain),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must lie in [0, 1], got {}", name, value
                )));
            }
        }

        let non_negative = [
            ("gravity_per_height", self.gravity_per_height),
            ("air_damping", self.air_damping),
            ("quadratic_drag", self.quadratic_drag),
            ("settling_damping", self.settling_damping),
            ("rotation_damping", self.rotation_damping),
            ("rotation_cap", self.rotation_cap),
            ("assist_idle_delay", self.assist_idle_delay),
            ("assist_cooldown", self.assist_cooldown),
            ("sleep_speed", self.sleep_speed),
            ("sleep_angular_speed", self.sleep_angular_speed),
            ("spawn_lift", self.spawn_lift),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be non-negative and finite, got {}", name, value
                )));
            }
        }

        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidParameter("max_substeps must be at least 1".into()));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidParameter("solver_iterations must be at least 1".into()));
        }
        if self.event_capacity == 0 {
            return Err(PhysicsError::InvalidParameter("event_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
