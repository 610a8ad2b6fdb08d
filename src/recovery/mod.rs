//! Rest detection and the stand assist.
//!
//! The figure moves through `Active`, `Settling` and `Asleep` as it comes to
//! rest on the floor. Independently of that, a fallen figure that has been
//! left alone long enough is blended back onto its feet by the stand assist.

pub mod assist;
pub mod posture;

pub use self::posture::{contact_tolerance, floor_contacts, is_calm, is_ground_stable, is_sleeping, is_upright};

use tracing::debug;

use crate::core::{EventQueue, Room, SimulationConfig, SimulationEvent};
use crate::math::ease_out_cubic;
use crate::skeleton::Skeleton;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How much the figure is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RestState {
    /// Normal simulation
    #[default]
    Active,

    /// On the floor and slowing down; extra damping applies
    Settling,

    /// At rest; velocities are zeroed every sub-step
    Asleep,
}

/// Progress of the stand assist
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RecoveryPhase {
    /// No assist running
    #[default]
    Idle,

    /// Blending toward the bind pose
    StandAssist {
        /// Simulation time the assist started
        started: f64,

        /// Linear progress through the assist duration (0-1)
        progress: f32,
    },

    /// An assist finished recently; no new one may start before `until`
    Cooldown { until: f64 },
}

/// What the state machine needs to know about the sub-step being evaluated
#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    /// Simulation time at the start of the sub-step
    pub time: f64,

    /// Sub-step length
    pub dt: f32,

    /// True while dragging or in the relaxation window after a release
    pub agitated: bool,
}

/// Tracks rest and runs the stand assist
#[derive(Debug, Clone, Default)]
pub struct RecoveryStateMachine {
    rest: RestState,
    phase: RecoveryPhase,
    calm_frames: u32,
    last_user_action: f64,
}

impl RecoveryStateMachine {
    /// Creates a machine that treats `time` as the last user action
    pub fn new(time: f64) -> Self {
        Self {
            last_user_action: time,
            ..Self::default()
        }
    }

    pub fn rest_state(&self) -> RestState {
        self.rest
    }

    pub fn phase(&self) -> RecoveryPhase {
        self.phase
    }

    /// True while the stand assist is blending
    #[inline]
    pub fn is_assisting(&self) -> bool {
        matches!(self.phase, RecoveryPhase::StandAssist { .. })
    }

    /// Forgets all state, as after a rebuild
    pub fn reset(&mut self, time: f64) {
        *self = Self::new(time);
    }

    /// Restarts the idle timer, cancels a running assist and wakes the figure
    pub fn notify_user_action(&mut self, time: f64, events: &mut EventQueue) {
        self.last_user_action = time;
        self.cancel_assist(events);
        self.wake(events);
    }

    /// Stops a running assist where it is
    pub fn cancel_assist(&mut self, events: &mut EventQueue) {
        if self.is_assisting() {
            debug!("stand assist cancelled");
            self.phase = RecoveryPhase::Idle;
            events.push(SimulationEvent::StandAssistCancelled);
        }
    }

    /// Runs once per sub-step after the collision passes.
    ///
    /// Updates the rest state, damps or freezes a resting figure, and starts,
    /// advances or finishes the stand assist.
    pub fn evaluate(
        &mut self,
        skeleton: &mut Skeleton,
        room: &Room,
        config: &SimulationConfig,
        step: StepInfo,
        events: &mut EventQueue,
    ) {
        if let RecoveryPhase::Cooldown { until } = self.phase {
            if step.time >= until {
                self.phase = RecoveryPhase::Idle;
            }
        }

        if step.agitated {
            self.cancel_assist(events);
            self.wake(events);
            return;
        }

        if let RecoveryPhase::StandAssist { started, .. } = self.phase {
            self.run_assist(skeleton, room, config, step.time, started, events);
            return;
        }

        self.update_rest(skeleton, room, config, step.dt, events);

        match self.rest {
            RestState::Active => {}
            RestState::Settling => {
                let keep = (-config.settling_damping * step.dt).exp();
                skeleton.points.freeze_velocities(1.0 - keep);
            }
            RestState::Asleep => {
                skeleton.points.freeze_velocities(1.0);
                if self.may_start_assist(skeleton, room, config, step.time) {
                    self.start_assist(step.time, events);
                }
            }
        }
    }

    fn update_rest(
        &mut self,
        skeleton: &Skeleton,
        room: &Room,
        config: &SimulationConfig,
        dt: f32,
        events: &mut EventQueue,
    ) {
        let points = skeleton.points.as_slice();
        let tolerance = contact_tolerance(&skeleton.metrics, config);
        let stable = is_ground_stable(
            points,
            &skeleton.anchors,
            room.floor_y(),
            tolerance,
            config.ground_stable_speed * dt,
        );
        let calm = is_calm(
            points,
            &skeleton.distances,
            config.sleep_speed * dt,
            config.sleep_angular_speed * dt,
        );

        if !stable {
            self.wake(events);
            return;
        }
        if !calm {
            self.wake(events);
            self.rest = RestState::Settling;
            return;
        }

        self.calm_frames = self.calm_frames.saturating_add(1);
        if self.calm_frames > config.calm_frames {
            if self.rest != RestState::Asleep {
                debug!(calm_frames = self.calm_frames, "fell asleep");
                events.push(SimulationEvent::FellAsleep);
            }
            self.rest = RestState::Asleep;
        } else {
            self.rest = RestState::Settling;
        }
    }

    fn wake(&mut self, events: &mut EventQueue) {
        if self.rest == RestState::Asleep {
            debug!("woke");
            events.push(SimulationEvent::Woke);
        }
        self.rest = RestState::Active;
        self.calm_frames = 0;
    }

    fn may_start_assist(&self, skeleton: &Skeleton, room: &Room, config: &SimulationConfig, time: f64) -> bool {
        if self.phase != RecoveryPhase::Idle {
            return false;
        }
        if time - self.last_user_action < f64::from(config.assist_idle_delay) {
            return false;
        }
        let tolerance = contact_tolerance(&skeleton.metrics, config);
        let touching = floor_contacts(skeleton.points.as_slice(), &skeleton.anchors, room.floor_y(), tolerance) > 0;
        touching && !is_upright(skeleton, config)
    }

    fn start_assist(&mut self, time: f64, events: &mut EventQueue) {
        debug!(time, "stand assist started");
        self.phase = RecoveryPhase::StandAssist { started: time, progress: 0.0 };
        self.rest = RestState::Active;
        self.calm_frames = 0;
        events.push(SimulationEvent::StandAssistStarted);
    }

    fn run_assist(
        &mut self,
        skeleton: &mut Skeleton,
        room: &Room,
        config: &SimulationConfig,
        time: f64,
        started: f64,
        events: &mut EventQueue,
    ) {
        let bounds = room.bounds();
        let duration = f64::from(config.assist_duration.max(f32::EPSILON));
        let progress = ((time - started) / duration).clamp(0.0, 1.0) as f32;

        if progress < 1.0 {
            let amount = ease_out_cubic(progress) * config.assist_gain;
            assist::blend_toward_bind_pose(skeleton, &bounds, config.assist_side_margin, amount);
            self.phase = RecoveryPhase::StandAssist { started, progress };
            return;
        }

        assist::snap_to_bind_pose(skeleton, &bounds, config.assist_side_margin);
        let upright = is_upright(skeleton, config);
        debug!(upright, "stand assist finished");
        self.phase = RecoveryPhase::Cooldown {
            until: time + f64::from(config.assist_cooldown),
        };
        self.calm_frames = 0;
        events.push(SimulationEvent::StandAssistFinished { upright });
    }
}
