mod builder;
pub mod body;
pub mod joints;

pub use self::builder::{BuiltGraph, SkeletonBuilder};

use tracing::debug;

use crate::constraints::{DistanceConstraint, HingeConstraint};
use crate::core::{PointStore, Room, SimulationConfig};
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Which half of the body a limb belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// -1 for the left side, +1 for the right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Point name for a part on this side, e.g. `knee_l`
    pub fn key(self, part: &str) -> String {
        match self {
            Side::Left => format!("{}_l", part),
            Side::Right => format!("{}_r", part),
        }
    }
}

/// Indices of a left/right pair of points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Pair {
    pub left: usize,
    pub right: usize,
}

impl Pair {
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        [self.left, self.right].into_iter()
    }
}

/// Named point indices kept after the build for rendering and recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Anchors {
    pub head: usize,
    pub neck: usize,
    pub torso_top: usize,
    pub torso_bottom: usize,
    pub shoulders: Pair,
    pub elbows: Pair,
    pub hands: Pair,
    pub hips: Pair,
    pub knees: Pair,
    pub feet: Pair,
}

impl Anchors {
    fn resolve(builder: &SkeletonBuilder) -> Result<Self> {
        let pair = |part: &str| -> Result<Pair> {
            Ok(Pair {
                left: builder.index_of(&Side::Left.key(part))?,
                right: builder.index_of(&Side::Right.key(part))?,
            })
        };
        Ok(Self {
            head: builder.index_of("head")?,
            neck: builder.index_of("neck")?,
            torso_top: builder.index_of("torso_top")?,
            torso_bottom: builder.index_of("torso_bottom")?,
            shoulders: pair("shoulder")?,
            elbows: pair("elbow")?,
            hands: pair("hand")?,
            hips: pair("hip")?,
            knees: pair("knee")?,
            feet: pair("foot")?,
        })
    }

    /// Points that count toward floor contact: feet, knees, hips and pelvis
    pub fn lower_body(&self) -> [usize; 7] {
        [
            self.feet.left,
            self.feet.right,
            self.knees.left,
            self.knees.right,
            self.hips.left,
            self.hips.right,
            self.torso_bottom,
        ]
    }
}

/// Body dimensions derived from the room height
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyMetrics {
    pub body_height: f32,
    pub head_radius: f32,
    pub neck_length: f32,
    pub torso_length: f32,
    pub shoulder_width: f32,
    pub hip_width: f32,
    pub upper_arm: f32,
    pub forearm: f32,
    pub upper_leg: f32,
    pub lower_leg: f32,

    /// Thickness of limbs for self-collision
    pub limb_radius: f32,

    /// Suggested stroke width for drawing
    pub line_width: f32,
}

impl BodyMetrics {
    pub fn for_room(room: &Room, config: &SimulationConfig) -> Self {
        let body_height = room.height * 0.55;
        let head_radius = (body_height * 0.08).round().max(14.0);
        let torso_length = body_height * 0.33;
        Self {
            body_height,
            head_radius,
            neck_length: head_radius * 0.8,
            torso_length,
            shoulder_width: head_radius * 2.4,
            hip_width: head_radius * 1.8,
            upper_arm: torso_length * 0.55,
            forearm: torso_length * 0.55,
            upper_leg: torso_length * 0.75,
            lower_leg: torso_length * 0.8,
            limb_radius: (head_radius * config.limb_radius_ratio).round().max(config.min_limb_radius),
            line_width: (room.height * 0.006).round().max(2.0),
        }
    }

    /// Vertical distance from the soles to the top of the head when standing
    pub fn standing_extent(&self) -> f32 {
        self.lower_leg + self.upper_leg + self.torso_length + self.neck_length + self.head_radius * 2.5
    }
}

/// The simulated figure: points, constraints, anchors and the bind pose
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub points: PointStore,
    pub distances: Vec<DistanceConstraint>,
    pub hinges: Vec<HingeConstraint>,
    pub anchors: Anchors,
    pub metrics: BodyMetrics,

    /// Point positions right after the build
    pub bind_pose: Vec<Vector2>,
}

impl Skeleton {
    /// Builds a standing figure centered in the room, feet slightly above the floor
    pub fn build_for_room(room: &Room, config: &SimulationConfig) -> Result<Self> {
        room.validate()?;

        let metrics = BodyMetrics::for_room(room, config);
        let bounds = room.bounds();
        let headroom = (bounds.height() - metrics.standing_extent()).max(0.0);
        let lift = (config.spawn_lift * room.height).min(headroom);
        let feet_y = bounds.bottom - lift;
        let pelvis_y = feet_y - metrics.upper_leg - metrics.lower_leg;

        let mut builder = SkeletonBuilder::new();
        body::add_torso(&mut builder, room.center_x(), pelvis_y, &metrics)?;
        body::add_neck(&mut builder, &metrics)?;
        body::add_head(&mut builder, &metrics)?;
        for side in Side::BOTH {
            body::add_arm(&mut builder, side, &metrics)?;
            body::add_leg(&mut builder, side, &metrics)?;
        }

        joints::add_spine(&mut builder)?;
        joints::add_neck_joint(&mut builder)?;
        for side in Side::BOTH {
            joints::add_shoulder(&mut builder, side)?;
            joints::add_elbow(&mut builder, side)?;
            joints::add_wrist(&mut builder, side)?;
            joints::add_hip(&mut builder, side)?;
            joints::add_knee(&mut builder, side)?;
            joints::add_ankle(&mut builder, side)?;
        }
        joints::add_clavicle(&mut builder)?;
        joints::add_pelvis(&mut builder)?;
        joints::add_trapezius(&mut builder)?;
        joints::add_soft_tissue(&mut builder)?;

        let anchors = Anchors::resolve(&builder)?;
        let graph = builder.finish();
        let bind_pose = graph.points.positions();

        debug!(
            points = graph.points.len(),
            distances = graph.distances.len(),
            hinges = graph.hinges.len(),
            head_radius = metrics.head_radius,
            "built skeleton"
        );

        Ok(Self {
            points: graph.points,
            distances: graph.distances,
            hinges: graph.hinges,
            anchors,
            metrics,
            bind_pose,
        })
    }

    /// Segments that are drawn and can be picked
    pub fn visible_segments(&self) -> impl Iterator<Item = &DistanceConstraint> {
        self.distances.iter().filter(|d| d.is_visible())
    }
}
