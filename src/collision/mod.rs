mod bounds;
mod self_collision;
mod rotational;

pub use self::bounds::BoundsResolver;
pub use self::self_collision::{
    separate_point_capsule, separate_point_circle, SelfCollision, SelfCollisionShape,
};
pub use self::rotational::{segment_turn, RotationalDamper};
