mod point;
mod material;

pub use self::point::{Point, MIN_MASS, MAX_MASS};
pub use self::material::WallMaterial;
pub use self::segment_flags::SegmentFlags;

/// Flags describing how a distance constraint takes part in rendering and damping
pub mod segment_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Per-segment behaviour flags
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct SegmentFlags: u8 {
            /// Segment is drawn and can be picked by the pointer
            const VISIBLE = 0x01;

            /// Segment takes part in rotational damping
            const ROTATION_DAMPED = 0x02;

            /// Structural brace that keeps the torso from shearing (never drawn)
            const SOFT = 0x04;
        }
    }

    impl Default for SegmentFlags {
        fn default() -> Self {
            SegmentFlags::VISIBLE | SegmentFlags::ROTATION_DAMPED
        }
    }
}
