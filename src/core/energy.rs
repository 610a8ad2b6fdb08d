use crate::bodies::Point;

/// Diagnostic energy readout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Energy {
    /// Sum of 1/2 m |v|^2 with v in px/s
    pub kinetic: f32,

    /// Sum of m g h with h the height above the floor
    pub potential: f32,
}

impl Energy {
    /// Measures the energy of `points` given gravity, floor height and sub-step length
    pub fn measure(points: &[Point], gravity: f32, floor_y: f32, step: f32) -> Self {
        let inv_step = if step > 0.0 { 1.0 / step } else { 0.0 };
        let mut energy = Energy::default();
        for point in points {
            let speed_sq = (point.velocity() * inv_step).length_squared();
            energy.kinetic += 0.5 * point.mass() * speed_sq;
            energy.potential += point.mass() * gravity * (floor_y - point.position.y).max(0.0);
        }
        energy
    }

    /// Kinetic plus potential energy
    #[inline]
    pub fn total(&self) -> f32 {
        self.kinetic + self.potential
    }
}
