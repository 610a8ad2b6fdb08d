use crate::math::Vector2;

/// Lightest mass a point may carry
pub const MIN_MASS: f32 = 0.1;

/// Heaviest mass a point may carry
pub const MAX_MASS: f32 = 3.0;

/// A simulated particle.
///
/// Velocity is implicit: it is the displacement `position - previous` over
/// one fixed sub-step. Anything that clamps `position` without touching
/// `previous` therefore also changes the velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Current position
    pub position: Vector2,

    /// Position one sub-step ago
    pub previous: Vector2,

    /// Accumulated external force, consumed by the next integration
    pub force: Vector2,

    /// Sub-steps left during which the point counts as touching a wall
    pub contact_timer: u8,

    /// Wall normal of the most recent contact
    pub contact_normal: Vector2,

    mass: f32,
    inverse_mass: f32,
}

impl Point {
    /// Creates a point at rest; mass is clamped into [MIN_MASS, MAX_MASS]
    pub fn new(position: Vector2, mass: f32) -> Self {
        let mass = sanitize_mass(mass);
        Self {
            position,
            previous: position,
            force: Vector2::zero(),
            contact_timer: 0,
            contact_normal: Vector2::zero(),
            mass,
            inverse_mass: 1.0 / mass,
        }
    }

    /// Returns the mass of the point
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Returns the inverse mass of the point
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Sets the mass, clamped into [MIN_MASS, MAX_MASS]
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = sanitize_mass(mass);
        self.inverse_mass = 1.0 / self.mass;
    }

    /// Displacement over the last sub-step
    #[inline]
    pub fn velocity(&self) -> Vector2 {
        self.position - self.previous
    }

    /// Rewrites `previous` so the implicit velocity becomes `velocity`
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.previous = self.position - velocity;
    }

    /// Moves the point and discards its velocity
    #[inline]
    pub fn teleport(&mut self, position: Vector2) {
        self.position = position;
        self.previous = position;
    }

    /// Adds a force to be applied on the next integration
    #[inline]
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Clears accumulated forces
    #[inline]
    pub fn clear_force(&mut self) {
        self.force = Vector2::zero();
    }

    /// Returns true if the point touched a wall recently
    #[inline]
    pub fn in_contact(&self) -> bool {
        self.contact_timer > 0
    }

    /// Records a wall contact lasting `frames` sub-steps
    #[inline]
    pub fn mark_contact(&mut self, normal: Vector2, frames: u8) {
        self.contact_timer = frames;
        self.contact_normal = normal;
    }

    /// Counts the contact timer down by one sub-step
    #[inline]
    pub fn decay_contact(&mut self) {
        self.contact_timer = self.contact_timer.saturating_sub(1);
    }

    /// Returns true if position and previous position are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.previous.is_finite()
    }
}

fn sanitize_mass(mass: f32) -> f32 {
    if mass.is_finite() {
        mass.clamp(MIN_MASS, MAX_MASS)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_is_clamped() {
        assert_eq!(Point::new(Vector2::zero(), 0.0).mass(), MIN_MASS);
        assert_eq!(Point::new(Vector2::zero(), 12.0).mass(), MAX_MASS);
        assert_eq!(Point::new(Vector2::zero(), f32::NAN).mass(), 1.0);
    }

    #[test]
    fn velocity_is_position_difference() {
        let mut point = Point::new(Vector2::new(10.0, 10.0), 1.0);
        point.set_velocity(Vector2::new(2.0, -1.0));
        assert_eq!(point.previous, Vector2::new(8.0, 11.0));
        assert_eq!(point.velocity(), Vector2::new(2.0, -1.0));

        point.teleport(Vector2::new(0.0, 0.0));
        assert!(point.velocity().is_zero());
    }

    #[test]
    fn contact_timer_counts_down() {
        let mut point = Point::new(Vector2::zero(), 1.0);
        point.mark_contact(Vector2::new(0.0, -1.0), 2);
        assert!(point.in_contact());
        point.decay_contact();
        point.decay_contact();
        assert!(!point.in_contact());
        point.decay_contact();
        assert_eq!(point.contact_timer, 0);
    }
}
