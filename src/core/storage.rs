use crate::bodies::Point;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Dense, index-stable storage for the simulated points.
///
/// Indices handed out by `push` stay valid until the store is cleared, which
/// only happens on a rebuild.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates an empty store with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self { points: Vec::with_capacity(capacity) }
    }

    /// Adds a point and returns its index
    pub fn push(&mut self, point: Point) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Point> {
        self.points.get_mut(index)
    }

    /// Gets a point by index, returning an error if it does not exist
    pub fn get_point(&self, index: usize) -> Result<&Point> {
        let count = self.points.len();
        self.points
            .get(index)
            .ok_or(PhysicsError::PointOutOfBounds { index, count })
    }

    /// Gets a mutable point by index, returning an error if it does not exist
    pub fn get_point_mut(&mut self, index: usize) -> Result<&mut Point> {
        let count = self.points.len();
        self.points
            .get_mut(index)
            .ok_or(PhysicsError::PointOutOfBounds { index, count })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.points.iter_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Snapshot of all current positions
    pub fn positions(&self) -> Vec<Vector2> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Sum of all masses
    pub fn total_mass(&self) -> f32 {
        self.points.iter().map(|p| p.mass()).sum()
    }

    /// Mass-weighted mean position
    pub fn center_of_mass(&self) -> Vector2 {
        let total = self.total_mass();
        if total <= 0.0 {
            return Vector2::zero();
        }
        let weighted = self
            .points
            .iter()
            .fold(Vector2::zero(), |acc, p| acc + p.position * p.mass());
        weighted / total
    }

    /// Mass-weighted mean per-step velocity
    pub fn center_of_mass_velocity(&self) -> Vector2 {
        let total = self.total_mass();
        if total <= 0.0 {
            return Vector2::zero();
        }
        let weighted = self
            .points
            .iter()
            .fold(Vector2::zero(), |acc, p| acc + p.velocity() * p.mass());
        weighted / total
    }

    /// Per-step velocity of the point at `index`
    pub fn velocity(&self, index: usize) -> Result<Vector2> {
        Ok(self.get_point(index)?.velocity())
    }

    /// Sets the per-step velocity of the point at `index`
    pub fn set_velocity(&mut self, index: usize, velocity: Vector2) -> Result<()> {
        self.get_point_mut(index)?.set_velocity(velocity);
        Ok(())
    }

    /// Removes the given fraction (0-1) of every point's velocity
    pub fn freeze_velocities(&mut self, strength: f32) {
        let keep = 1.0 - strength.clamp(0.0, 1.0);
        for point in &mut self.points {
            let velocity = point.velocity();
            point.set_velocity(velocity * keep);
        }
    }

    /// Returns true if every coordinate of every point is finite
    pub fn all_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }
}

impl std::ops::Index<usize> for PointStore {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl std::ops::IndexMut<usize> for PointStore {
    fn index_mut(&mut self, index: usize) -> &mut Point {
        &mut self.points[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn store() -> PointStore {
        let mut store = PointStore::new();
        store.push(Point::new(Vector2::new(0.0, 0.0), 1.0));
        store.push(Point::new(Vector2::new(10.0, 0.0), 3.0));
        store
    }

    #[test]
    fn center_of_mass_is_mass_weighted() {
        let store = store();
        assert_relative_eq!(store.total_mass(), 4.0);
        assert_relative_eq!(store.center_of_mass(), Vector2::new(7.5, 0.0));
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let store = store();
        assert_eq!(
            store.get_point(5).unwrap_err(),
            PhysicsError::PointOutOfBounds { index: 5, count: 2 }
        );
    }

    #[test]
    fn freeze_removes_velocity_fraction() {
        let mut store = store();
        store.set_velocity(0, Vector2::new(4.0, 2.0)).unwrap();
        assert_relative_eq!(store.center_of_mass_velocity(), Vector2::new(1.0, 0.5));
        store.freeze_velocities(0.5);
        assert_relative_eq!(store.velocity(0).unwrap(), Vector2::new(2.0, 1.0));
        store.freeze_velocities(1.0);
        assert!(store.velocity(0).unwrap().is_zero());
    }

    #[test]
    fn non_finite_points_are_detected() {
        let mut store = store();
        assert!(store.all_finite());
        store[1].position.x = f32::NAN;
        assert!(!store.all_finite());
    }
}
