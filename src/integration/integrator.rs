use crate::bodies::Point;

/// Trait for numerical integration algorithms
pub trait Integrator: Send + Sync {
    /// Advances every free point by one sub-step of length `dt`
    fn integrate(&mut self, points: &mut [Point], dt: f32);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}
