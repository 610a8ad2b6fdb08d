/// Converts variable frame deltas into a whole number of fixed sub-steps.
///
/// Time left over after the last whole sub-step is carried to the next frame.
/// When the per-frame cap is hit the remainder is dropped, so a long pause
/// never turns into a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    fixed_step: f32,
    max_frame_time: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStepScheduler {
    // Absorbs rounding so a frame of exactly one step yields one step
    const TOLERANCE: f32 = 1.0e-6;

    /// Creates a new scheduler
    pub fn new(fixed_step: f32, max_frame_time: f32, max_substeps: u32) -> Self {
        Self {
            fixed_step,
            max_frame_time,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Feeds a frame delta and returns how many sub-steps to run
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if !frame_time.is_finite() || frame_time <= 0.0 {
            return 0;
        }

        self.accumulator += frame_time.min(self.max_frame_time);

        let mut steps = 0;
        while self.accumulator + Self::TOLERANCE >= self.fixed_step {
            if steps == self.max_substeps {
                self.accumulator = 0.0;
                break;
            }
            self.accumulator = (self.accumulator - self.fixed_step).max(0.0);
            steps += 1;
        }
        steps
    }

    /// Drops any carried time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Time carried over to the next frame
    pub fn get_accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn get_fixed_step(&self) -> f32 {
        self.fixed_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fixed_step_yields_one_substep() {
        let mut scheduler = FixedStepScheduler::new(1.0 / 120.0, 0.05, 8);
        for _ in 0..100 {
            assert_eq!(scheduler.advance(1.0 / 120.0), 1);
        }
    }

    #[test]
    fn partial_steps_accumulate() {
        let mut scheduler = FixedStepScheduler::new(0.01, 0.05, 8);
        assert_eq!(scheduler.advance(0.004), 0);
        assert_eq!(scheduler.advance(0.004), 0);
        assert_eq!(scheduler.advance(0.004), 1);
        assert!(scheduler.get_accumulator() < 0.0021);
    }

    #[test]
    fn long_frames_are_clamped_and_capped() {
        let mut scheduler = FixedStepScheduler::new(1.0 / 120.0, 0.05, 4);
        assert_eq!(scheduler.advance(5.0), 4);
        assert_eq!(scheduler.get_accumulator(), 0.0);
    }

    #[test]
    fn invalid_frames_are_ignored() {
        let mut scheduler = FixedStepScheduler::new(1.0 / 120.0, 0.05, 8);
        assert_eq!(scheduler.advance(f32::NAN), 0);
        assert_eq!(scheduler.advance(-1.0), 0);
        assert_eq!(scheduler.advance(f32::INFINITY), 0);
        assert_eq!(scheduler.get_accumulator(), 0.0);
    }
}
