use std::collections::VecDeque;

use crate::math::Vector2;

// Shortest span between samples that still gives a usable estimate
const MIN_ELAPSED: f64 = 1.0e-3;

/// Estimates pointer velocity from a short history of samples.
///
/// Only samples inside the window ending at the query time are used, and the
/// estimate is the displacement between the oldest and newest of them, which
/// smooths out jitter between individual pointer events.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, Vector2)>,
    window: f64,
}

impl VelocityTracker {
    /// Creates a tracker keeping `window` seconds of history
    pub fn new(window: f32) -> Self {
        Self {
            samples: VecDeque::with_capacity(16),
            window: f64::from(window.max(0.0)),
        }
    }

    /// Records a pointer position at simulation time `time`
    pub fn record(&mut self, time: f64, position: Vector2) {
        if !position.is_finite() {
            return;
        }
        self.samples.push_back((time, position));
        self.trim(time);
    }

    /// Velocity in px/s over the window ending at `now`, if there is enough data
    pub fn estimate(&self, now: f64) -> Option<Vector2> {
        let start = now - self.window;
        let mut recent = self.samples.iter().filter(|(t, _)| *t >= start);
        let (t0, p0) = *recent.next()?;
        let (t1, p1) = *recent.last()?;
        let elapsed = t1 - t0;
        if elapsed < MIN_ELAPSED {
            return None;
        }
        Some((p1 - p0) / elapsed as f32)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn trim(&mut self, now: f64) {
        let start = now - self.window;
        while let Some(&(t, _)) = self.samples.front() {
            if t >= start {
                break;
            }
            self.samples.pop_front();
        }
    }
}
