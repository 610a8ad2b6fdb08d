use std::collections::VecDeque;

use crate::math::Vector2;

/// Something the host may want to react to (sound, speech bubble, debug log)
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// The skeleton was (re)built, either on request or after a numerical fault
    Rebuilt {
        /// True if the rebuild was forced by non-finite coordinates
        recovered: bool,
    },

    /// A point was grabbed
    GrabStarted { index: usize },

    /// The grabbed point was let go
    Released {
        index: usize,

        /// Velocity used for the throw (px/s)
        velocity: Vector2,
    },

    /// The figure came to rest
    FellAsleep,

    /// The figure started moving again after resting
    Woke,

    /// The stand assist started blending
    StandAssistStarted,

    /// The stand assist was interrupted by the user
    StandAssistCancelled,

    /// The stand assist ran to completion
    StandAssistFinished { upright: bool },
}

/// A bounded FIFO of simulation events.
///
/// The host drains it; when it is full the oldest event is dropped.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<SimulationEvent>,
    capacity: usize,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Adds an event, evicting the oldest one if the queue is full
    pub fn push(&mut self, event: SimulationEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Removes and returns all queued events, oldest first
    pub fn drain(&mut self) -> Vec<SimulationEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(256)
    }
}
