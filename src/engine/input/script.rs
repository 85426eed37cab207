// Scripted intent timeline for headless runs and replays

use super::action::IntentEvent;
use std::collections::VecDeque;

/// A single intent scheduled for a fixed-step index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedIntent {
    pub step: u64,
    pub event: IntentEvent,
}

/// Ordered timeline of intents keyed by fixed-step index
///
/// Events scheduled for the same step keep their insertion order, so a
/// press followed by a release in one step is delivered in that order.
#[derive(Debug, Default)]
pub struct InputScript {
    queue: VecDeque<ScriptedIntent>,
}

impl InputScript {
    /// Create an empty script
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Builder-style `push`
    pub fn at(mut self, step: u64, event: IntentEvent) -> Self {
        self.push(step, event);
        self
    }

    /// Schedule an event for `step`
    pub fn push(&mut self, step: u64, event: IntentEvent) {
        // Insert after every entry at or before this step
        let pos = self
            .queue
            .iter()
            .position(|entry| entry.step > step)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, ScriptedIntent { step, event });
    }

    /// Remove and return every event due at or before `step`
    pub fn drain_due(&mut self, step: u64) -> Vec<IntentEvent> {
        let due = self
            .queue
            .iter()
            .take_while(|entry| entry.step <= step)
            .count();
        self.queue.drain(..due).map(|entry| entry.event).collect()
    }

    /// Step index of the last scheduled event
    pub fn last_step(&self) -> Option<u64> {
        self.queue.back().map(|entry| entry.step)
    }

    /// Clear all scheduled events
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Get the number of scheduled events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the script is exhausted
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
