// Step-driven timers
//
// Nothing here reads a clock. Every timer advances only when the owning
// state machine ticks it with the fixed step, so a paused simulation
// pauses every pending action with it.

use crate::core::math::TIME_EPSILON;

/// Counts fixed-step time up to a duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    duration: f32,
    elapsed: f32,
    /// Skip the next tick
    deferred: bool,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            deferred: false,
        }
    }

    /// A countdown armed between steps. The step that follows still
    /// integrates the motion it started, so that step's tick is not counted.
    pub fn from_next_step(duration: f32) -> Self {
        Self {
            deferred: true,
            ..Self::new(duration)
        }
    }

    /// Advance by `dt`; returns true once the duration has been reached
    pub fn tick(&mut self, dt: f32) -> bool {
        if std::mem::take(&mut self.deferred) {
            return self.is_finished();
        }
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.duration
    }
}

/// Identifies one scheduling of a [`ScheduledAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u32);

#[derive(Debug, Clone, Copy)]
struct Pending<A> {
    action: A,
    countdown: Countdown,
    token: TimerToken,
}

/// A single-slot delayed action with cancellation
///
/// Scheduling replaces whatever was pending. Cancelling only succeeds while
/// the token's own scheduling is still pending, so a stale handle can never
/// cancel a newer action.
#[derive(Debug, Clone)]
pub struct ScheduledAction<A> {
    pending: Option<Pending<A>>,
    next_token: u32,
}

impl<A> Default for ScheduledAction<A> {
    fn default() -> Self {
        Self {
            pending: None,
            next_token: 0,
        }
    }
}

impl<A: Copy> ScheduledAction<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` after `delay` seconds of ticks, counted from the next step
    pub fn schedule(&mut self, action: A, delay: f32) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.pending = Some(Pending {
            action,
            countdown: Countdown::from_next_step(delay),
            token,
        });
        token
    }

    /// Drop the pending action if it is the one `token` refers to
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance the pending action; returns it on the tick it fires
    pub fn tick(&mut self, dt: f32) -> Option<A> {
        let pending = self.pending.as_mut()?;
        if pending.countdown.tick(dt) {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }
}
