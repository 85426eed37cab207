// Intent events delivered to the locomotion controller

/// A locomotion action requested by the player (or a script)
///
/// Device binding happens upstream; by the time an intent arrives here it is
/// already "move by this much" or "dash", never "key D went down".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Horizontal move axis in [-1, 1]
    Move(f32),
    Jump,
    WallJump,
    Roll,
    Dash,
    Attack,
}

/// Phase of an intent: the action fired, or the control was let go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    Performed,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentEvent {
    pub intent: Intent,
    pub phase: InputPhase,
}

impl IntentEvent {
    pub fn new(intent: Intent, phase: InputPhase) -> Self {
        Self { intent, phase }
    }

    /// A button press
    pub fn pressed(intent: Intent) -> Self {
        Self::new(intent, InputPhase::Performed)
    }

    /// A button release
    pub fn released(intent: Intent) -> Self {
        Self::new(intent, InputPhase::Canceled)
    }

    /// A move-axis change. Returning the stick to neutral cancels the move.
    pub fn move_axis(value: f32) -> Self {
        if value == 0.0 {
            Self::new(Intent::Move(0.0), InputPhase::Canceled)
        } else {
            Self::new(Intent::Move(value), InputPhase::Performed)
        }
    }

    /// Whether this intent is resolved the moment it arrives rather than
    /// sampled at the next fixed step
    pub fn is_edge_triggered(&self) -> bool {
        !matches!(self.intent, Intent::Move(_))
    }
}
