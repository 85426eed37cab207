// Character system
//
// This module contains everything related to the playable character:
// - Locomotion tuning and its validation
// - The locomotion state machine and its step-driven timers
// - The presentation adapter and animation player
// - The character entity tying a controller to a physics body

pub mod animation;
pub mod character;
pub mod locomotion;
pub mod state;
pub mod stats;
pub mod timer;

// Re-export commonly used types
pub use animation::{
    AnimationClip, AnimationEvent, AnimationPlayer, AnimatorSink, PresentationAdapter,
};
pub use character::Character;
pub use locomotion::{LocomotionController, ProbeKind, ProbeRegion};
pub use state::{DashPhase, Facing, LocomotionSnapshot, LocomotionState, MotionOwner, WallState};
pub use stats::{ConfigError, LocomotionConfig, ProbeConfig, BASE_CONFIG};
pub use timer::{Countdown, ScheduledAction, TimerToken};
