// Locomotion state: facing, flags, latches and the per-action sub-states

use super::timer::Countdown;

/// Direction the character faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing implied by a move-axis reading, `None` when neutral
    pub fn from_axis(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Self::Right)
        } else if value < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Wall interaction sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WallState {
    #[default]
    Idle,
    /// Airborne and touching a wall; fall speed is capped
    Sliding,
    /// Launched off a wall; owns horizontal velocity until it expires
    WallJumping,
}

/// Dash sequence: active phase, then cooldown, then ready again
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DashPhase {
    #[default]
    Ready,
    Active {
        timer: Countdown,
        /// Gravity scale to put back when the dash ends
        restore_gravity: f32,
    },
    Cooldown {
        timer: Countdown,
    },
}

impl DashPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Which behaviour owns horizontal velocity this step, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionOwner {
    Dashing,
    Rolling,
    WallJumping,
    /// Walk input drives velocity and facing
    Normal,
}

/// All state owned by the locomotion controller
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionState {
    pub(crate) facing: Facing,
    pub(crate) horizontal_input: f32,
    pub(crate) is_walking: bool,
    pub(crate) is_grounded: bool,
    pub(crate) on_wall: bool,
    pub(crate) wall: WallState,
    /// Open while a slide is in progress and no wall-jump has used it;
    /// holds the direction the wall-jump will launch in
    pub(crate) wall_jump_window: Option<Facing>,
    pub(crate) jump_charges: u8,
    pub(crate) is_rolling: bool,
    pub(crate) can_roll: bool,
    pub(crate) dash: DashPhase,
    pub(crate) is_attacking: bool,
}

impl LocomotionState {
    /// Fresh state: facing right, flags clear, charges full, latches open
    pub fn new(max_jump_charges: u8) -> Self {
        Self {
            facing: Facing::Right,
            horizontal_input: 0.0,
            is_walking: false,
            is_grounded: false,
            on_wall: false,
            wall: WallState::Idle,
            wall_jump_window: None,
            jump_charges: max_jump_charges,
            is_rolling: false,
            can_roll: true,
            dash: DashPhase::Ready,
            is_attacking: false,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn horizontal_input(&self) -> f32 {
        self.horizontal_input
    }

    pub fn is_walking(&self) -> bool {
        self.is_walking
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn on_wall(&self) -> bool {
        self.on_wall
    }

    pub fn wall_state(&self) -> WallState {
        self.wall
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.wall == WallState::Sliding
    }

    pub fn is_wall_jumping(&self) -> bool {
        self.wall == WallState::WallJumping
    }

    pub fn wall_jump_window_open(&self) -> bool {
        self.wall_jump_window.is_some()
    }

    pub fn jump_charges(&self) -> u8 {
        self.jump_charges
    }

    pub fn is_rolling(&self) -> bool {
        self.is_rolling
    }

    pub fn can_roll(&self) -> bool {
        self.can_roll
    }

    pub fn dash_phase(&self) -> DashPhase {
        self.dash
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_active()
    }

    pub fn can_dash(&self) -> bool {
        self.dash.is_ready()
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Resolve the single behaviour that writes horizontal velocity
    pub fn motion_owner(&self) -> MotionOwner {
        if self.is_dashing() {
            MotionOwner::Dashing
        } else if self.is_rolling {
            MotionOwner::Rolling
        } else if self.is_wall_jumping() {
            MotionOwner::WallJumping
        } else {
            MotionOwner::Normal
        }
    }

    /// Read-only view for presentation
    pub fn snapshot(&self, vertical_speed: f32) -> LocomotionSnapshot {
        LocomotionSnapshot {
            is_walking: self.is_walking,
            is_grounded: self.is_grounded,
            on_wall: self.on_wall,
            is_wall_sliding: self.is_wall_sliding(),
            is_wall_jumping: self.is_wall_jumping(),
            is_rolling: self.is_rolling,
            is_dashing: self.is_dashing(),
            is_attacking: self.is_attacking,
            facing: self.facing,
            vertical_speed,
        }
    }
}

/// Flags and vertical speed polled by the presentation side once per step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionSnapshot {
    pub is_walking: bool,
    pub is_grounded: bool,
    pub on_wall: bool,
    pub is_wall_sliding: bool,
    pub is_wall_jumping: bool,
    pub is_rolling: bool,
    pub is_dashing: bool,
    pub is_attacking: bool,
    pub facing: Facing,
    pub vertical_speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = LocomotionState::new(2);
        assert_eq!(state.facing(), Facing::Right);
        assert_eq!(state.jump_charges(), 2);
        assert!(state.can_roll());
        assert!(state.can_dash());
        assert!(!state.is_grounded());
        assert!(!state.wall_jump_window_open());
        assert_eq!(state.motion_owner(), MotionOwner::Normal);
    }

    #[test]
    fn test_facing_helpers() {
        assert_eq!(Facing::Right.sign(), 1.0);
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Left.opposite(), Facing::Right);
        assert_eq!(Facing::from_axis(0.2), Some(Facing::Right));
        assert_eq!(Facing::from_axis(-1.0), Some(Facing::Left));
        assert_eq!(Facing::from_axis(0.0), None);
    }

    #[test]
    fn test_motion_owner_priority() {
        let mut state = LocomotionState::new(2);
        state.wall = WallState::WallJumping;
        assert_eq!(state.motion_owner(), MotionOwner::WallJumping);

        state.is_rolling = true;
        assert_eq!(state.motion_owner(), MotionOwner::Rolling);

        state.dash = DashPhase::Active {
            timer: Countdown::new(0.2),
            restore_gravity: 1.0,
        };
        assert_eq!(state.motion_owner(), MotionOwner::Dashing);
    }

    #[test]
    fn test_dash_cooldown_is_neither_active_nor_ready() {
        let mut state = LocomotionState::new(2);
        state.dash = DashPhase::Cooldown {
            timer: Countdown::new(1.0),
        };
        assert!(!state.is_dashing());
        assert!(!state.can_dash());
    }

    #[test]
    fn test_snapshot_reflects_flags() {
        let mut state = LocomotionState::new(2);
        state.is_grounded = true;
        state.is_attacking = true;
        state.wall = WallState::Sliding;

        let snapshot = state.snapshot(-3.0);
        assert!(snapshot.is_grounded);
        assert!(snapshot.is_attacking);
        assert!(snapshot.is_wall_sliding);
        assert!(!snapshot.is_wall_jumping);
        assert_eq!(snapshot.vertical_speed, -3.0);
    }
}
