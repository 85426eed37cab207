// Locomotion tuning - fixed at construction for the character's lifetime

use glam::Vec2;

use crate::engine::physics::LayerMask;

/// Placement of one sensor probe relative to the character's origin
///
/// `offset.x` is given for a right-facing character and mirrored when the
/// character faces left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    pub offset: Vec2,
    /// Full width and height of the probe box
    pub size: Vec2,
    pub mask: LayerMask,
}

/// Movement tuning for a character
#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionConfig {
    // Walk
    /// Horizontal speed at full move-axis deflection (units/second)
    pub walk_speed: f32,

    // Jump
    /// Vertical velocity set by a jump press
    pub jump_power: f32,
    /// Jump press/release events allowed per ground contact
    pub max_jump_charges: u8,

    // Wall
    /// Maximum downward speed while sliding down a wall
    pub wall_slide_speed: f32,
    /// Velocity of a wall-jump, x pointing away from the wall
    pub wall_jump_power: Vec2,
    /// How long a wall-jump owns horizontal velocity (seconds)
    pub wall_jump_duration: f32,

    // Roll
    pub roll_speed: f32,

    // Dash
    pub dash_power: f32,
    /// Length of the dash itself (seconds)
    pub dash_duration: f32,
    /// Wait after a dash ends before the next one is allowed (seconds)
    pub dash_cooldown: f32,

    // Sensors
    pub ground_probe: ProbeConfig,
    pub wall_probe: ProbeConfig,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

/// Default tuning, sized for a 1x2 unit character in a -30 gravity world
pub const BASE_CONFIG: LocomotionConfig = LocomotionConfig {
    walk_speed: 8.0,

    jump_power: 16.0,
    max_jump_charges: 2,

    wall_slide_speed: 2.0,
    wall_jump_power: Vec2::new(8.0, 16.0),
    wall_jump_duration: 0.4,

    roll_speed: 10.0,

    dash_power: 24.0,
    dash_duration: 0.2,
    dash_cooldown: 1.0,

    ground_probe: ProbeConfig {
        offset: Vec2::new(0.0, -1.0),
        size: Vec2::new(0.8, 0.1),
        mask: LayerMask::GROUND,
    },
    wall_probe: ProbeConfig {
        offset: Vec2::new(0.55, 0.0),
        size: Vec2::new(0.1, 1.6),
        mask: LayerMask::WALL,
    },

    width: 1.0,
    height: 2.0,
};

impl Default for LocomotionConfig {
    fn default() -> Self {
        BASE_CONFIG
    }
}

/// Rejected locomotion configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidScalar { field: &'static str, value: f32 },

    #[error("max_jump_charges must be at least 1")]
    NoJumpCharges,

    #[error("{probe} probe must have a positive size, got {width}x{height}")]
    EmptyProbe {
        probe: &'static str,
        width: f32,
        height: f32,
    },

    #[error("{probe} probe has an empty layer mask")]
    EmptyMask { probe: &'static str },
}

impl LocomotionConfig {
    /// Get the standard tuning
    pub fn standard() -> Self {
        BASE_CONFIG
    }

    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn with_jump(mut self, jump_power: f32, max_jump_charges: u8) -> Self {
        self.jump_power = jump_power;
        self.max_jump_charges = max_jump_charges;
        self
    }

    pub fn with_wall_jump(mut self, power: Vec2, duration: f32) -> Self {
        self.wall_jump_power = power;
        self.wall_jump_duration = duration;
        self
    }

    pub fn with_dash(mut self, power: f32, duration: f32, cooldown: f32) -> Self {
        self.dash_power = power;
        self.dash_duration = duration;
        self.dash_cooldown = cooldown;
        self
    }

    /// Check the tuning is usable. Called by hosts before building a
    /// character; the controller itself trusts its config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("walk_speed", self.walk_speed),
            ("jump_power", self.jump_power),
            ("wall_slide_speed", self.wall_slide_speed),
            ("wall_jump_power.x", self.wall_jump_power.x),
            ("wall_jump_power.y", self.wall_jump_power.y),
            ("wall_jump_duration", self.wall_jump_duration),
            ("roll_speed", self.roll_speed),
            ("dash_power", self.dash_power),
            ("dash_duration", self.dash_duration),
            ("dash_cooldown", self.dash_cooldown),
            ("width", self.width),
            ("height", self.height),
        ];
        for (field, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScalar { field, value });
            }
        }

        if self.max_jump_charges == 0 {
            return Err(ConfigError::NoJumpCharges);
        }

        for (probe, config) in [("ground", &self.ground_probe), ("wall", &self.wall_probe)] {
            if !(config.size.x > 0.0 && config.size.y > 0.0) {
                return Err(ConfigError::EmptyProbe {
                    probe,
                    width: config.size.x,
                    height: config.size.y,
                });
            }
            if config.mask.is_empty() {
                return Err(ConfigError::EmptyMask { probe });
            }
        }

        Ok(())
    }
}
