// Character animation: the presentation adapter and a parameter-driven clip player

use std::collections::HashMap;

use super::state::{Facing, LocomotionSnapshot};

/// Animator parameter names written by the presentation adapter
pub mod params {
    pub const IS_WALKING: &str = "IsWalking";
    pub const IS_GROUNDED: &str = "IsGrounded";
    pub const ON_WALL: &str = "OnWall";
    pub const IS_WALL_SLIDING: &str = "IsWallSliding";
    pub const IS_ROLLING: &str = "IsRolling";
    pub const IS_DASHING: &str = "IsDashing";
    pub const IS_ATTACKING: &str = "IsAttacking";
    pub const Y_VELOCITY: &str = "YVelocity";
}

/// Clip names in the standard set
pub mod clips {
    pub const IDLE: &str = "idle";
    pub const WALK: &str = "walk";
    pub const RISE: &str = "rise";
    pub const FALL: &str = "fall";
    pub const WALL_SLIDE: &str = "wall_slide";
    pub const ROLL: &str = "roll";
    pub const ATTACK: &str = "attack";
    pub const DASH: &str = "dash";
}

/// Anything that accepts named animator parameters
pub trait AnimatorSink {
    fn set_bool(&mut self, name: &'static str, value: bool);
    fn set_float(&mut self, name: &'static str, value: f32);

    /// Sprite orientation. Sinks that do not draw can ignore it.
    fn set_facing(&mut self, _facing: Facing) {}
}

/// Forwards a locomotion snapshot to an animator. Holds no state of its own.
pub struct PresentationAdapter;

impl PresentationAdapter {
    pub fn sync<S: AnimatorSink + ?Sized>(snapshot: &LocomotionSnapshot, sink: &mut S) {
        sink.set_bool(params::IS_WALKING, snapshot.is_walking);
        sink.set_bool(params::IS_GROUNDED, snapshot.is_grounded);
        sink.set_bool(params::ON_WALL, snapshot.on_wall);
        sink.set_bool(params::IS_WALL_SLIDING, snapshot.is_wall_sliding);
        sink.set_bool(params::IS_ROLLING, snapshot.is_rolling);
        sink.set_bool(params::IS_DASHING, snapshot.is_dashing);
        sink.set_bool(params::IS_ATTACKING, snapshot.is_attacking);
        sink.set_float(params::Y_VELOCITY, snapshot.vertical_speed);
        sink.set_facing(snapshot.facing);
    }
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &str, frame_count: usize, fps: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            frame_count: frame_count.max(1),
            frame_duration: 1.0 / fps,
            looping,
        }
    }

    pub fn looping(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, true)
    }

    /// Plays once and reports [`AnimationEvent::Finished`]
    pub fn one_shot(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, false)
    }

    pub fn total_duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }
}

/// Raised by the player while it advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A one-shot clip reached its last frame
    Finished { clip: String },
}

/// Plays clips for one character
///
/// Once any parameter has been set, the player picks its clip from the
/// parameter table on every update; until then `play` drives it directly.
#[derive(Debug)]
pub struct AnimationPlayer {
    animations: HashMap<String, AnimationClip>,
    bools: HashMap<&'static str, bool>,
    floats: HashMap<&'static str, f32>,
    parameter_driven: bool,
    current_animation: String,
    current_frame: usize,
    frame_timer: f32,
    playing: bool,
    flip_horizontal: bool,
    events: Vec<AnimationEvent>,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
            bools: HashMap::new(),
            floats: HashMap::new(),
            parameter_driven: false,
            current_animation: String::new(),
            current_frame: 0,
            frame_timer: 0.0,
            playing: true,
            flip_horizontal: false,
            events: Vec::new(),
        }
    }

    /// Player with the locomotion clip set, starting on idle
    pub fn with_standard_animations() -> Self {
        let mut player = Self::new();

        player.add_animation(AnimationClip::looping(clips::IDLE, 8, 10.0));
        player.add_animation(AnimationClip::looping(clips::WALK, 8, 12.0));
        player.add_animation(AnimationClip::looping(clips::RISE, 4, 10.0));
        player.add_animation(AnimationClip::looping(clips::FALL, 4, 10.0));
        player.add_animation(AnimationClip::looping(clips::WALL_SLIDE, 4, 8.0));
        player.add_animation(AnimationClip::looping(clips::DASH, 4, 20.0));
        // 0.4s and 0.3s: these two decide how long a roll and an attack last
        player.add_animation(AnimationClip::one_shot(clips::ROLL, 6, 15.0));
        player.add_animation(AnimationClip::one_shot(clips::ATTACK, 6, 20.0));

        player.play(clips::IDLE);

        player
    }

    pub fn add_animation(&mut self, clip: AnimationClip) {
        self.animations.insert(clip.name.clone(), clip);
    }

    /// Switch clips. Re-requesting a finished one-shot restarts it.
    pub fn play(&mut self, name: &str) {
        if self.current_animation != name || self.is_finished() {
            self.current_animation = name.to_string();
            self.current_frame = 0;
            self.frame_timer = 0.0;
            self.playing = true;
        }
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    pub fn bool_param(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn float_param(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    /// Clip the current parameters call for
    pub fn select_clip(&self) -> &'static str {
        if self.bool_param(params::IS_DASHING) {
            clips::DASH
        } else if self.bool_param(params::IS_ROLLING) {
            clips::ROLL
        } else if self.bool_param(params::IS_ATTACKING) {
            clips::ATTACK
        } else if self.bool_param(params::IS_WALL_SLIDING) {
            clips::WALL_SLIDE
        } else if !self.bool_param(params::IS_GROUNDED) {
            if self.float_param(params::Y_VELOCITY) > 0.0 {
                clips::RISE
            } else {
                clips::FALL
            }
        } else if self.bool_param(params::IS_WALKING) {
            clips::WALK
        } else {
            clips::IDLE
        }
    }

    /// Advance playback by `dt`
    pub fn update(&mut self, dt: f32) {
        if self.parameter_driven {
            let clip = self.select_clip();
            self.play(clip);
        }

        if !self.playing {
            return;
        }

        let Some(clip) = self.animations.get(&self.current_animation) else {
            return;
        };

        self.frame_timer += dt;

        while self.frame_timer >= clip.frame_duration {
            self.frame_timer -= clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    // Hold the last frame
                    self.current_frame = clip.frame_count - 1;
                    self.frame_timer = 0.0;
                    self.playing = false;
                    log::trace!("Clip '{}' finished", clip.name);
                    self.events.push(AnimationEvent::Finished {
                        clip: clip.name.clone(),
                    });
                    break;
                }
            }
        }
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn current_animation(&self) -> &str {
        &self.current_animation
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True once a one-shot clip has reached its last frame
    pub fn is_finished(&self) -> bool {
        match self.animations.get(&self.current_animation) {
            Some(clip) => {
                !clip.looping && self.current_frame + 1 >= clip.frame_count && !self.playing
            }
            None => true,
        }
    }
}

impl AnimatorSink for AnimationPlayer {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.parameter_driven = true;
        self.bools.insert(name, value);
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.parameter_driven = true;
        self.floats.insert(name, value);
    }

    fn set_facing(&mut self, facing: Facing) {
        self.set_flip_horizontal(facing == Facing::Left);
    }
}
