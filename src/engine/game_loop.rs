/// Game loop timing and control system
///
/// Implements a fixed timestep loop. Locomotion and physics advance in
/// steps of exactly `FIXED_TIMESTEP`; the host feeds in however much real
/// (or simulated) time has passed and runs the returned number of steps.
use std::time::{Duration, Instant};

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
pub const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of physics steps per frame to prevent spiral of death
pub const MAX_PHYSICS_STEPS: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last wall-clock frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new wall-clock frame, returns the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Feed an explicit frame time, returns the number of fixed updates to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Drop the backlog instead of carrying it into the next frame
        if updates == MAX_PHYSICS_STEPS && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Fixed-step backlog of {:?} dropped after {} updates",
                self.accumulator,
                MAX_PHYSICS_STEPS
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of fixed updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated time covered by the executed fixed updates (in seconds)
    pub fn simulated_secs(&self) -> f32 {
        self.update_count as f32 * FIXED_TIMESTEP
    }

    /// Check if the loop is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
