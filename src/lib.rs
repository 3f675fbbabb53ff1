//! Crypt Flight - a side-scrolling cavern flier
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, game state machine)
//! - `renderer`: WebGPU rendering pipeline
//! - `highscore`: Persistent best-score storage
//! - `settings`: Player preferences
//! - `audio`: Procedural Web Audio sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscore;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscore::ScoreStore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Simulation tick rate in Hz
    pub const TICK_RATE: f32 = 120.0;

    /// Play field dimensions (units, y-up, origin bottom-left)
    pub const FIELD_WIDTH: f32 = 375.0;
    pub const FIELD_HEIGHT: f32 = 667.0;

    /// Downward gravity acceleration (units/s²)
    pub const GRAVITY_Y: f32 = -700.0;

    /// Player spawn point
    pub const PLAYER_X: f32 = FIELD_WIDTH / 6.0;
    pub const PLAYER_START_Y: f32 = FIELD_HEIGHT * 0.75;
    /// Player sprite half extents (for rendering)
    pub const PLAYER_HALF_W: f32 = 22.0;
    pub const PLAYER_HALF_H: f32 = 15.0;
    /// Collider radius, inset inside the sprite so transparent margins
    /// don't register contacts
    pub const PLAYER_RADIUS: f32 = 13.0;
    /// Vertical velocity set by a jump (prior velocity is zeroed first)
    pub const JUMP_IMPULSE: f32 = 60.0;
    /// Rotation tracks vertical velocity scaled by this factor
    pub const ROTATION_TRACK: f32 = 0.001;
    /// Rotation eases toward its target over this duration
    pub const ROTATION_EASE_SECS: f32 = 0.1;
    /// Idle animation frame duration
    pub const ANIM_FRAME_SECS: f32 = 0.2;

    /// Rock obstacle dimensions
    pub const ROCK_WIDTH: f32 = 60.0;
    pub const ROCK_HEIGHT: f32 = 400.0;
    /// Score gate width (full field height, invisible)
    pub const GATE_WIDTH: f32 = 32.0;

    /// Seconds between obstacle spawns while playing
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    pub const SPAWN_INTERVAL_TICKS: u64 = (SPAWN_INTERVAL_SECS * TICK_RATE) as u64;
    /// Obstacles cross their full travel distance in this many seconds
    pub const OBSTACLE_TRAVEL_SECS: f32 = 6.2;
    /// Leftward obstacle speed (units/s)
    pub const OBSTACLE_SPEED: f32 = (FIELD_WIDTH + 2.0 * ROCK_WIDTH) / OBSTACLE_TRAVEL_SECS;
    /// Random vertical placement range for the gap center
    pub const SPAWN_CENTER_MIN: i32 = -100;
    pub const SPAWN_CENTER_MAX: i32 = (FIELD_HEIGHT / 3.0) as i32;

    /// Ground strip height (hazard)
    pub const GROUND_HEIGHT: f32 = 60.0;

    /// Logo fade-out duration after the starting tap
    pub const LOGO_FADE_SECS: f32 = 0.5;
    /// Delay from the starting tap until the player unfreezes and the
    /// spawner arms (fade + a beat, matching the intro sequence)
    pub const ACTIVATE_DELAY_TICKS: u64 = TICK_RATE as u64;

    /// Parallax scroll: one tile width crosses the field in this long
    pub const BACKGROUND_SCROLL_SECS: f32 = 20.0;
    pub const GROUND_SCROLL_SECS: f32 = 6.75;
}
