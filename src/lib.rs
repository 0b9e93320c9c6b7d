//! Kurdish Snake - classic and modern snake for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, obstacles, bot)
//! - `session`: Game lifecycle, timers, scoring and coin accrual
//! - `platform`: Timer scheduling (manual for tests/headless, `setInterval` on web)
//! - `persistence`: Key-value store abstraction (memory or LocalStorage)
//! - `economy`, `highscores`, `settings`: Saved progress
//! - `renderer`, `audio`: Browser-only collaborators fed by the session

pub mod difficulty;
pub mod economy;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use difficulty::{Difficulty, DifficultySettings};
pub use economy::{Economy, ItemKind};
pub use error::{EconomyError, SessionError, SimError};
pub use highscores::HighScores;
pub use session::{GameEvent, GameSummary, Phase, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Canvas edge length in pixels (square play field)
    pub const CANVAS_SIZE: f32 = 400.0;
    /// Pixel size of one classic grid cell
    pub const GRID_SIZE: i32 = 20;
    /// Classic grid cells per side
    pub const TILE_COUNT: i32 = CANVAS_SIZE as i32 / GRID_SIZE;

    /// Classic tick interval floor (ms)
    pub const CLASSIC_MIN_TICK_MS: u32 = 50;
    /// Interval reduction each time the snake reaches a multiple of `CLASSIC_SPEEDUP_EVERY`
    pub const CLASSIC_SPEEDUP_STEP_MS: u32 = 5;
    pub const CLASSIC_SPEEDUP_EVERY: usize = 5;

    /// Modern tick interval (~60 Hz)
    pub const MODERN_TICK_MS: u32 = 16;
    /// Target spacing between modern body segments
    pub const SEGMENT_DISTANCE: f32 = 15.0;
    /// Half the drawn snake width; also the wall margin
    pub const SNAKE_HALF_WIDTH: f32 = 10.0;
    /// Head-to-body distance that counts as biting yourself
    pub const SELF_COLLISION_RADIUS: f32 = 12.0;
    /// Segments right behind the head skipped by the self check
    pub const SELF_COLLISION_SKIP: usize = 4;
    /// Head-to-food distance that counts as eating
    pub const EAT_RADIUS: f32 = 15.0;
    /// Minimum distance between fresh food and any snake segment
    pub const FOOD_CLEARANCE: f32 = 30.0;
    /// Fresh food stays this far from the canvas edges
    pub const FOOD_EDGE_MARGIN: f32 = 20.0;
    /// Speed gained per regular food and its cap
    pub const SPEED_STEP: f32 = 0.1;
    pub const MAX_SPEED: f32 = 4.0;
    /// Angle change per tick while a turn key is held (and per key press)
    pub const TURN_RATE: f32 = 0.1;
    /// Angle change per touch button tap
    pub const TOUCH_TURN: f32 = 0.5;

    /// Points per food
    pub const FOOD_POINTS: u32 = 10;
    pub const SPECIAL_FOOD_POINTS: u32 = 20;
    /// Extra coin factor for special food on top of the difficulty multiplier
    pub const SPECIAL_FOOD_COIN_FACTOR: u64 = 2;
    /// Net growth from one special food
    pub const SPECIAL_FOOD_GROWTH: usize = 3;
    /// Coins for taking out the bot (never multiplied)
    pub const BOT_KILL_BONUS: u64 = 500;

    /// Display clock period
    pub const CLOCK_INTERVAL_MS: u32 = 1000;
    /// Special food spawn period and lifetime
    pub const SPECIAL_FOOD_SPAWN_MS: u32 = 15_000;
    pub const SPECIAL_FOOD_LIFETIME_MS: u32 = 5_000;

    /// Attempts per obstacle slot / bot spawn before giving up
    pub const PLACEMENT_ATTEMPTS: u32 = 50;
    /// Random attempts for food before falling back to a scan (or giving up)
    pub const FOOD_ATTEMPTS: u32 = 1000;

    /// Starting coin balance for a fresh profile
    pub const STARTING_COINS: u64 = 500;
    /// Balance granted by the VIP unlock
    pub const VIP_COINS: u64 = 99_999_999;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Format whole seconds as `mm:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
