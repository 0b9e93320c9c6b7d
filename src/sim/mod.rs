//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `advance_tick` per timer tick
//! - Seeded RNG only
//! - No rendering, timers or storage

pub mod active;
pub mod bot;
pub mod classic;
pub mod geometry;
pub mod modern;
pub mod obstacles;
pub mod state;

pub use active::ActiveSimulation;
pub use bot::{ClassicBot, ModernBot};
pub use classic::ClassicGame;
pub use geometry::{Cell, Circle, GridRect};
pub use modern::{ModernGame, ModernSnake, Steering};
pub use state::{
    BotStrike, Collision, Direction, FoodKind, GameMode, Heading, Intent, SpecialFood, TickReport,
};
