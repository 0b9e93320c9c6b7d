//! The one simulation currently in play

use rand::Rng;

use super::classic::ClassicGame;
use super::modern::ModernGame;
use super::state::{GameMode, Intent, TickReport};
use crate::consts::{CANVAS_SIZE, MODERN_TICK_MS, TILE_COUNT};
use crate::difficulty::Difficulty;
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub enum ActiveSimulation {
    Classic(ClassicGame),
    Modern(ModernGame),
}

impl ActiveSimulation {
    /// Fresh board for a run in `mode`
    pub fn new(mode: GameMode, difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        match mode {
            GameMode::Classic => {
                ActiveSimulation::Classic(ClassicGame::with_layout(rng, TILE_COUNT, difficulty))
            }
            GameMode::Modern => ActiveSimulation::Modern(ModernGame::with_layout(
                rng,
                CANVAS_SIZE,
                CANVAS_SIZE,
                difficulty,
            )),
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            ActiveSimulation::Classic(_) => GameMode::Classic,
            ActiveSimulation::Modern(_) => GameMode::Modern,
        }
    }

    /// Route an intent to the active model; returns whether anything changed
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        match self {
            ActiveSimulation::Classic(game) => match intent {
                Intent::Key(d) | Intent::Touch(d) | Intent::Joystick(d) => game.change_direction(d),
                Intent::Hold { .. } => false,
            },
            ActiveSimulation::Modern(game) => game.apply_intent(intent),
        }
    }

    pub fn advance_tick(&mut self, rng: &mut impl Rng) -> Result<TickReport, SimError> {
        match self {
            ActiveSimulation::Classic(game) => game.advance_tick(rng),
            ActiveSimulation::Modern(game) => game.advance_tick(rng),
        }
    }

    pub fn spawn_special_food(&mut self, rng: &mut impl Rng, now_ms: f64) -> bool {
        match self {
            ActiveSimulation::Classic(game) => game.spawn_special_food(rng, now_ms),
            ActiveSimulation::Modern(game) => game.spawn_special_food(rng, now_ms),
        }
    }

    /// Remove special food; false if there was none
    pub fn clear_special_food(&mut self) -> bool {
        match self {
            ActiveSimulation::Classic(game) => game.special_food.take().is_some(),
            ActiveSimulation::Modern(game) => game.special_food.take().is_some(),
        }
    }

    pub fn has_special_food(&self) -> bool {
        match self {
            ActiveSimulation::Classic(game) => game.special_food.is_some(),
            ActiveSimulation::Modern(game) => game.special_food.is_some(),
        }
    }

    pub fn snake_len(&self) -> usize {
        match self {
            ActiveSimulation::Classic(game) => game.snake.len(),
            ActiveSimulation::Modern(game) => game.snake.segments.len(),
        }
    }

    /// Tick interval a run starts with
    pub fn base_tick_ms(&self, difficulty: Difficulty) -> u32 {
        match self {
            ActiveSimulation::Classic(_) => difficulty.settings().tick_interval_ms,
            ActiveSimulation::Modern(_) => MODERN_TICK_MS,
        }
    }

    pub fn has_bot(&self) -> bool {
        match self {
            ActiveSimulation::Classic(game) => game.bot.is_some(),
            ActiveSimulation::Modern(game) => game.bot.is_some(),
        }
    }

    pub fn as_classic(&self) -> Option<&ClassicGame> {
        match self {
            ActiveSimulation::Classic(game) => Some(game),
            ActiveSimulation::Modern(_) => None,
        }
    }

    pub fn as_modern(&self) -> Option<&ModernGame> {
        match self {
            ActiveSimulation::Modern(game) => Some(game),
            ActiveSimulation::Classic(_) => None,
        }
    }

    pub fn as_classic_mut(&mut self) -> Option<&mut ClassicGame> {
        match self {
            ActiveSimulation::Classic(game) => Some(game),
            ActiveSimulation::Modern(_) => None,
        }
    }

    pub fn as_modern_mut(&mut self) -> Option<&mut ModernGame> {
        match self {
            ActiveSimulation::Modern(game) => Some(game),
            ActiveSimulation::Classic(_) => None,
        }
    }
}
