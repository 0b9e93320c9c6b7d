//! Autonomous opponent
//!
//! The bot borrows the active mode's movement rules but steers itself. It only
//! reports what it ran into; the owning simulation regenerates it and the session
//! pays out the kill bonus.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::geometry::{Cell, Circle, GridRect, cell_in_rect, points_within};
use super::state::{BotStrike, Direction, Heading};
use crate::consts::PLACEMENT_ATTEMPTS;
use crate::normalize_angle;

/// Player segments right behind the head; a bot hitting these kills the player
pub const NECK_LENGTH: usize = 3;

/// Classic bot acts on every Nth player tick
pub const CLASSIC_BOT_STRIDE: u32 = 3;
/// Chance per move to try a random new direction
pub const CLASSIC_BOT_TURN_CHANCE: f64 = 0.3;

/// Modern bot acts on every Nth player tick
pub const MODERN_BOT_STRIDE: u32 = 2;
/// Chance per move to wander off its current angle
pub const MODERN_BOT_WANDER_CHANCE: f64 = 0.05;
pub const MODERN_BOT_SEGMENT_DISTANCE: f32 = 20.0;
/// Bot speed relative to the player at spawn time
pub const MODERN_BOT_SPEED_FACTOR: f32 = 0.9;
/// Reach of the bot head against the player head / body
pub const MODERN_BOT_HEAD_REACH: f32 = 20.0;
pub const MODERN_BOT_BODY_REACH: f32 = 15.0;
/// Bot turns around when this close to an obstacle edge
pub const MODERN_BOT_OBSTACLE_CLEARANCE: f32 = 15.0;

/// Spawn clearances for the modern bot
const MODERN_SPAWN_EDGE: f32 = 50.0;
const MODERN_SPAWN_OBSTACLE_CLEARANCE: f32 = 30.0;
const MODERN_SPAWN_SNAKE_CLEARANCE: f32 = 40.0;
const MODERN_SPAWN_FOOD_CLEARANCE: f32 = 30.0;

/// Map a hit on player segment `index` to its consequence
fn strike_for_index(index: usize) -> BotStrike {
    match index {
        0 => BotStrike::HeadOn,
        i if i > NECK_LENGTH => BotStrike::Eliminated,
        _ => BotStrike::Neck,
    }
}

/// Grid bot for classic mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicBot {
    pub segments: Vec<Cell>,
    pub heading: Heading,
    move_counter: u32,
}

impl ClassicBot {
    /// Three cells trailing left of `head`, heading right
    pub fn new(head: Cell) -> Self {
        Self {
            segments: vec![head, head.offset(-1, 0), head.offset(-2, 0)],
            heading: Heading::from(Direction::Right),
            move_counter: 0,
        }
    }

    /// Find a spot clear of the snake, food and obstacles
    pub fn spawn(
        rng: &mut impl Rng,
        snake: &[Cell],
        food: Cell,
        obstacles: &[GridRect],
        tile_count: i32,
    ) -> Option<Self> {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let head = Cell::new(
                rng.random_range(0..tile_count),
                rng.random_range(0..tile_count),
            );
            let bot = Self::new(head);
            let clear = bot.segments.iter().all(|&c| {
                c.in_bounds(tile_count)
                    && c != food
                    && !snake.contains(&c)
                    && !obstacles.iter().any(|o| cell_in_rect(c, o))
            });
            if clear {
                log::debug!("Classic bot spawned at {:?}", head);
                return Some(bot);
            }
        }
        log::debug!("No room for the classic bot this round");
        None
    }

    pub fn head(&self) -> Option<Cell> {
        self.segments.first().copied()
    }

    fn is_open(&self, cell: Cell, obstacles: &[GridRect], tile_count: i32) -> bool {
        cell.in_bounds(tile_count)
            && !obstacles.iter().any(|o| cell_in_rect(cell, o))
            && !self.segments.contains(&cell)
    }

    /// Advance one player tick; moves only on every `CLASSIC_BOT_STRIDE`th call
    pub fn step(
        &mut self,
        rng: &mut impl Rng,
        player: &[Cell],
        obstacles: &[GridRect],
        tile_count: i32,
    ) -> Option<BotStrike> {
        self.move_counter += 1;
        if self.move_counter < CLASSIC_BOT_STRIDE {
            return None;
        }
        self.move_counter = 0;

        let head = self.head()?;

        if rng.random_bool(CLASSIC_BOT_TURN_CHANCE) {
            let pick = Heading::from(Direction::ALL[rng.random_range(0..Direction::ALL.len())]);
            if !self.heading.is_reversal(pick) {
                self.heading = pick;
            }
        }

        let mut next = self.heading.step(head);
        if !self.is_open(next, obstacles, tile_count) {
            let escape = Direction::ALL
                .iter()
                .map(|&d| Heading::from(d))
                .find(|h| self.is_open(h.step(head), obstacles, tile_count));
            match escape {
                Some(heading) => {
                    self.heading = heading;
                    next = heading.step(head);
                }
                None => {
                    // Boxed in: hold position until something opens up
                    log::debug!("Classic bot boxed in at {:?}", head);
                    return None;
                }
            }
        }

        if let Some(index) = player.iter().position(|&c| c == next) {
            return Some(strike_for_index(index));
        }

        self.segments.insert(0, next);
        self.segments.pop();
        None
    }
}

/// Free-roaming bot for modern mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernBot {
    pub segments: Vec<Vec2>,
    pub angle: f32,
    pub speed: f32,
    move_counter: u32,
}

impl ModernBot {
    /// Three segments trailing left of `head`, facing right
    pub fn new(head: Vec2, speed: f32) -> Self {
        let gap = Vec2::new(MODERN_BOT_SEGMENT_DISTANCE, 0.0);
        Self {
            segments: vec![head, head - gap, head - 2.0 * gap],
            angle: 0.0,
            speed,
            move_counter: 0,
        }
    }

    /// Find a spot clear of obstacles, the snake and the food
    pub fn spawn(
        rng: &mut impl Rng,
        snake: &[Vec2],
        food: Vec2,
        obstacles: &[Circle],
        width: f32,
        height: f32,
        player_speed: f32,
    ) -> Option<Self> {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = Vec2::new(
                rng.random::<f32>() * (width - 2.0 * MODERN_SPAWN_EDGE) + MODERN_SPAWN_EDGE,
                rng.random::<f32>() * (height - 2.0 * MODERN_SPAWN_EDGE) + MODERN_SPAWN_EDGE,
            );
            let near_obstacle = obstacles
                .iter()
                .any(|o| points_within(o.center, pos, o.radius + MODERN_SPAWN_OBSTACLE_CLEARANCE));
            let near_snake = snake
                .iter()
                .any(|&s| points_within(s, pos, MODERN_SPAWN_SNAKE_CLEARANCE));
            let near_food = points_within(food, pos, MODERN_SPAWN_FOOD_CLEARANCE);

            if !near_obstacle && !near_snake && !near_food {
                log::debug!("Modern bot spawned at ({:.1}, {:.1})", pos.x, pos.y);
                return Some(Self::new(pos, player_speed * MODERN_BOT_SPEED_FACTOR));
            }
        }
        log::debug!("No room for the modern bot this round");
        None
    }

    pub fn head(&self) -> Option<Vec2> {
        self.segments.first().copied()
    }

    /// Advance one player tick; moves only on every `MODERN_BOT_STRIDE`th call
    pub fn step(
        &mut self,
        rng: &mut impl Rng,
        player: &[Vec2],
        obstacles: &[Circle],
        width: f32,
        height: f32,
    ) -> Option<BotStrike> {
        self.move_counter += 1;
        if self.move_counter < MODERN_BOT_STRIDE {
            return None;
        }
        self.move_counter = 0;

        let current = self.head()?;

        if rng.random_bool(MODERN_BOT_WANDER_CHANCE) {
            self.angle = normalize_angle(self.angle + (rng.random::<f32>() - 0.5) * PI);
        }

        let ahead = current + Vec2::from_angle(self.angle) * self.speed;
        let blocked = ahead.x < 0.0
            || ahead.x > width
            || ahead.y < 0.0
            || ahead.y > height
            || obstacles
                .iter()
                .any(|o| points_within(o.center, ahead, o.radius + MODERN_BOT_OBSTACLE_CLEARANCE));
        let head = if blocked {
            // Turn around with some jitter and hold position; contact still counts
            self.angle = normalize_angle(self.angle + PI + (rng.random::<f32>() - 0.5));
            current
        } else {
            ahead
        };

        let player_head = *player.first()?;
        let touching = player.iter().enumerate().any(|(i, &s)| {
            let reach = if i == 0 {
                MODERN_BOT_HEAD_REACH
            } else {
                MODERN_BOT_BODY_REACH
            };
            points_within(s, head, reach)
        });
        if touching {
            if points_within(player_head, head, MODERN_BOT_HEAD_REACH) {
                return Some(BotStrike::HeadOn);
            }
            let hit = player
                .iter()
                .position(|&s| points_within(s, head, MODERN_BOT_BODY_REACH));
            return Some(match hit {
                Some(i) if i > NECK_LENGTH => BotStrike::Eliminated,
                _ => BotStrike::Neck,
            });
        }

        if blocked {
            return None;
        }
        self.segments.insert(0, head);
        self.segments.pop();
        for i in 1..self.segments.len() {
            let prev = self.segments[i - 1];
            let offset = self.segments[i] - prev;
            if offset.length() > MODERN_BOT_SEGMENT_DISTANCE {
                self.segments[i] = prev + offset.normalize() * MODERN_BOT_SEGMENT_DISTANCE;
            }
        }
        None
    }
}
