//! Modern free-movement snake
//!
//! The head travels `speed` pixels per tick along `angle`; every other segment is
//! pulled toward the one ahead of it until they are `segment_distance` apart.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::bot::ModernBot;
use super::geometry::{Circle, point_in_circle, points_within};
use super::obstacles::modern_layout;
use super::state::{BotStrike, Collision, Direction, Intent, SpecialFood, TickReport};
use crate::consts::{
    EAT_RADIUS, FOOD_ATTEMPTS, FOOD_CLEARANCE, FOOD_EDGE_MARGIN, MAX_SPEED, SEGMENT_DISTANCE,
    SELF_COLLISION_RADIUS, SELF_COLLISION_SKIP, SNAKE_HALF_WIDTH, SPECIAL_FOOD_GROWTH, SPEED_STEP,
    TOUCH_TURN, TURN_RATE,
};
use crate::difficulty::Difficulty;
use crate::error::SimError;
use crate::normalize_angle;

/// Starting body, head first
pub const MODERN_START: [Vec2; 3] = [
    Vec2::new(200.0, 200.0),
    Vec2::new(180.0, 200.0),
    Vec2::new(160.0, 200.0),
];
pub const MODERN_FIRST_FOOD: Vec2 = Vec2::new(300.0, 300.0);
/// Clearance between fresh food and an obstacle edge
const FOOD_OBSTACLE_CLEARANCE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernSnake {
    /// Head first
    pub segments: Vec<Vec2>,
    pub angle: f32,
    /// Pixels per tick
    pub speed: f32,
    pub segment_distance: f32,
}

impl ModernSnake {
    pub fn new(speed: f32) -> Self {
        Self {
            segments: MODERN_START.to_vec(),
            angle: 0.0,
            speed,
            segment_distance: SEGMENT_DISTANCE,
        }
    }

    pub fn head(&self) -> Option<Vec2> {
        self.segments.first().copied()
    }

    pub fn turn(&mut self, delta: f32) {
        self.angle = normalize_angle(self.angle + delta);
    }

    /// Pull each segment toward its leader by the excess over `segment_distance`
    fn follow(&mut self) {
        for i in 1..self.segments.len() {
            let target = self.segments[i - 1];
            let offset = target - self.segments[i];
            let distance = offset.length();
            if distance > self.segment_distance {
                let excess = distance - self.segment_distance;
                self.segments[i] += offset / distance * excess;
            }
        }
    }

    /// Append copies of the tail; they spread out over the next ticks
    fn grow(&mut self, count: usize) {
        if let Some(&tail) = self.segments.last() {
            self.segments.extend(std::iter::repeat_n(tail, count));
        }
    }
}

/// Turn keys currently held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernGame {
    pub snake: ModernSnake,
    pub steering: Steering,
    pub food: Vec2,
    pub special_food: Option<SpecialFood<Vec2>>,
    pub obstacles: Vec<Circle>,
    pub bot: Option<ModernBot>,
    pub width: f32,
    pub height: f32,
}

impl ModernGame {
    /// Bare canvas: starting snake, first food, nothing else
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        Self {
            snake: ModernSnake::new(speed),
            steering: Steering::default(),
            food: MODERN_FIRST_FOOD,
            special_food: None,
            obstacles: Vec::new(),
            bot: None,
            width,
            height,
        }
    }

    /// Canvas for a fresh run at the given difficulty
    pub fn with_layout(rng: &mut impl Rng, width: f32, height: f32, difficulty: Difficulty) -> Self {
        let mut game = Self::new(width, height, difficulty.modern_start_speed());
        let settings = difficulty.settings();
        game.obstacles = modern_layout(
            rng,
            settings.modern_obstacle_count,
            width,
            height,
            &game.snake.segments,
            game.food,
        );
        if settings.has_bot {
            game.bot = ModernBot::spawn(
                rng,
                &game.snake.segments,
                game.food,
                &game.obstacles,
                width,
                height,
                game.snake.speed,
            );
        }
        log::info!(
            "Modern canvas ready: {} obstacles, speed {:.1}, bot: {}",
            game.obstacles.len(),
            game.snake.speed,
            game.bot.is_some()
        );
        game
    }

    /// Steer; returns whether the input changed anything
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Key(Direction::Left) => self.snake.turn(-TURN_RATE),
            Intent::Key(Direction::Right) => self.snake.turn(TURN_RATE),
            Intent::Key(_) => return false,
            Intent::Touch(Direction::Up) => self.snake.angle = -FRAC_PI_2,
            Intent::Touch(Direction::Down) => self.snake.angle = FRAC_PI_2,
            Intent::Touch(Direction::Left) => self.snake.turn(-TOUCH_TURN),
            Intent::Touch(Direction::Right) => self.snake.turn(TOUCH_TURN),
            Intent::Joystick(direction) => self.snake.angle = direction.angle(),
            Intent::Hold { left, right } => {
                let steering = Steering { left, right };
                if steering == self.steering {
                    return false;
                }
                self.steering = steering;
            }
        }
        true
    }

    fn hits_wall(&self, p: Vec2) -> bool {
        p.x < SNAKE_HALF_WIDTH
            || p.x > self.width - SNAKE_HALF_WIDTH
            || p.y < SNAKE_HALF_WIDTH
            || p.y > self.height - SNAKE_HALF_WIDTH
    }

    fn player_collision(&self, head: Vec2) -> Option<Collision> {
        if self.hits_wall(head) {
            return Some(Collision::Wall);
        }
        if self
            .obstacles
            .iter()
            .any(|o| point_in_circle(head, o.center, o.radius + SNAKE_HALF_WIDTH))
        {
            return Some(Collision::Obstacle);
        }
        if self
            .snake
            .segments
            .iter()
            .skip(SELF_COLLISION_SKIP)
            .any(|&s| points_within(head, s, SELF_COLLISION_RADIUS))
        {
            return Some(Collision::SelfBite);
        }
        None
    }

    pub fn advance_tick(&mut self, rng: &mut impl Rng) -> Result<TickReport, SimError> {
        let current = self.snake.head().ok_or(SimError::EmptySnake)?;

        if self.steering.left {
            self.snake.turn(-TURN_RATE);
        }
        if self.steering.right {
            self.snake.turn(TURN_RATE);
        }

        let head = current + Vec2::from_angle(self.snake.angle) * self.snake.speed;
        if let Some(collision) = self.player_collision(head) {
            return Ok(TickReport::game_over(collision, self.snake.segments.len()));
        }

        self.snake.segments[0] = head;
        self.snake.follow();

        let mut report = TickReport::default();
        if points_within(head, self.food, EAT_RADIUS) {
            self.snake.grow(1);
            self.regenerate_food(rng);
            self.snake.speed = (self.snake.speed + SPEED_STEP).min(MAX_SPEED);
            report.ate_regular = true;
        }
        if self
            .special_food
            .is_some_and(|s| points_within(head, s.pos, EAT_RADIUS))
        {
            self.snake.grow(SPECIAL_FOOD_GROWTH);
            self.special_food = None;
            report.ate_special = true;
        }

        let strike = self.step_bot(rng);
        let report = TickReport {
            length: self.snake.segments.len(),
            ..report
        };
        Ok(report.with_bot(strike))
    }

    fn step_bot(&mut self, rng: &mut impl Rng) -> Option<BotStrike> {
        let bot = self.bot.as_mut()?;
        let strike = bot.step(rng, &self.snake.segments, &self.obstacles, self.width, self.height)?;
        if matches!(strike, BotStrike::HeadOn | BotStrike::Eliminated) {
            self.bot = ModernBot::spawn(
                rng,
                &self.snake.segments,
                self.food,
                &self.obstacles,
                self.width,
                self.height,
                self.snake.speed,
            );
        }
        Some(strike)
    }

    /// Food spot inside the edge margin, clear of the snake, obstacles and bot
    fn is_clear(&self, p: Vec2) -> bool {
        !self
            .snake
            .segments
            .iter()
            .any(|&s| points_within(s, p, FOOD_CLEARANCE))
            && !self
                .obstacles
                .iter()
                .any(|o| points_within(o.center, p, o.radius + FOOD_OBSTACLE_CLEARANCE))
            && !self
                .bot
                .as_ref()
                .is_some_and(|b| b.segments.iter().any(|&s| points_within(s, p, FOOD_CLEARANCE)))
    }

    fn random_clear_point(&self, rng: &mut impl Rng, also: impl Fn(Vec2) -> bool) -> Option<Vec2> {
        let span_x = self.width - 2.0 * FOOD_EDGE_MARGIN;
        let span_y = self.height - 2.0 * FOOD_EDGE_MARGIN;
        if span_x <= 0.0 || span_y <= 0.0 {
            return None;
        }
        (0..FOOD_ATTEMPTS)
            .map(|_| {
                Vec2::new(
                    rng.random::<f32>() * span_x + FOOD_EDGE_MARGIN,
                    rng.random::<f32>() * span_y + FOOD_EDGE_MARGIN,
                )
            })
            .find(|&p| self.is_clear(p) && also(p))
    }

    /// Move the food; keeps it in place if no clear spot turns up
    pub fn regenerate_food(&mut self, rng: &mut impl Rng) {
        let special = self.special_food.map(|s| s.pos);
        let spot = self.random_clear_point(rng, |p| {
            special.is_none_or(|s| !points_within(s, p, FOOD_CLEARANCE))
        });
        match spot {
            Some(p) => self.food = p,
            None => log::warn!("No clear spot for food after {} attempts", FOOD_ATTEMPTS),
        }
    }

    pub fn spawn_special_food(&mut self, rng: &mut impl Rng, now_ms: f64) -> bool {
        let food = self.food;
        match self.random_clear_point(rng, |p| !points_within(food, p, FOOD_CLEARANCE)) {
            Some(pos) => {
                self.special_food = Some(SpecialFood {
                    pos,
                    created_at_ms: now_ms,
                });
                true
            }
            None => {
                log::warn!("No clear spot for special food");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    /// Head 10 px left of the first food, body trailing left
    fn about_to_eat(speed: f32) -> ModernGame {
        let mut game = ModernGame::new(400.0, 400.0, speed);
        game.snake.segments = vec![
            Vec2::new(290.0, 300.0),
            Vec2::new(275.0, 300.0),
            Vec2::new(260.0, 300.0),
        ];
        game
    }

    #[test]
    fn test_eat_food_grows_and_speeds_up() {
        let mut game = about_to_eat(2.0);
        let report = game.advance_tick(&mut rng()).unwrap();

        assert!(report.ate_regular);
        assert_eq!(game.snake.segments.len(), 4);
        assert!((game.snake.speed - 2.1).abs() < 1e-5);
        assert!(game.food.distance(game.snake.segments[0]) >= FOOD_CLEARANCE);
        assert!(game.food.x >= FOOD_EDGE_MARGIN && game.food.x < 400.0 - FOOD_EDGE_MARGIN);
    }

    #[test]
    fn test_speed_is_capped() {
        let mut game = about_to_eat(MAX_SPEED - 0.05);
        game.advance_tick(&mut rng()).unwrap();
        assert_eq!(game.snake.speed, MAX_SPEED);
    }

    #[test]
    fn test_special_food_grows_by_three() {
        let mut game = about_to_eat(2.0);
        game.food = Vec2::new(50.0, 50.0);
        game.special_food = Some(SpecialFood {
            pos: Vec2::new(300.0, 300.0),
            created_at_ms: 0.0,
        });
        let report = game.advance_tick(&mut rng()).unwrap();
        assert!(report.ate_special);
        assert!(!report.ate_regular);
        assert_eq!(game.snake.segments.len(), 3 + SPECIAL_FOOD_GROWTH);
        assert!(game.special_food.is_none());
    }

    #[test]
    fn test_regular_and_special_eaten_same_tick() {
        let mut game = about_to_eat(2.0);
        game.special_food = Some(SpecialFood {
            pos: Vec2::new(305.0, 300.0),
            created_at_ms: 0.0,
        });
        let report = game.advance_tick(&mut rng()).unwrap();

        assert!(report.ate_regular);
        assert!(report.ate_special);
        assert_eq!(game.snake.segments.len(), 3 + 1 + SPECIAL_FOOD_GROWTH);
        assert!(game.special_food.is_none());
        assert!((game.snake.speed - 2.1).abs() < 1e-5);
    }

    #[test]
    fn test_wall_margin() {
        let mut game = ModernGame::new(400.0, 400.0, 3.0);
        game.snake.segments = vec![Vec2::new(388.0, 200.0), Vec2::new(373.0, 200.0)];
        let before = game.snake.segments.clone();
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::Wall));
        assert_eq!(game.snake.segments, before);
    }

    #[test]
    fn test_obstacle_hit_uses_padding() {
        let mut game = ModernGame::new(400.0, 400.0, 2.0);
        // Head lands 21 px from the center of a radius-12 circle
        game.obstacles = vec![Circle::new(Vec2::new(223.0, 200.0), 12.0)];
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::Obstacle));
    }

    #[test]
    fn test_self_bite_skips_neck() {
        let mut game = ModernGame::new(400.0, 400.0, 2.0);
        // Segments 1..4 overlap the head but are skipped; segment 4 is close
        game.snake.segments = vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(101.0, 100.0),
            Vec2::new(102.0, 100.0),
            Vec2::new(103.0, 100.0),
            Vec2::new(110.0, 100.0),
        ];
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::SelfBite));
    }

    #[test]
    fn test_key_turns_and_touch_snaps() {
        let mut game = ModernGame::new(400.0, 400.0, 2.0);
        assert!(game.apply_intent(Intent::Key(Direction::Right)));
        assert!((game.snake.angle - TURN_RATE).abs() < 1e-6);
        assert!(!game.apply_intent(Intent::Key(Direction::Up)));
        assert!(game.apply_intent(Intent::Touch(Direction::Up)));
        assert_eq!(game.snake.angle, -FRAC_PI_2);
        assert!(game.apply_intent(Intent::Joystick(Direction::Left)));
        assert_eq!(game.snake.angle, std::f32::consts::PI);
    }

    #[test]
    fn test_held_turn_applies_each_tick() {
        let mut game = ModernGame::new(400.0, 400.0, 1.0);
        assert!(game.apply_intent(Intent::Hold { left: true, right: false }));
        assert!(!game.apply_intent(Intent::Hold { left: true, right: false }));
        game.advance_tick(&mut rng()).unwrap();
        game.advance_tick(&mut rng()).unwrap();
        assert!((game.snake.angle + 2.0 * TURN_RATE).abs() < 1e-5);
    }

    #[test]
    fn test_with_layout_uses_start_speed() {
        let game = ModernGame::with_layout(&mut rng(), 400.0, 400.0, Difficulty::Easy);
        assert_eq!(game.snake.speed, 1.0);
        assert!(game.obstacles.is_empty());
        assert!(game.bot.is_none());
        let game = ModernGame::with_layout(&mut rng(), 400.0, 400.0, Difficulty::Extreme);
        assert_eq!(game.snake.speed, 3.0);
    }

    proptest! {
        #[test]
        fn prop_segments_stay_within_follow_distance(
            seed in any::<u64>(),
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut game = ModernGame::with_layout(&mut rng, 400.0, 400.0, Difficulty::Normal);

            for (left, right) in inputs {
                game.apply_intent(Intent::Hold { left, right });
                let report = game.advance_tick(&mut rng).unwrap();
                if report.game_over.is_some() {
                    break;
                }
                for pair in game.snake.segments.windows(2) {
                    prop_assert!(pair[0].distance(pair[1]) <= SEGMENT_DISTANCE + 1e-3);
                }
            }
        }
    }
}
