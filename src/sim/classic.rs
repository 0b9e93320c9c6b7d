//! Classic grid snake
//!
//! One cell per tick. The head is checked against walls, its own body, obstacles
//! and the bot before anything moves, so a fatal tick leaves the board untouched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bot::ClassicBot;
use super::geometry::{Cell, GridRect, cell_in_rect};
use super::obstacles::classic_layout;
use super::state::{
    BotStrike, Collision, Direction, Heading, SpecialFood, TickReport,
};
use crate::consts::{FOOD_ATTEMPTS, SPECIAL_FOOD_GROWTH};
use crate::difficulty::Difficulty;
use crate::error::SimError;

/// Starting body, head first
pub const CLASSIC_START: [Cell; 3] = [Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)];
pub const CLASSIC_FIRST_FOOD: Cell = Cell::new(15, 15);

/// Random draws first, then a row-major scan so a nearly full board still finds its gap
fn random_free_cell(
    rng: &mut impl Rng,
    tile_count: i32,
    is_free: impl Fn(Cell) -> bool,
) -> Option<Cell> {
    if tile_count <= 0 {
        return None;
    }
    for _ in 0..FOOD_ATTEMPTS {
        let cell = Cell::new(
            rng.random_range(0..tile_count),
            rng.random_range(0..tile_count),
        );
        if is_free(cell) {
            return Some(cell);
        }
    }
    (0..tile_count)
        .flat_map(|y| (0..tile_count).map(move |x| Cell::new(x, y)))
        .find(|&c| is_free(c))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicGame {
    /// Head first
    pub snake: Vec<Cell>,
    pub heading: Heading,
    pub food: Cell,
    pub special_food: Option<SpecialFood<Cell>>,
    pub obstacles: Vec<GridRect>,
    pub bot: Option<ClassicBot>,
    pub tile_count: i32,
}

impl ClassicGame {
    /// Bare board: starting snake, first food, nothing else
    pub fn new(tile_count: i32) -> Self {
        Self {
            snake: CLASSIC_START.to_vec(),
            heading: Heading::STILL,
            food: CLASSIC_FIRST_FOOD,
            special_food: None,
            obstacles: Vec::new(),
            bot: None,
            tile_count,
        }
    }

    /// Board for a fresh run at the given difficulty
    pub fn with_layout(rng: &mut impl Rng, tile_count: i32, difficulty: Difficulty) -> Self {
        let mut game = Self::new(tile_count);
        let settings = difficulty.settings();
        game.obstacles = classic_layout(
            rng,
            settings.obstacle_count,
            tile_count,
            &game.snake,
            game.food,
        );
        if settings.has_bot {
            game.bot = ClassicBot::spawn(rng, &game.snake, game.food, &game.obstacles, tile_count);
        }
        log::info!(
            "Classic board ready: {} obstacles, bot: {}",
            game.obstacles.len(),
            game.bot.is_some()
        );
        game
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    fn on_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.iter().any(|o| cell_in_rect(cell, o))
    }

    fn on_bot(&self, cell: Cell) -> bool {
        self.bot
            .as_ref()
            .is_some_and(|bot| bot.segments.contains(&cell))
    }

    /// Turn unless it would reverse a snake longer than one cell
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        let next = Heading::from(direction);
        if self.snake.len() > 1 && self.heading.is_reversal(next) {
            return false;
        }
        self.heading = next;
        true
    }

    /// Fatal checks for the head landing on `cell`, in order
    fn player_collision(&self, cell: Cell) -> Option<Collision> {
        if !cell.in_bounds(self.tile_count) {
            return Some(Collision::Wall);
        }
        if self.snake.contains(&cell) {
            return Some(Collision::SelfBite);
        }
        if self.on_obstacle(cell) {
            return Some(Collision::Obstacle);
        }
        if self.on_bot(cell) {
            return Some(Collision::BotBody);
        }
        None
    }

    pub fn advance_tick(&mut self, rng: &mut impl Rng) -> Result<TickReport, SimError> {
        let head = self.head().ok_or(SimError::EmptySnake)?;

        if self.heading.is_still() {
            let strike = self.step_bot(rng);
            let report = TickReport {
                length: self.snake.len(),
                ..Default::default()
            };
            return Ok(report.with_bot(strike));
        }

        let next = self.heading.step(head);
        if let Some(collision) = self.player_collision(next) {
            return Ok(TickReport::game_over(collision, self.snake.len()));
        }

        self.snake.insert(0, next);
        let mut report = TickReport::default();
        if next == self.food {
            self.regenerate_food(rng);
            report.ate_regular = true;
        } else if self.special_food.is_some_and(|s| s.pos == next) {
            // Tail stays and three copies of it are added
            self.special_food = None;
            if let Some(&tail) = self.snake.last() {
                self.snake
                    .extend(std::iter::repeat_n(tail, SPECIAL_FOOD_GROWTH));
            }
            report.ate_special = true;
        } else {
            self.snake.pop();
        }

        let strike = self.step_bot(rng);
        let report = TickReport {
            length: self.snake.len(),
            ..report
        };
        Ok(report.with_bot(strike))
    }

    /// Step the bot; a dead bot comes back somewhere else
    fn step_bot(&mut self, rng: &mut impl Rng) -> Option<BotStrike> {
        let bot = self.bot.as_mut()?;
        let strike = bot.step(rng, &self.snake, &self.obstacles, self.tile_count)?;
        if matches!(strike, BotStrike::HeadOn | BotStrike::Eliminated) {
            self.bot = ClassicBot::spawn(rng, &self.snake, self.food, &self.obstacles, self.tile_count);
        }
        Some(strike)
    }

    /// Move the food to a free cell; keeps it in place if the board is full
    pub fn regenerate_food(&mut self, rng: &mut impl Rng) {
        let special = self.special_food.map(|s| s.pos);
        let spot = random_free_cell(rng, self.tile_count, |c| {
            !self.snake.contains(&c)
                && !self.on_obstacle(c)
                && !self.on_bot(c)
                && special != Some(c)
        });
        match spot {
            Some(cell) => self.food = cell,
            None => log::warn!("No free cell for food, leaving it at {:?}", self.food),
        }
    }

    /// Drop special food on a free cell; false if none was found
    pub fn spawn_special_food(&mut self, rng: &mut impl Rng, now_ms: f64) -> bool {
        let spot = random_free_cell(rng, self.tile_count, |c| {
            !self.snake.contains(&c) && !self.on_obstacle(c) && !self.on_bot(c) && c != self.food
        });
        match spot {
            Some(pos) => {
                self.special_food = Some(SpecialFood {
                    pos,
                    created_at_ms: now_ms,
                });
                true
            }
            None => {
                log::warn!("No free cell for special food");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FoodKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn moving_right() -> ClassicGame {
        let mut game = ClassicGame::new(20);
        game.change_direction(Direction::Right);
        game
    }

    #[test]
    fn test_eat_regular_food_keeps_tail() {
        let mut game = moving_right();
        game.food = Cell::new(11, 10);

        let report = game.advance_tick(&mut rng()).unwrap();

        assert!(report.ate_regular);
        assert_eq!(
            game.snake,
            vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(report.length, 4);
        assert!(!game.snake.contains(&game.food));
    }

    #[test]
    fn test_plain_step_keeps_length() {
        let mut game = moving_right();
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.eaten().count(), 0);
        assert_eq!(
            game.snake,
            vec![Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10)]
        );
    }

    #[test]
    fn test_obstacle_ends_run_without_moving() {
        let mut game = ClassicGame::new(20);
        game.snake = vec![Cell::new(4, 5), Cell::new(3, 5), Cell::new(2, 5)];
        game.obstacles = vec![GridRect::new(5, 5, 2, 2)];
        game.change_direction(Direction::Right);
        let before = game.snake.clone();

        let report = game.advance_tick(&mut rng()).unwrap();

        assert_eq!(report.game_over, Some(Collision::Obstacle));
        assert_eq!(game.snake, before);
    }

    #[test]
    fn test_wall_ends_run() {
        let mut game = ClassicGame::new(20);
        game.snake = vec![Cell::new(19, 3), Cell::new(18, 3), Cell::new(17, 3)];
        game.change_direction(Direction::Right);
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::Wall));
    }

    #[test]
    fn test_self_bite_includes_tail() {
        let mut game = ClassicGame::new(20);
        // Square loop: moving up lands on the tail cell
        game.snake = vec![
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 4),
            Cell::new(5, 4),
        ];
        game.heading = Heading::from(Direction::Left);
        game.change_direction(Direction::Up);
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::SelfBite));
    }

    #[test]
    fn test_player_runs_into_bot() {
        let mut game = moving_right();
        game.bot = Some(ClassicBot::new(Cell::new(11, 12)));
        game.bot.as_mut().unwrap().segments = vec![Cell::new(11, 12), Cell::new(11, 11), Cell::new(11, 10)];
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report.game_over, Some(Collision::BotBody));
    }

    #[test]
    fn test_special_food_keeps_tail_and_adds_three() {
        let mut game = moving_right();
        game.special_food = Some(SpecialFood {
            pos: Cell::new(11, 10),
            created_at_ms: 0.0,
        });

        let report = game.advance_tick(&mut rng()).unwrap();

        assert!(report.ate_special);
        assert_eq!(game.snake.len(), 3 + 1 + SPECIAL_FOOD_GROWTH);
        assert!(game.special_food.is_none());
        assert_eq!(game.snake[0], Cell::new(11, 10));
        assert_eq!(game.snake[3..], [Cell::new(8, 10); 4]);
    }

    #[test]
    fn test_still_snake_does_nothing() {
        let mut game = ClassicGame::new(20);
        let before = game.clone();
        let report = game.advance_tick(&mut rng()).unwrap();
        assert_eq!(report, TickReport { length: 3, ..Default::default() });
        assert_eq!(game, before);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut game = moving_right();
        assert!(!game.change_direction(Direction::Left));
        assert_eq!(game.heading, Heading::from(Direction::Right));
        assert!(game.change_direction(Direction::Up));
    }

    #[test]
    fn test_single_cell_may_reverse() {
        let mut game = moving_right();
        game.snake.truncate(1);
        assert!(game.change_direction(Direction::Left));
    }

    #[test]
    fn test_empty_snake_is_an_error() {
        let mut game = moving_right();
        game.snake.clear();
        assert_eq!(game.advance_tick(&mut rng()), Err(SimError::EmptySnake));
    }

    #[test]
    fn test_full_board_keeps_food() {
        let mut game = ClassicGame::new(2);
        game.snake = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1)];
        game.food = Cell::new(5, 5);
        game.regenerate_food(&mut rng());
        assert_eq!(game.food, Cell::new(5, 5));
    }

    #[test]
    fn test_scan_finds_last_gap() {
        let mut game = ClassicGame::new(2);
        game.snake = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)];
        game.regenerate_food(&mut rng());
        assert_eq!(game.food, Cell::new(0, 1));
    }

    #[test]
    fn test_special_food_avoids_food() {
        let mut game = ClassicGame::with_layout(&mut rng(), 20, Difficulty::Hard);
        for t in 0..50 {
            assert!(game.spawn_special_food(&mut rng(), t as f64));
            let pos = game.special_food.unwrap().pos;
            assert_ne!(pos, game.food);
            assert!(!game.snake.contains(&pos));
            assert!(!game.obstacles.iter().any(|o| cell_in_rect(pos, o)));
        }
    }

    #[test]
    fn test_extreme_layout_has_bot() {
        let game = ClassicGame::with_layout(&mut rng(), 20, Difficulty::Extreme);
        assert!(game.obstacles.len() <= 12);
        let bot = game.bot.expect("extreme spawns a bot on an open board");
        for cell in &bot.segments {
            assert!(!game.snake.contains(cell));
        }
    }

    proptest! {
        #[test]
        fn prop_length_changes_by_food(seed in any::<u64>(), turns in proptest::collection::vec(0usize..4, 1..60)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut game = ClassicGame::with_layout(&mut rng, 20, Difficulty::Normal);

            for t in turns {
                game.change_direction(Direction::ALL[t]);
                let before = game.snake.len();
                let report = game.advance_tick(&mut rng).unwrap();
                if report.game_over.is_some() {
                    prop_assert_eq!(game.snake.len(), before);
                    break;
                }
                let expected = match report.eaten().next() {
                    Some(FoodKind::Regular) => before + 1,
                    Some(FoodKind::Special) => before + 1 + SPECIAL_FOOD_GROWTH,
                    None => before,
                };
                prop_assert_eq!(game.snake.len(), expected);
                prop_assert!(game.snake[0].in_bounds(20));
                prop_assert!(!game.snake.contains(&game.food));
            }
        }

        #[test]
        fn prop_never_turns_back_on_itself(turns in proptest::collection::vec(0usize..4, 1..40)) {
            let mut game = moving_right();
            for t in turns {
                let before = game.heading;
                let accepted = game.change_direction(Direction::ALL[t]);
                prop_assert_eq!(accepted, !before.is_reversal(Direction::ALL[t].into()));
                prop_assert!(!before.is_reversal(game.heading));
            }
        }
    }
}
