//! Shared simulation types
//!
//! Everything a tick reads or reports that is not specific to one movement model.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use super::geometry::Cell;
use crate::consts::SPECIAL_FOOD_LIFETIME_MS;

/// Which movement model is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Grid-stepped movement
    #[default]
    Classic,
    /// Continuous, angle-steered movement
    Modern,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Modern => "modern",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "modern" => Some(GameMode::Modern),
            _ => None,
        }
    }
}

/// A cardinal direction as delivered by keyboard, buttons or joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Probe order used when the classic bot looks for an escape
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid step (y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Heading angle in canvas space
    pub fn angle(self) -> f32 {
        match self {
            Direction::Up => -FRAC_PI_2,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Right => 0.0,
        }
    }

    /// Dominant axis of a drag once it passes `threshold` pixels (screen y grows downward)
    pub fn from_drag(dx: f32, dy: f32, threshold: f32) -> Option<Self> {
        if dx.abs() > dy.abs() {
            (dx.abs() > threshold).then_some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            (dy.abs() > threshold).then_some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

/// Classic velocity vector; `(0, 0)` until the first input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const STILL: Heading = Heading { dx: 0, dy: 0 };

    pub fn is_still(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// `other` points straight back the way we are going
    pub fn is_reversal(self, other: Heading) -> bool {
        !self.is_still() && other.dx == -self.dx && other.dy == -self.dy
    }

    pub fn step(self, cell: Cell) -> Cell {
        cell.offset(self.dx, self.dy)
    }
}

impl From<Direction> for Heading {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { dx, dy }
    }
}

/// Player intent delivered by the input source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Keyboard arrow/WASD press
    Key(Direction),
    /// On-screen direction button
    Touch(Direction),
    /// Virtual joystick leaning into a direction
    Joystick(Direction),
    /// Held turn keys (modern steering)
    Hold { left: bool, right: bool },
}

impl Intent {
    /// Directional intents wake an idle game up
    pub fn starts_game(&self) -> bool {
        !matches!(self, Intent::Hold { .. })
    }
}

/// Time-limited bonus food
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialFood<P> {
    pub pos: P,
    /// Scheduler time when it appeared
    pub created_at_ms: f64,
}

impl<P> SpecialFood<P> {
    pub fn expires_at_ms(&self) -> f64 {
        self.created_at_ms + SPECIAL_FOOD_LIFETIME_MS as f64
    }
}

/// What the head ate this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodKind {
    Regular,
    Special,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collision {
    Wall,
    SelfBite,
    Obstacle,
    /// Player ran into the bot
    BotBody,
    /// Bot and player met head to head
    HeadOn,
    /// Bot hit the player right behind the head
    BotNeck,
}

/// Outcome of the bot touching the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotStrike {
    /// Head to head: both die, bonus paid
    HeadOn,
    /// Bot ran into the player's body past the neck: bot dies, bonus paid
    Eliminated,
    /// Bot hit the neck: player dies, no bonus
    Neck,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub ate_regular: bool,
    pub ate_special: bool,
    pub bot: Option<BotStrike>,
    pub game_over: Option<Collision>,
    /// Player length after the tick
    pub length: usize,
}

impl TickReport {
    pub fn game_over(collision: Collision, length: usize) -> Self {
        Self {
            game_over: Some(collision),
            length,
            ..Default::default()
        }
    }

    /// Food eaten this tick, regular first
    pub fn eaten(&self) -> impl Iterator<Item = FoodKind> {
        [
            (self.ate_regular, FoodKind::Regular),
            (self.ate_special, FoodKind::Special),
        ]
        .into_iter()
        .filter_map(|(ate, kind)| ate.then_some(kind))
    }

    /// Fold a bot outcome into the report
    pub fn with_bot(mut self, strike: Option<BotStrike>) -> Self {
        self.bot = strike;
        match strike {
            Some(BotStrike::HeadOn) => self.game_over = Some(Collision::HeadOn),
            Some(BotStrike::Neck) => self.game_over = Some(Collision::BotNeck),
            _ => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal_detection() {
        let right = Heading::from(Direction::Right);
        assert!(right.is_reversal(Direction::Left.into()));
        assert!(!right.is_reversal(Direction::Up.into()));
        assert!(!right.is_reversal(Direction::Right.into()));
        // Standing still has no reverse
        assert!(!Heading::STILL.is_reversal(Direction::Left.into()));
    }

    #[test]
    fn test_drag_picks_dominant_axis() {
        assert_eq!(Direction::from_drag(45.0, 10.0, 30.0), Some(Direction::Right));
        assert_eq!(Direction::from_drag(-5.0, -31.0, 30.0), Some(Direction::Up));
        assert_eq!(Direction::from_drag(20.0, 25.0, 30.0), None);
        // Ties go to the vertical axis
        assert_eq!(Direction::from_drag(-40.0, 40.0, 30.0), Some(Direction::Down));
    }

    #[test]
    fn test_mode_round_trip_str() {
        assert_eq!(GameMode::from_str("Modern"), Some(GameMode::Modern));
        assert_eq!(GameMode::from_str(GameMode::Classic.as_str()), Some(GameMode::Classic));
        assert_eq!(GameMode::from_str("arcade"), None);
    }

    #[test]
    fn test_bot_strike_sets_game_over() {
        let report = TickReport::default().with_bot(Some(BotStrike::HeadOn));
        assert_eq!(report.game_over, Some(Collision::HeadOn));
        let report = TickReport::default().with_bot(Some(BotStrike::Eliminated));
        assert_eq!(report.game_over, None);
        let report = TickReport::default().with_bot(Some(BotStrike::Neck));
        assert_eq!(report.game_over, Some(Collision::BotNeck));
    }

    #[test]
    fn test_eaten_lists_regular_first() {
        let report = TickReport {
            ate_regular: true,
            ate_special: true,
            ..Default::default()
        };
        assert_eq!(
            report.eaten().collect::<Vec<_>>(),
            vec![FoodKind::Regular, FoodKind::Special]
        );
        assert_eq!(TickReport::default().eaten().count(), 0);
    }

    #[test]
    fn test_special_food_expiry() {
        let food = SpecialFood {
            pos: Cell::new(1, 1),
            created_at_ms: 15_000.0,
        };
        assert_eq!(food.expires_at_ms(), 20_000.0);
    }
}
