//! Difficulty levels and their tuning table

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

/// One row of the difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySettings {
    /// Classic tick interval at the start of a run
    pub tick_interval_ms: u32,
    /// Multiplies every food coin reward and the game-over payout
    pub coin_multiplier: u32,
    /// Classic rectangle obstacles
    pub obstacle_count: usize,
    pub has_bot: bool,
    /// Nominal modern speed rating shown in the difficulty picker
    pub modern_speed: f32,
    /// Modern circle obstacles
    pub modern_obstacle_count: usize,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }

    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                tick_interval_ms: 400,
                coin_multiplier: 1,
                obstacle_count: 0,
                has_bot: false,
                modern_speed: 0.8,
                modern_obstacle_count: 0,
            },
            Difficulty::Normal => DifficultySettings {
                tick_interval_ms: 300,
                coin_multiplier: 2,
                obstacle_count: 5,
                has_bot: false,
                modern_speed: 1.2,
                modern_obstacle_count: 5,
            },
            Difficulty::Hard => DifficultySettings {
                tick_interval_ms: 300,
                coin_multiplier: 3,
                obstacle_count: 8,
                has_bot: false,
                modern_speed: 1.2,
                modern_obstacle_count: 8,
            },
            Difficulty::Extreme => DifficultySettings {
                tick_interval_ms: 300,
                coin_multiplier: 5,
                obstacle_count: 12,
                has_bot: true,
                modern_speed: 1.2,
                modern_obstacle_count: 12,
            },
        }
    }

    /// Coin multiplier as a coin amount factor
    pub fn coin_multiplier(&self) -> u64 {
        self.settings().coin_multiplier as u64
    }

    /// Obstacles laid out for the given mode
    pub fn obstacle_count(&self, mode: GameMode) -> usize {
        let settings = self.settings();
        match mode {
            GameMode::Classic => settings.obstacle_count,
            GameMode::Modern => settings.modern_obstacle_count,
        }
    }

    /// Pixels per tick the modern snake starts a run with
    pub fn modern_start_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 2.0,
            Difficulty::Hard | Difficulty::Extreme => 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_row() {
        let s = Difficulty::Extreme.settings();
        assert!(s.has_bot);
        assert_eq!(s.obstacle_count, 12);
        assert_eq!(s.modern_obstacle_count, 12);
        assert_eq!(s.coin_multiplier, 5);
        assert_eq!(s.tick_interval_ms, 300);
    }

    #[test]
    fn test_only_extreme_has_bot() {
        for d in Difficulty::ALL {
            assert_eq!(d.settings().has_bot, d == Difficulty::Extreme);
        }
    }

    #[test]
    fn test_easy_row() {
        let s = Difficulty::Easy.settings();
        assert_eq!(s.tick_interval_ms, 400);
        assert_eq!(s.coin_multiplier, 1);
        assert_eq!(s.obstacle_count, 0);
        assert!((s.modern_speed - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_defaults_to_none_on_garbage() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("insane"), None);
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Extreme).unwrap();
        assert_eq!(json, "\"extreme\"");
    }
}
