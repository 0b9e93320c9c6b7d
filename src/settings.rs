//! Player preferences
//!
//! Read once at start-up and written back on every change.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::persistence::{KeyValueStore, keys, read_bool};

pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_SKIN: &str = "peshmerga";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Selected theme id
    pub theme: String,
    /// Selected skin id
    pub skin: String,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            theme: DEFAULT_THEME.to_string(),
            skin: DEFAULT_SKIN.to_string(),
            sound_enabled: true,
        }
    }
}

impl Settings {
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        let difficulty = store
            .get(keys::DIFFICULTY)
            .and_then(|raw| {
                let parsed = Difficulty::from_str(&raw);
                if parsed.is_none() {
                    log::warn!("Unknown difficulty {:?}, using default", raw);
                }
                parsed
            })
            .unwrap_or(defaults.difficulty);

        let settings = Self {
            difficulty,
            theme: store.get(keys::THEME).unwrap_or(defaults.theme),
            skin: store.get(keys::SKIN).unwrap_or(defaults.skin),
            sound_enabled: read_bool(store, keys::SOUND, defaults.sound_enabled),
        };
        log::info!(
            "Loaded settings: {} difficulty, theme {}, skin {}, sound {}",
            settings.difficulty.as_str(),
            settings.theme,
            settings.skin,
            if settings.sound_enabled { "on" } else { "off" }
        );
        settings
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(keys::DIFFICULTY, self.difficulty.as_str());
        store.set(keys::THEME, &self.theme);
        store.set(keys::SKIN, &self.skin);
        store.set(keys::SOUND, if self.sound_enabled { "true" } else { "false" });
    }
}
