//! LocalStorage backend

use super::{KeyValueStore, keys};

/// Browser LocalStorage; every failure is logged and otherwise ignored
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }
}

const OWNED_KEYS: [&str; 11] = [
    keys::HIGH_SCORE,
    keys::CLASSIC_HIGH_SCORE,
    keys::MODERN_HIGH_SCORE,
    keys::COINS,
    keys::DIFFICULTY,
    keys::THEME,
    keys::SKIN,
    keys::OWNED_THEMES,
    keys::OWNED_SKINS,
    keys::SOUND,
    keys::VIP,
];

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {} to LocalStorage", key);
            }
        }
    }

    fn clear(&mut self) {
        if let Some(storage) = &self.storage {
            for key in OWNED_KEYS {
                let _ = storage.remove_item(key);
            }
            log::info!("Saved progress cleared");
        }
    }
}
