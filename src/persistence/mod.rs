//! Saved progress storage
//!
//! Progress lives in a flat string key/value store: LocalStorage in the
//! browser, a `HashMap` in tests and the headless demo. Values are plain
//! strings; sets are JSON arrays. Unreadable values fall back to defaults.

#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "kurdish-snake-high-score";
    pub const CLASSIC_HIGH_SCORE: &str = "kurdish-snake-classic-high-score";
    pub const MODERN_HIGH_SCORE: &str = "kurdish-snake-modern-high-score";
    pub const COINS: &str = "kurdish-snake-coins";
    pub const DIFFICULTY: &str = "kurdish-snake-difficulty";
    pub const THEME: &str = "kurdish-snake-theme";
    pub const SKIN: &str = "kurdish-snake-skin";
    pub const OWNED_THEMES: &str = "kurdish-snake-owned-themes";
    pub const OWNED_SKINS: &str = "kurdish-snake-owned-skins";
    pub const SOUND: &str = "kurdish-snake-sound";
    pub const VIP: &str = "kurdish-snake-vip";
}

/// String key/value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// Drop every key this game owns
    fn clear(&mut self);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Parse a stored number, `default` when missing or garbled
pub fn read_u64(store: &impl KeyValueStore, key: &str, default: u64) -> u64 {
    match store.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}

pub fn read_bool(store: &impl KeyValueStore, key: &str, default: bool) -> bool {
    match store.get(key).as_deref() {
        Some("true") => true,
        Some("false") => false,
        Some(raw) => {
            log::warn!("Ignoring unreadable value for {}: {:?}", key, raw);
            default
        }
        None => default,
    }
}

/// JSON-encoded value, `None` when missing or garbled
pub fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable value for {}: {}", key, e);
            None
        }
    }
}

pub fn write_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to encode {}: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_read_u64_falls_back() {
        let mut store = MemoryStore::new();
        assert_eq!(read_u64(&store, keys::COINS, 500), 500);
        store.set(keys::COINS, "42");
        assert_eq!(read_u64(&store, keys::COINS, 500), 42);
        store.set(keys::COINS, "lots");
        assert_eq!(read_u64(&store, keys::COINS, 500), 500);
    }

    #[test]
    fn test_read_bool() {
        let mut store = MemoryStore::new();
        assert!(read_bool(&store, keys::SOUND, true));
        store.set(keys::SOUND, "false");
        assert!(!read_bool(&store, keys::SOUND, true));
    }

    #[test]
    fn test_sets_are_json_arrays() {
        let mut store = MemoryStore::new();
        let owned: BTreeSet<String> = ["light".to_string(), "dark".to_string()].into();
        write_json(&mut store, keys::OWNED_THEMES, &owned);
        assert_eq!(store.get(keys::OWNED_THEMES).as_deref(), Some(r#"["dark","light"]"#));
        let back: Option<BTreeSet<String>> = read_json(&store, keys::OWNED_THEMES);
        assert_eq!(back, Some(owned));
    }

    #[test]
    fn test_garbled_json_is_none() {
        let mut store = MemoryStore::new();
        store.set(keys::OWNED_SKINS, "{not json");
        assert_eq!(read_json::<Vec<String>>(&store, keys::OWNED_SKINS), None);
    }
}
