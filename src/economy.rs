//! Coins and cosmetic ownership
//!
//! The catalogue (ids and prices) belongs to the UI; the economy only checks
//! balances and ownership.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::consts::{STARTING_COINS, VIP_COINS};
use crate::error::EconomyError;
use crate::persistence::{KeyValueStore, keys, read_bool, read_json, read_u64, write_json};

pub const DEFAULT_THEMES: [&str; 2] = ["dark", "light"];
pub const DEFAULT_SKINS: [&str; 1] = ["peshmerga"];
pub const VIP_THEMES: [&str; 2] = ["galaxy", "vip"];
pub const VIP_SKINS: [&str; 7] = ["golden", "shadow", "neon", "diamond", "phoenix", "void", "vip"];

/// Kind of cosmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Theme,
    Skin,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Theme => "theme",
            ItemKind::Skin => "skin",
        }
    }
}

fn owned_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Economy {
    pub coins: u64,
    pub owned_themes: BTreeSet<String>,
    pub owned_skins: BTreeSet<String>,
    pub vip: bool,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            owned_themes: owned_set(&DEFAULT_THEMES),
            owned_skins: owned_set(&DEFAULT_SKINS),
            vip: false,
        }
    }
}

impl Economy {
    fn owned(&self, kind: ItemKind) -> &BTreeSet<String> {
        match kind {
            ItemKind::Theme => &self.owned_themes,
            ItemKind::Skin => &self.owned_skins,
        }
    }

    fn owned_mut(&mut self, kind: ItemKind) -> &mut BTreeSet<String> {
        match kind {
            ItemKind::Theme => &mut self.owned_themes,
            ItemKind::Skin => &mut self.owned_skins,
        }
    }

    pub fn owns(&self, kind: ItemKind, id: &str) -> bool {
        self.owned(kind).contains(id)
    }

    pub fn credit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Debit `cost` and take ownership of `id`
    pub fn buy(&mut self, kind: ItemKind, id: &str, cost: u64) -> Result<(), EconomyError> {
        if self.owns(kind, id) {
            return Err(EconomyError::AlreadyOwned {
                kind,
                id: id.to_string(),
            });
        }
        if self.coins < cost {
            return Err(EconomyError::InsufficientFunds {
                needed: cost,
                available: self.coins,
            });
        }
        self.coins -= cost;
        self.owned_mut(kind).insert(id.to_string());
        log::info!("Bought {} '{}' for {} coins", kind.as_str(), id, cost);
        Ok(())
    }

    /// Ownership check for a selection
    pub fn require_owned(&self, kind: ItemKind, id: &str) -> Result<(), EconomyError> {
        if self.owns(kind, id) {
            Ok(())
        } else {
            Err(EconomyError::NotOwned {
                kind,
                id: id.to_string(),
            })
        }
    }

    /// VIP: top up the balance and grant the VIP sets
    pub fn unlock_vip(&mut self) {
        self.vip = true;
        self.coins = VIP_COINS;
        self.owned_themes.extend(VIP_THEMES.iter().map(|s| s.to_string()));
        self.owned_skins.extend(VIP_SKINS.iter().map(|s| s.to_string()));
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        let mut economy = Self {
            coins: read_u64(store, keys::COINS, defaults.coins),
            owned_themes: read_json(store, keys::OWNED_THEMES).unwrap_or(defaults.owned_themes),
            owned_skins: read_json(store, keys::OWNED_SKINS).unwrap_or(defaults.owned_skins),
            vip: read_bool(store, keys::VIP, false),
        };
        if economy.vip {
            economy.unlock_vip();
        }
        log::info!(
            "Loaded economy: {} coins, {} themes, {} skins{}",
            economy.coins,
            economy.owned_themes.len(),
            economy.owned_skins.len(),
            if economy.vip { " (VIP)" } else { "" }
        );
        economy
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(keys::COINS, &self.coins.to_string());
        write_json(store, keys::OWNED_THEMES, &self.owned_themes);
        write_json(store, keys::OWNED_SKINS, &self.owned_skins);
        store.set(keys::VIP, if self.vip { "true" } else { "false" });
    }
}
