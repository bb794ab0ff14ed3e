//! Item catalog and the player's inventory/stash
//!
//! The loadout is a plain resource created at startup and dropped at
//! shutdown; UI code reads it and asks it to move stacks between the two
//! mappings.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, ControllerResult};

pub const STARTING_HEALTH: i32 = 100;
pub const STARTING_SHIELD: i32 = 50;
pub const STARTING_INVENTORY_AMOUNT: u32 = 3;
pub const STARTING_STASH_AMOUNT: u32 = 2;

// =============================================================================
// ITEMS
// =============================================================================

/// Which pool a consumable restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HealKind {
    #[default]
    Health,
    Shield,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub heal_kind: HealKind,
    /// Consumables only.
    #[serde(default)]
    pub heal_amount: i32,
    /// Weapons only.
    #[serde(default)]
    pub damage: i32,
}

impl ItemDef {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            heal_kind: HealKind::Health,
            heal_amount: 0,
            damage: 0,
        }
    }

    pub fn heals(mut self, kind: HealKind, amount: i32) -> Self {
        self.heal_kind = kind;
        self.heal_amount = amount;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    /// UI tint
    pub fn color(&self) -> Color {
        if self.damage > 0 {
            Color::srgb(0.75, 0.30, 0.15)
        } else {
            match self.heal_kind {
                HealKind::Health => Color::srgb(0.35, 0.75, 0.35),
                HealKind::Shield => Color::srgb(0.30, 0.55, 0.85),
            }
        }
    }
}

/// Every item the game knows about.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDef>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self {
            items: vec![
                ItemDef::new("bandage", "Bandage").heals(HealKind::Health, 25),
                ItemDef::new("shield_cell", "Shield Cell").heals(HealKind::Shield, 25),
                ItemDef::new("combat_knife", "Combat Knife").with_damage(35),
            ],
        }
    }
}

impl ItemCatalog {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|item| item.label.as_str()).unwrap_or(id)
    }
}

// =============================================================================
// LOADOUT
// =============================================================================

/// Which side of the loadout a stack lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    Inventory,
    Stash,
}

impl Storage {
    pub fn other(self) -> Self {
        match self {
            Storage::Inventory => Storage::Stash,
            Storage::Stash => Storage::Inventory,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub health: i32,
    pub shield: i32,
    inventory: BTreeMap<String, u32>,
    stash: BTreeMap<String, u32>,
}

impl Loadout {
    pub fn empty() -> Self {
        Self {
            health: STARTING_HEALTH,
            shield: STARTING_SHIELD,
            ..default()
        }
    }

    /// Starting loadout: a few of everything carried, a couple more stashed.
    pub fn seeded(catalog: &ItemCatalog) -> Self {
        let mut loadout = Self::empty();
        for item in &catalog.items {
            loadout.inventory.insert(item.id.clone(), STARTING_INVENTORY_AMOUNT);
            loadout.stash.insert(item.id.clone(), STARTING_STASH_AMOUNT);
        }
        loadout
    }

    fn storage(&self, storage: Storage) -> &BTreeMap<String, u32> {
        match storage {
            Storage::Inventory => &self.inventory,
            Storage::Stash => &self.stash,
        }
    }

    fn storage_mut(&mut self, storage: Storage) -> &mut BTreeMap<String, u32> {
        match storage {
            Storage::Inventory => &mut self.inventory,
            Storage::Stash => &mut self.stash,
        }
    }

    /// Entries sorted by item id.
    pub fn entries(&self, storage: Storage) -> impl Iterator<Item = (&str, u32)> {
        self.storage(storage).iter().map(|(id, amount)| (id.as_str(), *amount))
    }

    pub fn amount(&self, storage: Storage, id: &str) -> u32 {
        self.storage(storage).get(id).copied().unwrap_or(0)
    }

    pub fn add(&mut self, storage: Storage, id: &str, amount: u32) {
        *self.storage_mut(storage).entry(id.to_string()).or_insert(0) += amount;
    }

    /// Move the whole `id` stack out of `from` into the other side.
    /// Returns how many were moved.
    pub fn transfer(&mut self, from: Storage, id: &str) -> ControllerResult<u32> {
        let amount = self
            .storage_mut(from)
            .remove(id)
            .ok_or_else(|| ControllerError::UnknownItem(id.to_string()))?;
        self.add(from.other(), id, amount);
        info!("Moved {}x {} from {:?} to {:?}", amount, id, from, from.other());
        Ok(amount)
    }

    pub fn transfer_to_stash(&mut self, id: &str) -> ControllerResult<u32> {
        self.transfer(Storage::Inventory, id)
    }

    pub fn transfer_to_inventory(&mut self, id: &str) -> ControllerResult<u32> {
        self.transfer(Storage::Stash, id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
