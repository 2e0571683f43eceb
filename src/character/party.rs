use super::companion::{Companion, CompanionId};
use super::player::Player;
use crate::core::constants::*;
use crate::core::error::{BattleError, Result};
use crate::items::{SMALL_HP, SMALL_MP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the battle engine reads and writes outside a single encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub player: Player,
    pub companions: Vec<Companion>,
    pub active_companion: Option<CompanionId>,
    pub inventory: BTreeMap<String, u32>,
    pub money: u64,
    pub current_zone: String,
    next_companion_id: CompanionId,
}

impl Party {
    pub fn new(player: Player) -> Self {
        let mut inventory = BTreeMap::new();
        inventory.insert(SMALL_HP.to_string(), STARTING_SMALL_HP);
        inventory.insert(SMALL_MP.to_string(), STARTING_SMALL_MP);
        Self {
            player,
            companions: Vec::new(),
            active_companion: None,
            inventory,
            money: STARTING_MONEY,
            current_zone: "town".to_string(),
            next_companion_id: 1,
        }
    }

    pub fn next_companion_id(&self) -> CompanionId {
        self.next_companion_id
    }

    /// Adds a companion to the stable, assigning it a fresh id.
    pub fn add_companion(&mut self, mut companion: Companion) -> CompanionId {
        let id = self.next_companion_id;
        self.next_companion_id += 1;
        companion.id = id;
        self.companions.push(companion);
        id
    }

    pub fn companion(&self, id: CompanionId) -> Option<&Companion> {
        self.companions.iter().find(|c| c.id == id)
    }

    pub fn companion_mut(&mut self, id: CompanionId) -> Option<&mut Companion> {
        self.companions.iter_mut().find(|c| c.id == id)
    }

    pub fn active_companion(&self) -> Option<&Companion> {
        self.active_companion.and_then(|id| self.companion(id))
    }

    pub fn active_companion_mut(&mut self) -> Option<&mut Companion> {
        let id = self.active_companion?;
        self.companion_mut(id)
    }

    pub fn set_active_companion(&mut self, id: Option<CompanionId>) -> Result<()> {
        if let Some(id) = id {
            if self.companion(id).is_none() {
                return Err(BattleError::InvalidAction(format!("no companion {id}")));
            }
        }
        self.active_companion = id;
        Ok(())
    }

    pub fn item_count(&self, item_id: &str) -> u32 {
        self.inventory.get(item_id).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item_id: &str, count: u32) {
        *self.inventory.entry(item_id.to_string()).or_insert(0) += count;
    }

    /// Removes one of `item_id`, dropping the entry when it runs out.
    pub fn take_item(&mut self, item_id: &str) -> Result<()> {
        match self.inventory.get_mut(item_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.inventory.remove(item_id);
                }
                Ok(())
            }
            _ => Err(BattleError::ItemUnavailable(item_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Attributes;
    use crate::character::derived_stats::Aptitude;
    use crate::character::element::Element;

    fn party() -> Party {
        Party::new(Player::new("Li", Element::Metal))
    }

    fn frog() -> Companion {
        Companion::new(
            0,
            "Frog",
            Element::Water,
            2,
            Attributes::from_values(2, 3, 4, 4),
            Aptitude::default(),
            Vec::new(),
        )
    }

    #[test]
    fn test_starting_party() {
        let party = party();
        assert_eq!(party.money, 1000);
        assert_eq!(party.item_count(SMALL_HP), 5);
        assert_eq!(party.item_count(SMALL_MP), 3);
        assert!(party.active_companion().is_none());
    }

    #[test]
    fn test_add_companion_assigns_unique_ids() {
        let mut party = party();
        let a = party.add_companion(frog());
        let b = party.add_companion(frog());
        assert_ne!(a, b);
        assert_eq!(party.companions.len(), 2);
        assert!(party.active_companion.is_none());
    }

    #[test]
    fn test_set_active_companion() {
        let mut party = party();
        let id = party.add_companion(frog());
        party.set_active_companion(Some(id)).unwrap();
        assert_eq!(party.active_companion().map(|c| c.id), Some(id));
        assert!(party.set_active_companion(Some(99)).is_err());
        assert_eq!(party.active_companion, Some(id));
    }

    #[test]
    fn test_take_item() {
        let mut party = party();
        party.add_item("large_hp", 1);
        party.take_item("large_hp").unwrap();
        assert_eq!(party.item_count("large_hp"), 0);
        assert!(!party.inventory.contains_key("large_hp"));
        assert_eq!(
            party.take_item("large_hp"),
            Err(BattleError::ItemUnavailable("large_hp".to_string()))
        );
    }
}
