use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
    Boots,
    Accessory,
}

/// Flat stat bonuses carried by one equipment piece, or summed across a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonus {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub max_hp: u32,
    pub max_mp: u32,
    pub strength: u32,
    pub constitution: u32,
    pub spirit: u32,
    pub agility: u32,
}

impl EquipmentBonus {
    pub fn sum<'a>(bonuses: impl IntoIterator<Item = &'a EquipmentBonus>) -> Self {
        bonuses
            .into_iter()
            .fold(EquipmentBonus::default(), |acc, b| acc + *b)
    }
}

impl Add for EquipmentBonus {
    type Output = EquipmentBonus;

    fn add(self, rhs: EquipmentBonus) -> EquipmentBonus {
        EquipmentBonus {
            attack: self.attack + rhs.attack,
            defense: self.defense + rhs.defense,
            speed: self.speed + rhs.speed,
            max_hp: self.max_hp + rhs.max_hp,
            max_mp: self.max_mp + rhs.max_mp,
            strength: self.strength + rhs.strength,
            constitution: self.constitution + rhs.constitution,
            spirit: self.spirit + rhs.spirit,
            agility: self.agility + rhs.agility,
        }
    }
}

impl AddAssign for EquipmentBonus {
    fn add_assign(&mut self, rhs: EquipmentBonus) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPiece {
    pub name: String,
    pub slot: EquipmentSlot,
    pub bonus: EquipmentBonus,
}

/// Equipped pieces, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub weapon: Option<EquipmentPiece>,
    pub armor: Option<EquipmentPiece>,
    pub helmet: Option<EquipmentPiece>,
    pub boots: Option<EquipmentPiece>,
    pub accessory: Option<EquipmentPiece>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<EquipmentPiece> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Helmet => &self.helmet,
            EquipmentSlot::Boots => &self.boots,
            EquipmentSlot::Accessory => &self.accessory,
        }
    }

    /// Puts `piece` into its slot, returning whatever was there before.
    pub fn equip(&mut self, piece: EquipmentPiece) -> Option<EquipmentPiece> {
        let slot = match piece.slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Boots => &mut self.boots,
            EquipmentSlot::Accessory => &mut self.accessory,
        };
        slot.replace(piece)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &EquipmentPiece> {
        [
            &self.weapon,
            &self.armor,
            &self.helmet,
            &self.boots,
            &self.accessory,
        ]
        .into_iter()
        .filter_map(|piece| piece.as_ref())
    }

    /// Sum of every equipped piece's bonus.
    pub fn total_bonus(&self) -> EquipmentBonus {
        EquipmentBonus::sum(self.iter_equipped().map(|p| &p.bonus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(slot: EquipmentSlot, bonus: EquipmentBonus) -> EquipmentPiece {
        EquipmentPiece {
            name: format!("{:?}", slot),
            slot,
            bonus,
        }
    }

    #[test]
    fn test_empty_equipment_has_no_bonus() {
        assert_eq!(Equipment::new().total_bonus(), EquipmentBonus::default());
    }

    #[test]
    fn test_total_bonus_sums_slots() {
        let mut equipment = Equipment::new();
        equipment.equip(piece(
            EquipmentSlot::Weapon,
            EquipmentBonus {
                attack: 10,
                strength: 2,
                ..Default::default()
            },
        ));
        equipment.equip(piece(
            EquipmentSlot::Helmet,
            EquipmentBonus {
                defense: 5,
                constitution: 1,
                max_hp: 20,
                ..Default::default()
            },
        ));

        let total = equipment.total_bonus();
        assert_eq!(total.attack, 10);
        assert_eq!(total.strength, 2);
        assert_eq!(total.defense, 5);
        assert_eq!(total.constitution, 1);
        assert_eq!(total.max_hp, 20);
    }

    #[test]
    fn test_equip_replaces_same_slot() {
        let mut equipment = Equipment::new();
        let first = piece(
            EquipmentSlot::Boots,
            EquipmentBonus {
                speed: 3,
                ..Default::default()
            },
        );
        let second = piece(
            EquipmentSlot::Boots,
            EquipmentBonus {
                speed: 5,
                ..Default::default()
            },
        );
        assert!(equipment.equip(first.clone()).is_none());
        assert_eq!(equipment.equip(second), Some(first));
        assert_eq!(equipment.total_bonus().speed, 5);
        assert_eq!(equipment.iter_equipped().count(), 1);
    }
}
