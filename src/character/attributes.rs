use crate::core::constants::STARTING_ATTRIBUTE_VALUE;
use serde::{Deserialize, Serialize};

pub const NUM_ATTRIBUTES: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Physical attack and hit rate.
    Strength,
    /// Max hp and defense.
    Constitution,
    /// Max mp and magic damage.
    Spirit,
    /// Speed (initiative).
    Agility,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_ATTRIBUTES] {
        [
            AttributeType::Strength,
            AttributeType::Constitution,
            AttributeType::Spirit,
            AttributeType::Agility,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            AttributeType::Strength => 0,
            AttributeType::Constitution => 1,
            AttributeType::Spirit => 2,
            AttributeType::Agility => 3,
        }
    }
}

/// Base attributes shared by every combatant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    values: [u32; NUM_ATTRIBUTES],
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    /// Starting attributes for a fresh character.
    pub fn new() -> Self {
        Self {
            values: [STARTING_ATTRIBUTE_VALUE; NUM_ATTRIBUTES],
        }
    }

    pub fn from_values(strength: u32, constitution: u32, spirit: u32, agility: u32) -> Self {
        Self {
            values: [strength, constitution, spirit, agility],
        }
    }

    pub fn get(&self, attr: AttributeType) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: AttributeType, value: u32) {
        self.values[attr.index()] = value;
    }

    pub fn increment(&mut self, attr: AttributeType) {
        self.values[attr.index()] = self.values[attr.index()].saturating_add(1);
    }

    pub fn strength(&self) -> u32 {
        self.get(AttributeType::Strength)
    }

    pub fn constitution(&self) -> u32 {
        self.get(AttributeType::Constitution)
    }

    pub fn spirit(&self) -> u32 {
        self.get(AttributeType::Spirit)
    }

    pub fn agility(&self) -> u32 {
        self.get(AttributeType::Agility)
    }

    /// Scales every attribute by `multiplier`, rounding and keeping at least 1.
    /// Used for baby enemies, whose base attributes grow faster.
    pub fn scaled(&self, multiplier: f64) -> Self {
        let mut values = self.values;
        for v in values.iter_mut() {
            *v = ((*v as f64 * multiplier).round() as u32).max(1);
        }
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attributes() {
        let attrs = Attributes::new();
        for attr_type in AttributeType::all() {
            assert_eq!(attrs.get(attr_type), 5);
        }
    }

    #[test]
    fn test_get_set() {
        let mut attrs = Attributes::new();
        attrs.set(AttributeType::Strength, 16);
        assert_eq!(attrs.strength(), 16);
        assert_eq!(attrs.agility(), 5);
    }

    #[test]
    fn test_increment() {
        let mut attrs = Attributes::new();
        attrs.increment(AttributeType::Spirit);
        assert_eq!(attrs.spirit(), 6);
    }

    #[test]
    fn test_from_values_order() {
        let attrs = Attributes::from_values(1, 2, 3, 4);
        assert_eq!(attrs.strength(), 1);
        assert_eq!(attrs.constitution(), 2);
        assert_eq!(attrs.spirit(), 3);
        assert_eq!(attrs.agility(), 4);
    }

    #[test]
    fn test_scaled_rounds_and_floors_at_one() {
        let attrs = Attributes::from_values(3, 4, 2, 0);
        let baby = attrs.scaled(1.4);
        // 4.2 -> 4, 5.6 -> 6, 2.8 -> 3, 0 -> 1
        assert_eq!(baby, Attributes::from_values(4, 6, 3, 1));
    }
}
