//! Capability set shared by the player, companions and enemies.

use super::derived_stats::DerivedStats;
use super::element::Element;
use super::skills::{Skill, SkillId};
use serde::{Deserialize, Serialize};

/// Current hp/mp and the transient defend flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: u32,
    pub mp: u32,
    #[serde(default)]
    pub defending: bool,
}

impl Vitals {
    pub fn full(stats: &DerivedStats) -> Self {
        Self {
            hp: stats.max_hp,
            mp: stats.max_mp,
            defending: false,
        }
    }

    /// Clamps current values into the new maxima without refilling them.
    pub fn clamp_to(&mut self, stats: &DerivedStats) {
        self.hp = self.hp.min(stats.max_hp);
        self.mp = self.mp.min(stats.max_mp);
    }

    pub fn restore_full(&mut self, stats: &DerivedStats) {
        self.hp = stats.max_hp;
        self.mp = stats.max_mp;
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn spend_mp(&mut self, cost: u32) {
        self.mp = self.mp.saturating_sub(cost);
    }
}

pub trait Combatant {
    fn name(&self) -> &str;
    fn element(&self) -> Element;
    fn level(&self) -> u32;
    fn stats(&self) -> &DerivedStats;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;
    fn skills(&self) -> &[Skill];

    fn hp(&self) -> u32 {
        self.vitals().hp
    }

    fn mp(&self) -> u32 {
        self.vitals().mp
    }

    fn is_alive(&self) -> bool {
        self.vitals().hp > 0
    }

    fn is_defending(&self) -> bool {
        self.vitals().defending
    }

    fn hp_ratio(&self) -> f64 {
        let max_hp = self.stats().max_hp.max(1);
        self.vitals().hp as f64 / max_hp as f64
    }

    fn find_skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills().iter().find(|s| s.id == id)
    }

    fn can_afford(&self, skill: &Skill) -> bool {
        self.vitals().mp >= skill.mp_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::Attributes;

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut vitals = Vitals {
            hp: 10,
            mp: 5,
            defending: false,
        };
        vitals.take_damage(25);
        assert_eq!(vitals.hp, 0);
        vitals.spend_mp(8);
        assert_eq!(vitals.mp, 0);
    }

    #[test]
    fn test_clamp_keeps_damage_taken() {
        let stats = DerivedStats::from_attributes(&Attributes::new(), 1);
        let mut vitals = Vitals {
            hp: 40,
            mp: 500,
            defending: false,
        };
        vitals.clamp_to(&stats);
        assert_eq!(vitals.hp, 40);
        assert_eq!(vitals.mp, stats.max_mp);
    }
}
