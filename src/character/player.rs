use super::attributes::{AttributeType, Attributes};
use super::combatant::{Combatant, Vitals};
use super::derived_stats::{Aptitude, DerivedStats};
use super::element::{AffinityPoints, Element};
use super::progression::player_exp_max;
use super::skills::{get_sect, Skill, SkillId};
use crate::core::constants::*;
use crate::core::error::{BattleError, Result};
use crate::items::Equipment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub exp: u64,
    pub exp_max: u64,
    pub attribute_points: u32,
    pub attributes: Attributes,
    pub stats: DerivedStats,
    pub vitals: Vitals,
    /// Element of the joined sect, if any.
    #[serde(default)]
    pub sect: Option<Element>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub affinity: AffinityPoints,
    #[serde(default)]
    pub equipment: Equipment,
}

impl Player {
    pub fn new(name: impl Into<String>, element: Element) -> Self {
        let attributes = Attributes::new();
        let stats = DerivedStats::from_attributes(&attributes, 1);
        Self {
            name: name.into(),
            element,
            level: 1,
            exp: 0,
            exp_max: player_exp_max(1),
            attribute_points: STARTING_ATTRIBUTE_POINTS,
            attributes,
            vitals: Vitals::full(&stats),
            stats,
            sect: None,
            skills: Vec::new(),
            affinity: AffinityPoints::default(),
            equipment: Equipment::new(),
        }
    }

    /// Re-derives combat stats, clamping current hp/mp to the new maxima.
    pub fn recalculate_stats(&mut self) {
        let affinity = (self.affinity.total() > 0).then_some(&self.affinity);
        self.stats = DerivedStats::calculate_derived_stats(
            &self.attributes,
            self.level,
            affinity,
            &self.equipment.total_bonus(),
            &Aptitude::default(),
        );
        self.vitals.clamp_to(&self.stats);
    }

    pub fn restore_full(&mut self) {
        self.vitals.restore_full(&self.stats);
    }

    pub fn allocate_point(&mut self, attr: AttributeType) -> Result<()> {
        if self.attribute_points == 0 {
            return Err(BattleError::InvalidAction(
                "no unspent attribute points".to_string(),
            ));
        }
        self.attribute_points -= 1;
        self.attributes.increment(attr);
        self.recalculate_stats();
        Ok(())
    }

    /// Joins the sect of the player's own element.
    pub fn join_sect(&mut self) -> Result<()> {
        if self.sect.is_some() {
            return Err(BattleError::InvalidAction("already in a sect".to_string()));
        }
        if self.level < SECT_JOIN_LEVEL {
            return Err(BattleError::InvalidAction(format!(
                "joining a sect requires level {SECT_JOIN_LEVEL}"
            )));
        }
        self.sect = Some(self.element);
        Ok(())
    }

    pub fn learn_skill(&mut self, id: SkillId) -> Result<()> {
        let Some(sect) = self.sect else {
            return Err(BattleError::InvalidAction("not in a sect".to_string()));
        };
        let Some(skill) = get_sect(sect).skills.into_iter().find(|s| s.id == id) else {
            return Err(BattleError::InvalidAction(format!(
                "skill {id} is not taught by this sect"
            )));
        };
        if self.skills.iter().any(|s| s.id == id) {
            return Err(BattleError::InvalidAction(format!(
                "{} already learned",
                skill.name
            )));
        }
        if self.level < skill.level_req {
            return Err(BattleError::InvalidAction(format!(
                "{} requires level {}",
                skill.name, skill.level_req
            )));
        }
        self.skills.push(skill);
        Ok(())
    }

    pub fn set_affinity(&mut self, affinity: AffinityPoints) {
        self.affinity = affinity;
        self.recalculate_stats();
    }

    pub fn set_equipment(&mut self, equipment: Equipment) {
        self.equipment = equipment;
        self.recalculate_stats();
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn element(&self) -> Element {
        self.element
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipmentBonus, EquipmentPiece, EquipmentSlot};

    #[test]
    fn test_new_player() {
        let player = Player::new("Li", Element::Metal);
        assert_eq!(player.level, 1);
        assert_eq!(player.exp_max, 100);
        assert_eq!(player.attribute_points, 5);
        assert_eq!(player.vitals.hp, player.stats.max_hp);
        assert_eq!(player.vitals.mp, player.stats.max_mp);
        assert!(player.skills.is_empty());
    }

    #[test]
    fn test_allocate_point_keeps_damage() {
        let mut player = Player::new("Li", Element::Metal);
        player.vitals.hp = 50;
        player.allocate_point(AttributeType::Constitution).unwrap();
        assert_eq!(player.attribute_points, 4);
        assert_eq!(player.attributes.constitution(), 6);
        assert_eq!(player.stats.max_hp, 192);
        assert_eq!(player.vitals.hp, 50);
    }

    #[test]
    fn test_allocate_point_without_points() {
        let mut player = Player::new("Li", Element::Metal);
        player.attribute_points = 0;
        let before = player.attributes;
        assert!(player.allocate_point(AttributeType::Strength).is_err());
        assert_eq!(player.attributes, before);
    }

    #[test]
    fn test_join_sect_requires_level() {
        let mut player = Player::new("Li", Element::Fire);
        assert!(player.join_sect().is_err());
        player.level = 10;
        player.join_sect().unwrap();
        assert_eq!(player.sect, Some(Element::Fire));
        assert!(player.join_sect().is_err());
    }

    #[test]
    fn test_learn_skill_rules() {
        let mut player = Player::new("Li", Element::Fire);
        assert!(player.learn_skill(41).is_err());
        player.level = 12;
        player.join_sect().unwrap();
        player.learn_skill(41).unwrap();
        // already known
        assert!(player.learn_skill(41).is_err());
        // level 15 tier
        assert!(player.learn_skill(42).is_err());
        // another sect's skill
        assert!(player.learn_skill(11).is_err());
        assert_eq!(player.skills.len(), 1);
    }

    #[test]
    fn test_equipment_changes_stats() {
        let mut player = Player::new("Li", Element::Metal);
        let base_attack = player.stats.attack;
        let mut equipment = Equipment::new();
        equipment.equip(EquipmentPiece {
            name: "Iron Sword".to_string(),
            slot: EquipmentSlot::Weapon,
            bonus: EquipmentBonus {
                attack: 8,
                ..Default::default()
            },
        });
        player.set_equipment(equipment);
        assert_eq!(player.stats.attack, base_attack + 8);
    }
}
