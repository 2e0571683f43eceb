use super::attributes::Attributes;
use super::element::{AffinityBonus, AffinityPoints, ElementMap};
use crate::core::constants::*;
use crate::items::EquipmentBonus;
use serde::{Deserialize, Serialize};

/// Growth and aptitude multipliers. Only companions carry values other than 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Aptitude {
    pub growth: f64,
    pub attack: f64,
    pub defense: f64,
    pub magic: f64,
}

impl Default for Aptitude {
    fn default() -> Self {
        Self {
            growth: 1.0,
            attack: 1.0,
            defense: 1.0,
            magic: 1.0,
        }
    }
}

impl Aptitude {
    pub fn with_growth(growth: f64) -> Self {
        Self {
            growth,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DerivedStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub max_hp: u32,
    pub max_mp: u32,
    /// Percent chance to land a hit, 0-100.
    pub hit_rate: u32,
    /// Multiplier applied to skill damage, always >= 1.0.
    pub magic_damage: f64,
    /// Per-element spell damage multipliers from affinity points.
    pub spell_damage: Option<ElementMap<f64>>,
    /// Per-element spell resistance fractions from affinity points.
    pub spell_resistance: Option<ElementMap<f64>>,
}

impl DerivedStats {
    /// Derives combat stats from base attributes and level, with no
    /// equipment, affinity or aptitude modifiers.
    pub fn from_attributes(attrs: &Attributes, level: u32) -> Self {
        Self::calculate_derived_stats(
            attrs,
            level,
            None,
            &EquipmentBonus::default(),
            &Aptitude::default(),
        )
    }

    /// Calculates derived stats.
    ///
    /// Base terms scale with attributes, level and aptitude. Equipment adds
    /// flat and attribute-scaled terms afterwards, then affinity points apply
    /// their flat bonuses and the attack/magic multipliers. Everything except
    /// `magic_damage` is floored.
    pub fn calculate_derived_stats(
        attrs: &Attributes,
        level: u32,
        affinity: Option<&AffinityPoints>,
        equipment: &EquipmentBonus,
        aptitude: &Aptitude,
    ) -> Self {
        let growth = aptitude.growth;
        let level = level as f64;
        let strength = attrs.strength() as f64;
        let constitution = attrs.constitution() as f64;
        let spirit = attrs.spirit() as f64;
        let agility = attrs.agility() as f64;

        let mut attack =
            BASE_ATTACK + strength * ATTACK_PER_STRENGTH * aptitude.attack * growth + level * growth;
        let mut defense = BASE_DEFENSE
            + (constitution * DEFENSE_PER_CONSTITUTION * aptitude.defense * growth).floor()
            + level * DEFENSE_SPEED_PER_LEVEL * growth;
        let mut speed = BASE_SPEED
            + (agility * SPEED_PER_AGILITY * growth).floor()
            + level * DEFENSE_SPEED_PER_LEVEL * growth;
        let mut max_hp =
            BASE_MAX_HP + constitution * HP_PER_CONSTITUTION * growth + level * HP_PER_LEVEL * growth;
        let mut max_mp = BASE_MAX_MP
            + spirit * MP_PER_SPIRIT * aptitude.magic * growth
            + level * MP_PER_LEVEL * growth;
        let hit_rate = BASE_HIT_RATE + strength * HIT_RATE_PER_STRENGTH;
        let mut magic_damage = 1.0 + spirit * MAGIC_DAMAGE_PER_SPIRIT * aptitude.magic;

        // Equipment: flat terms plus attribute-scaled terms
        attack += equipment.attack as f64 + equipment.strength as f64 * ATTACK_PER_STRENGTH;
        defense +=
            equipment.defense as f64 + equipment.constitution as f64 * DEFENSE_PER_CONSTITUTION;
        speed += equipment.speed as f64 + equipment.agility as f64 * SPEED_PER_AGILITY;
        max_hp += equipment.max_hp as f64 + equipment.constitution as f64 * HP_PER_CONSTITUTION;
        max_mp += equipment.max_mp as f64 + equipment.spirit as f64 * MP_PER_SPIRIT;

        let mut spell_damage = None;
        let mut spell_resistance = None;
        if let Some(points) = affinity {
            let bonus = AffinityBonus::from_points(points);
            attack *= bonus.attack_multiplier;
            defense += bonus.defense_bonus;
            speed += bonus.speed_bonus;
            max_hp += bonus.hp_bonus;
            magic_damage *= bonus.magic_multiplier;
            spell_damage = Some(bonus.spell_damage);
            spell_resistance = Some(bonus.spell_resistance);
        }

        Self {
            attack: attack.floor() as u32,
            defense: defense.floor() as u32,
            speed: speed.floor() as u32,
            max_hp: (max_hp.floor() as u32).max(1),
            max_mp: max_mp.floor() as u32,
            hit_rate: (hit_rate.floor() as u32).min(MAX_HIT_RATE),
            magic_damage,
            spell_damage,
            spell_resistance,
        }
    }
}
