//! Hit and damage resolution.
//!
//! These functions only read their inputs. The caller applies the returned
//! damage, mp cost and defend-flag consumption.

use crate::character::{is_advantageous, Combatant, Skill};
use crate::core::constants::*;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub enum AttackMode<'a> {
    Physical,
    Skill(&'a Skill),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    pub hit: bool,
    pub damage: u32,
    /// Elemental advantage applied.
    pub advantage: bool,
    /// The defender was defending; the caller must clear the flag.
    pub consumed_defend: bool,
}

impl AttackOutcome {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Rolls the hit check. `hit_rate` is a 0-100 percentage.
pub fn roll_hit(hit_rate: u32, rng: &mut impl Rng) -> bool {
    rng.gen_range(0.0..100.0) < hit_rate as f64
}

/// Damage for an attack that has already hit.
pub fn calculate_damage(
    attacker: &dyn Combatant,
    defender: &dyn Combatant,
    mode: AttackMode<'_>,
) -> AttackOutcome {
    let stats = attacker.stats();

    let (mut damage, attack_element, defense_factor) = match mode {
        AttackMode::Physical => (
            stats.attack as f64,
            attacker.element(),
            PHYSICAL_DEFENSE_FACTOR,
        ),
        AttackMode::Skill(skill) => {
            let mut base =
                (stats.attack as f64 * skill.damage_multiplier * stats.magic_damage).floor();
            if let Some(spell) = &stats.spell_damage {
                base = (base * spell.get(skill.element)).floor();
            }
            (base, skill.element, SKILL_DEFENSE_FACTOR)
        }
    };

    let advantage = is_advantageous(attack_element, defender.element());
    if advantage {
        damage = (damage * ELEMENT_ADVANTAGE_MULTIPLIER).floor();
    }

    let mitigation = (defender.stats().defense as f64 * defense_factor).floor();
    damage = (damage - mitigation).floor().max(1.0);

    if let AttackMode::Skill(skill) = mode {
        if let Some(resistance) = &defender.stats().spell_resistance {
            let res = resistance.get(skill.element).clamp(0.0, 1.0);
            damage = (damage * (1.0 - res)).floor().max(1.0);
        }
    }

    let consumed_defend = defender.is_defending();
    if consumed_defend {
        damage = (damage / 2.0).floor().max(1.0);
    }

    AttackOutcome {
        hit: true,
        damage: damage as u32,
        advantage,
        consumed_defend,
    }
}

/// Rolls to hit, then computes damage. A miss has no side effects.
pub fn resolve_attack(
    attacker: &dyn Combatant,
    defender: &dyn Combatant,
    mode: AttackMode<'_>,
    rng: &mut impl Rng,
) -> AttackOutcome {
    if !roll_hit(attacker.stats().hit_rate, rng) {
        return AttackOutcome::miss();
    }
    calculate_damage(attacker, defender, mode)
}
