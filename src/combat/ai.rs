//! Decision rules for units that act on their own.

use super::types::{Action, Enemy, UnitRef};
use crate::character::{Combatant, Companion, CompanionStance, Player, SkillId};
use crate::core::constants::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Enemy turn: random living target, sometimes a random affordable skill.
/// `targets` must only hold living player-side units.
pub fn enemy_decide(enemy: &Enemy, targets: &[UnitRef], rng: &mut impl Rng) -> Option<Action> {
    let target = *targets.choose(rng)?;

    if rng.gen::<f64>() < ENEMY_SKILL_CHANCE {
        let affordable: Vec<_> = enemy.skills.iter().filter(|s| enemy.can_afford(s)).collect();
        if let Some(skill) = affordable.choose(rng) {
            return Some(Action::Skill {
                skill_id: skill.id,
                target,
            });
        }
    }

    Some(Action::Attack { target })
}

/// Living enemy with the lowest current hp. Ties go to the earliest in roster order.
pub fn weakest_enemy<'a>(enemies: impl IntoIterator<Item = &'a Enemy>) -> Option<&'a Enemy> {
    enemies
        .into_iter()
        .filter(|e| e.is_alive())
        .fold(None, |best: Option<&Enemy>, e| match best {
            Some(b) if b.hp() <= e.hp() => Some(b),
            _ => Some(e),
        })
}

/// Companion turn. Defensive companions guard when low; otherwise they hit
/// the weakest enemy, with the preferred skill when mana allows.
pub fn companion_decide<'a>(
    companion: &Companion,
    enemies: impl IntoIterator<Item = &'a Enemy>,
    preferred_skill: Option<SkillId>,
) -> Option<Action> {
    if companion.stance == CompanionStance::Defensive
        && companion.hp_ratio() <= DEFENSIVE_STANCE_HP_RATIO
    {
        return Some(Action::Defend);
    }

    let target = UnitRef::Enemy(weakest_enemy(enemies)?.id);
    let skill = preferred_skill
        .or(companion.preferred_skill)
        .and_then(|id| companion.find_skill(id))
        .filter(|s| companion.can_afford(s));

    Some(match skill {
        Some(skill) => Action::Skill {
            skill_id: skill.id,
            target,
        },
        None => Action::Attack { target },
    })
}

/// Auto-battle player turn against `target`. Never chooses to defend.
pub fn auto_player_decide(
    player: &Player,
    target: &Enemy,
    auto_capture: bool,
    preferred_skill: Option<SkillId>,
) -> Action {
    if auto_capture && target.hp_ratio() <= AUTO_CAPTURE_HP_RATIO {
        return Action::Capture { target: target.id };
    }

    let unit = UnitRef::Enemy(target.id);
    match preferred_skill
        .and_then(|id| player.find_skill(id))
        .filter(|s| player.can_afford(s))
    {
        Some(skill) => Action::Skill {
            skill_id: skill.id,
            target: unit,
        },
        None => Action::Attack { target: unit },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Aptitude, Attributes, Element, Skill};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn water_bolt() -> Skill {
        Skill {
            id: 901,
            name: "Water Bolt".to_string(),
            element: Element::Water,
            mp_cost: 10,
            damage_multiplier: 1.3,
            level_req: 0,
        }
    }

    fn enemy(id: u32, hp: u32, skills: Vec<Skill>) -> Enemy {
        let mut enemy = Enemy::new(
            id,
            "frog",
            format!("Frog {id}"),
            Element::Water,
            2,
            Attributes::from_values(2, 3, 4, 4),
            skills,
        );
        enemy.vitals.hp = hp;
        enemy
    }

    fn companion() -> Companion {
        let mut companion = Companion::new(
            1,
            "Squirrel",
            Element::Wood,
            3,
            Attributes::from_values(3, 4, 2, 5),
            Aptitude::default(),
            vec![water_bolt()],
        );
        companion.skills[0].id = 902;
        companion
    }

    #[test]
    fn test_enemy_no_targets() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(enemy_decide(&enemy(0, 50, vec![]), &[], &mut rng).is_none());
    }

    #[test]
    fn test_enemy_skill_rate_near_thirty_percent() {
        let caster = enemy(0, 50, vec![water_bolt()]);
        let targets = [UnitRef::Player, UnitRef::Companion];
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let mut skills = 0;
        let mut hit_companion = 0;
        for _ in 0..10000 {
            match enemy_decide(&caster, &targets, &mut rng) {
                Some(Action::Skill { target, .. }) => {
                    skills += 1;
                    if target == UnitRef::Companion {
                        hit_companion += 1;
                    }
                }
                Some(Action::Attack { target }) => {
                    if target == UnitRef::Companion {
                        hit_companion += 1;
                    }
                }
                other => panic!("unexpected decision {other:?}"),
            }
        }
        assert!((2700..=3300).contains(&skills), "skills used {skills}");
        assert!(
            (4700..=5300).contains(&hit_companion),
            "companion targeted {hit_companion}"
        );
    }

    #[test]
    fn test_enemy_without_mana_attacks() {
        let mut caster = enemy(0, 50, vec![water_bolt()]);
        caster.vitals.mp = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let action = enemy_decide(&caster, &[UnitRef::Player], &mut rng);
            assert_eq!(
                action,
                Some(Action::Attack {
                    target: UnitRef::Player
                })
            );
        }
    }

    #[test]
    fn test_companion_targets_weakest() {
        let enemies = [enemy(0, 40, vec![]), enemy(1, 12, vec![]), enemy(2, 0, vec![])];
        let action = companion_decide(&companion(), &enemies, None);
        assert_eq!(
            action,
            Some(Action::Attack {
                target: UnitRef::Enemy(1)
            })
        );
    }

    #[test]
    fn test_companion_prefers_affordable_skill() {
        let enemies = [enemy(0, 40, vec![])];
        let mut pet = companion();
        let action = companion_decide(&pet, &enemies, Some(902));
        assert!(matches!(action, Some(Action::Skill { skill_id: 902, .. })));

        pet.vitals.mp = 5;
        let action = companion_decide(&pet, &enemies, Some(902));
        assert!(matches!(action, Some(Action::Attack { .. })));
    }

    #[test]
    fn test_defensive_companion_guards_when_low() {
        let enemies = [enemy(0, 40, vec![])];
        let mut pet = companion();
        pet.stance = CompanionStance::Defensive;
        pet.vitals.hp = pet.stats.max_hp * 3 / 10;
        assert_eq!(companion_decide(&pet, &enemies, None), Some(Action::Defend));

        pet.stance = CompanionStance::Aggressive;
        assert!(matches!(
            companion_decide(&pet, &enemies, None),
            Some(Action::Attack { .. })
        ));
    }

    #[test]
    fn test_auto_player_captures_weak_target() {
        let player = Player::new("Li", Element::Metal);
        let mut target = enemy(4, 0, vec![]);
        target.vitals.hp = target.stats.max_hp / 4;
        assert_eq!(
            auto_player_decide(&player, &target, true, None),
            Action::Capture { target: 4 }
        );
        assert_eq!(
            auto_player_decide(&player, &target, false, None),
            Action::Attack {
                target: UnitRef::Enemy(4)
            }
        );
    }

    #[test]
    fn test_auto_player_uses_known_skill() {
        let mut player = Player::new("Li", Element::Fire);
        player.level = 10;
        player.join_sect().unwrap();
        player.learn_skill(41).unwrap();
        let target = enemy(0, 50, vec![]);
        assert!(matches!(
            auto_player_decide(&player, &target, false, Some(41)),
            Action::Skill { skill_id: 41, .. }
        ));
        // unknown skill falls back to attack
        assert!(matches!(
            auto_player_decide(&player, &target, false, Some(42)),
            Action::Attack { .. }
        ));
    }
}
