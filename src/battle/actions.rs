//! Applying one unit's action to the live roster.
//!
//! Every operation validates first and mutates only once nothing can fail,
//! so a rejected action leaves the roster untouched.

use super::state::{lookup, lookup_mut, Battle, BattleLog, DefeatedEnemy, LogKind};
use crate::character::{Combatant, Party, SkillId};
use crate::combat::{
    companion_from_enemy, resolve_attack, roll_capture, Action, AttackMode, EnemyId, UnitRef,
};
use crate::core::error::{BattleError, Result};
use crate::items::get_medicine;
use rand::Rng;
use tracing::debug;

fn gone(unit: UnitRef) -> BattleError {
    BattleError::StaleReference(format!("{unit} is no longer in the fight"))
}

/// Mutable view over everything one action may touch.
pub struct Turn<'a, R> {
    pub party: &'a mut Party,
    pub battle: &'a mut Battle,
    pub rng: &'a mut R,
    pub log: &'a mut BattleLog,
}

impl<R: Rng> Turn<'_, R> {
    fn note(&mut self, kind: LogKind, message: String) {
        self.log.push(self.battle.round, kind, message);
    }

    /// The player's selected target, if it is still standing.
    pub fn selected_target(&self) -> Result<EnemyId> {
        let id = self
            .battle
            .selected_target
            .ok_or_else(|| BattleError::InvalidAction("no target selected".to_string()))?;
        match self.battle.enemy(id) {
            Some(enemy) if enemy.is_alive() => Ok(id),
            _ => Err(gone(UnitRef::Enemy(id))),
        }
    }

    pub fn execute(&mut self, actor: UnitRef, action: Action) -> Result<()> {
        match action {
            Action::Attack { target } => self.strike(actor, target, None),
            Action::Skill { skill_id, target } => self.strike(actor, target, Some(skill_id)),
            Action::Defend => self.defend(actor),
            Action::Capture { target } => self.capture(target).map(|_| ()),
        }
    }

    /// Physical attack, or a skill when `skill_id` is set.
    pub fn strike(&mut self, actor: UnitRef, target: UnitRef, skill_id: Option<SkillId>) -> Result<()> {
        let attacker = lookup(self.party, self.battle, actor)
            .filter(|u| u.is_alive())
            .ok_or_else(|| gone(actor))?;
        let defender = lookup(self.party, self.battle, target)
            .filter(|u| u.is_alive())
            .ok_or_else(|| gone(target))?;

        let skill = match skill_id {
            Some(id) => {
                let skill = attacker.find_skill(id).cloned().ok_or_else(|| {
                    BattleError::InvalidAction(format!("{} does not know skill {id}", attacker.name()))
                })?;
                if !attacker.can_afford(&skill) {
                    return Err(BattleError::InsufficientMana {
                        needed: skill.mp_cost,
                        available: attacker.mp(),
                    });
                }
                Some(skill)
            }
            None => None,
        };

        let mode = skill.as_ref().map_or(AttackMode::Physical, AttackMode::Skill);
        let outcome = resolve_attack(attacker, defender, mode, &mut *self.rng);
        let attacker_name = attacker.name().to_string();
        let defender_name = defender.name().to_string();
        let defender_level = defender.level();
        let verb = skill
            .as_ref()
            .map_or_else(|| "attacks".to_string(), |s| format!("casts {} on", s.name));

        debug!(%actor, %target, hit = outcome.hit, damage = outcome.damage, "resolved attack");

        if !outcome.hit {
            self.note(
                LogKind::Action,
                format!("{attacker_name} {verb} {defender_name} but misses"),
            );
            return Ok(());
        }

        if let Some(skill) = &skill {
            if let Some(unit) = lookup_mut(self.party, self.battle, actor) {
                unit.vitals_mut().spend_mp(skill.mp_cost);
            }
        }

        let remaining = match lookup_mut(self.party, self.battle, target) {
            Some(unit) => {
                let vitals = unit.vitals_mut();
                vitals.take_damage(outcome.damage);
                if outcome.consumed_defend {
                    vitals.defending = false;
                }
                vitals.hp
            }
            None => return Err(gone(target)),
        };

        let mut message = format!(
            "{attacker_name} {verb} {defender_name} for {} damage",
            outcome.damage
        );
        if outcome.advantage {
            message.push_str(" (elemental advantage)");
        }
        if outcome.consumed_defend {
            message.push_str(" (blocked)");
        }
        self.note(LogKind::Action, message);

        if remaining == 0 {
            self.on_defeat(target, defender_name, defender_level);
        }
        Ok(())
    }

    fn on_defeat(&mut self, unit: UnitRef, name: String, level: u32) {
        match unit {
            UnitRef::Enemy(id) => {
                self.battle.defeated.push(DefeatedEnemy {
                    name: name.clone(),
                    level,
                });
                if self.battle.selected_target == Some(id) {
                    self.battle.selected_target = self.battle.first_living_enemy();
                }
                self.note(LogKind::Action, format!("{name} is defeated"));
            }
            UnitRef::Player | UnitRef::Companion => {
                self.note(LogKind::Action, format!("{name} has fallen"));
            }
        }
    }

    pub fn defend(&mut self, actor: UnitRef) -> Result<()> {
        let unit = lookup_mut(self.party, self.battle, actor)
            .filter(|u| u.is_alive())
            .ok_or_else(|| gone(actor))?;
        unit.vitals_mut().defending = true;
        let message = format!("{} takes a defensive stance", unit.name());
        self.note(LogKind::Action, message);
        Ok(())
    }

    /// Attempts to capture an enemy. Returns whether it succeeded.
    pub fn capture(&mut self, target: EnemyId) -> Result<bool> {
        let enemy = self
            .battle
            .enemy(target)
            .filter(|e| e.is_alive())
            .ok_or_else(|| gone(UnitRef::Enemy(target)))?;

        if !roll_capture(enemy, &mut *self.rng) {
            let message = format!("Failed to capture {}", enemy.name);
            self.note(LogKind::Action, message);
            return Ok(false);
        }

        let companion = companion_from_enemy(self.party.next_companion_id(), enemy);
        let name = companion.name.clone();
        self.battle.enemies.retain(|e| e.id != target);
        let id = self.party.add_companion(companion);
        self.battle.captured.push(id);
        if self.battle.selected_target == Some(target) {
            self.battle.selected_target = self.battle.first_living_enemy();
        }
        self.note(LogKind::Action, format!("Captured {name}!"));
        Ok(true)
    }

    /// Uses one consumable on the player.
    pub fn use_item(&mut self, item_id: &str) -> Result<()> {
        let medicine =
            get_medicine(item_id).ok_or_else(|| BattleError::ItemUnavailable(item_id.to_string()))?;
        if self.party.item_count(item_id) == 0 {
            return Err(BattleError::ItemUnavailable(item_id.to_string()));
        }

        self.party.take_item(item_id)?;
        let player = &mut self.party.player;
        let (hp, mp) = medicine.effect.apply(
            player.vitals.hp,
            player.stats.max_hp,
            player.vitals.mp,
            player.stats.max_mp,
        );
        player.vitals.hp = hp;
        player.vitals.mp = mp;
        let message = format!("{} uses {}", player.name, medicine.name);
        self.note(LogKind::Action, message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, Element, Player};
    use crate::combat::Enemy;
    use crate::items::{SMALL_HP, SMALL_MP};
    use rand::rngs::mock::StepRng;

    fn setup() -> (Party, Battle) {
        let party = Party::new(Player::new("Li", Element::Metal));
        let enemy = Enemy::new(
            0,
            "squirrel",
            "Squirrel 1",
            Element::Wood,
            1,
            Attributes::from_values(3, 4, 2, 5),
            Vec::new(),
        );
        (party, Battle::new(vec![enemy], None, false))
    }

    #[test]
    fn test_strike_applies_damage() {
        let (mut party, mut battle) = setup();
        let mut rng = StepRng::new(0, 0);
        let mut log = BattleLog::default();
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        turn.strike(UnitRef::Player, UnitRef::Enemy(0), None).unwrap();
        let enemy = &battle.enemies[0];
        assert!(enemy.hp() < enemy.stats.max_hp);
        assert!(log.last().unwrap().message.contains("elemental advantage"));
    }

    #[test]
    fn test_unknown_skill_rejected_without_mutation() {
        let (mut party, mut battle) = setup();
        let mut rng = StepRng::new(0, 0);
        let mut log = BattleLog::default();
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        let err = turn
            .strike(UnitRef::Player, UnitRef::Enemy(0), Some(41))
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidAction(_)));
        assert_eq!(battle.enemies[0].hp(), battle.enemies[0].stats.max_hp);
        assert!(log.is_empty());
    }

    #[test]
    fn test_kill_records_defeat() {
        let (mut party, mut battle) = setup();
        battle.enemies[0].vitals.hp = 1;
        let mut rng = StepRng::new(0, 0);
        let mut log = BattleLog::default();
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        turn.strike(UnitRef::Player, UnitRef::Enemy(0), None).unwrap();
        assert_eq!(battle.defeated.len(), 1);
        assert_eq!(battle.selected_target, None);
        // attacking the corpse is stale
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        assert!(matches!(
            turn.strike(UnitRef::Player, UnitRef::Enemy(0), None),
            Err(BattleError::StaleReference(_))
        ));
    }

    #[test]
    fn test_forced_capture_moves_enemy_to_stable() {
        let (mut party, mut battle) = setup();
        let mut rng = StepRng::new(0, 0);
        let mut log = BattleLog::default();
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        assert!(turn.capture(0).unwrap());
        assert!(battle.enemies.is_empty());
        assert_eq!(battle.captured.len(), 1);
        assert!(battle.defeated.is_empty());
        assert_eq!(party.companions.len(), 1);
        assert!(party.active_companion.is_none());
    }

    #[test]
    fn test_use_item_restores_and_consumes() {
        let (mut party, mut battle) = setup();
        party.player.vitals.hp = 20;
        party.player.vitals.mp = 0;
        let mut rng = StepRng::new(0, 0);
        let mut log = BattleLog::default();
        let mut turn = Turn {
            party: &mut party,
            battle: &mut battle,
            rng: &mut rng,
            log: &mut log,
        };
        turn.use_item(SMALL_HP).unwrap();
        turn.use_item(SMALL_MP).unwrap();
        assert!(turn.use_item("full_hp").is_err());
        assert_eq!(party.player.vitals.hp, 70);
        assert_eq!(party.player.vitals.mp, 30);
        assert_eq!(party.item_count(SMALL_HP), 4);
        assert_eq!(party.item_count(SMALL_MP), 2);
    }
}
