//! Reward settlement once a battle is won.

use super::state::Battle;
use crate::character::{
    companion_share, exp_reward, grant_companion_exp, grant_player_exp, CompanionId, Party,
};
use crate::core::constants::MONEY_PER_KILL;
use crate::items::{roll_drops, ItemDrop};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub exp: u64,
    pub companion_exp: u64,
    pub money: u64,
    pub drops: Vec<ItemDrop>,
    pub player_levels: u32,
    pub companion_levels: u32,
    pub captured: Vec<CompanionId>,
}

/// Pays out exp, drops and money for every enemy killed in `battle`.
///
/// Captured enemies were removed from the roster and pay nothing. When the
/// player levels up, companions holding banked exp retry their level-up
/// against the raised ceiling.
pub fn settle_victory(party: &mut Party, battle: &Battle, rng: &mut impl Rng) -> Rewards {
    let player_level = party.player.level;
    let exp: u64 = battle
        .defeated
        .iter()
        .map(|e| exp_reward(e.level, player_level))
        .sum();

    let mut rewards = Rewards {
        exp,
        captured: battle.captured.clone(),
        ..Default::default()
    };

    if exp > 0 {
        rewards.player_levels = grant_player_exp(&mut party.player, exp);
        let new_level = party.player.level;

        if let Some(companion) = battle.companion.and_then(|id| party.companion_mut(id)) {
            rewards.companion_exp = companion_share(exp);
            rewards.companion_levels =
                grant_companion_exp(companion, rewards.companion_exp, new_level);
        }

        if rewards.player_levels > 0 {
            for companion in party.companions.iter_mut().filter(|c| c.stored_exp > 0) {
                grant_companion_exp(companion, 0, new_level);
            }
        }
    }

    rewards.drops = roll_drops(battle.defeated.len(), rng);
    for drop in &rewards.drops {
        party.add_item(&drop.id, drop.count);
    }

    rewards.money = battle.defeated.len() as u64 * MONEY_PER_KILL;
    party.money += rewards.money;

    rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::DefeatedEnemy;
    use crate::character::{Aptitude, Attributes, Companion, Element, Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn party_with_companion(companion_level: u32) -> (Party, CompanionId) {
        let mut party = Party::new(Player::new("Li", Element::Metal));
        let id = party.add_companion(Companion::new(
            0,
            "Frog",
            Element::Water,
            companion_level,
            Attributes::from_values(2, 3, 4, 4),
            Aptitude::default(),
            Vec::new(),
        ));
        party.set_active_companion(Some(id)).unwrap();
        (party, id)
    }

    fn won_battle(companion: Option<CompanionId>, levels: &[u32]) -> Battle {
        let mut battle = Battle::new(Vec::new(), companion, false);
        battle.defeated = levels
            .iter()
            .map(|&level| DefeatedEnemy {
                name: "Squirrel".to_string(),
                level,
            })
            .collect();
        battle
    }

    #[test]
    fn test_exp_and_money() {
        let (mut party, id) = party_with_companion(1);
        let battle = won_battle(Some(id), &[1, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let rewards = settle_victory(&mut party, &battle, &mut rng);

        assert_eq!(rewards.exp, 120);
        assert_eq!(party.player.level, 2);
        assert_eq!(party.player.exp, 20);
        assert_eq!(rewards.companion_exp, 96);
        assert_eq!(rewards.money, 100);
        assert_eq!(party.money, 1100);
        // 96 exp: level 1 (50) -> 2, 46 left toward 70
        let companion = party.companion(id).unwrap();
        assert_eq!(companion.level, 2);
        assert_eq!(companion.exp, 46);
    }

    #[test]
    fn test_no_kills_no_rewards() {
        let (mut party, id) = party_with_companion(1);
        let battle = won_battle(Some(id), &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rewards = settle_victory(&mut party, &battle, &mut rng);
        assert_eq!(rewards, Rewards::default());
        assert_eq!(party.money, 1000);
    }

    #[test]
    fn test_drops_added_to_inventory() {
        let (mut party, _) = party_with_companion(1);
        let battle = won_battle(None, &[1; 20]);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let before: u32 = party.inventory.values().sum();
        let rewards = settle_victory(&mut party, &battle, &mut rng);
        let dropped: u32 = rewards.drops.iter().map(|d| d.count).sum();
        let after: u32 = party.inventory.values().sum();
        assert_eq!(after, before + dropped);
    }

    #[test]
    fn test_player_level_up_folds_benched_companion_bank() {
        let (mut party, id) = party_with_companion(6);
        party.companion_mut(id).unwrap().stored_exp = 100;
        party.set_active_companion(None).unwrap();

        let battle = won_battle(None, &[5, 5]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rewards = settle_victory(&mut party, &battle, &mut rng);
        assert!(rewards.player_levels > 0);

        let companion = party.companion(id).unwrap();
        assert_eq!(companion.stored_exp, 0);
        assert_eq!(companion.exp, 100);
    }
}
