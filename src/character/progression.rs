//! Experience curves, level-up loops and battle exp rewards.

use super::companion::Companion;
use super::player::Player;
use crate::core::constants::*;
use tracing::info;

/// Exp needed for a player at `level` to reach the next level.
pub fn player_exp_max(level: u32) -> u64 {
    // nudge so exact powers like 100 * 1.2^2 don't floor to 143
    (PLAYER_EXP_BASE * PLAYER_EXP_GROWTH.powi(level.saturating_sub(1) as i32) + 1e-6).floor() as u64
}

/// Exp needed for a companion at `level` to reach the next level.
pub fn companion_exp_max(level: u32) -> u64 {
    (COMPANION_EXP_BASE + level as u64 * COMPANION_EXP_PER_LEVEL).max(COMPANION_EXP_FLOOR)
}

/// Highest level a companion may reach while its owner is at `player_level`.
pub fn companion_level_ceiling(player_level: u32) -> u32 {
    (player_level + COMPANION_LEVEL_HEADROOM).min(MAX_LEVEL)
}

/// Scales rewards up for stronger enemies and down (to a floor) for weaker ones.
pub fn level_diff_factor(enemy_level: u32, player_level: u32) -> f64 {
    let diff = enemy_level as f64 - player_level as f64;
    if diff > 0.0 {
        1.0 + diff * EXP_OVERLEVEL_BONUS_PER_LEVEL
    } else if diff < 0.0 {
        (1.0 + diff * EXP_UNDERLEVEL_PENALTY_PER_LEVEL).max(EXP_UNDERLEVEL_FACTOR_FLOOR)
    } else {
        1.0
    }
}

pub fn exp_reward(enemy_level: u32, player_level: u32) -> u64 {
    let base = EXP_REWARD_BASE + enemy_level as f64 * EXP_REWARD_PER_LEVEL;
    let scaled = (base * level_diff_factor(enemy_level, player_level)).floor() as u64;
    scaled.max(EXP_REWARD_MIN)
}

/// Portion of the player's exp gain passed to the active companion.
pub fn companion_share(player_gain: u64) -> u64 {
    (player_gain as f64 * COMPANION_EXP_SHARE).floor() as u64
}

/// Adds exp to the player and runs the level-up loop. Each level gained
/// grants attribute points and restores hp/mp. Returns levels gained.
pub fn grant_player_exp(player: &mut Player, gained: u64) -> u32 {
    player.exp += gained;
    let mut levels = 0;

    while player.exp >= player.exp_max && player.level < MAX_LEVEL {
        player.exp -= player.exp_max;
        player.level += 1;
        player.exp_max = player_exp_max(player.level);
        player.attribute_points += PLAYER_POINTS_PER_LEVEL;
        player.recalculate_stats();
        player.restore_full();
        levels += 1;
    }

    if player.level >= MAX_LEVEL {
        player.exp = player.exp.min(player.exp_max.saturating_sub(1));
    }

    if levels > 0 {
        info!(level = player.level, levels, "player leveled up");
    }
    levels
}

/// Adds exp to a companion bounded by its owner's level.
///
/// At the ceiling everything goes to `stored_exp`. Below it, current exp, the
/// new grant and any stored exp form one pool that feeds the level-up loop;
/// whatever is left when the ceiling is reached is banked again. Granting 0
/// after the ceiling rises folds the bank back in. Returns levels gained.
pub fn grant_companion_exp(companion: &mut Companion, gained: u64, player_level: u32) -> u32 {
    let ceiling = companion_level_ceiling(player_level);

    if companion.level >= ceiling {
        companion.stored_exp += gained;
        return 0;
    }

    let mut pool = companion.exp + gained + companion.stored_exp;
    companion.stored_exp = 0;
    let mut levels = 0;

    while pool >= companion.exp_max && companion.level < MAX_LEVEL && companion.level < ceiling {
        pool -= companion.exp_max;
        companion.level += 1;
        companion.exp_max = companion_exp_max(companion.level);
        companion.attribute_points += COMPANION_POINTS_PER_LEVEL;
        companion.recalculate_stats();
        companion.restore_full();
        levels += 1;
    }

    if companion.level >= ceiling {
        companion.stored_exp = pool;
        companion.exp = 0;
    } else {
        companion.exp = pool;
    }

    if levels > 0 {
        info!(
            companion = %companion.name,
            level = companion.level,
            stored = companion.stored_exp,
            "companion leveled up"
        );
    }
    levels
}

/// Total exp a companion holds, counting both current and banked exp.
pub fn companion_pending_exp(companion: &Companion) -> u64 {
    companion.exp + companion.stored_exp
}
