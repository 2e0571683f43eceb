// Pacing (milliseconds of engine clock)
pub const TICK_INTERVAL_MS: u64 = 100;
pub const TURN_DELAY_MS: u64 = 220;
pub const FAST_TURN_DELAY_MS: u64 = 120;
pub const ACTION_DELAY_MS: u64 = 180;
pub const CHAIN_BATTLE_DELAY_MS: u64 = 280;
/// Floor for every scheduled delay; a continuation never comes due at the instant it is scheduled.
pub const MIN_CONTINUATION_DELAY_MS: u64 = 1;

// Battle log
pub const BATTLE_LOG_CAPACITY: usize = 500;

// Levels
pub const MAX_LEVEL: u32 = 100;
pub const COMPANION_LEVEL_HEADROOM: u32 = 5;
pub const PLAYER_POINTS_PER_LEVEL: u32 = 5;
pub const COMPANION_POINTS_PER_LEVEL: u32 = 3;

// Player exp curve: floor(PLAYER_EXP_BASE * PLAYER_EXP_GROWTH^(level-1))
pub const PLAYER_EXP_BASE: f64 = 100.0;
pub const PLAYER_EXP_GROWTH: f64 = 1.2;

// Companion exp curve: max(COMPANION_EXP_FLOOR, COMPANION_EXP_BASE + level * COMPANION_EXP_PER_LEVEL)
pub const COMPANION_EXP_FLOOR: u64 = 25;
pub const COMPANION_EXP_BASE: u64 = 30;
pub const COMPANION_EXP_PER_LEVEL: u64 = 20;
pub const COMPANION_EXP_SHARE: f64 = 0.8;

// Kill rewards
pub const EXP_REWARD_BASE: f64 = 50.0;
pub const EXP_REWARD_PER_LEVEL: f64 = 10.0;
pub const EXP_REWARD_MIN: u64 = 10;
pub const EXP_OVERLEVEL_BONUS_PER_LEVEL: f64 = 0.1;
pub const EXP_UNDERLEVEL_PENALTY_PER_LEVEL: f64 = 0.05;
pub const EXP_UNDERLEVEL_FACTOR_FLOOR: f64 = 0.5;
pub const MONEY_PER_KILL: u64 = 50;
pub const DROP_CHANCE: f64 = 0.3;

// Starting character
pub const STARTING_ATTRIBUTE_VALUE: u32 = 5;
pub const STARTING_ATTRIBUTE_POINTS: u32 = 5;
pub const STARTING_MONEY: u64 = 1000;
pub const STARTING_SMALL_HP: u32 = 5;
pub const STARTING_SMALL_MP: u32 = 3;

// Stat model
pub const BASE_ATTACK: f64 = 10.0;
pub const ATTACK_PER_STRENGTH: f64 = 2.5;
pub const BASE_DEFENSE: f64 = 5.0;
pub const DEFENSE_PER_CONSTITUTION: f64 = 2.0;
pub const BASE_SPEED: f64 = 5.0;
pub const SPEED_PER_AGILITY: f64 = 2.0;
pub const DEFENSE_SPEED_PER_LEVEL: f64 = 0.5;
pub const BASE_MAX_HP: f64 = 100.0;
pub const HP_PER_CONSTITUTION: f64 = 12.0;
pub const HP_PER_LEVEL: f64 = 20.0;
pub const BASE_MAX_MP: f64 = 50.0;
pub const MP_PER_SPIRIT: f64 = 3.0;
pub const MP_PER_LEVEL: f64 = 10.0;
pub const BASE_HIT_RATE: f64 = 80.0;
pub const HIT_RATE_PER_STRENGTH: f64 = 0.5;
pub const MAX_HIT_RATE: u32 = 100;
pub const MAGIC_DAMAGE_PER_SPIRIT: f64 = 0.015;

// Affinity points
pub const AFFINITY_SPELL_DAMAGE_PER_POINT: f64 = 0.02;
pub const AFFINITY_RESISTANCE_PER_POINT: f64 = 0.01;
pub const AFFINITY_ATTACK_PERCENT_PER_POINT: f64 = 0.005;
pub const AFFINITY_HP_PER_POINT: f64 = 10.0;
pub const AFFINITY_DEFENSE_PER_POINT: f64 = 0.3;
pub const AFFINITY_SPEED_PER_POINT: f64 = 0.2;

// Damage resolution
pub const ELEMENT_ADVANTAGE_MULTIPLIER: f64 = 1.5;
pub const PHYSICAL_DEFENSE_FACTOR: f64 = 0.5;
pub const SKILL_DEFENSE_FACTOR: f64 = 0.3;

// Capture
pub const CAPTURE_BASE_CHANCE: f64 = 0.3;
pub const CAPTURE_MISSING_HP_WEIGHT: f64 = 0.5;
pub const CAPTURE_MAX_CHANCE: f64 = 0.8;

// AI
pub const ENEMY_SKILL_CHANCE: f64 = 0.3;
pub const DEFENSIVE_STANCE_HP_RATIO: f64 = 0.3;
pub const AUTO_CAPTURE_HP_RATIO: f64 = 0.3;

// Enemy generation
pub const BABY_CHANCE: f64 = 0.15;
pub const BABY_GROWTH: f64 = 1.4;
pub const BABY_LEVEL: u32 = 1;

// Sects
pub const SECT_JOIN_LEVEL: u32 = 10;
