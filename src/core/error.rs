//! Error types for the battle engine.
//!
//! Expected game-rule violations (wrong turn, dead target, not enough mana)
//! are returned as `BattleError` values and mirrored into the battle log.
//! They never leave the engine in a partially mutated state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoneError {
    #[error("{0} is a safe zone, no enemies here")]
    Safe(String),

    #[error("no enemy templates for {0}")]
    NoTemplates(String),

    #[error("unknown zone: {0}")]
    UnknownZone(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("target is gone: {0}")]
    StaleReference(String),

    #[error("expected phase {expected}, battle is in {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: String,
    },

    #[error("not enough mana: needs {needed}, has {available}")]
    InsufficientMana { needed: u32, available: u32 },

    #[error("item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("turn order is empty while the battle is still running")]
    EmptyInitiative,

    #[error(transparent)]
    Zone(#[from] ZoneError),
}

impl BattleError {
    /// True for rejections caused by the caller breaking a game rule.
    /// False for conditions that indicate an engine bug.
    pub fn is_rule_violation(&self) -> bool {
        !matches!(self, BattleError::EmptyInitiative)
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
