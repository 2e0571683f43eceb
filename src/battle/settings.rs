//! Player preferences that steer battles, loadable from JSON.

use crate::character::SkillId;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Continuation delays in logical milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub turn_delay_ms: u64,
    /// Used instead of `turn_delay_ms` while the player acts on its own.
    pub fast_turn_delay_ms: u64,
    pub action_delay_ms: u64,
    pub chain_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            turn_delay_ms: TURN_DELAY_MS,
            fast_turn_delay_ms: FAST_TURN_DELAY_MS,
            action_delay_ms: ACTION_DELAY_MS,
            chain_delay_ms: CHAIN_BATTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSettings {
    pub auto_battle: bool,
    pub auto_chain_battle: bool,
    pub auto_capture: bool,
    pub auto_skill_id: Option<SkillId>,
    pub auto_companion_skill_id: Option<SkillId>,
    pub heal_on_entry: bool,
    pub pacing: Pacing,
}

impl BattleSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = BattleSettings::default();
        assert!(!settings.auto_battle);
        assert!(!settings.heal_on_entry);
        assert_eq!(settings.pacing.turn_delay_ms, 220);
        assert_eq!(settings.pacing.chain_delay_ms, 280);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            BattleSettings::from_json_str(r#"{"auto_battle": true, "pacing": {"turn_delay_ms": 300}}"#)
                .unwrap();
        assert!(settings.auto_battle);
        assert!(!settings.auto_capture);
        assert_eq!(settings.pacing.turn_delay_ms, 300);
        assert_eq!(settings.pacing.action_delay_ms, 180);
    }

    #[test]
    fn test_invalid_json() {
        let err = BattleSettings::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_file_roundtrip() {
        let settings = BattleSettings {
            auto_capture: true,
            auto_skill_id: Some(41),
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(settings.to_json_string().unwrap().as_bytes())
            .unwrap();
        let loaded = BattleSettings::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        let err = BattleSettings::from_json_file("/nonexistent/wendao.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
