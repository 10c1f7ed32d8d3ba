//! Battle configuration with documented defaults
//!
//! Loaded from `data/battle.toml`. Every field is optional in the file;
//! missing fields take the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFAULT_ACTION_POINTS, PLAYER_ALWAYS_STARTS};
use crate::core::error::{BattleError, Result};
use crate::core::types::DefinitionId;

/// Definition ids deployed on each side at battle setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupConfig {
    /// Player side, in slot order
    pub player: Vec<DefinitionId>,
    /// Enemy side, in slot order
    pub enemy: Vec<DefinitionId>,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            player: [11001, 12001, 11004, 13001].map(DefinitionId).to_vec(),
            enemy: [11002, 13002, 12002, 11005].map(DefinitionId).to_vec(),
        }
    }
}

/// Configuration for a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Action points granted at the start of every tactics phase
    ///
    /// Each boost costs one point, so this is the number of boosts the
    /// player can issue per round.
    pub action_points_per_turn: u32,

    /// Whether every living player unit acts before any enemy unit
    ///
    /// When off, initiative is decided by wheel value alone.
    pub player_always_starts: bool,

    /// RNG seed for reproducible battles (entropy when absent)
    pub seed: Option<u64>,

    /// Starting lineups
    pub lineup: LineupConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            action_points_per_turn: DEFAULT_ACTION_POINTS,
            player_always_starts: PLAYER_ALWAYS_STARTS,
            seed: None,
            lineup: LineupConfig::default(),
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.action_points_per_turn == 0 {
            return Err(BattleError::InvalidConfig(
                "action_points_per_turn must be positive".into(),
            ));
        }

        if self.lineup.player.is_empty() || self.lineup.enemy.is_empty() {
            return Err(BattleError::InvalidConfig(format!(
                "lineups must not be empty (player: {}, enemy: {})",
                self.lineup.player.len(),
                self.lineup.enemy.len()
            )));
        }

        Ok(())
    }
}

/// Parse and validate a config from TOML text
pub fn parse_config(content: &str) -> Result<BattleConfig> {
    let config: BattleConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file
pub fn load_config(path: &Path) -> Result<BattleConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = BattleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.action_points_per_turn, 3);
        assert!(config.player_always_starts);
    }

    #[test]
    fn test_zero_action_points_rejected() {
        let config = BattleConfig {
            action_points_per_turn: 0,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BattleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = parse_config("player_always_starts = false\nseed = 7\n").unwrap();
        assert!(!config.player_always_starts);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.action_points_per_turn, 3);
        assert_eq!(config.lineup, LineupConfig::default());
    }

    #[test]
    fn test_lineup_from_toml() {
        let config = parse_config(
            r#"
            action_points_per_turn = 2

            [lineup]
            player = [11001]
            enemy = [11002, 11005]
            "#,
        )
        .unwrap();
        assert_eq!(config.action_points_per_turn, 2);
        assert_eq!(config.lineup.player, vec![DefinitionId(11001)]);
        assert_eq!(config.lineup.enemy.len(), 2);
    }

    #[test]
    fn test_empty_lineup_rejected() {
        let result = parse_config("[lineup]\nplayer = []\nenemy = [11002]\n");
        assert!(matches!(result, Err(BattleError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_data_config() {
        let config = load_config(Path::new("data/battle.toml")).expect("Should load battle config");
        assert!(config.action_points_per_turn > 0);
    }
}
