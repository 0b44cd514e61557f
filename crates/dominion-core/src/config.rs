//! Configuration loading and typed config structures for a Dominion game.
//!
//! The canonical configuration lives in `dominion-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use dominion_units::TransportRules;

use crate::state::{PlayerSetup, Rules};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range or inconsistent.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `dominion-config.yaml`. Every section is
/// optional and falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Game-level settings (name, turn limit, input files).
    #[serde(default)]
    pub game: GameSection,

    /// Players in registration order.
    #[serde(default = "default_players")]
    pub players: Vec<PlayerSetup>,

    /// Rule tunables.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging and output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game: GameSection::default(),
            players: default_players(),
            rules: RulesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DOMINION_MAP_PATH` overrides `game.map_path`
    /// - `DOMINION_MAX_TURNS` overrides `game.max_turns`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.game.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.max_turns == 0 {
            return Err(invalid("game.max_turns", "must be at least 1"));
        }
        if self.rules.upkeep_divisor == 0 {
            return Err(invalid("rules.upkeep_divisor", "must be at least 1"));
        }
        if self.rules.base_assault_divisor == 0 {
            return Err(invalid("rules.base_assault_divisor", "must be at least 1"));
        }
        if self.rules.transport_toll_percent > 100 {
            return Err(invalid("rules.transport_toll_percent", "must not exceed 100"));
        }
        if self.players.is_empty() {
            return Err(invalid("players", "at least one player is required"));
        }

        let mut ids = BTreeSet::new();
        let mut bases = BTreeSet::new();
        for player in &self.players {
            if !ids.insert(&player.id) {
                return Err(invalid("players", format!("duplicate player id {}", player.id)));
            }
            if !bases.insert(&player.base) {
                return Err(invalid("players", format!("base {} is shared", player.base)));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Game-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSection {
    /// Human-readable game name.
    #[serde(default = "default_game_name")]
    pub name: String,

    /// Turn limit; the game is decided by city count when it is reached.
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,

    /// Map file in the world-definition JSON format. The built-in demo map
    /// is used when absent.
    #[serde(default)]
    pub map_path: Option<PathBuf>,

    /// Scripted per-turn orders. Players stay idle when absent.
    #[serde(default)]
    pub orders_path: Option<PathBuf>,
}

impl GameSection {
    /// Apply environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `DOMINION_MAX_TURNS` is not a
    /// number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("DOMINION_MAP_PATH") {
            self.map_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("DOMINION_MAX_TURNS") {
            self.max_turns = parse_max_turns(&val)?;
        }
        Ok(())
    }
}

/// Parse a turn limit given as text.
fn parse_max_turns(val: &str) -> Result<u64, ConfigError> {
    val.trim()
        .parse()
        .map_err(|e| invalid("game.max_turns", format!("not a number: {val} ({e})")))
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            name: default_game_name(),
            max_turns: default_max_turns(),
            map_path: None,
            orders_path: None,
        }
    }
}

/// Rule tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Reserve each player starts with.
    #[serde(default = "default_starting_reserve")]
    pub starting_reserve: u32,

    /// Upkeep is supply-tree weight divided by this.
    #[serde(default = "default_upkeep_divisor")]
    pub upkeep_divisor: u32,

    /// Percent of cargo a neutral city keeps when a transport enters it.
    #[serde(default = "default_transport_toll_percent")]
    pub transport_toll_percent: u32,

    /// Turns a destroyed transport stays out of play.
    #[serde(default = "default_transport_respawn_turns")]
    pub transport_respawn_turns: u32,

    /// Attack strength against a base is divided by this.
    #[serde(default = "default_base_assault_divisor")]
    pub base_assault_divisor: u32,

    /// Skip combat and settlement for everyone on a turn in which any player
    /// was defeated during the supply phase.
    #[serde(default)]
    pub freeze_combat_on_defeat: bool,
}

impl RulesConfig {
    /// Convert to the engine's rule set.
    pub fn to_rules(&self) -> Rules {
        Rules {
            starting_reserve: Decimal::from(self.starting_reserve),
            upkeep_divisor: self.upkeep_divisor,
            transport: TransportRules {
                toll_percent: self.transport_toll_percent,
                respawn_turns: self.transport_respawn_turns,
            },
            base_assault_divisor: self.base_assault_divisor,
            freeze_combat_on_defeat: self.freeze_combat_on_defeat,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_reserve: default_starting_reserve(),
            upkeep_divisor: default_upkeep_divisor(),
            transport_toll_percent: default_transport_toll_percent(),
            transport_respawn_turns: default_transport_respawn_turns(),
            base_assault_divisor: default_base_assault_divisor(),
            freeze_combat_on_defeat: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for per-turn JSON snapshots. Nothing is written when absent.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_game_name() -> String {
    "Dominion".to_owned()
}

const fn default_max_turns() -> u64 {
    50
}

fn default_players() -> Vec<PlayerSetup> {
    vec![
        PlayerSetup::new("j0", "base_j0"),
        PlayerSetup::new("j1", "base_j1"),
    ]
}

const fn default_starting_reserve() -> u32 {
    100
}

const fn default_upkeep_divisor() -> u32 {
    dominion_world::DEFAULT_UPKEEP_DIVISOR
}

const fn default_transport_toll_percent() -> u32 {
    dominion_units::DEFAULT_TOLL_PERCENT
}

const fn default_transport_respawn_turns() -> u32 {
    dominion_units::DEFAULT_RESPAWN_TURNS
}

const fn default_base_assault_divisor() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use dominion_types::{CityId, PlayerId};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_matches_rulebook() {
        let config = GameConfig::default();
        assert_eq!(config.game.max_turns, 50);
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[0].id, PlayerId::new("j0"));
        assert_eq!(config.players[1].base, CityId::new("base_j1"));
        assert_eq!(config.rules.upkeep_divisor, 100);
        assert_eq!(config.rules.transport_toll_percent, 10);
        assert_eq!(config.rules.transport_respawn_turns, 2);
        assert_eq!(config.rules.base_assault_divisor, 2);
        assert!(!config.rules.freeze_combat_on_defeat);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn max_turns_text_is_parsed_or_explained() {
        assert!(matches!(parse_max_turns(" 75 "), Ok(75)));
        let err = parse_max_turns("soon");
        assert!(matches!(&err, Err(ConfigError::Invalid { field, .. }) if *field == "game.max_turns"));
        let Err(ConfigError::Invalid { reason, .. }) = err else { return };
        assert!(reason.starts_with("not a number: soon ("), "{reason}");
        assert!(reason.contains("invalid digit"), "{reason}");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
game:
  name: "Skirmish"
  max_turns: 30
  map_path: "maps/ring.json"

players:
  - id: red
    base: red_keep
  - id: blue
    base: blue_keep
  - id: green
    base: green_keep

rules:
  starting_reserve: 150
  upkeep_divisor: 50
  transport_toll_percent: 20
  freeze_combat_on_defeat: true

logging:
  level: "debug"
  snapshot_dir: "out/snapshots"
"#;
        let config = GameConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.unwrap_or_default();

        assert_eq!(config.game.name, "Skirmish");
        assert_eq!(config.players.len(), 3);
        assert_eq!(config.players[2].id, PlayerId::new("green"));
        assert_eq!(config.rules.transport_respawn_turns, 2);
        assert_eq!(config.logging.snapshot_dir, Some(PathBuf::from("out/snapshots")));

        let rules = config.rules.to_rules();
        assert_eq!(rules.starting_reserve, dec!(150));
        assert_eq!(rules.transport.toll_percent, 20);
        assert!(rules.freeze_combat_on_defeat);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = GameConfig::parse("rules:\n  base_assault_divisor: 3\n");
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.rules.base_assault_divisor, 3);
        assert_eq!(config.rules.starting_reserve, 100);
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GameConfig::parse("").is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let result = GameConfig::parse("rules:\n  upkeep_divisor: 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "rules.upkeep_divisor", .. })
        ));

        let result = GameConfig::parse("rules:\n  transport_toll_percent: 101\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = GameConfig::parse("players: []\n");
        assert!(matches!(result, Err(ConfigError::Invalid { field: "players", .. })));
    }

    #[test]
    fn rejects_shared_bases() {
        let yaml = "players:\n  - { id: a, base: keep }\n  - { id: b, base: keep }\n";
        assert!(matches!(GameConfig::parse(yaml), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        assert!(matches!(GameConfig::parse("game: [unclosed"), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("dominion-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
