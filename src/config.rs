// Configuration module for reading Snake.toml
//
// Holds server timing, appearance, turn logging and the strategy override
// tables. Strategy tables are plain override maps: they go through
// `strategy::resolve` so file values follow the same coercion rules as any
// other override.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::strategy::{resolve, StrategyConfig};
use crate::types::InfoResponse;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub turn_log: TurnLogConfig,
    /// Overrides applied on top of the built-in strategy defaults
    #[serde(default)]
    pub strategy: Map<String, Value>,
    /// Extra bots served under `/<slug>`
    #[serde(default)]
    pub bots: Vec<BotProfile>,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// What GET / reports
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: String,
}

impl AppearanceConfig {
    pub fn to_info(&self) -> InfoResponse {
        InfoResponse {
            apiversion: self.apiversion.clone(),
            author: self.author.clone(),
            color: self.color.clone(),
            head: self.head.clone(),
            tail: self.tail.clone(),
            version: self.version.clone(),
        }
    }
}

/// Turn log persistence settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TurnLogConfig {
    pub enabled: bool,
    pub log_file_path: String,
    /// Store the DebugTrace alongside each move
    pub include_trace: bool,
}

impl Default for TurnLogConfig {
    fn default() -> Self {
        TurnLogConfig {
            enabled: false,
            log_file_path: "battlesnake_turns.jsonl".to_string(),
            include_trace: true,
        }
    }
}

/// A named bot variant. Unset appearance fields fall back to `[appearance]`.
#[derive(Debug, Deserialize, Clone)]
pub struct BotProfile {
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub tail: Option<String>,
    #[serde(default)]
    pub strategy: Map<String, Value>,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            appearance: AppearanceConfig {
                apiversion: "1".to_string(),
                author: "ksiopiolosz-aterlo".to_string(),
                color: "#00DEAD".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            turn_log: TurnLogConfig::default(),
            strategy: Map::new(),
            bots: Vec::new(),
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Built-in defaults with the `[strategy]` table applied
    pub fn base_strategy(&self) -> StrategyConfig {
        resolve(&StrategyConfig::default(), &self.strategy)
    }

    /// Strategy for a profile: its table applied on top of `base_strategy`
    pub fn strategy_for(&self, profile: &BotProfile) -> StrategyConfig {
        resolve(&self.base_strategy(), &profile.strategy)
    }

    pub fn appearance_for(&self, profile: &BotProfile) -> AppearanceConfig {
        let mut appearance = self.appearance.clone();
        if let Some(color) = &profile.color {
            appearance.color = color.clone();
        }
        if let Some(head) = &profile.head {
            appearance.head = head.clone();
        }
        if let Some(tail) = &profile.tail {
            appearance.tail = tail.clone();
        }
        appearance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 350);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_snake_toml_matches_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(
            file_config.timing.effective_budget_ms(),
            hardcoded.timing.effective_budget_ms()
        );
        assert_eq!(file_config.appearance.color, hardcoded.appearance.color);
        assert_eq!(file_config.base_strategy(), hardcoded.base_strategy());
    }

    #[test]
    fn test_strategy_tables_use_override_rules() {
        let config = Config::from_toml(
            r##"
            [timing]
            response_time_budget_ms = 400
            network_overhead_ms = 50

            [appearance]
            apiversion = "1"
            author = "me"
            color = "#123456"
            head = "default"
            tail = "default"
            version = "1.0.0"

            [strategy]
            health_threshold = 30
            aggression = "0.5"

            [[bots]]
            slug = "hunter"
            color = "#FF0000"
            strategy = { aggression = 0.9, foodWeight = 2 }
            "##,
        )
        .unwrap();

        let base = config.base_strategy();
        assert_eq!(base.health_threshold, 30);
        assert_eq!(base.aggression, 0.5);

        let hunter = &config.bots[0];
        let strategy = config.strategy_for(hunter);
        assert_eq!(strategy.health_threshold, 30);
        assert_eq!(strategy.aggression, 0.9);
        assert_eq!(strategy.food_weight, 2.0);
        assert_eq!(config.appearance_for(hunter).color, "#FF0000");
        assert_eq!(config.appearance_for(hunter).author, "me");
        assert!(!config.turn_log.enabled);
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert!(config.timing.effective_budget_ms() > 0);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        assert!(Config::from_toml("timing = [").is_err());
    }
}
