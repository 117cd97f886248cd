// Configuration module for reading Snake.toml

use log::warn;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::selector::DistanceMetric;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub decision: DecisionConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
    pub stats: StatsConfig,
}

/// Response deadline handling
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

/// Knobs of the move decision itself
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DecisionConfig {
    #[serde(default)]
    pub distance_metric: DistanceMetric,
    /// Fixed seed for the random tie-break; a fresh seed per turn when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Values returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Cross-game statistics bookkeeping
#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    pub enabled: bool,
    pub file_path: String,
    pub stale_game_max_age_seconds: i64,
}

impl StatsConfig {
    /// `STATS_FILE` takes precedence over the configured path
    pub fn resolved_file_path(&self) -> String {
        env::var("STATS_FILE").unwrap_or_else(|_| self.file_path.clone())
    }
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Hardcoded fallback, kept in sync with the shipped Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 500,
                network_overhead_ms: 100,
            },
            decision: DecisionConfig {
                distance_metric: DistanceMetric::Manhattan,
                rng_seed: None,
            },
            appearance: AppearanceConfig {
                apiversion: "1".to_string(),
                author: "fusionstreak".to_string(),
                color: "#BF360C".to_string(),
                head: "mlh-gene".to_string(),
                tail: "mlh-gene".to_string(),
                version: "0.1.0".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
            stats: StatsConfig {
                enabled: true,
                file_path: "./data/stats.json".to_string(),
                stale_game_max_age_seconds: 3600,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 400);
    }

    #[test]
    fn test_effective_budget_saturates() {
        let timing = TimingConfig {
            response_time_budget_ms: 50,
            network_overhead_ms: 80,
        };
        assert_eq!(timing.effective_budget_ms(), 0);
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
        assert_eq!(
            file_config.decision.distance_metric,
            hardcoded.decision.distance_metric
        );
        assert_eq!(file_config.decision.rng_seed, hardcoded.decision.rng_seed);
        assert_eq!(file_config.appearance.author, hardcoded.appearance.author);
        assert_eq!(file_config.appearance.color, hardcoded.appearance.color);
        assert_eq!(file_config.debug.enabled, hardcoded.debug.enabled);
        assert_eq!(file_config.stats.file_path, hardcoded.stats.file_path);
        assert_eq!(
            file_config.stats.stale_game_max_age_seconds,
            hardcoded.stats.stale_game_max_age_seconds
        );
    }

    #[test]
    fn test_decision_section_defaults() {
        let config = Config::from_toml_str(
            r##"
            [timing]
            response_time_budget_ms = 500
            network_overhead_ms = 100

            [decision]

            [appearance]
            apiversion = "1"
            author = "me"
            color = "#000000"
            head = "default"
            tail = "default"
            version = "0"

            [debug]
            enabled = false
            log_file_path = "x.jsonl"

            [stats]
            enabled = false
            file_path = "stats.json"
            stale_game_max_age_seconds = 60
            "##,
        )
        .expect("minimal config should parse");

        assert_eq!(config.decision.distance_metric, DistanceMetric::Manhattan);
        assert_eq!(config.decision.rng_seed, None);
    }

    #[test]
    fn test_euclidean_metric_and_seed_parse() {
        let decision: DecisionConfig =
            toml::from_str("distance_metric = \"euclidean\"\nrng_seed = 9\n").unwrap();
        assert_eq!(decision.distance_metric, DistanceMetric::Euclidean);
        assert_eq!(decision.rng_seed, Some(9));
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let result: Result<DecisionConfig, _> = toml::from_str("distance_metric = \"xor\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
