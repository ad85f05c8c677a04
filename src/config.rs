//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::arbitrage::detector::DEFAULT_MIN_OUTCOMES;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Detection Parameters ===
    /// Minimum edge in percentage points, strictly exceeded for inclusion.
    #[serde(default)]
    pub threshold_percent: Decimal,

    /// Minimum distinct outcomes per match (1 reports single-outcome markets).
    #[serde(default = "default_min_outcomes")]
    pub min_outcomes: usize,

    /// Outcome name to drop before detection (e.g. "Draw").
    #[serde(default)]
    pub exclude_outcome: Option<String>,

    /// Bankroll to split across legs when printing stakes.
    #[serde(default)]
    pub bankroll: Option<Decimal>,

    // === Input ===
    /// JSON file holding the quote batch.
    #[serde(default = "default_quotes_path")]
    pub quotes_path: PathBuf,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_min_outcomes() -> usize {
    DEFAULT_MIN_OUTCOMES
}

fn default_quotes_path() -> PathBuf {
    PathBuf::from("latest_odds.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_percent: Decimal::ZERO,
            min_outcomes: default_min_outcomes(),
            exclude_outcome: None,
            bankroll: None,
            quotes_path: default_quotes_path(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let hundred = Decimal::ONE_HUNDRED;
        if self.threshold_percent <= -hundred || self.threshold_percent >= hundred {
            return Err("THRESHOLD_PERCENT must be between -100 and 100".to_string());
        }

        if self.min_outcomes == 0 {
            return Err("MIN_OUTCOMES must be at least 1".to_string());
        }

        if let Some(bankroll) = self.bankroll {
            if bankroll <= Decimal::ZERO {
                return Err("BANKROLL must be positive".to_string());
            }
        }

        if let Some(excluded) = &self.exclude_outcome {
            if excluded.trim().is_empty() {
                return Err("EXCLUDE_OUTCOME must not be blank".to_string());
            }
        }

        Ok(())
    }
}
