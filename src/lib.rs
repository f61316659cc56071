//! Season stats pipeline for one tracked basketball team
//!
//! Reconstructs per-team box scores from raw game feeds, aggregates player
//! totals across the season, merges game outcomes into the fixture
//! schedule, and publishes site-ready JSON artifacts.

pub mod feed;
pub mod links;
pub mod publish;
pub mod schedule;
pub mod stats;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a team in the provider's feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Unique identifier for a player within a game feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

/// Provider match identifier, shared by feed URLs, raw files and the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum BoxscoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, BoxscoreError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub season: SeasonConfig,
    pub team: TeamConfig,
    pub paths: PathsConfig,
}

/// Season boundaries used for year inference on schedule dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Month (1-12) the season starts in; earlier months belong to the next year
    pub start_month: u32,
    pub start_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Provider team id of the tracked team
    pub tracked_team_id: i64,
    /// Display name used in logs only; artifacts carry feed names
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub raw_dir: String,
    pub processed_dir: String,
    pub site_data_dir: String,
    pub schedule_file: String,
    pub links_file: String,
    pub sources_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            season: SeasonConfig {
                start_month: 9,
                start_year: 2025,
            },
            team: TeamConfig {
                tracked_team_id: 0,
                name: String::new(),
            },
            paths: PathsConfig {
                raw_dir: "data/raw".to_string(),
                processed_dir: "data/processed".to_string(),
                site_data_dir: "site/data".to_string(),
                schedule_file: "data/schedule.csv".to_string(),
                links_file: "data/links.txt".to_string(),
                sources_file: "data/sources.txt".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BoxscoreError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| BoxscoreError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BoxscoreError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn tracked_team(&self) -> TeamId {
        TeamId(self.team.tracked_team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.season.start_month, 9);
        assert_eq!(back.paths.raw_dir, "data/raw");
    }

    #[test]
    fn test_error_display() {
        let err = BoxscoreError::MissingInput("data/raw".to_string());
        assert_eq!(err.to_string(), "Missing input: data/raw");
    }
}
