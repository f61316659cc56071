//! Raw feed ingestion
//!
//! Typed views over the provider's per-game JSON documents, plus the
//! loader that enumerates cached feeds in the raw-data directory.

pub mod fetch;

use crate::{BoxscoreError, MatchId, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// One raw game feed, as far as the pipeline cares about it.
///
/// Feeds carry many more fields; everything not listed here is ignored on
/// the typed view and survives only in the untyped pretty copy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFeed {
    pub lineup: Vec<LineupMember>,
    pub events: Vec<RawEvent>,
    pub gamestate: Option<GameState>,
}

/// One roster slot in a feed's lineup listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineupMember {
    /// Player id events refer to
    pub id: Option<i64>,
    pub person_id: Option<i64>,
    pub number: Option<String>,
    pub name: Option<String>,
    /// "player" for roster players; staff and officials use other values
    #[serde(rename = "type")]
    pub member_type: Option<String>,
    pub starter: bool,
    pub played: bool,
    pub web_team_id: Option<i64>,
}

/// One atomic in-game occurrence
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub event_type_id: Option<i64>,
    pub team_id: Option<i64>,
    pub person: Option<EventPerson>,
    /// Point magnitude; meaning depends on the event type code
    pub goals: Option<i64>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventPerson {
    pub id: Option<i64>,
}

/// Optional game-state block at the end of a feed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub current_score: Option<String>,
    pub period: Option<i64>,
}

/// A raw feed read from disk, keeping both the typed and verbatim forms
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub id: MatchId,
    pub feed: RawFeed,
    /// Untyped document, republished verbatim as the pretty copy
    pub raw: serde_json::Value,
}

/// Load every cached feed from the raw directory, sorted by match id.
///
/// Files that do not match the `game_<id>.json` naming or fail to parse
/// are skipped; a missing directory aborts the run.
pub fn load_raw_games(raw_dir: &str) -> Result<Vec<LoadedGame>> {
    let dir = Path::new(raw_dir);
    if !dir.is_dir() {
        return Err(BoxscoreError::MissingInput(format!(
            "raw feed directory {} not found; run `boxscore sync` first",
            raw_dir
        )));
    }

    let name_pattern = Regex::new(r"^game_(\d+)\.json$").unwrap();
    let mut games = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(caps) = name_pattern.captures(name) else {
            log::debug!("Ignoring {} (not a game feed)", name);
            continue;
        };
        let id: i64 = match caps[1].parse() {
            Ok(id) => id,
            Err(_) => continue,
        };

        match load_one(&entry.path(), MatchId(id)) {
            Ok(game) => games.push(game),
            Err(e) => log::warn!("Skipping {}: {}", name, e),
        }
    }

    games.sort_by_key(|g| g.id);
    Ok(games)
}

fn load_one(path: &Path, id: MatchId) -> Result<LoadedGame> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;
    let feed: RawFeed = serde_json::from_value(raw.clone())?;
    Ok(LoadedGame { id, feed, raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_deserializes_known_fields() {
        let json = r#"{
            "lineup": [
                {"id": 11, "personId": 7, "number": "23", "name": "A Guard",
                 "type": "player", "starter": true, "played": false, "webTeamId": 500}
            ],
            "events": [
                {"eventTypeId": 104, "teamId": 500, "person": {"id": 11},
                 "goals": 2, "teamName": "Home Team"}
            ],
            "gamestate": {"currentScore": "54 - 48", "period": 4}
        }"#;

        let feed: RawFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.lineup.len(), 1);
        assert_eq!(feed.lineup[0].web_team_id, Some(500));
        assert!(feed.lineup[0].starter);
        assert_eq!(feed.events[0].event_type_id, Some(104));
        assert_eq!(feed.events[0].person.as_ref().unwrap().id, Some(11));
        assert_eq!(
            feed.gamestate.as_ref().unwrap().current_score.as_deref(),
            Some("54 - 48")
        );
    }

    #[test]
    fn test_feed_tolerates_unknown_and_missing_fields() {
        let json = r#"{
            "tournament": {"name": "irrelevant"},
            "events": [{"eventTypeId": 999, "comment": "unknown code"}]
        }"#;

        let feed: RawFeed = serde_json::from_str(json).unwrap();
        assert!(feed.lineup.is_empty());
        assert_eq!(feed.events.len(), 1);
        assert!(feed.events[0].team_id.is_none());
        assert!(feed.gamestate.is_none());
    }
}
