//! Artifact publication
//!
//! Serializes everything the static site consumes: per-game summaries and
//! pretty raw copies, the season player table, the merged schedule, the
//! links list, and the run metadata record. Artifacts are rewritten
//! wholesale on every run.

use crate::feed::LoadedGame;
use crate::links::Link;
use crate::schedule::ScheduleEntry;
use crate::stats::{GameMetrics, SeasonTotals, TeamBoxScore};
use crate::{Config, MatchId, Result, TeamId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Per-game summary artifact
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameSummary<'a> {
    game_id: MatchId,
    final_score: Option<&'a str>,
    periods_played: Option<i64>,
    team_stats: Vec<&'a TeamBoxScore>,
}

/// Run metadata artifact
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    generated_at: String,
    games_processed: Vec<MatchId>,
    players_tracked: usize,
    team_records: Option<TeamRecords>,
}

/// Season-best records scanned from all game metrics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecords {
    pub highest_score: GameMetrics,
    pub biggest_win: Option<GameMetrics>,
    pub toughest_loss: Option<GameMetrics>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write one game's summary plus a pretty-printed verbatim copy of its feed
pub fn write_game_summary(
    config: &Config,
    game: &LoadedGame,
    teams: &BTreeMap<TeamId, TeamBoxScore>,
) -> Result<()> {
    let gamestate = game.feed.gamestate.as_ref();
    let summary = GameSummary {
        game_id: game.id,
        final_score: gamestate.and_then(|g| g.current_score.as_deref()),
        periods_played: gamestate.and_then(|g| g.period),
        team_stats: teams.values().collect(),
    };

    let processed = Path::new(&config.paths.processed_dir);
    write_json(&processed.join(format!("game_{}_summary.json", game.id)), &summary)?;
    write_json(&processed.join(format!("game_{}.pretty.json", game.id)), &game.raw)?;
    Ok(())
}

/// Publish the season player table (players with at least one counted game)
pub fn publish_players(config: &Config, season: &SeasonTotals) -> Result<()> {
    let path = Path::new(&config.paths.site_data_dir).join("players.json");
    write_json(&path, &season.rows())
}

/// Publish the merged schedule, kickoff ascending with undated entries last
pub fn publish_schedule(
    config: &Config,
    schedule: &BTreeMap<MatchId, ScheduleEntry>,
) -> Result<()> {
    let path = Path::new(&config.paths.site_data_dir).join("schedule.json");
    write_json(&path, &crate::schedule::sorted_for_publish(schedule))
}

/// Publish the links list unchanged
pub fn publish_links(config: &Config, links: &[Link]) -> Result<()> {
    let path = Path::new(&config.paths.site_data_dir).join("links.json");
    write_json(&path, &links)
}

/// Publish the run metadata record
pub fn publish_metadata(
    config: &Config,
    game_ids: &[MatchId],
    season: &SeasonTotals,
    metrics: &[GameMetrics],
) -> Result<()> {
    let mut games_processed: Vec<MatchId> = game_ids.to_vec();
    games_processed.sort();
    games_processed.dedup();

    let metadata = Metadata {
        generated_at: chrono::Utc::now().to_rfc3339(),
        games_processed,
        players_tracked: season.players_tracked(),
        team_records: team_records(metrics),
    };

    let path = Path::new(&config.paths.site_data_dir).join("last_updated.json");
    write_json(&path, &metadata)
}

/// Scan all game metrics for the season's best and worst games
pub fn team_records(metrics: &[GameMetrics]) -> Option<TeamRecords> {
    let highest_score = metrics.iter().max_by_key(|m| m.team_points)?.clone();
    let biggest_win = metrics
        .iter()
        .filter(|m| m.point_diff > 0)
        .max_by_key(|m| m.point_diff)
        .cloned();
    let toughest_loss = metrics
        .iter()
        .filter(|m| m.point_diff < 0)
        .min_by_key(|m| m.point_diff)
        .cloned();

    Some(TeamRecords {
        highest_score,
        biggest_win,
        toughest_loss,
    })
}
