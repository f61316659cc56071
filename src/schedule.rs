//! Fixture schedule loading and outcome merging
//!
//! Loads the season fixture list from a small delimited text file, parses
//! kickoff labels that carry no year, and overlays computed game metrics
//! onto matching entries.

use crate::stats::GameMetrics;
use crate::{MatchId, Result, SeasonConfig};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeAway {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Upcoming,
    Played,
}

/// One fixture, as loaded from the schedule file and later enriched by
/// computed game metrics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub match_id: MatchId,
    pub home_or_away: HomeAway,
    pub opponent: String,
    pub location: String,
    pub date_label: String,
    pub kickoff: Option<NaiveDateTime>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    /// Tracked-team score, regardless of designation
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
    pub point_diff: Option<i32>,
    pub result: Option<GameResult>,
    pub status: Status,
    /// True once computed game metrics have been merged in
    pub has_stats: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_team_id: Option<i64>,
}

fn classify(point_diff: i32) -> GameResult {
    match point_diff.cmp(&0) {
        Ordering::Greater => GameResult::Win,
        Ordering::Less => GameResult::Loss,
        Ordering::Equal => GameResult::Draw,
    }
}

impl ScheduleEntry {
    /// Derive tracked-team fields from the stored home/away scores.
    /// Used at load time for fixtures whose result came with the schedule.
    fn derive_from_scores(&mut self) {
        let (Some(home), Some(away)) = (self.home_score, self.away_score) else {
            return;
        };
        let (team, opponent) = match self.home_or_away {
            HomeAway::Home => (home, away),
            HomeAway::Away => (away, home),
        };
        self.team_score = Some(team);
        self.opponent_score = Some(opponent);
        self.point_diff = Some(team - opponent);
        self.result = Some(classify(team - opponent));
        self.status = Status::Played;
    }
}

/// Overlay one game's computed metrics onto its schedule entry.
///
/// Entries without matching metrics keep their loaded score fields; the
/// home/away raw scores are re-derived from the tracked-team perspective.
pub fn apply_metrics(schedule: &mut BTreeMap<MatchId, ScheduleEntry>, metrics: &GameMetrics) {
    let Some(entry) = schedule.get_mut(&metrics.game_id) else {
        log::debug!("Game {} not in schedule; metrics not merged", metrics.game_id);
        return;
    };

    let team = metrics.team_points as i32;
    let opponent = metrics.opponent_points as i32;
    entry.team_score = Some(team);
    entry.opponent_score = Some(opponent);
    entry.point_diff = Some(team - opponent);
    entry.result = Some(classify(team - opponent));
    entry.status = Status::Played;
    entry.has_stats = true;

    match entry.home_or_away {
        HomeAway::Home => {
            entry.home_score = Some(team);
            entry.away_score = Some(opponent);
        }
        HomeAway::Away => {
            entry.home_score = Some(opponent);
            entry.away_score = Some(team);
        }
    }

    entry.opponent_team_id = metrics.opponent_team_id.map(|id| id.0);
    if entry.opponent.is_empty() && !metrics.opponent.is_empty() {
        entry.opponent = metrics.opponent.clone();
    }
}

/// Entries in publish order: kickoff ascending, undated fixtures last
pub fn sorted_for_publish(schedule: &BTreeMap<MatchId, ScheduleEntry>) -> Vec<ScheduleEntry> {
    let mut entries: Vec<ScheduleEntry> = schedule.values().cloned().collect();
    entries.sort_by_key(|e| (e.kickoff.is_none(), e.kickoff, e.match_id));
    entries
}

/// Load the fixture list, keyed by match id.
///
/// A missing schedule file yields an empty schedule; malformed rows are
/// skipped with a warning.
pub fn load_schedule(
    path: &str,
    season: &SeasonConfig,
) -> Result<BTreeMap<MatchId, ScheduleEntry>> {
    let mut schedule = BTreeMap::new();
    if !Path::new(path).exists() {
        log::info!("No schedule file at {}; publishing an empty schedule", path);
        return Ok(schedule);
    }

    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Ok(schedule);
    };
    let header: Vec<String> = split_fields(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    let col = |name: &str| header.iter().position(|h| h == name);
    let (Some(id_col), Some(side_col)) = (col("matchId"), col("homeOrAway")) else {
        return Err(crate::BoxscoreError::Parse(format!(
            "schedule {} is missing the matchId/homeOrAway columns",
            path
        )));
    };
    let opponent_col = col("opponents");
    let location_col = col("location");
    let date_col = col("date");
    let home_col = col("homeScore");
    let away_col = col("awayScore");

    fn cell<'a>(fields: &'a [String], idx: Option<usize>) -> &'a str {
        idx.and_then(|i| fields.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    for line in lines {
        let fields = split_fields(line);

        let raw_id = cell(&fields, Some(id_col));
        let Ok(match_id) = raw_id.parse::<i64>() else {
            log::warn!("Skipping schedule row with bad match id: {:?}", raw_id);
            continue;
        };

        let home_or_away = if cell(&fields, Some(side_col)).eq_ignore_ascii_case("home") {
            HomeAway::Home
        } else {
            HomeAway::Away
        };
        let date_label = cell(&fields, date_col)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let kickoff = parse_kickoff(&date_label, season);
        if kickoff.is_none() && !date_label.is_empty() {
            log::warn!("Unparseable date label for game {}: {:?}", match_id, date_label);
        }

        let mut entry = ScheduleEntry {
            match_id: MatchId(match_id),
            home_or_away,
            opponent: cell(&fields, opponent_col).to_string(),
            location: cell(&fields, location_col).to_string(),
            date_label,
            kickoff,
            home_score: to_int(cell(&fields, home_col)),
            away_score: to_int(cell(&fields, away_col)),
            team_score: None,
            opponent_score: None,
            point_diff: None,
            result: None,
            status: Status::Upcoming,
            has_stats: false,
            opponent_team_id: None,
        };
        entry.derive_from_scores();
        schedule.insert(entry.match_id, entry);
    }

    Ok(schedule)
}

/// Parse a kickoff label of the form `"Sat 14.Sep 18:00"`.
///
/// Labels carry no year; months at or after the configured season start
/// belong to the start year, earlier months to the following year. The
/// weekday token is display-only and never validated.
pub fn parse_kickoff(label: &str, season: &SeasonConfig) -> Option<NaiveDateTime> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    if tokens.len() != 3 {
        return None;
    }

    let (day_str, month_str) = tokens[1].split_once('.')?;
    let day: u32 = day_str.parse().ok()?;
    let month = month_number(month_str)?;

    let (hour_str, minute_str) = tokens[2].split_once(':')?;
    let hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;

    let year = if month >= season.start_month {
        season.start_year
    } else {
        season.start_year + 1
    };

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

fn to_int(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// Split one delimited row, tolerating quoted fields with embedded commas
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
}
