//! Roster and event reconstruction
//!
//! Rebuilds per-team box scores for a single game from a feed's lineup
//! listing and flat event log. Events reference players only by id; the
//! authoritative roster lives in the lineup, so attribution goes through a
//! transient per-game index that never reaches the published output.

use crate::feed::RawFeed;
use crate::{PlayerId, TeamId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Free throw made (1 point)
pub const EVENT_FREE_THROW: i64 = 106;
/// Two-point field goal made
pub const EVENT_TWO_POINTER: i64 = 104;
/// Three-point field goal made
pub const EVENT_THREE_POINTER: i64 = 103;
/// Personal foul
pub const EVENT_FOUL: i64 = 109;

/// Point value of a scoring event code, None for non-scoring codes
fn shot_value(code: i64) -> Option<u32> {
    match code {
        EVENT_FREE_THROW => Some(1),
        EVENT_TWO_POINTER => Some(2),
        EVENT_THREE_POINTER => Some(3),
        _ => None,
    }
}

/// Accumulated single-game statistics for one roster slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
    pub points: u32,
    pub free_throws_made: u32,
    pub two_pointers_made: u32,
    pub three_pointers_made: u32,
    pub fouls: u32,
}

impl PlayerGameStats {
    /// Record `made` shots worth `value` points each.
    ///
    /// The made-shot counter and the point total move together, so points
    /// always remain the weighted sum of the counters.
    fn record_shots(&mut self, value: u32, made: u32) {
        match value {
            1 => self.free_throws_made += made,
            2 => self.two_pointers_made += made,
            _ => self.three_pointers_made += made,
        }
        self.points += value * made;
    }

    pub fn any_shot_made(&self) -> bool {
        self.free_throws_made > 0 || self.two_pointers_made > 0 || self.three_pointers_made > 0
    }
}

/// One lineup slot with its accumulated game stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSlot {
    pub player_id: Option<PlayerId>,
    pub person_id: Option<i64>,
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    pub starter: bool,
    pub played: bool,
    pub stats: PlayerGameStats,
}

impl RosterSlot {
    pub fn is_player(&self) -> bool {
        self.member_type == "player"
    }

    /// A slot counts as having played iff it started, was flagged as
    /// played, made any shot, or committed any foul. Absence from the
    /// lineup never counts.
    pub fn counted_as_played(&self) -> bool {
        self.played || self.starter || self.stats.any_shot_made() || self.stats.fouls > 0
    }
}

/// Per-game box score for one team
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBoxScore {
    pub team_id: TeamId,
    /// First non-empty name seen across the team's events
    pub team_name: Option<String>,
    pub roster: Vec<RosterSlot>,
}

/// Reconstruct per-team box scores from one raw feed.
///
/// Lineup members without a team id, events for teams absent from the
/// lineup, and events whose player id does not resolve (team-level or
/// unrecognized events) are all skipped silently.
pub fn build_box_scores(feed: &RawFeed) -> BTreeMap<TeamId, TeamBoxScore> {
    let mut teams: BTreeMap<TeamId, TeamBoxScore> = BTreeMap::new();
    // (team, player) -> roster position; build-time only
    let mut index: HashMap<(TeamId, PlayerId), usize> = HashMap::new();

    for member in &feed.lineup {
        let Some(team_id) = member.web_team_id else {
            continue;
        };
        let team = teams.entry(TeamId(team_id)).or_insert_with(|| TeamBoxScore {
            team_id: TeamId(team_id),
            team_name: None,
            roster: Vec::new(),
        });

        if let Some(player_id) = member.id {
            index.insert((TeamId(team_id), PlayerId(player_id)), team.roster.len());
        }
        team.roster.push(RosterSlot {
            player_id: member.id.map(PlayerId),
            person_id: member.person_id,
            number: member.number.as_deref().unwrap_or("").trim().to_string(),
            name: member.name.as_deref().unwrap_or("").trim().to_string(),
            member_type: member.member_type.clone().unwrap_or_default(),
            starter: member.starter,
            played: member.played,
            stats: PlayerGameStats::default(),
        });
    }

    for event in &feed.events {
        let Some(team_id) = event.team_id else {
            continue;
        };
        let Some(team) = teams.get_mut(&TeamId(team_id)) else {
            continue;
        };

        if team.team_name.is_none() {
            if let Some(name) = event
                .team_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            {
                team.team_name = Some(name.to_string());
            }
        }

        let Some(player_id) = event.person.as_ref().and_then(|p| p.id) else {
            continue;
        };
        let Some(&slot_pos) = index.get(&(TeamId(team_id), PlayerId(player_id))) else {
            continue;
        };
        let stats = &mut team.roster[slot_pos].stats;

        let Some(code) = event.event_type_id else {
            continue;
        };
        if let Some(value) = shot_value(code) {
            let goals = event.goals.unwrap_or(0);
            if goals > 0 {
                // Magnitudes not divisible by the point value truncate;
                // an accepted feed discrepancy, not an error.
                let made = goals as u32 / value;
                if made > 0 {
                    stats.record_shots(value, made);
                }
            }
        } else if code == EVENT_FOUL {
            stats.fouls += 1;
        }
    }

    teams
}
