//! Per-game outcome metrics
//!
//! Derives the final score and point differential for one game from the
//! reconstructed box scores, from the tracked team's perspective.

use crate::stats::roster::TeamBoxScore;
use crate::{MatchId, TeamId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Final outcome of one game, tracked-team perspective
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetrics {
    pub game_id: MatchId,
    pub opponent: String,
    pub opponent_team_id: Option<TeamId>,
    pub team_points: u32,
    pub opponent_points: u32,
    pub point_diff: i32,
}

/// Sum of points over roster slots of type "player"
fn team_points(team: &TeamBoxScore) -> u32 {
    team.roster
        .iter()
        .filter(|slot| slot.is_player())
        .map(|slot| slot.stats.points)
        .sum()
}

/// Compute the game's metrics, or None when the tracked team or an
/// opponent cannot be identified. Feeds listing more than two teams are
/// not supported; the first non-tracked team in id order is taken as the
/// opponent.
pub fn compute_game_metrics(
    game_id: MatchId,
    teams: &BTreeMap<TeamId, TeamBoxScore>,
    tracked: TeamId,
) -> Option<GameMetrics> {
    let tracked_team = teams.get(&tracked)?;
    let opponent = teams.values().find(|t| t.team_id != tracked)?;

    let points = team_points(tracked_team);
    let opponent_points = team_points(opponent);

    let opponent_name = opponent
        .team_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Opponent")
        .to_string();

    Some(GameMetrics {
        game_id,
        opponent: opponent_name,
        opponent_team_id: Some(opponent.team_id),
        team_points: points,
        opponent_points,
        point_diff: points as i32 - opponent_points as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::roster::{PlayerGameStats, RosterSlot};

    fn team(id: i64, name: Option<&str>, player_points: &[u32]) -> TeamBoxScore {
        let roster = player_points
            .iter()
            .enumerate()
            .map(|(i, &points)| RosterSlot {
                player_id: Some(crate::PlayerId(i as i64)),
                person_id: None,
                number: String::new(),
                name: format!("Player {}", i),
                member_type: "player".to_string(),
                starter: false,
                played: false,
                stats: PlayerGameStats {
                    points,
                    ..Default::default()
                },
            })
            .collect();
        TeamBoxScore {
            team_id: TeamId(id),
            team_name: name.map(str::to_string),
            roster,
        }
    }

    fn game(teams: Vec<TeamBoxScore>) -> BTreeMap<TeamId, TeamBoxScore> {
        teams.into_iter().map(|t| (t.team_id, t)).collect()
    }

    #[test]
    fn test_metrics_from_two_teams() {
        let teams = game(vec![
            team(10, Some("Tracked"), &[20, 15]),
            team(20, Some("Visitors"), &[30]),
        ]);

        let metrics = compute_game_metrics(MatchId(1), &teams, TeamId(10)).unwrap();
        assert_eq!(metrics.team_points, 35);
        assert_eq!(metrics.opponent_points, 30);
        assert_eq!(metrics.point_diff, 5);
        assert_eq!(metrics.opponent, "Visitors");
        assert_eq!(metrics.opponent_team_id, Some(TeamId(20)));
    }

    #[test]
    fn test_non_player_points_are_excluded() {
        let mut tracked = team(10, None, &[10]);
        let mut bench_official = tracked.roster[0].clone();
        bench_official.member_type = "staff".to_string();
        bench_official.stats.points = 50;
        tracked.roster.push(bench_official);

        let teams = game(vec![tracked, team(20, None, &[8])]);
        let metrics = compute_game_metrics(MatchId(2), &teams, TeamId(10)).unwrap();
        assert_eq!(metrics.team_points, 10);
    }

    #[test]
    fn test_missing_tracked_team_yields_none() {
        let teams = game(vec![team(20, None, &[8])]);
        assert!(compute_game_metrics(MatchId(3), &teams, TeamId(10)).is_none());
    }

    #[test]
    fn test_missing_opponent_yields_none() {
        let teams = game(vec![team(10, None, &[8])]);
        assert!(compute_game_metrics(MatchId(4), &teams, TeamId(10)).is_none());
    }

    #[test]
    fn test_unnamed_opponent_gets_placeholder() {
        let teams = game(vec![team(10, None, &[8]), team(20, Some("  "), &[6])]);
        let metrics = compute_game_metrics(MatchId(5), &teams, TeamId(10)).unwrap();
        assert_eq!(metrics.opponent, "Opponent");
    }

    #[test]
    fn test_first_opponent_in_id_order_is_used() {
        let teams = game(vec![
            team(30, Some("Later"), &[1]),
            team(10, None, &[8]),
            team(20, Some("Earlier"), &[6]),
        ]);
        let metrics = compute_game_metrics(MatchId(6), &teams, TeamId(10)).unwrap();
        assert_eq!(metrics.opponent, "Earlier");
    }
}
