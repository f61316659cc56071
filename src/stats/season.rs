//! Season-level player aggregation
//!
//! Folds each game's tracked-team box score into running per-player
//! totals, keyed by display name so a player keeps one row even when
//! their jersey number changes between games.

use crate::stats::roster::{PlayerGameStats, TeamBoxScore};
use crate::TeamId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Season-cumulative totals for one player
#[derive(Debug, Clone, Default)]
pub struct PlayerSeasonTotals {
    pub name: String,
    /// Every non-empty jersey number seen across the season
    numbers: BTreeSet<String>,
    /// Most recently seen non-empty number
    last_number: String,
    pub games_played: u32,
    pub free_throws: u32,
    pub two_pointers: u32,
    pub three_pointers: u32,
    pub fouls: u32,
}

impl PlayerSeasonTotals {
    fn new(name: &str) -> Self {
        PlayerSeasonTotals {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Fold one game's stats into the season totals.
    ///
    /// Shot and foul counts are added unconditionally; a non-played slot
    /// contributes zeros, which is a safe no-op.
    pub fn register_game(&mut self, number: &str, stats: &PlayerGameStats, counted_as_played: bool) {
        let number = number.trim();
        if !number.is_empty() {
            self.numbers.insert(number.to_string());
            self.last_number = number.to_string();
        }

        if counted_as_played {
            self.games_played += 1;
        }

        self.free_throws += stats.free_throws_made;
        self.two_pointers += stats.two_pointers_made;
        self.three_pointers += stats.three_pointers_made;
        self.fouls += stats.fouls;
    }

    /// Always derived from the made-shot counters, never stored
    pub fn total_points(&self) -> u32 {
        self.free_throws + self.two_pointers * 2 + self.three_pointers * 3
    }

    /// Canonical jersey number: most recently seen, falling back to the
    /// shortest (then lexicographically smallest) number ever seen.
    pub fn display_number(&self) -> String {
        if !self.last_number.is_empty() {
            return self.last_number.clone();
        }
        self.numbers
            .iter()
            .min_by_key(|n| (n.len(), n.as_str()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn points_per_game(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let ppg = f64::from(self.total_points()) / f64::from(self.games_played);
        (ppg * 10.0).round() / 10.0
    }

    fn as_row(&self) -> PlayerRow {
        PlayerRow {
            name: self.name.clone(),
            number: self.display_number(),
            games_played: self.games_played,
            free_throws_made: self.free_throws,
            field_goals_made: self.two_pointers + self.three_pointers,
            three_points_made: self.three_pointers,
            fouls_made: self.fouls,
            total_points: self.total_points(),
            points_per_game: self.points_per_game(),
        }
    }
}

/// One row of the published season player table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRow {
    pub name: String,
    pub number: String,
    pub games_played: u32,
    pub free_throws_made: u32,
    pub field_goals_made: u32,
    pub three_points_made: u32,
    pub fouls_made: u32,
    pub total_points: u32,
    pub points_per_game: f64,
}

/// Running season totals for the tracked team's players
#[derive(Debug)]
pub struct SeasonTotals {
    tracked_team: TeamId,
    totals: BTreeMap<String, PlayerSeasonTotals>,
}

impl SeasonTotals {
    pub fn new(tracked_team: TeamId) -> Self {
        SeasonTotals {
            tracked_team,
            totals: BTreeMap::new(),
        }
    }

    /// Fold the tracked team's roster from one game into the season
    /// totals. Games where the tracked team is absent are a no-op; staff
    /// and other non-player lineup entries are excluded.
    pub fn absorb_game(&mut self, teams: &BTreeMap<TeamId, TeamBoxScore>) {
        let Some(team) = teams.get(&self.tracked_team) else {
            return;
        };

        for slot in &team.roster {
            if !slot.is_player() {
                continue;
            }
            let record = self
                .totals
                .entry(slot.name.clone())
                .or_insert_with(|| PlayerSeasonTotals::new(&slot.name));
            record.register_game(&slot.number, &slot.stats, slot.counted_as_played());
        }
    }

    /// Players with at least one counted game
    pub fn players_tracked(&self) -> usize {
        self.totals.values().filter(|p| p.games_played > 0).count()
    }

    /// Published table: players with a counted game, ordered by total
    /// points descending with case-insensitive name as tiebreak.
    pub fn rows(&self) -> Vec<PlayerRow> {
        let mut rows: Vec<PlayerRow> = self
            .totals
            .values()
            .filter(|p| p.games_played > 0)
            .map(PlayerSeasonTotals::as_row)
            .collect();
        rows.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        rows
    }

    pub fn get(&self, name: &str) -> Option<&PlayerSeasonTotals> {
        self.totals.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::roster::RosterSlot;

    fn slot(name: &str, number: &str, stats: PlayerGameStats) -> RosterSlot {
        RosterSlot {
            player_id: Some(crate::PlayerId(1)),
            person_id: Some(1),
            number: number.to_string(),
            name: name.to_string(),
            member_type: "player".to_string(),
            starter: false,
            played: false,
            stats,
        }
    }

    fn one_team_game(slots: Vec<RosterSlot>) -> BTreeMap<TeamId, TeamBoxScore> {
        let mut teams = BTreeMap::new();
        teams.insert(
            TeamId(10),
            TeamBoxScore {
                team_id: TeamId(10),
                team_name: Some("Tracked".to_string()),
                roster: slots,
            },
        );
        teams
    }

    #[test]
    fn test_totals_accumulate_across_games() {
        let mut season = SeasonTotals::new(TeamId(10));

        let stats = PlayerGameStats {
            points: 7,
            free_throws_made: 1,
            two_pointers_made: 3,
            three_pointers_made: 0,
            fouls: 2,
        };
        season.absorb_game(&one_team_game(vec![slot("A Guard", "23", stats.clone())]));
        season.absorb_game(&one_team_game(vec![slot("A Guard", "23", stats)]));

        let player = season.get("A Guard").unwrap();
        assert_eq!(player.games_played, 2);
        assert_eq!(player.free_throws, 2);
        assert_eq!(player.two_pointers, 6);
        assert_eq!(player.fouls, 4);
        assert_eq!(player.total_points(), 14);
    }

    #[test]
    fn test_total_points_is_weighted_sum() {
        let mut player = PlayerSeasonTotals::new("Shooter");
        let stats = PlayerGameStats {
            points: 10,
            free_throws_made: 2,
            two_pointers_made: 1,
            three_pointers_made: 2,
            fouls: 0,
        };
        player.register_game("5", &stats, true);
        assert_eq!(player.total_points(), 2 + 2 + 6);
        assert_eq!(player.points_per_game(), 10.0);
    }

    #[test]
    fn test_starter_with_no_events_counts_as_played() {
        let mut season = SeasonTotals::new(TeamId(10));
        let mut starter = slot("Quiet Starter", "4", PlayerGameStats::default());
        starter.starter = true;
        season.absorb_game(&one_team_game(vec![starter]));

        assert_eq!(season.get("Quiet Starter").unwrap().games_played, 1);
        assert_eq!(season.players_tracked(), 1);
    }

    #[test]
    fn test_bench_player_without_action_gets_no_game_and_no_row() {
        let mut season = SeasonTotals::new(TeamId(10));
        season.absorb_game(&one_team_game(vec![slot(
            "Bench",
            "12",
            PlayerGameStats::default(),
        )]));

        assert_eq!(season.get("Bench").unwrap().games_played, 0);
        assert!(season.rows().is_empty());
        assert_eq!(season.players_tracked(), 0);
    }

    #[test]
    fn test_staff_entries_are_excluded() {
        let mut season = SeasonTotals::new(TeamId(10));
        let mut coach = slot("Coach", "", PlayerGameStats::default());
        coach.member_type = "staff".to_string();
        coach.played = true;
        season.absorb_game(&one_team_game(vec![coach]));

        assert!(season.get("Coach").is_none());
    }

    #[test]
    fn test_most_recent_number_wins() {
        let mut player = PlayerSeasonTotals::new("Mover");
        player.register_game("23", &PlayerGameStats::default(), true);
        player.register_game("8", &PlayerGameStats::default(), true);
        assert_eq!(player.display_number(), "8");
    }

    #[test]
    fn test_number_fallback_and_blank() {
        let blank = PlayerSeasonTotals::new("Unnumbered");
        assert_eq!(blank.display_number(), "");

        // Fallback ordering is by length first, then lexicographic
        let mut player = PlayerSeasonTotals::new("Fallback");
        player.numbers.insert("10".to_string());
        player.numbers.insert("9".to_string());
        assert_eq!(player.display_number(), "9");
    }

    #[test]
    fn test_rows_sorted_by_points_then_name() {
        let mut season = SeasonTotals::new(TeamId(10));
        let big = PlayerGameStats {
            points: 9,
            free_throws_made: 0,
            two_pointers_made: 3,
            three_pointers_made: 1,
            fouls: 0,
        };
        let small = PlayerGameStats {
            points: 2,
            free_throws_made: 0,
            two_pointers_made: 1,
            three_pointers_made: 0,
            fouls: 0,
        };
        season.absorb_game(&one_team_game(vec![
            slot("zeta", "1", small.clone()),
            slot("Alpha", "2", small),
            slot("Center", "3", big),
        ]));

        let names: Vec<String> = season.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Center", "Alpha", "zeta"]);
    }

    #[test]
    fn test_absent_tracked_team_is_noop() {
        let mut season = SeasonTotals::new(TeamId(999));
        season.absorb_game(&one_team_game(vec![slot(
            "Someone",
            "1",
            PlayerGameStats::default(),
        )]));
        assert_eq!(season.players_tracked(), 0);
        assert!(season.rows().is_empty());
    }
}
