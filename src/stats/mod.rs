//! Box-score reconstruction and season aggregation
//!
//! The pipeline core: per-game team structures rebuilt from the flat event
//! log, season totals for the tracked team, and per-game outcome metrics.

pub mod metrics;
pub mod roster;
pub mod season;

pub use metrics::{compute_game_metrics, GameMetrics};
pub use roster::{build_box_scores, TeamBoxScore};
pub use season::SeasonTotals;
