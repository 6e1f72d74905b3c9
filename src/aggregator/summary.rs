use serde::Serialize;
use tracing::info;

use crate::aggregator::group::{count_by, count_where, distinct, mean_by, top_n, Count, Rate};
use crate::types::{Month, PointRecord};

/// Tournament grouping key. Field order gives the tie-break for equal counts:
/// name first, then id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TournamentKey {
    pub name: String,
    pub id: String,
}

/// Every aggregate the report, charts and JSON export are built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_rows: usize,
    pub num_tournaments: usize,
    pub num_matches: usize,
    /// Sums to `total_rows`; blank surfaces are grouped as "Unknown".
    pub games_by_surface: Vec<Count<String>>,
    pub service_games: usize,
    /// None when the dataset has no service games.
    pub overall_hold_rate: Option<f64>,
    pub hold_rate_by_surface: Vec<Rate<String>>,
    /// Chronological. Rows without a parseable date are skipped; rows without a
    /// match id do not add to their month's count.
    pub games_per_month: Vec<Count<Month>>,
    pub top_tournaments: Vec<Count<TournamentKey>>,
}

impl Summary {
    pub fn compute(records: &[PointRecord], top: usize) -> Self {
        let service_games = records.iter().filter(|r| r.is_service_game).count();
        let holds = records.iter().filter(|r| r.hold).count();
        let overall_hold_rate = (service_games > 0).then(|| holds as f64 / service_games as f64);

        // Groups are formed from every row with a key; only rows with a match id
        // are counted, so a group without match ids is listed with 0.
        let has_match = |r: &PointRecord| r.match_id.is_some();

        let mut games_per_month = count_where(records, |r| r.month, has_match);
        games_per_month.sort_by_key(|c| c.key);

        let tournaments = count_where(
            records,
            |r| {
                Some(TournamentKey {
                    name: r.tournament_name.clone()?,
                    id: r.tournament_id.clone()?,
                })
            },
            has_match,
        );

        let summary = Self {
            total_rows: records.len(),
            num_tournaments: distinct(records, |r| r.tournament_id.clone()),
            num_matches: distinct(records, |r| r.match_id.clone()),
            games_by_surface: count_by(records, |r| Some(r.surface.to_string())),
            service_games,
            overall_hold_rate,
            hold_rate_by_surface: mean_by(
                records,
                |r| r.is_service_game,
                |r| Some(r.surface.to_string()),
                |r| r.hold,
            ),
            games_per_month,
            top_tournaments: top_n(&tournaments, top),
        };

        info!(
            rows = summary.total_rows,
            tournaments = summary.num_tournaments,
            matches = summary.num_matches,
            service_games = summary.service_games,
            months = summary.games_per_month.len(),
            "[AGG] aggregates computed",
        );
        summary
    }
}
