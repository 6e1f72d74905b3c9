pub mod dates;

use crate::config::columns;
use crate::error::{AppError, Result};
use crate::loader::{Cell, RawTable};
use crate::types::{PointRecord, ServeOutcome, Surface};

pub use dates::parse_date;

/// Position of each required column in the raw header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub tournament_id: usize,
    pub tournament_name: usize,
    pub match_id: usize,
    pub match_date: usize,
    pub surface: usize,
    pub won_serve: usize,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AppError::Schema(format!("missing required column {name:?}")))
        };
        Ok(Self {
            tournament_id: find(columns::TOURNAMENT_ID)?,
            tournament_name: find(columns::TOURNAMENT_NAME)?,
            match_id: find(columns::MATCH_ID)?,
            match_date: find(columns::MATCH_DATE)?,
            surface: find(columns::SURFACE)?,
            won_serve: find(columns::WON_SERVE)?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanStats {
    pub rows: usize,
    /// Non-blank date cells that failed to parse.
    pub unparseable_dates: usize,
    pub blank_dates: usize,
    /// Non-blank outcome labels other than WON/LOST.
    pub non_service_outcomes: usize,
    /// Sample of unrecognised outcome labels, first seen first.
    pub outcome_samples: Vec<String>,
}

const MAX_OUTCOME_SAMPLES: usize = 5;

impl std::fmt::Display for CleanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows | dates: {} blank, {} unparseable | {} non-service rows",
            self.rows, self.blank_dates, self.unparseable_dates, self.non_service_outcomes
        )
    }
}

/// Turn raw rows into records with the derived month and serve flags.
pub fn clean(table: &RawTable) -> Result<(Vec<PointRecord>, CleanStats)> {
    let cols = ColumnMap::resolve(&table.headers)?;
    let mut stats = CleanStats {
        rows: table.len(),
        ..Default::default()
    };

    let records: Vec<PointRecord> = table
        .rows
        .iter()
        .map(|row| {
            let record = clean_row(row, &cols);
            let date_cell = cell_at(row, cols.match_date);
            if record.match_date.is_none() {
                if date_cell.is_blank() {
                    stats.blank_dates += 1;
                } else {
                    stats.unparseable_dates += 1;
                }
            }
            if let ServeOutcome::Other(label) = &record.outcome {
                stats.non_service_outcomes += 1;
                if stats.outcome_samples.len() < MAX_OUTCOME_SAMPLES
                    && !stats.outcome_samples.contains(label)
                {
                    stats.outcome_samples.push(label.clone());
                }
            }
            record
        })
        .collect();

    Ok((records, stats))
}

fn clean_row(row: &[Cell], cols: &ColumnMap) -> PointRecord {
    let text = |idx: usize| cell_at(row, idx).as_text();
    PointRecord::new(
        text(cols.tournament_id),
        text(cols.tournament_name),
        text(cols.match_id),
        parse_date(cell_at(row, cols.match_date)),
        Surface::parse(text(cols.surface).as_deref()),
        ServeOutcome::parse(text(cols.won_serve).as_deref()),
    )
}

fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    row.get(idx).unwrap_or(EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn headers() -> Vec<String> {
        [
            "TOURNAMENT ID",
            "TOURNAMENT NAME",
            "MATCH ID",
            "MATCH DATE",
            "SURFACE",
            "WON SERVE",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn row(date: &str, surface: &str, outcome: &str) -> Vec<Cell> {
        let text = |s: &str| {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.to_string())
            }
        };
        vec![
            Cell::Float(1.0),
            text("Roland Garros"),
            text("M1"),
            text(date),
            text(surface),
            text(outcome),
        ]
    }

    #[test]
    fn resolves_columns_in_any_order() {
        let mut h = headers();
        h.reverse();
        h.push("EXTRA".to_string());
        let cols = ColumnMap::resolve(&h).unwrap();
        assert_eq!(cols.won_serve, 0);
        assert_eq!(cols.tournament_id, 5);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let h: Vec<String> = headers().into_iter().filter(|c| c != "SURFACE").collect();
        let err = ColumnMap::resolve(&h).unwrap_err();
        assert!(err.to_string().contains("SURFACE"), "{err}");
    }

    #[test]
    fn example_rows_derive_service_flags() {
        let table = RawTable {
            headers: headers(),
            rows: vec![
                row("2024-05-27", "Clay", "WON"),
                row("2024-05-27", "Clay", "LOST"),
                row("2024-05-28", "Clay", "WON"),
                row("2024-05-28", "Clay", "n/a"),
            ],
        };
        let (records, stats) = clean(&table).unwrap();
        let service: Vec<bool> = records.iter().map(|r| r.is_service_game).collect();
        assert_eq!(service, vec![true, true, true, false]);
        let hold: Vec<bool> = records.iter().map(|r| r.hold).collect();
        assert_eq!(hold, vec![true, false, true, false]);
        assert_eq!(stats.non_service_outcomes, 1);
        assert_eq!(stats.outcome_samples, vec!["n/a".to_string()]);
        assert_eq!(records[0].tournament_id.as_deref(), Some("1"));
        assert_eq!(records[0].surface, Surface::Clay);
    }

    #[test]
    fn bad_dates_become_missing() {
        let table = RawTable {
            headers: headers(),
            rows: vec![
                row("garbage", "Hard", "WON"),
                row("", "Hard", "WON"),
                row("2024-01-08", "Hard", "WON"),
            ],
        };
        let (records, stats) = clean(&table).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].match_date, None);
        assert_eq!(records[0].month, None);
        assert_eq!(records[2].match_date, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(stats.unparseable_dates, 1);
        assert_eq!(stats.blank_dates, 1);
        assert_eq!(
            stats.to_string(),
            "3 rows | dates: 1 blank, 1 unparseable | 0 non-service rows"
        );
    }

    #[test]
    fn short_rows_read_as_blank() {
        let table = RawTable {
            headers: headers(),
            rows: vec![vec![Cell::Text("T9".to_string())]],
        };
        let (records, _) = clean(&table).unwrap();
        assert_eq!(records[0].tournament_id.as_deref(), Some("T9"));
        assert_eq!(records[0].surface, Surface::Unknown);
        assert_eq!(records[0].outcome, ServeOutcome::Missing);
    }
}
