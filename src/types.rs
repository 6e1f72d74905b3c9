use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Placeholder printed for missing values.
pub const MISSING: &str = "NaN";

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Carpet,
    /// Any other non-blank label, kept verbatim.
    Other(String),
    /// Blank cell.
    Unknown,
}

impl Surface {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(label) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Surface::Unknown;
        };
        // Exact match after trimming, like `ServeOutcome::parse`.
        match label {
            "Hard" => Surface::Hard,
            "Clay" => Surface::Clay,
            "Grass" => Surface::Grass,
            "Carpet" => Surface::Carpet,
            _ => Surface::Other(label.to_string()),
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Surface::Hard => "Hard",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
            Surface::Carpet => "Carpet",
            Surface::Other(label) => label,
            Surface::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Serve outcome
// ---------------------------------------------------------------------------

/// Value of the `WON SERVE` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeOutcome {
    /// Server held.
    Won,
    /// Server was broken.
    Lost,
    /// Row is not a service game for the tracked player (e.g. "n/a").
    Other(String),
    Missing,
}

impl ServeOutcome {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => ServeOutcome::Missing,
            Some("WON") => ServeOutcome::Won,
            Some("LOST") => ServeOutcome::Lost,
            Some(other) => ServeOutcome::Other(other.to_string()),
        }
    }

    pub fn is_service_game(&self) -> bool {
        matches!(self, ServeOutcome::Won | ServeOutcome::Lost)
    }
}

impl std::fmt::Display for ServeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeOutcome::Won => write!(f, "WON"),
            ServeOutcome::Lost => write!(f, "LOST"),
            ServeOutcome::Other(label) => write!(f, "{label}"),
            ServeOutcome::Missing => write!(f, "{MISSING}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Month bucket
// ---------------------------------------------------------------------------

/// Calendar month a match date falls in. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// PointRecord
// ---------------------------------------------------------------------------

/// One game row after cleaning. Built once by the cleaner, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub tournament_id: Option<String>,
    pub tournament_name: Option<String>,
    pub match_id: Option<String>,
    pub match_date: Option<NaiveDate>,
    pub surface: Surface,
    pub outcome: ServeOutcome,
    /// `match_date` truncated to its month; None when the date did not parse.
    pub month: Option<Month>,
    pub is_service_game: bool,
    /// Always false unless `is_service_game` is true.
    pub hold: bool,
}

impl PointRecord {
    pub fn new(
        tournament_id: Option<String>,
        tournament_name: Option<String>,
        match_id: Option<String>,
        match_date: Option<NaiveDate>,
        surface: Surface,
        outcome: ServeOutcome,
    ) -> Self {
        let is_service_game = outcome.is_service_game();
        let hold = outcome == ServeOutcome::Won;
        Self {
            tournament_id,
            tournament_name,
            match_id,
            month: match_date.map(Month::of),
            match_date,
            surface,
            outcome,
            is_service_game,
            hold,
        }
    }
}
