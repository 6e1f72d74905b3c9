use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::loader::Cell;

/// Text layouts tried in order for date cells stored as strings.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Interpret a `MATCH DATE` cell. Anything unparseable is None, never an error.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Int(i) => from_compact(*i),
        Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => from_compact(*f as i64),
        Cell::Text(s) => parse_date_str(s.trim()),
        Cell::Float(_) | Cell::Bool(_) | Cell::Empty => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(from_compact);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `20240115`-style integers.
fn from_compact(value: i64) -> Option<NaiveDate> {
    if !(10_000_101..=99_991_231).contains(&value) {
        return None;
    }
    let year = (value / 10_000) as i32;
    let month = ((value / 100) % 100) as u32;
    let day = (value % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}
