use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Raw cells
// ---------------------------------------------------------------------------

/// A single spreadsheet cell before any column-specific interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Empty,
}

impl Cell {
    /// Text form of the cell, trimmed. None for blanks.
    /// Integral floats drop the fraction so numeric ids read as `"42"`, not `"42.0"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{f:.0}")),
            Cell::Float(f) if f.is_finite() => Some(f.to_string()),
            Cell::Float(_) => None,
            Cell::Bool(b) => Some(b.to_string()),
            Cell::DateTime(dt) => Some(dt.to_string()),
            Cell::Empty => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// Header names plus data rows, exactly as read from the file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Splits sheet rows at `header_row` (0-based). Rows above it are ignored,
    /// blank rows at the end of the sheet are dropped.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>, header_row: usize) -> Result<Self> {
        if header_row >= rows.len() {
            return Err(AppError::Schema(format!(
                "header row {header_row} is beyond the end of the sheet ({} rows)",
                rows.len()
            )));
        }

        let mut data = rows.split_off(header_row + 1);
        let header_cells = rows.pop().unwrap_or_default();
        let headers: Vec<String> = header_cells
            .iter()
            .map(|c| c.as_text().unwrap_or_default())
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(AppError::Schema(format!("header row {header_row} is blank")));
        }

        let before = data.len();
        while data.last().is_some_and(|row| row.iter().all(Cell::is_blank)) {
            data.pop();
        }
        if before != data.len() {
            debug!("[LOAD] dropped {} trailing blank rows", before - data.len());
        }

        Ok(Self { headers, rows: data })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Load the first worksheet (or a csv file) and split it at `header_row`.
pub fn load_table(path: &Path, header_row: usize) -> Result<RawTable> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        read_workbook_rows(path)?
    };

    let table = RawTable::from_rows(rows, header_row)?;
    info!(
        rows = table.len(),
        columns = table.headers.len(),
        "[LOAD] {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display(),
    );
    Ok(table)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook.sheet_names().first().cloned();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Schema(format!("{} has no worksheets", path.display())))??;
    debug!("[LOAD] reading worksheet {:?}", sheet_name.unwrap_or_default());
    Ok(sheet_rows(&range))
}

/// Rows of a worksheet range, indexed by absolute sheet row.
fn sheet_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    // Ranges start at the first used cell; pad so indices match sheet rows.
    let leading = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); leading];
    rows.extend(range.rows().map(|row| row.iter().map(Cell::from).collect()));
    rows
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use std::io::Write;

    fn excel_date(serial: f64) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false))
    }

    fn jan_1_2024() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::Text(c.to_string()) })
            .collect()
    }

    #[test]
    fn numeric_ids_read_without_fraction() {
        assert_eq!(Cell::Float(1042.0).as_text().as_deref(), Some("1042"));
        assert_eq!(Cell::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Int(7).as_text().as_deref(), Some("7"));
        assert_eq!(Cell::Float(f64::NAN).as_text(), None);
        assert_eq!(Cell::Text("  ".to_string()).as_text(), None);
    }

    #[test]
    fn workbook_cells_convert() {
        assert_eq!(Cell::from(&excel_date(45292.0)), Cell::DateTime(jan_1_2024()));
        assert_eq!(Cell::from(&Data::Float(1042.0)).as_text().as_deref(), Some("1042"));
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Int(7));
        assert_eq!(Cell::from(&Data::String("Clay".to_string())), Cell::Text("Clay".to_string()));
        assert_eq!(
            Cell::from(&Data::DateTimeIso("2024-01-01T00:00:00".to_string())),
            Cell::Text("2024-01-01T00:00:00".to_string())
        );
        assert_eq!(Cell::from(&Data::Error(CellErrorType::NA)), Cell::Empty);
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn sheet_rows_keep_absolute_row_numbers() {
        // Sheet rows 0 and 1 are unused, so the range starts at row 2.
        let mut range: Range<Data> = Range::new((2, 0), (4, 1));
        range.set_value((2, 0), Data::String("WTA 2024".to_string()));
        range.set_value((3, 0), Data::String("MATCH ID".to_string()));
        range.set_value((3, 1), Data::String("MATCH DATE".to_string()));
        range.set_value((4, 0), Data::Float(1042.0));
        range.set_value((4, 1), excel_date(45292.0));

        let rows = sheet_rows(&range);
        assert_eq!(rows.len(), 5);
        assert!(rows[0].is_empty() && rows[1].is_empty());

        let table = RawTable::from_rows(rows, 3).unwrap();
        assert_eq!(table.headers, vec!["MATCH ID", "MATCH DATE"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0].as_text().as_deref(), Some("1042"));
        assert_eq!(table.rows[0][1], Cell::DateTime(jan_1_2024()));
    }

    #[test]
    fn header_row_skips_title_line() {
        let rows = vec![
            text_row(&["2024 WTA points"]),
            text_row(&["MATCH ID", "SURFACE"]),
            text_row(&["M1", "Clay"]),
            text_row(&["M2", "Hard"]),
        ];
        let table = RawTable::from_rows(rows, 1).unwrap();
        assert_eq!(table.headers, vec!["MATCH ID", "SURFACE"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn trailing_blank_rows_are_dropped_interior_kept() {
        let rows = vec![
            text_row(&["MATCH ID"]),
            text_row(&["M1"]),
            text_row(&[""]),
            text_row(&["M2"]),
            text_row(&["", ""]),
            Vec::new(),
        ];
        let table = RawTable::from_rows(rows, 0).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn header_beyond_sheet_is_error() {
        let rows = vec![text_row(&["MATCH ID"])];
        assert!(matches!(RawTable::from_rows(rows, 3), Err(AppError::Schema(_))));
    }

    #[test]
    fn blank_header_is_error() {
        let rows = vec![text_row(&["", ""]), text_row(&["M1", "Clay"])];
        assert!(matches!(RawTable::from_rows(rows, 0), Err(AppError::Schema(_))));
    }

    #[test]
    fn loads_csv_with_header_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "WTA 2024").unwrap();
        writeln!(file, "MATCH ID,SURFACE,WON SERVE").unwrap();
        writeln!(file, "M1,Clay,WON").unwrap();
        writeln!(file, "M1,Clay,").unwrap();
        writeln!(file, "M2,Hard,LOST").unwrap();
        drop(file);

        let table = load_table(&path, 1).unwrap();
        assert_eq!(table.headers, vec!["MATCH ID", "SURFACE", "WON SERVE"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][2], Cell::Empty);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_table(&dir.path().join("nope.xlsx"), 1).is_err());
        assert!(load_table(&dir.path().join("nope.csv"), 1).is_err());
    }
}
