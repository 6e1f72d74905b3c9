use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::aggregator::Summary;
use crate::error::Result;

/// Persists the computed summary as pretty JSON for the static HTML report.
pub fn write_summary(summary: &Summary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        path = %path.display(),
        surfaces = summary.games_by_surface.len(),
        months = summary.games_per_month.len(),
        "[EXPORT] summary written",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PointRecord, ServeOutcome, Surface};

    #[test]
    fn round_trips_key_figures() {
        let records = vec![
            PointRecord::new(
                Some("7".to_string()),
                Some("Doha".to_string()),
                Some("D-1".to_string()),
                None,
                Surface::Hard,
                ServeOutcome::Won,
            ),
            PointRecord::new(
                Some("7".to_string()),
                Some("Doha".to_string()),
                Some("D-1".to_string()),
                None,
                Surface::Hard,
                ServeOutcome::Lost,
            ),
        ];
        let summary = Summary::compute(&records, 10);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.json");

        write_summary(&summary, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_rows"], 2);
        assert_eq!(value["service_games"], 2);
        assert_eq!(value["overall_hold_rate"], 0.5);
        assert_eq!(value["hold_rate_by_surface"][0]["key"], "Hard");
        assert_eq!(value["top_tournaments"][0]["key"]["id"], "7");
        assert!(value["games_per_month"].as_array().unwrap().is_empty());
    }
}
