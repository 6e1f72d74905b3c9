use std::fmt::Write;

use crate::aggregator::Summary;
use crate::config::PREVIEW_ROWS;
use crate::types::{PointRecord, MISSING};

/// Build the console report. Pure; `main` prints the result to stdout.
pub fn render(summary: &Summary, records: &[PointRecord], headers: &[String]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, summary, records, headers);
    out
}

fn write_report(
    out: &mut String,
    summary: &Summary,
    records: &[PointRecord],
    headers: &[String],
) -> std::fmt::Result {
    writeln!(out, "Data loaded successfully!")?;
    writeln!(out, "\nFirst {PREVIEW_ROWS} rows of the dataset:")?;
    write_preview(out, records)?;
    writeln!(out, "\nColumns in the dataset:")?;
    writeln!(out, "{headers:?}")?;

    writeln!(out, "\n--- BASIC STRUCTURE QUESTIONS ---")?;
    writeln!(out, "Total rows (roughly individual games): {}", summary.total_rows)?;
    writeln!(out, "Number of tournaments: {}", summary.num_tournaments)?;
    writeln!(out, "Number of matches: {}", summary.num_matches)?;

    writeln!(out, "\nGames by surface:")?;
    let width = label_width(summary.games_by_surface.iter().map(|c| c.key.as_str()));
    for c in &summary.games_by_surface {
        writeln!(out, "  {:<width$}  {:>7}", c.key, c.count)?;
    }

    writeln!(out, "\n--- SERVE PERFORMANCE ---")?;
    writeln!(out, "Total service games in dataset: {}", summary.service_games)?;
    writeln!(
        out,
        "Overall hold percentage: {}",
        format_rate(summary.overall_hold_rate)
    )?;

    writeln!(out, "\nHold percentage by surface:")?;
    let width = label_width(summary.hold_rate_by_surface.iter().map(|r| r.key.as_str()));
    for r in &summary.hold_rate_by_surface {
        writeln!(
            out,
            "  {:<width$}  {:>6}  ({} of {} service games)",
            r.key,
            format_pct(r.rate),
            r.hits,
            r.total
        )?;
    }

    writeln!(out, "\nGames per month:")?;
    if summary.games_per_month.is_empty() {
        writeln!(out, "  (no parseable match dates)")?;
    }
    for c in &summary.games_per_month {
        writeln!(out, "  {}  {:>7}", c.key, c.count)?;
    }

    writeln!(out, "\n--- INSIGHT QUESTIONS ---")?;
    writeln!(
        out,
        "\nTop {} tournaments by number of game-rows:",
        summary.top_tournaments.len()
    )?;
    let id_width = label_width(summary.top_tournaments.iter().map(|c| c.key.id.as_str())).max(2);
    let name_width = summary
        .top_tournaments
        .iter()
        .map(|c| c.key.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, 40);
    writeln!(
        out,
        "  {:>3}  {:<id_width$}  {:<name_width$}  {:>7}",
        "#", "ID", "NAME", "ROWS"
    )?;
    for (rank, c) in summary.top_tournaments.iter().enumerate() {
        writeln!(
            out,
            "  {:>3}  {:<id_width$}  {:<name_width$}  {:>7}",
            rank + 1,
            c.key.id,
            truncate(&c.key.name, name_width),
            c.count
        )?;
    }

    writeln!(out, "\nText summary of serve strength by surface:")?;
    for r in &summary.hold_rate_by_surface {
        writeln!(
            out,
            "- On {}, players hold serve about {} of the time.",
            r.key,
            format_pct(r.rate)
        )?;
    }
    Ok(())
}

fn write_preview(out: &mut String, records: &[PointRecord]) -> std::fmt::Result {
    writeln!(
        out,
        "  {:<8}  {:<24}  {:<14}  {:<10}  {:<8}  {:<6}  {:<7}  {:>7}  {:>4}",
        "TOURN ID", "TOURNAMENT NAME", "MATCH ID", "DATE", "SURFACE", "SERVE", "MONTH", "SERVICE", "HOLD"
    )?;
    for r in records.iter().take(PREVIEW_ROWS) {
        writeln!(
            out,
            "  {:<8}  {:<24}  {:<14}  {:<10}  {:<8}  {:<6}  {:<7}  {:>7}  {:>4}",
            truncate(r.tournament_id.as_deref().unwrap_or(MISSING), 8),
            truncate(r.tournament_name.as_deref().unwrap_or(MISSING), 24),
            truncate(r.match_id.as_deref().unwrap_or(MISSING), 14),
            r.match_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            truncate(&r.surface.to_string(), 8),
            truncate(&r.outcome.to_string(), 6),
            r.month
                .map(|m| m.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            u8::from(r.is_service_game),
            u8::from(r.hold),
        )?;
    }
    Ok(())
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

/// `0.6234` → `"62.3%"`.
pub fn format_pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(format_pct).unwrap_or_else(|| "n/a".to_string())
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
