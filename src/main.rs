mod aggregator;
mod cleaner;
mod config;
mod error;
mod export;
mod loader;
mod plotter;
mod reporter;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::aggregator::Summary;
use crate::config::{outputs, Config};
use crate::error::Result;

fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cfg) {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: &Config) -> Result<()> {
    // --- Load ---
    let table = loader::load_table(&cfg.data_path, cfg.header_row)?;
    if table.is_empty() {
        warn!("[LOAD] no data rows below header row {}", cfg.header_row);
    }

    // --- Clean ---
    let (records, stats) = cleaner::clean(&table)?;
    info!(
        rows = stats.rows,
        blank_dates = stats.blank_dates,
        unparseable_dates = stats.unparseable_dates,
        "[CLEAN] {stats}",
    );
    if stats.unparseable_dates > 0 {
        warn!(
            "[CLEAN] {} date cells could not be parsed and are excluded from monthly counts",
            stats.unparseable_dates
        );
    }
    if !stats.outcome_samples.is_empty() {
        info!("[CLEAN] non-service labels seen: {:?}", stats.outcome_samples);
    }

    // --- Aggregate ---
    let summary = Summary::compute(&records, cfg.top_n);

    // --- Report ---
    print!("{}", reporter::render(&summary, &records, &table.headers));

    // --- Charts ---
    if cfg.skip_plots {
        info!("[PLOT] SKIP_PLOTS set, charts not rendered");
    } else {
        let charts = plotter::render_charts(&summary, &cfg.output_dir)?;
        info!(
            "[PLOT] {} | {} | {}",
            charts.games_by_surface.display(),
            charts.hold_rate_by_surface.display(),
            charts.games_per_month.display(),
        );
    }

    // --- Export ---
    export::write_summary(&summary, &cfg.output_dir.join(outputs::SUMMARY_JSON))?;

    println!("\nAnalysis finished. Charts and summary are in {}.", cfg.output_dir.display());
    Ok(())
}
