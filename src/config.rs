use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DEFAULT_DATA_PATH: &str = "2024-WTA-Women-Points-Dataset.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// The dataset ships with a title line above the column names.
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Tournaments listed in the ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Records shown in the preview block of the report.
pub const PREVIEW_ROWS: usize = 5;

/// Column names in the source spreadsheet.
pub mod columns {
    pub const TOURNAMENT_ID: &str = "TOURNAMENT ID";
    pub const TOURNAMENT_NAME: &str = "TOURNAMENT NAME";
    pub const MATCH_ID: &str = "MATCH ID";
    pub const MATCH_DATE: &str = "MATCH DATE";
    pub const SURFACE: &str = "SURFACE";
    pub const WON_SERVE: &str = "WON SERVE";
}

/// Output file names, written under `Config::output_dir`.
pub mod outputs {
    pub const GAMES_BY_SURFACE: &str = "games_by_surface.png";
    pub const HOLD_RATE_BY_SURFACE: &str = "hold_rate_by_surface.png";
    pub const GAMES_PER_MONTH: &str = "games_per_month.png";
    pub const SUMMARY_JSON: &str = "summary.json";
}

/// Chart canvas sizes in pixels (width, height).
pub mod chart_sizes {
    pub const BAR: (u32, u32) = (800, 500);
    pub const LINE: (u32, u32) = (1000, 500);
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    /// 0-based index of the row holding column names (HEADER_ROW)
    pub header_row: usize,
    pub output_dir: PathBuf,
    /// Tournaments kept in the ranking (TOP_N)
    pub top_n: usize,
    pub log_level: String,
    /// Skip chart rendering, e.g. on headless boxes without fonts (SKIP_PLOTS)
    pub skip_plots: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source. `from_env` passes the process env.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_n = var("TOP_N")
            .unwrap_or_else(|| DEFAULT_TOP_N.to_string())
            .trim()
            .parse::<usize>()
            .map_err(|_| AppError::Config("TOP_N must be a non-negative integer".to_string()))?;

        Ok(Self {
            data_path: var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            header_row: var("HEADER_ROW")
                .unwrap_or_else(|| DEFAULT_HEADER_ROW.to_string())
                .trim()
                .parse::<usize>()
                .map_err(|_| {
                    AppError::Config("HEADER_ROW must be a non-negative integer".to_string())
                })?,
            output_dir: var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            top_n,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            skip_plots: var("SKIP_PLOTS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
