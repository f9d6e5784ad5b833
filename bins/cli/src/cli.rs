//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use treso_core::ForecastRequest;

/// Treso - treasury forecast runner
#[derive(Debug, Parser)]
#[command(name = "treso")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Forecast request JSON file, or `-` for stdin
    pub request: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Calendar view, overriding the request
    #[arg(long)]
    pub view: Option<String>,

    /// Anchor date (YYYY-MM-DD), overriding the request
    #[arg(long)]
    pub anchor: Option<NaiveDate>,

    /// Navigation offset, overriding the request
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i32>,

    /// Number of top-level periods, overriding the request
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Disable the result cache for this run
    #[arg(long, env = "TRESO_NO_CACHE")]
    pub no_cache: bool,
}

impl Cli {
    /// Whether the request is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.request.as_os_str() == "-"
    }

    /// Applies command-line overrides to a parsed request.
    pub fn apply_overrides(&self, request: &mut ForecastRequest) {
        if let Some(view) = &self.view {
            request.view.clone_from(view);
        }
        if let Some(anchor) = self.anchor {
            request.anchor = anchor;
        }
        if let Some(offset) = self.offset {
            request.offset = offset;
        }
        if self.horizon.is_some() {
            request.horizon = self.horizon;
        }
    }
}
