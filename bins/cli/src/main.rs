//! Treso forecast runner.
//!
//! Reads one forecast request as JSON, runs the forecast pipeline and writes
//! the report as JSON.
//!
//! ```bash
//! treso request.json --view quarter --horizon 4
//! cat request.json | treso - --compact
//! ```

mod cli;

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use treso_core::{ForecastEngine, ForecastRequest};
use treso_shared::{AppConfig, AppError};

use cli::Cli;

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Forecast failed");
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().map_err(AppError::from)?;
    if cli.no_cache {
        config.cache.enabled = false;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut request = read_request(cli)?;
    cli.apply_overrides(&mut request);

    let engine = ForecastEngine::from_config(&config);
    let report = engine.run(&request);
    info!(
        periods = report.periods.len(),
        rows = report.rows.len(),
        issues = report.issues.len(),
        "Forecast computed"
    );

    let json = if cli.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .map_err(|e| AppError::Serialization(e.to_string()))?;

    match &cli.output {
        Some(path) => std::fs::write(path, json + "\n")
            .map_err(AppError::from)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn read_request(cli: &Cli) -> anyhow::Result<ForecastRequest> {
    let raw = if cli.reads_stdin() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(AppError::from)
            .context("reading request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.request)
            .map_err(AppError::from)
            .with_context(|| format!("reading {}", cli.request.display()))?
    };
    let request = serde_json::from_str(&raw)
        .map_err(|e| AppError::InvalidInput(e.to_string()))
        .context("parsing forecast request")?;
    Ok(request)
}
