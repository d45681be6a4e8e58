//! crdp-bench - protect/reveal round-trip benchmark
//!
//! A CLI tool that generates a run of numeric test values, pushes each one
//! through a tokenization service's protect and reveal endpoints (singly or
//! in bulk), checks that the revealed value equals the original, and prints
//! timing and correctness totals.
//!
//! ## Usage
//!
//! ```bash
//! # 100 single round trips against the default target
//! crdp-bench
//!
//! # Two iterations with per-iteration progress
//! crdp-bench --host 10.0.0.5 --port 32082 --start-data 99 --iterations 2 --show-progress
//!
//! # Bulk endpoints, 1000 values in chunks of 100, over HTTPS
//! crdp-bench --bulk --iterations 1000 --batch-size 100 --tls
//!
//! # Show the effective configuration
//! crdp-bench --config ./config.yaml --print-config
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info, warn};

mod benchmark;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod utils;

use cli::Args;
use config::{load_config, EnvConfig, Settings};
use executor::Driver;
use http::ProtectionClient;
use models::{RunReport, RunSummary};
use output::{write_report, SummaryFormatter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let explicit_config = args.config.clone().or_else(|| env.config_file.clone());
    let loaded = load_config(explicit_config.as_deref());

    let mut settings = Settings::resolve(&args, &env, &loaded.config);
    let notes = settings.normalize();

    utils::init_logger(settings.log_level());

    if let Some(warning) = &loaded.warning {
        warn!("Failed to load config file: {}", warning);
    }
    if let Some(path) = &loaded.path {
        debug!("Config loaded from {}", path.display());
    }
    if env.has_any() {
        debug!("Environment overrides present");
    }
    for note in &notes {
        warn!("{}", note);
    }
    debug!("JWT enabled={}", settings.jwt_enabled);

    if args.print_config {
        print!("{}", settings.to_app_config().to_yaml()?);
        return Ok(());
    }

    let client = ProtectionClient::new(&settings.client_config())
        .context("Failed to create HTTP client")?;

    info!("Target {} policy {}", client.base_url(), client.policy());

    let started_at = Utc::now();
    let summary = Driver::new(&client, &settings).run().await;

    let rendered = SummaryFormatter::new(settings.format).format_summary(&summary);
    println!("{}", rendered.trim_end());

    if let Some(path) = &settings.output_file {
        let report = build_report(&settings, &client, started_at, summary);
        match write_report(path, &report) {
            Ok(()) => info!("Report written to {}", path.display()),
            Err(e) => warn!("{:#}", e),
        }
    }

    Ok(())
}

fn build_report(
    settings: &Settings,
    client: &ProtectionClient,
    started_at: chrono::DateTime<Utc>,
    summary: RunSummary,
) -> RunReport {
    RunReport {
        started_at,
        target: client.base_url().to_string(),
        policy: client.policy().to_string(),
        start_data: settings.start_data.clone(),
        iterations: settings.iterations,
        batch_size: settings.bulk.then_some(settings.batch_size),
        workers: settings.workers,
        average_time_s: summary.average_time_s(),
        summary,
    }
}
