//! CLI argument parsing
//!
//! Defines command-line interface using clap. Every setting is optional so
//! an explicitly passed flag can be told apart from a default.

use clap::Parser;
use std::path::PathBuf;

/// Round-trip benchmark for protect/reveal tokenization APIs
#[derive(Parser, Debug)]
#[command(name = "crdp-bench")]
#[command(version)]
#[command(about = "Benchmark protect/reveal round trips against a tokenization API")]
#[command(long_about = None)]
pub struct Args {
    /// Path to config.yaml (default: auto-search)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// API host [default: 192.168.0.231]
    #[arg(long)]
    pub host: Option<String>,

    /// API port [default: 32082]
    #[arg(long)]
    pub port: Option<u16>,

    /// protection_policy_name [default: P03]
    #[arg(long)]
    pub policy: Option<String>,

    /// Numeric data to start from [default: 1234567890123]
    #[arg(long)]
    pub start_data: Option<String>,

    /// Number of iterations (values to round-trip) [default: 100]
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub verbose: Option<bool>,

    /// Show per-iteration progress output
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub show_progress: Option<bool>,

    /// Show request/response URLs and JSON bodies (implies --show-progress)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub show_body: Option<bool>,

    /// Use bulk protect/reveal endpoints
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub bulk: Option<bool>,

    /// Batch size for bulk operations [default: 50]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Use HTTPS instead of HTTP (certificates are not verified)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub tls: Option<bool>,

    /// Enable JWT authentication (true/false)
    #[arg(long)]
    pub jwt_enabled: Option<String>,

    /// JWT token sent as a bearer token
    #[arg(long)]
    pub jwt_token: Option<String>,

    /// Concurrent iterations or batches in flight [default: 1]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Write a JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summary format (text, json, json-pretty)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// `--jwt-enabled` as a switch: an empty value leaves it unset, and
    /// anything other than `true` turns JWT off.
    pub fn jwt_requested(&self) -> Option<bool> {
        self.jwt_enabled
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| v == "true")
    }
}
