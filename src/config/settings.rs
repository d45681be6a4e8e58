//! Resolved run settings
//!
//! Built once at startup from CLI flags, environment, config file and
//! built-in defaults (in that order of precedence), then passed by
//! reference to everything that needs it.

use std::path::PathBuf;

use super::{AppConfig, EnvConfig};
use crate::cli::Args;
use crate::http::ClientConfig;
use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Effective configuration of one run
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub policy: String,
    pub timeout_secs: u64,
    pub tls: bool,
    pub start_data: String,
    pub iterations: usize,
    pub bulk: bool,
    pub batch_size: usize,
    pub workers: usize,
    pub show_progress: bool,
    pub show_body: bool,
    pub verbose: bool,
    pub output_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub jwt_enabled: bool,
    pub jwt_token: String,
    pub log_level: Option<LogLevel>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Settings {
    /// Settings taken from a configuration file alone
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            policy: config.protection.policy.clone(),
            timeout_secs: config.api.timeout,
            tls: config.api.tls,
            start_data: config.execution.start_data.clone(),
            iterations: config.execution.iterations,
            bulk: config.batch.enabled,
            batch_size: config.batch.size,
            workers: config.parallel.workers,
            show_progress: config.output.show_progress,
            show_body: config.output.show_body,
            verbose: config.output.verbose,
            output_file: Some(config.output.file.as_str())
                .filter(|f| !f.is_empty())
                .map(PathBuf::from),
            format: OutputFormat::default(),
            jwt_enabled: config.auth.jwt,
            jwt_token: config.auth.jwt_token.clone(),
            log_level: None,
        }
    }

    /// Layer environment and CLI overrides on top of the file settings
    pub fn resolve(args: &Args, env: &EnvConfig, config: &AppConfig) -> Self {
        let mut settings = Self::from_config(config);

        settings.apply_env(env);
        settings.apply_args(args);
        settings
    }

    fn apply_env(&mut self, env: &EnvConfig) {
        override_with(&mut self.host, env.host.clone());
        override_with(&mut self.port, env.port);
        override_with(&mut self.policy, env.policy.clone());
        override_with(&mut self.timeout_secs, env.timeout);
        override_with(&mut self.iterations, env.iterations);
        override_with(&mut self.start_data, env.start_data.clone());
        override_with(&mut self.bulk, env.bulk);
        override_with(&mut self.batch_size, env.batch_size);
        override_with(&mut self.tls, env.tls);
        override_with(&mut self.workers, env.workers);
        override_with(&mut self.jwt_token, env.jwt_token.clone());

        if let Some(level) = env.log_level.as_deref() {
            self.log_level = LogLevel::parse(level);
        }
    }

    fn apply_args(&mut self, args: &Args) {
        override_with(&mut self.host, args.host.clone());
        override_with(&mut self.port, args.port);
        override_with(&mut self.policy, args.policy.clone());
        override_with(&mut self.start_data, args.start_data.clone());
        override_with(&mut self.iterations, args.iterations);
        override_with(&mut self.timeout_secs, args.timeout);
        override_with(&mut self.verbose, args.verbose);
        override_with(&mut self.show_progress, args.show_progress);
        override_with(&mut self.show_body, args.show_body);
        override_with(&mut self.bulk, args.bulk);
        override_with(&mut self.batch_size, args.batch_size);
        override_with(&mut self.tls, args.tls);
        override_with(&mut self.jwt_enabled, args.jwt_requested());
        override_with(&mut self.jwt_token, args.jwt_token.clone());
        override_with(&mut self.workers, args.workers);

        if args.output.is_some() {
            self.output_file = args.output.clone();
        }
        self.format = OutputFormat::from_str(&args.format).unwrap_or_default();
    }

    /// Apply implied settings and repair unusable values.
    ///
    /// Returns a note for every value that was changed so the caller can
    /// log them once logging is up.
    pub fn normalize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();

        if self.show_body {
            self.show_progress = true;
        }
        if self.batch_size == 0 {
            self.batch_size = 1;
            notes.push("batch size 0 is not usable, using 1".to_string());
        }
        if self.workers == 0 {
            self.workers = 1;
            notes.push("worker count 0 is not usable, using 1".to_string());
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = AppConfig::default().api.timeout;
            notes.push(format!(
                "timeout 0 is not usable, using {}s",
                self.timeout_secs
            ));
        }
        if self.jwt_enabled && self.jwt_token.is_empty() {
            notes.push(
                "JWT enabled but no token configured, sending no Authorization header".to_string(),
            );
        }

        notes
    }

    /// Level for the logger: explicit level, else derived from `verbose`
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .unwrap_or_else(|| LogLevel::from_verbose(self.verbose))
    }

    /// Token to send, if JWT authentication is on and a token is set
    pub fn bearer_token(&self) -> Option<String> {
        (self.jwt_enabled && !self.jwt_token.is_empty()).then(|| self.jwt_token.clone())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.host, self.port, &self.policy)
            .timeout(self.timeout_secs)
            .tls(self.tls)
            .show_body(self.show_body)
            .bearer_token(self.bearer_token())
    }

    /// Settings expressed in the configuration file schema
    pub fn to_app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();

        config.api.host = self.host.clone();
        config.api.port = self.port;
        config.api.timeout = self.timeout_secs;
        config.api.tls = self.tls;
        config.protection.policy = self.policy.clone();
        config.execution.iterations = self.iterations;
        config.execution.start_data = self.start_data.clone();
        config.batch.enabled = self.bulk;
        config.batch.size = self.batch_size;
        config.output.show_progress = self.show_progress;
        config.output.show_body = self.show_body;
        config.output.verbose = self.verbose;
        config.output.file = self
            .output_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        config.auth.jwt = self.jwt_enabled;
        // never echo the token
        config.auth.jwt_token = if self.jwt_token.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        config.parallel.workers = self.workers;

        config
    }
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
