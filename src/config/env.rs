//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "CRDP_BENCH";

/// Overrides read from `CRDP_BENCH_*` variables
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub policy: Option<String>,
    pub timeout: Option<u64>,
    pub iterations: Option<usize>,
    pub start_data: Option<String>,
    pub bulk: Option<bool>,
    pub batch_size: Option<usize>,
    pub tls: Option<bool>,
    pub workers: Option<usize>,
    pub jwt_token: Option<String>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            host: get_env("HOST"),
            port: get_env_parse("PORT"),
            policy: get_env("POLICY"),
            timeout: get_env_parse("TIMEOUT"),
            iterations: get_env_parse("ITERATIONS"),
            start_data: get_env("START_DATA"),
            bulk: get_env_bool("BULK"),
            batch_size: get_env_parse("BATCH_SIZE"),
            tls: get_env_bool("TLS"),
            workers: get_env_parse("WORKERS"),
            jwt_token: get_env("JWT_TOKEN"),
            config_file: get_env("CONFIG").map(PathBuf::from),
            log_level: get_env("LOG_LEVEL"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        *self != Self::default()
    }
}

/// Get environment variable with prefix, ignoring empty values
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Restores the previous value of a variable on drop
    struct EnvGuard {
        key: String,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(name: &str, value: &str) -> Self {
            let key = format!("{ENV_PREFIX}_{name}");
            let previous = env::var(&key).ok();
            env::set_var(&key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.host.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_overrides() {
        let _host = EnvGuard::set("HOST", "10.9.8.7");
        let _port = EnvGuard::set("PORT", "9443");
        let _iterations = EnvGuard::set("ITERATIONS", "not-a-number");

        let config = EnvConfig::load();
        assert_eq!(config.host.as_deref(), Some("10.9.8.7"));
        assert_eq!(config.port, Some(9443));
        assert_eq!(config.iterations, None);
        assert!(config.has_any());
    }

    #[test]
    fn test_env_bool_parsing() {
        let _bulk = EnvGuard::set("BULK", "yes");
        let _tls = EnvGuard::set("TLS", "off");

        let config = EnvConfig::load();
        assert_eq!(config.bulk, Some(true));
        assert_eq!(config.tls, Some(false));
    }
}
