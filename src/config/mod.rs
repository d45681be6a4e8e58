//! Configuration module
//!
//! The YAML schema, its discovery on disk, environment overrides, and the
//! resolved [`Settings`] a run is driven by.

use serde::{Deserialize, Serialize};

mod env;
mod file;
mod settings;

pub use env::EnvConfig;
pub use file::load_config;
pub use settings::Settings;

/// Configuration file schema. Every section and field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub protection: ProtectionConfig,
    pub execution: ExecutionConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub auth: AuthConfig,
    pub parallel: ParallelConfig,
}

/// Target service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub timeout: u64,
    pub tls: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.231".to_string(),
            port: 32082,
            timeout: 10,
            tls: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    pub policy: String,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            policy: "P03".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub iterations: usize,
    pub start_data: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            start_data: "1234567890123".to_string(),
        }
    }
}

/// Bulk endpoint usage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub enabled: bool,
    pub size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 50,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub show_progress: bool,
    pub show_body: bool,
    pub verbose: bool,
    /// JSON report path, empty for none
    pub file: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(alias = "jwt_enabled")]
    pub jwt: bool,
    pub jwt_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}
