//! HTTP client for the protect/reveal API
//!
//! Wraps a pooled reqwest client and exposes the four tokenization
//! endpoints. Non-2xx responses are returned as ordinary values; only
//! transport failures surface as [`HttpError`].

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const PROTECT_PATH: &str = "/v1/protect";
const REVEAL_PATH: &str = "/v1/reveal";
const PROTECT_BULK_PATH: &str = "/v1/protectbulk";
const REVEAL_BULK_PATH: &str = "/v1/revealbulk";

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// The four operations of a tokenization service
#[async_trait]
pub trait ProtectionApi: Send + Sync {
    /// Tokenize a single value
    async fn protect(&self, data: &str) -> Result<ApiResponse, HttpError>;

    /// Recover a single value from its token
    async fn reveal(&self, protected_data: &str) -> Result<ApiResponse, HttpError>;

    /// Tokenize many values in one request
    async fn protect_bulk(&self, data: &[String]) -> Result<ApiResponse, HttpError>;

    /// Recover many values in one request
    async fn reveal_bulk(&self, protected_data: &[String]) -> Result<ApiResponse, HttpError>;
}

/// Status code plus decoded JSON object body
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Map<String, Value>,
}

impl ApiResponse {
    pub fn new(status_code: u16, body: Map<String, Value>) -> Self {
        Self { status_code, body }
    }

    /// Decode a raw response body.
    ///
    /// An empty body yields an empty map. Anything that is not a JSON
    /// object is kept verbatim under the `raw` key.
    pub fn from_text(status_code: u16, text: &str) -> Self {
        if text.is_empty() {
            return Self::new(status_code, Map::new());
        }

        let body = serde_json::from_str::<Map<String, Value>>(text).unwrap_or_else(|_| {
            let mut raw = Map::new();
            raw.insert("raw".to_string(), Value::String(text.to_string()));
            raw
        });

        Self::new(status_code, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// String value of a top-level field, empty when absent or not a string
    pub fn string_field(&self, key: &str) -> String {
        self.body
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Collect `field` from each object of the array under `array_key`.
    ///
    /// Order is preserved; entries without a string `field` are skipped.
    pub fn string_list(&self, array_key: &str, field: &str) -> Vec<String> {
        self.body
            .get(array_key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(field).and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tokens returned by `/v1/protect`
    pub fn protected_data(&self) -> String {
        self.string_field("protected_data")
    }

    /// Plaintext returned by `/v1/reveal`
    pub fn data(&self) -> String {
        self.string_field("data")
    }

    /// Tokens returned by `/v1/protectbulk`
    pub fn protected_data_array(&self) -> Vec<String> {
        self.string_list("protected_data_array", "protected_data")
    }

    /// Plaintext values returned by `/v1/revealbulk`
    pub fn data_array(&self) -> Vec<String> {
        self.string_list("data_array", "data")
    }
}

/// Connection settings for [`ProtectionClient`]
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub policy: String,
    pub timeout_secs: u64,
    pub tls: bool,
    pub show_body: bool,
    pub bearer_token: Option<String>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, policy: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            policy: policy.into(),
            timeout_secs: 10,
            tls: false,
            show_body: false,
            bearer_token: None,
        }
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = enabled;
        self
    }

    pub fn show_body(mut self, enabled: bool) -> Self {
        self.show_body = enabled;
        self
    }

    pub fn bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    /// `scheme://host:port` without a trailing slash
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

/// Client for the protect/reveal endpoints
#[derive(Clone)]
pub struct ProtectionClient {
    client: Client,
    base_url: String,
    policy: String,
    timeout_secs: u64,
    show_body: bool,
    authorization: Option<HeaderValue>,
}

impl ProtectionClient {
    /// Build the pooled client. TLS certificates are not verified.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(config.tls)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        let authorization = config
            .bearer_token
            .as_deref()
            .map(|token| {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
                value.set_sensitive(true);
                Ok::<_, HttpError>(value)
            })
            .transpose()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            policy: config.policy.clone(),
            timeout_secs: config.timeout_secs,
            show_body: config.show_body,
            authorization,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// POST a JSON payload and decode the response
    pub async fn post_json(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<ApiResponse, HttpError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = serde_json::to_string(payload)?;

        if self.show_body {
            println!("POST {url}\n{body}");
        }

        debug!("Sending POST request to {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization.clone());
        }

        let response = request.send().await.map_err(|e| self.classify(e, &url))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e, &url))?;

        if self.show_body {
            println!("{text}");
        }

        debug!(
            "Response: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        Ok(ApiResponse::from_text(status.as_u16(), &text))
    }

    fn classify(&self, error: reqwest::Error, url: &str) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout(self.timeout_secs)
        } else if error.is_connect() {
            HttpError::ConnectionRefused(url.to_string())
        } else {
            HttpError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl ProtectionApi for ProtectionClient {
    async fn protect(&self, data: &str) -> Result<ApiResponse, HttpError> {
        self.post_json(PROTECT_PATH, &protect_payload(&self.policy, data))
            .await
    }

    async fn reveal(&self, protected_data: &str) -> Result<ApiResponse, HttpError> {
        self.post_json(REVEAL_PATH, &reveal_payload(&self.policy, protected_data))
            .await
    }

    async fn protect_bulk(&self, data: &[String]) -> Result<ApiResponse, HttpError> {
        self.post_json(PROTECT_BULK_PATH, &protect_bulk_payload(&self.policy, data))
            .await
    }

    async fn reveal_bulk(&self, protected_data: &[String]) -> Result<ApiResponse, HttpError> {
        self.post_json(
            REVEAL_BULK_PATH,
            &reveal_bulk_payload(&self.policy, protected_data),
        )
        .await
    }
}

fn protect_payload(policy: &str, data: &str) -> Value {
    json!({
        "data": data,
        "protection_policy_name": policy,
    })
}

fn reveal_payload(policy: &str, protected_data: &str) -> Value {
    json!({
        "protected_data": protected_data,
        "protection_policy_name": policy,
    })
}

fn protect_bulk_payload(policy: &str, data: &[String]) -> Value {
    json!({
        "protection_policy_name": policy,
        "data_array": data,
    })
}

fn reveal_bulk_payload(policy: &str, protected_data: &[String]) -> Value {
    let entries: Vec<Value> = protected_data
        .iter()
        .map(|token| json!({ "protected_data": token }))
        .collect();

    json!({
        "protection_policy_name": policy,
        "protected_data_array": entries,
    })
}
