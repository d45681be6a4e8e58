//! HTTP client module for the tokenization service
//!
//! Provides the protect/reveal client and the trait the runners drive.

mod client;

pub use client::{ApiResponse, ClientConfig, HttpError, ProtectionApi, ProtectionClient};
