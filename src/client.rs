//! HTTP client construction
//!
//! The executors never build a client themselves; the composition root builds
//! one here from [`Config`] and injects it through [`HttpTransport`].

use crate::config::{Config, DEFAULT_POOL_IDLE_TIMEOUT_SECS, DEFAULT_TCP_KEEPALIVE_SECS};
use crate::error::{FrameworkError, Result};
use crate::transport::HttpTransport;
use reqwest::Client;
use std::time::Duration;

/// Create an HTTP client honoring the configured timeouts
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., invalid user agent).
pub fn create_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .tcp_keepalive(Duration::from_secs(DEFAULT_TCP_KEEPALIVE_SECS))
        .tcp_nodelay(true)
        .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS))
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| FrameworkError::Internal(format!("Failed to create HTTP client: {e}")))
}

/// Transport over a client built from `config`
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn create_transport(config: &Config) -> Result<HttpTransport> {
    create_client(config).map(HttpTransport::new)
}
