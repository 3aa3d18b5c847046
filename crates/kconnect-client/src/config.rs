//! Plain-data transport configuration.
//!
//! These structs deserialize from any serde format with every field optional,
//! so a caller can embed them in their own config file. Durations are in
//! milliseconds.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::{self, RetryCondition, RetryPolicy};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings applied to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// User-Agent header; the crate default when unset.
    pub user_agent: Option<String>,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// HTTP basic credentials.
    pub basic_auth: Option<BasicAuth>,
    /// Retry behaviour for every request.
    pub retry: RetryConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            user_agent: None,
            headers: BTreeMap::new(),
            basic_auth: None,
            retry: RetryConfig::default(),
        }
    }
}

impl TransportConfig {
    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Username and optional password for HTTP basic auth.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Retry settings in declarative form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Cap on a single wait, in milliseconds.
    pub max_backoff_ms: u64,
    /// Response statuses that trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Also retry timeouts and connection failures.
    pub retry_transport_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: retry::DEFAULT_INITIAL_BACKOFF.as_millis() as u64,
            max_backoff_ms: retry::DEFAULT_MAX_BACKOFF.as_millis() as u64,
            retry_on_status: vec![StatusCode::CONFLICT.as_u16()],
            retry_transport_errors: false,
        }
    }
}

impl RetryConfig {
    /// Build the equivalent [`RetryPolicy`].
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let statuses = self
            .retry_on_status
            .iter()
            .map(|code| {
                StatusCode::from_u16(*code)
                    .map_err(|_| Error::Config(format!("invalid retry status code: {}", code)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut condition = RetryCondition::on_status(statuses);
        if self.retry_transport_errors {
            condition = condition.or(RetryCondition::transport_errors());
        }

        let policy = RetryPolicy::new()
            .max_retries(self.max_retries)
            .initial_backoff(Duration::from_millis(self.initial_backoff_ms))
            .max_backoff(Duration::from_millis(self.max_backoff_ms))
            .condition(condition);
        policy.validate()?;
        Ok(policy)
    }
}
