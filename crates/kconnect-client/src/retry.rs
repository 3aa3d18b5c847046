//! Retry policy for the shared transport.
//!
//! The policy only decides; the transport owns the attempt loop. Connect
//! workers answer 409 while a rebalance is in progress, so that is the one
//! outcome retried by default. Everything else fails on the first attempt
//! unless a broader [`RetryCondition`] is configured.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Error, Result};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default wait before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Default upper bound for a single wait.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Coarse classification of a failure below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The attempt exceeded its timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// Any other request failure.
    Other,
}

impl TransportFailure {
    /// Classify a `reqwest` error.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else {
            TransportFailure::Other
        }
    }
}

/// What a single attempt produced, as seen by the retry condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response arrived with this status.
    Status(StatusCode),
    /// The request failed before a response arrived.
    Transport(TransportFailure),
}

/// Predicate deciding whether an attempt outcome is worth retrying.
///
/// Cheap to clone; the wrapped function is shared.
#[derive(Clone)]
pub struct RetryCondition(Arc<dyn Fn(&AttemptOutcome) -> bool + Send + Sync>);

impl RetryCondition {
    /// Wrap an arbitrary predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&AttemptOutcome) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Retry on 409 Conflict only.
    pub fn conflict() -> Self {
        Self::on_status([StatusCode::CONFLICT])
    }

    /// Retry when the response status is one of `statuses`.
    pub fn on_status(statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        let statuses: Vec<StatusCode> = statuses.into_iter().collect();
        Self::new(move |outcome| {
            matches!(outcome, AttemptOutcome::Status(status) if statuses.contains(status))
        })
    }

    /// Retry on timeouts and connection failures.
    pub fn transport_errors() -> Self {
        Self::new(|outcome| {
            matches!(
                outcome,
                AttemptOutcome::Transport(TransportFailure::Timeout | TransportFailure::Connect)
            )
        })
    }

    /// Never retry.
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Retry when either condition holds.
    pub fn or(self, other: RetryCondition) -> Self {
        Self::new(move |outcome| self.matches(outcome) || other.matches(outcome))
    }

    /// Evaluate the condition.
    pub fn matches(&self, outcome: &AttemptOutcome) -> bool {
        (self.0)(outcome)
    }
}

impl Default for RetryCondition {
    fn default() -> Self {
        Self::conflict()
    }
}

impl fmt::Debug for RetryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryCondition(..)")
    }
}

/// Bounded retry policy with capped exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    condition: RetryCondition,
}

impl RetryPolicy {
    /// Policy with the defaults: 5 retries on 409, 500ms doubling up to 5s.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            condition: RetryCondition::default(),
        }
    }

    /// Policy that sends every request exactly once.
    pub fn disabled() -> Self {
        Self::new().max_retries(0).condition(RetryCondition::never())
    }

    /// Set the number of retries after the first attempt.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the wait before the first retry.
    pub fn initial_backoff(mut self, wait: Duration) -> Self {
        self.initial_backoff = wait;
        self
    }

    /// Set the cap on a single wait. Must not be below the initial wait.
    pub fn max_backoff(mut self, wait: Duration) -> Self {
        self.max_backoff = wait;
        self
    }

    /// Set which outcomes are retried.
    pub fn condition(mut self, condition: RetryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Check that the backoff bounds are consistent.
    pub fn validate(&self) -> Result<()> {
        if self.max_backoff < self.initial_backoff {
            return Err(Error::Config(format!(
                "max backoff ({:?}) is below initial backoff ({:?})",
                self.max_backoff, self.initial_backoff
            )));
        }
        Ok(())
    }

    /// Configured number of retries after the first attempt.
    pub fn retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound on requests sent for one call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Decide whether to retry after `retries_so_far` retries have been made.
    pub fn should_retry(&self, outcome: &AttemptOutcome, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries && self.condition.matches(outcome)
    }

    /// Wait before retry number `retry` (1-based): `initial * 2^(retry-1)`,
    /// capped at the maximum but never below the initial wait.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(20);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
            .max(self.initial_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
