//! Retry policy for host-driven polling.
//!
//! [`RetryPolicy`] describes how many follow-up attempts an operation gets
//! and how long to wait before each. [`RetryState`] walks a policy one
//! attempt at a time so callers can arm a timer per attempt instead of
//! sleeping.
//!
//! Delays are fixed (no jitter) so simulated-time tests reproduce exact
//! schedules.
//!
//! # Example
//!
//! ```
//! use folio_runtime::retry::{RetryPolicy, RetryState};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::fixed(2, Duration::from_millis(120));
//! let mut state = RetryState::new(policy);
//!
//! assert_eq!(state.next_delay(), Some(Duration::from_millis(120)));
//! assert_eq!(state.next_delay(), Some(Duration::from_millis(120)));
//! assert_eq!(state.next_delay(), None);
//! ```

#![forbid(unsafe_code)]

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// A fixed-interval retry policy with a bounded number of follow-up attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = only the initial attempt).
    pub max_retries: u32,
    /// Delay before each retry, in milliseconds.
    pub interval_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn fixed(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Cursor over a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Consume one retry and return the delay before it, or `None` when the
    /// policy is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt += 1;
        Some(self.policy.interval())
    }

    /// Retries consumed so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.policy.max_retries
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
