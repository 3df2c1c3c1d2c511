/*!
 * Timeout Handling
 *
 * Validation of caller-supplied timeouts and deadline computation for the
 * bounded waits. Timeouts arrive as signed `time::Duration` so a negative
 * value can be rejected instead of being unrepresentable.
 */

use crate::core::errors::{QueueError, QueueResult};
use std::time::{Duration, Instant};

/// Convert a signed timeout into a wait duration
///
/// Negative timeouts are rejected with `InvalidArgument`; zero means
/// "check once, do not wait".
pub(crate) fn validate_timeout(timeout: time::Duration) -> QueueResult<Duration> {
    if timeout.is_negative() {
        return Err(QueueError::InvalidArgument(format!(
            "timeout must not be negative, got {}",
            timeout
        )));
    }

    Duration::try_from(timeout)
        .map_err(|e| QueueError::InvalidArgument(format!("timeout {} out of range: {}", timeout, e)))
}

/// Deadline for a bounded wait, measured from the moment it is created
///
/// A timeout too large to be added to the current instant has no deadline
/// and waits like an unbounded take.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub(crate) fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
        }
    }

    pub(crate) fn never() -> Self {
        Self { at: None }
    }

    #[inline]
    pub(crate) fn instant(&self) -> Option<Instant> {
        self.at
    }

    #[inline]
    pub(crate) fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}
