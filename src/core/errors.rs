/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * "Nothing available" is never an error here: non-blocking and timed takes
 * report absence as `None`.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(queue::invalid_argument),
        help("Timeouts must be zero or positive. Use zero to check once without waiting.")
    )]
    InvalidArgument(String),

    #[error("Wait was cancelled")]
    #[diagnostic(
        code(queue::cancelled),
        help("The cancellation token passed to the wait was triggered, usually during shutdown.")
    )]
    Cancelled,

    #[error("Invalid queue configuration: {0}")]
    #[diagnostic(
        code(queue::invalid_config),
        help("Check QUEUE_NAME and QUEUE_INITIAL_CAPACITY in the environment.")
    )]
    InvalidConfig(String),
}

impl QueueError {
    /// Whether the error came from a cancelled wait rather than bad input
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueueError::Cancelled)
    }
}
