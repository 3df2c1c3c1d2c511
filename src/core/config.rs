/*!
 * Queue Configuration
 *
 * Construction-time settings for a blocking queue
 */

use super::errors::{QueueError, QueueResult};

/// Default queue name used in logs and stats
pub const DEFAULT_QUEUE_NAME: &str = "queue";

/// Environment variable holding the queue name
pub const ENV_QUEUE_NAME: &str = "QUEUE_NAME";

/// Environment variable holding the initial storage capacity
pub const ENV_QUEUE_INITIAL_CAPACITY: &str = "QUEUE_INITIAL_CAPACITY";

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Name attached to every log event and stats snapshot
    pub name: String,
    /// Pre-allocated slots in the FIFO storage. Not a capacity limit.
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            initial_capacity: 0,
        }
    }
}

impl QueueConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Load configuration from the environment
    ///
    /// Environment variables:
    /// - QUEUE_NAME: queue name (default: "queue")
    /// - QUEUE_INITIAL_CAPACITY: pre-allocated slots (default: 0)
    pub fn from_env() -> QueueResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> QueueResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_QUEUE_NAME) {
            let name = name.trim();
            if name.is_empty() {
                return Err(QueueError::InvalidConfig(format!(
                    "{} must not be empty",
                    ENV_QUEUE_NAME
                )));
            }
            config.name = name.to_string();
        }

        if let Some(raw) = lookup(ENV_QUEUE_INITIAL_CAPACITY) {
            config.initial_capacity = raw.trim().parse().map_err(|e| {
                QueueError::InvalidConfig(format!(
                    "{}={:?} is not a valid capacity: {}",
                    ENV_QUEUE_INITIAL_CAPACITY, raw, e
                ))
            })?;
        }

        Ok(config)
    }
}
