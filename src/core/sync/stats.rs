/*!
 * Queue Statistics
 */

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a queue
///
/// Taken under the queue lock, so `total_enqueued - total_dequeued == length`
/// holds within one snapshot. May be stale as soon as it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub length: usize,
    /// Consumers currently suspended waiting for elements
    pub waiting_consumers: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    /// Timed takes that returned absence after a deadline passed
    pub timeouts: u64,
    pub cancellations: u64,
}

/// Counters kept alongside the items, mutated only under the queue lock
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    pub waiting: usize,
    pub enqueued: u64,
    pub dequeued: u64,
    pub timeouts: u64,
    pub cancellations: u64,
}

impl QueueStats {
    pub(crate) fn from_counters(name: &str, length: usize, counters: &Counters) -> Self {
        Self {
            name: name.to_string(),
            length,
            waiting_consumers: counters.waiting,
            total_enqueued: counters.enqueued,
            total_dequeued: counters.dequeued,
            timeouts: counters.timeouts,
            cancellations: counters.cancellations,
        }
    }

    /// Elements that were enqueued and not yet handed to a consumer
    #[inline]
    pub fn pending(&self) -> u64 {
        self.total_enqueued.saturating_sub(self.total_dequeued)
    }
}
