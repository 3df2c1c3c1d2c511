/*!
 * Sync Queue Library
 * Blocking concurrent queue for coordinating producer and consumer threads
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::{BlockingQueue, CancellationToken, QueueConfig, QueueError, QueueResult, QueueStats};
pub use monitoring::init_tracing;
