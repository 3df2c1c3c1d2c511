/*!
 * Core Module
 * Queue primitive, configuration and error handling
 */

pub mod config;
pub mod errors;
pub mod sync;

// Re-export for convenience
pub use config::QueueConfig;
pub use errors::*;
pub use sync::{BlockingQueue, CancellationToken, QueueStats};
