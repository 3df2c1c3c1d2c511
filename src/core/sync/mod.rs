/*!
 * Synchronization Primitives
 *
 * Blocking producer/consumer queue built on a single lock and a "not empty"
 * condition:
 * - Blocking takes (bulk drain, unbounded, bounded by a timeout)
 * - Non-blocking and async takes
 * - Cancellable unbounded takes for shutdown
 *
 * # Use Cases
 *
 * - **Work distribution**: Producers enqueue jobs, a pool of workers takes them
 * - **Batch collection**: A single consumer drains everything queued so far
 * - **Graceful shutdown**: Consumers blocked in a take are released by a token
 */

mod cancel;
mod queue;
mod stats;
mod timeout;

pub use cancel::CancellationToken;
pub use queue::BlockingQueue;
pub use stats::QueueStats;
