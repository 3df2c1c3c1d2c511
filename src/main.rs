/*!
 * Queue Demo - Main Entry Point
 *
 * Producers enqueue batches while a pool of consumers takes elements one at a
 * time. Once every element has been observed the consumers are released with
 * a cancellation token and the final stats are logged as JSON.
 *
 * Environment variables:
 * - QUEUE_DEMO_PRODUCERS: producer threads (default: 4)
 * - QUEUE_DEMO_ITEMS: batches per producer (default: 5)
 * - QUEUE_NAME / QUEUE_INITIAL_CAPACITY: queue configuration
 */

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

use sync_queue::{init_tracing, BlockingQueue, CancellationToken, QueueConfig, QueueError};

const BATCH: [&str; 3] = ["hello", "world", "queue"];
const CONSUMERS: usize = 3;

fn env_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw:?} is not a valid count")),
        Err(_) => Ok(default),
    }
}

/// Wait until `expected` elements were observed
///
/// Returns `false` as soon as any consumer has exited, since a consumer only
/// stops on its own after an error or a panic and the count may never be reached.
fn wait_for_observed<R>(observed: &AtomicUsize, expected: usize, consumers: &[JoinHandle<R>]) -> bool {
    while observed.load(Ordering::SeqCst) < expected {
        if consumers.iter().any(JoinHandle::is_finished) {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
    true
}

fn main() -> Result<()> {
    init_tracing();

    let producers = env_usize("QUEUE_DEMO_PRODUCERS", 4)?;
    let batches = env_usize("QUEUE_DEMO_ITEMS", 5)?;
    let config = QueueConfig::from_env().context("Failed to load queue configuration")?;
    let expected = producers * batches * BATCH.len();

    info!(queue = %config.name, producers, batches, expected, "Queue demo starting...");

    let queue = Arc::new(BlockingQueue::<String>::with_config(config));
    let token = CancellationToken::new();
    let observed = Arc::new(AtomicUsize::new(0));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|id| {
            let queue = queue.clone();
            let token = token.clone();
            let observed = observed.clone();
            thread::Builder::new()
                .name(format!("consumer-{id}"))
                .spawn(move || {
                    let mut taken = 0usize;
                    loop {
                        match queue.dequeue_with_cancel(&token) {
                            Ok(item) => {
                                tracing::trace!(consumer = id, %item, "took item");
                                taken += 1;
                                observed.fetch_add(1, Ordering::SeqCst);
                            }
                            Err(QueueError::Cancelled) => break,
                            Err(e) => {
                                warn!(consumer = id, error = %e, "Consumer stopped");
                                break;
                            }
                        }
                    }
                    taken
                })
                .context("Failed to spawn consumer")
        })
        .collect::<Result<_>>()?;

    let producer_handles: Vec<_> = (0..producers)
        .map(|id| {
            let queue = queue.clone();
            thread::Builder::new()
                .name(format!("producer-{id}"))
                .spawn(move || {
                    for batch in 0..batches {
                        queue.enqueue_all(BATCH.iter().map(|w| format!("p{id}-b{batch}-{w}")));
                    }
                })
                .context("Failed to spawn producer")
        })
        .collect::<Result<_>>()?;

    for handle in producer_handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    }

    if !wait_for_observed(&observed, expected, &consumers) {
        warn!(
            observed = observed.load(Ordering::SeqCst),
            expected, "A consumer exited early, shutting down"
        );
    }
    token.cancel();

    for (id, handle) in consumers.into_iter().enumerate() {
        let taken = handle
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
        info!(consumer = id, taken, "Consumer finished");
    }

    let stats = queue.stats();
    info!(
        stats = %serde_json::to_string(&stats).context("Failed to serialize stats")?,
        "Queue demo complete"
    );

    Ok(())
}
