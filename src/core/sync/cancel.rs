/*!
 * Cancellation
 *
 * External release signal for unbounded waits. A token can be shared by any
 * number of consumers and queues; cancelling it wakes every queue that a
 * cancellable wait registered with it.
 */

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Something a cancelled token has to wake up
pub(crate) trait Wake: Send + Sync {
    /// Broadcast to all waiters. Must take the waiters' lock before notifying.
    fn wake_waiters(&self);
}

#[derive(Default)]
struct TokenState {
    cancelled: AtomicBool,
    targets: Mutex<Vec<Weak<dyn Wake>>>,
}

/// Cancellation signal for blocking takes
///
/// Cloning shares the underlying state. Once cancelled a token stays
/// cancelled.
///
/// # Examples
///
/// ```
/// use sync_queue::{BlockingQueue, CancellationToken, QueueError};
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(BlockingQueue::<u32>::new());
/// let token = CancellationToken::new();
///
/// let consumer = {
///     let queue = queue.clone();
///     let token = token.clone();
///     thread::spawn(move || queue.dequeue_with_cancel(&token))
/// };
///
/// token.cancel();
/// assert_eq!(consumer.join().unwrap(), Err(QueueError::Cancelled));
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and wake every registered queue
    ///
    /// Idempotent: only the first call wakes anything.
    pub fn cancel(&self) {
        if self.state.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }

        let targets = std::mem::take(&mut *self.state.targets.lock());
        debug!(targets = targets.len(), "Cancellation token triggered");

        for target in targets.iter().filter_map(Weak::upgrade) {
            target.wake_waiters();
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Register a wake target
    ///
    /// Callers must check `is_cancelled` under their own lock after this
    /// returns; a registration racing with `cancel` is otherwise missed.
    pub(crate) fn register(&self, target: Weak<dyn Wake>) {
        let mut targets = self.state.targets.lock();
        targets.retain(|t| t.strong_count() > 0);
        if !targets.iter().any(|t| Weak::ptr_eq(t, &target)) {
            targets.push(target);
        }
    }

    #[cfg(test)]
    fn registered(&self) -> usize {
        self.state.targets.lock().len()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
