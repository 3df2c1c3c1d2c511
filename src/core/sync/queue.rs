/*!
 * Blocking Queue
 *
 * Unbounded FIFO queue coordinating producer and consumer threads through a
 * single `parking_lot::Mutex` and a "not empty" `Condvar`.
 *
 * # Lock discipline
 *
 * Every check of the storage and the mutation that depends on it happen under
 * one lock acquisition. Waits always re-test the emptiness predicate in a loop:
 * a wake can be spurious, or another consumer may have drained the queue first.
 *
 * Each insertion call that adds elements broadcasts exactly once, to both the
 * blocking waiters (condvar) and the async waiters (`tokio::sync::Notify`).
 */

use super::cancel::{CancellationToken, Wake};
use super::stats::{Counters, QueueStats};
use super::timeout::{validate_timeout, Deadline};
use crate::core::config::QueueConfig;
use crate::core::errors::{QueueError, QueueResult};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, trace, warn};

/// Items plus counters, only ever touched with the lock held
struct State<T> {
    items: VecDeque<T>,
    counters: Counters,
}

/// Shared part of the queue. Lives behind an `Arc` so cancellation tokens can
/// hold a weak reference to it.
struct Shared<T> {
    name: String,
    state: Mutex<State<T>>,
    not_empty: Condvar,
    async_waiters: Notify,
}

impl<T: Send> Wake for Shared<T> {
    fn wake_waiters(&self) {
        let _state = self.state.lock();
        self.not_empty.notify_all();
    }
}

/// Why a wait for elements ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitOutcome {
    Ready,
    TimedOut,
    Cancelled,
}

/// Generic blocking queue shared between producer and consumer threads
///
/// Share it with `Arc<BlockingQueue<T>>`. The storage is never exposed; all
/// access goes through the operations below.
///
/// # Examples
///
/// ```
/// use sync_queue::BlockingQueue;
///
/// let queue = BlockingQueue::new();
/// queue.enqueue_all(["hello", "world"]);
///
/// assert_eq!(queue.size(), 2);
/// assert_eq!(queue.dequeue_all(), vec!["hello", "world"]);
/// assert_eq!(queue.size(), 0);
/// assert_eq!(queue.try_dequeue(), None);
/// ```
pub struct BlockingQueue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue with default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        debug!(
            queue = %config.name,
            initial_capacity = config.initial_capacity,
            "Blocking queue created"
        );
        Self {
            shared: Arc::new(Shared {
                name: config.name,
                state: Mutex::new(State {
                    items: VecDeque::with_capacity(config.initial_capacity),
                    counters: Counters::default(),
                }),
                not_empty: Condvar::new(),
                async_waiters: Notify::new(),
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Append one element to the tail and wake all waiters
    pub fn enqueue(&self, value: T) {
        {
            let mut state = self.shared.state.lock();
            state.items.push_back(value);
            state.counters.enqueued += 1;
            trace!(queue = %self.shared.name, length = state.items.len(), "enqueue");
            self.shared.not_empty.notify_all();
        }
        self.shared.async_waiters.notify_waiters();
    }

    /// Append a batch under one lock acquisition
    ///
    /// The batch is never split by another producer. An empty batch changes
    /// nothing and wakes nobody.
    ///
    /// The iterator is drained before the lock is taken, so it may panic or
    /// call back into this queue without leaving a partial batch behind.
    pub fn enqueue_all<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let batch: Vec<T> = values.into_iter().collect();
        let added = batch.len();
        if added == 0 {
            // Lock still taken so an empty batch orders like any other call
            drop(self.shared.state.lock());
            return;
        }

        {
            let mut state = self.shared.state.lock();
            state.items.extend(batch);
            state.counters.enqueued += added as u64;
            trace!(
                queue = %self.shared.name,
                added,
                length = state.items.len(),
                "enqueue_all"
            );
            self.shared.not_empty.notify_all();
        }

        self.shared.async_waiters.notify_waiters();
    }

    /// Number of queued elements at the moment of the call
    pub fn size(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().items.is_empty()
    }

    /// Block until the queue is non-empty, then remove everything in it
    pub fn dequeue_all(&self) -> Vec<T> {
        let mut state = self.shared.state.lock();
        self.wait_for_items(&mut state, Deadline::never(), None);
        self.drain(&mut state)
    }

    /// Block until an element exists, then remove the head
    pub fn dequeue_with_wait(&self) -> T {
        let mut state = self.shared.state.lock();
        self.wait_for_items(&mut state, Deadline::never(), None);
        match self.pop(&mut state) {
            Some(value) => value,
            None => unreachable!("wait returned Ready on an empty queue"),
        }
    }

    /// Remove the head, waiting at most `timeout`
    ///
    /// Returns `Ok(None)` if nothing arrived before the deadline. A zero
    /// timeout checks once without waiting; a negative one fails with
    /// `InvalidArgument` without touching the queue.
    pub fn dequeue_with_timeout(&self, timeout: time::Duration) -> QueueResult<Option<T>> {
        let timeout = validate_timeout(timeout).inspect_err(|e| {
            warn!(queue = %self.shared.name, error = %e, "Rejected dequeue timeout");
        })?;
        Ok(self.dequeue_for(timeout))
    }

    /// Remove the head, waiting at most `timeout`
    pub fn dequeue_for(&self, timeout: Duration) -> Option<T> {
        let deadline = Deadline::after(timeout);
        let mut state = self.shared.state.lock();
        match self.wait_for_items(&mut state, deadline, None) {
            WaitOutcome::Ready => self.pop(&mut state),
            _ => None,
        }
    }

    /// Remove the head if there is one; never waits
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        self.pop(&mut state)
    }

    /// Resolve to the head element once one exists, without blocking the
    /// executor thread
    pub async fn dequeue_async(&self) -> T {
        loop {
            // Register interest before checking so an insertion between the
            // check and the await is not missed.
            let mut notified = pin!(self.shared.async_waiters.notified());
            notified.as_mut().enable();

            if let Some(value) = self.try_dequeue() {
                return value;
            }

            notified.await;
        }
    }

    /// Snapshot of length and lifetime counters
    pub fn stats(&self) -> QueueStats {
        let state = self.shared.state.lock();
        QueueStats::from_counters(&self.shared.name, state.items.len(), &state.counters)
    }

    /// Suspend on `not_empty` until elements exist, the deadline passes or the
    /// token is cancelled. Returns with the lock held.
    fn wait_for_items(
        &self,
        state: &mut MutexGuard<'_, State<T>>,
        deadline: Deadline,
        token: Option<&CancellationToken>,
    ) -> WaitOutcome {
        state.counters.waiting += 1;

        let outcome = loop {
            if token.is_some_and(CancellationToken::is_cancelled) {
                break WaitOutcome::Cancelled;
            }
            if !state.items.is_empty() {
                break WaitOutcome::Ready;
            }
            if deadline.is_expired() {
                break WaitOutcome::TimedOut;
            }

            match deadline.instant() {
                Some(at) => {
                    self.shared.not_empty.wait_until(state, at);
                }
                None => self.shared.not_empty.wait(state),
            }
        };

        state.counters.waiting -= 1;
        match outcome {
            WaitOutcome::TimedOut => {
                state.counters.timeouts += 1;
                debug!(queue = %self.shared.name, "Dequeue timed out");
            }
            WaitOutcome::Cancelled => {
                state.counters.cancellations += 1;
                debug!(queue = %self.shared.name, "Dequeue cancelled");
            }
            WaitOutcome::Ready => {}
        }
        outcome
    }

    fn pop(&self, state: &mut MutexGuard<'_, State<T>>) -> Option<T> {
        let value = state.items.pop_front()?;
        state.counters.dequeued += 1;
        trace!(queue = %self.shared.name, length = state.items.len(), "dequeue");
        Some(value)
    }

    fn drain(&self, state: &mut MutexGuard<'_, State<T>>) -> Vec<T> {
        let drained: Vec<T> = state.items.drain(..).collect();
        state.counters.dequeued += drained.len() as u64;
        trace!(queue = %self.shared.name, drained = drained.len(), "dequeue_all");
        drained
    }
}

impl<T: Send + 'static> BlockingQueue<T> {
    /// Like `dequeue_with_wait`, but gives up with `Cancelled` once `token`
    /// is cancelled
    ///
    /// A cancelled token wins over queued elements; they stay in the queue.
    pub fn dequeue_with_cancel(&self, token: &CancellationToken) -> QueueResult<T> {
        let mut state = self.lock_cancellable(token);
        match self.wait_for_items(&mut state, Deadline::never(), Some(token)) {
            WaitOutcome::Ready => self.pop(&mut state).ok_or(QueueError::Cancelled),
            _ => Err(QueueError::Cancelled),
        }
    }

    /// Like `dequeue_all`, but gives up with `Cancelled` once `token` is
    /// cancelled
    pub fn dequeue_all_with_cancel(&self, token: &CancellationToken) -> QueueResult<Vec<T>> {
        let mut state = self.lock_cancellable(token);
        match self.wait_for_items(&mut state, Deadline::never(), Some(token)) {
            WaitOutcome::Ready => Ok(self.drain(&mut state)),
            _ => Err(QueueError::Cancelled),
        }
    }

    /// Register with the token before taking the lock; the token state is
    /// then re-checked under the lock by `wait_for_items`.
    fn lock_cancellable(&self, token: &CancellationToken) -> MutexGuard<'_, State<T>> {
        let target: Weak<dyn Wake> = Arc::downgrade(&self.shared) as Weak<dyn Wake>;
        token.register(target);
        self.shared.state.lock()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("name", &self.shared.name)
            .field("length", &self.size())
            .finish()
    }
}
