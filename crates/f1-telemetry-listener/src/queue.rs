//! Bounded multi-producer/multi-consumer queue that drops the oldest entry
//! when full.
//!
//! Producers never wait: a push into a full queue evicts the front entry.
//! The freshest telemetry is the most useful, so stale datagrams go first.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Result of [`BoundedQueue::push`].
#[derive(Debug, PartialEq, Eq)]
pub enum Push<T> {
    Accepted,
    /// The queue was full; the returned oldest entry was evicted.
    Evicted(T),
    /// The queue is closed; the item is handed back.
    Closed(T),
}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    capacity: usize,
    evicted: AtomicU64,
    notify: Notify,
}

/// Cloneable handle to a shared drop-oldest queue.
pub struct BoundedQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &self.inner.capacity)
            .field("evicted", &self.evicted())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> BoundedQueue<T> {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    items: VecDeque::with_capacity(capacity),
                    closed: false,
                }),
                capacity,
                evicted: AtomicU64::new(0),
                notify: Notify::new(),
            }),
        }
    }

    pub fn push(&self, item: T) -> Push<T> {
        let outcome = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Push::Closed(item);
            }
            let evicted = if state.items.len() >= self.inner.capacity {
                state.items.pop_front()
            } else {
                None
            };
            state.items.push_back(item);
            evicted.map_or(Push::Accepted, Push::Evicted)
        };
        if matches!(outcome, Push::Evicted(_)) {
            self.inner.evicted.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.notify.notify_one();
        outcome
    }

    pub fn try_pop(&self) -> Option<T> {
        self.inner.state.lock().items.pop_front()
    }

    /// Wait for the next entry. Returns `None` once the queue is closed and
    /// drained.
    pub async fn recv(&self) -> Option<T> {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut state = self.inner.state.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Refuse further pushes and wake every waiting consumer. Entries already
    /// queued can still be received.
    pub fn close(&self) {
        self.inner.state.lock().closed = true;
        self.inner.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Entries dropped to make room since the queue was created.
    pub fn evicted(&self) -> u64 {
        self.inner.evicted.load(Ordering::Relaxed)
    }
}
