// src/runtime/event_queue.rs
//! Cross-thread event queue
//!
//! Unbounded mutex-guarded FIFO. Any thread may enqueue; the dispatch thread
//! drains once per tick, popping one record per lock acquisition and
//! delivering it with the lock released.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Mutex-guarded MPSC queue
pub struct EventQueue<T> {
    /// Pending records, oldest first
    queue: Mutex<VecDeque<T>>,

    /// Push counter
    push_count: AtomicU64,

    /// Pop counter
    pop_count: AtomicU64,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            push_count: AtomicU64::new(0),
            pop_count: AtomicU64::new(0),
        }
    }

    /// Append a record (callable from any thread)
    pub fn enqueue(&self, record: T) {
        self.queue.lock().push_back(record);
        self.push_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Pop the oldest record, if any
    pub fn try_pop(&self) -> Option<T> {
        let record = self.queue.lock().pop_front();
        if record.is_some() {
            self.pop_count.fetch_add(1, Ordering::Relaxed);
        }
        record
    }

    /// Deliver records until the queue is observed empty.
    ///
    /// The lock is never held while `deliver` runs, so producers are not
    /// blocked and delivery may enqueue further records. Returns the number
    /// of records delivered.
    pub fn drain_all(&self, mut deliver: impl FnMut(T)) -> usize {
        let mut delivered = 0;
        while let Some(record) = self.try_pop() {
            deliver(record);
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Get queue statistics
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            push_count: self.push_count.load(Ordering::Relaxed),
            pop_count: self.pop_count.load(Ordering::Relaxed),
            current_size: self.len(),
        }
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Total records enqueued
    pub push_count: u64,

    /// Total records dequeued
    pub pop_count: u64,

    /// Current queue size
    pub current_size: usize,
}
