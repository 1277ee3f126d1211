// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// Handle to a scheduled timer, used for cancellation.
///
/// Handles are unique for the lifetime of the queue; cancelling an already
/// fired or already cancelled timer is a harmless no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: u64,
    deadline: u64,
    task: T,
}

/// A queue of cancellable one-shot timers on a host-supplied clock.
///
/// Deadlines are absolute values of a monotonic millisecond clock owned by
/// the host; the queue never reads time itself. Due timers are delivered
/// earliest deadline first, and in scheduling order among equal deadlines.
///
/// The number of live timers in the intended usage is tiny (a settle
/// debounce and a composite throttle), so the queue is a plain vector with
/// linear scans rather than a binary heap.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Schedules `task` to become due at `deadline_ms`.
    pub fn schedule(&mut self, deadline_ms: u64, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: deadline_ms,
            task,
        });
        TimerHandle(id)
    }

    /// Cancels the timer behind `handle`.
    ///
    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != handle.0);
        self.entries.len() != before
    }

    /// Returns the earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Removes and returns the earliest timer whose deadline is at or before
    /// `now_ms`.
    ///
    /// Call in a loop to drain everything that is due.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<T> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now_ms)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(i, _)| i)?;
        Some(self.entries.remove(idx).task)
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
