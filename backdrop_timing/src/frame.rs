// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A coalescing one-shot slot for "run before the next repaint" work.
///
/// At most one task is pending at a time. [`FrameSlot::set`] replaces any
/// task already in the slot, so N requests between two frames collapse into
/// one task carrying the latest value. Only the state at the time the frame
/// actually runs matters.
#[derive(Clone, Debug, Default)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> FrameSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arms the slot with `task`, replacing any pending task.
    pub fn set(&mut self, task: T) {
        self.pending = Some(task);
    }

    /// Takes the pending task, leaving the slot empty.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Returns `true` if a task is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
