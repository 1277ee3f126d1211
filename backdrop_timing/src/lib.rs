// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backdrop Timing: host-agnostic frame and timer scheduling primitives.
//!
//! Interactive viewport control needs three kinds of deferred work: a
//! one-shot "repaint on the next display frame" task, a short throttle
//! timer, and a longer debounce timer. This crate provides the two
//! primitives those reduce to, without owning an event loop or reading a
//! clock:
//!
//! - [`FrameSlot`]: a coalescing one-shot slot for next-frame work. Setting
//!   it twice before the frame runs collapses into a single task, so
//!   repeated redraw requests never queue a backlog.
//! - [`TimerQueue`]: cancellable one-shot timers against a host-supplied
//!   monotonic millisecond clock.
//!
//! The host is responsible for driving both: run the frame slot's task
//! before the next repaint, and deliver due timers when the clock passes
//! [`TimerQueue::next_deadline`]. Because time only advances when the host
//! says so, schedules are fully deterministic under test.
//!
//! ```rust
//! use backdrop_timing::{FrameSlot, TimerQueue};
//!
//! let mut frame = FrameSlot::new();
//! frame.set("redraw");
//! frame.set("redraw"); // coalesces
//! assert_eq!(frame.take(), Some("redraw"));
//! assert_eq!(frame.take(), None);
//!
//! let mut timers = TimerQueue::new();
//! let h = timers.schedule(500, "settle");
//! assert_eq!(timers.next_deadline(), Some(500));
//! assert!(timers.cancel(h));
//! assert_eq!(timers.pop_due(1_000), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod frame;
mod timer;

pub use frame::FrameSlot;
pub use timer::{TimerHandle, TimerQueue};
