// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backdrop View: a pan/zoom viewport controller with dual-buffer
//! compositing.
//!
//! Interactive 2D content is expensive to repaint but cheap to recomposite.
//! This crate exploits that: content is painted once into a large off-screen
//! **backing surface**, and pan/zoom gestures are answered by copying
//! already-rendered backing pixels into the on-screen **visible surface**.
//! Full repaints only happen when they are unavoidable (the viewport ran out
//! of pre-rendered pixels) or when interaction pauses and the view settles
//! back to full resolution.
//!
//! The controller is headless. Surfaces are supplied by the caller through
//! the `backdrop_raster` traits, and scheduling is driven by the host event
//! loop rather than by callbacks:
//!
//! - [`PanZoomView::needs_frame`] / [`PanZoomView::run_frame`] coalesce full
//!   redraws onto the host's next repaint.
//! - [`PanZoomView::next_deadline`] / [`PanZoomView::run_due_timers`] drive
//!   the composite throttle and the settle debounce on a host-supplied
//!   millisecond clock.
//!
//! ```rust
//! use backdrop_raster_ref::RefRaster;
//! use backdrop_view::{InputUnits, PanZoomView};
//! use kurbo::Point;
//!
//! // A 400x400 backing raster behind a 100x100 on-screen surface.
//! let backing = RefRaster::new(400.0, 400.0);
//! let visible = RefRaster::new(100.0, 100.0);
//! let mut view = PanZoomView::new(backing, visible);
//!
//! view.add_drawing(|surface| {
//!     // Paint content in content coordinates.
//!     let _ = surface;
//! });
//!
//! // Host loop: run the scheduled frame, then feed input.
//! view.run_frame(0);
//! view.pan(25.0, 0.0, InputUnits::Device);
//! view.zoom(2.0, Point::new(50.0, 50.0), InputUnits::Device);
//!
//! // Deliver timers as their deadlines pass; the gesture settles back to a
//! // crisp full-resolution redraw.
//! while let Some(deadline) = view.next_deadline() {
//!     view.run_due_timers(deadline);
//! }
//! if view.needs_frame() {
//!     view.run_frame(600);
//! }
//! assert!(view.is_ready());
//! ```
//!
//! ## Design notes
//!
//! - The controller owns both surfaces and is their only writer; callers get
//!   them back with [`PanZoomView::into_surfaces`].
//! - Pan deltas are clamped so the viewport never leaves the backing
//!   surface, and zoom factors are clamped to keep the backing surface
//!   covering the visible one (up to 20x magnification).
//! - During a zoom gesture the on-screen image is an approximation
//!   ([`PanZoomView::is_ready`] returns `false`); coordinate mappings such
//!   as [`PanZoomView::visible_to_content`] always reflect the committed,
//!   authoritative state.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod modes;
mod preview;
mod view;

pub use modes::InputUnits;
pub use view::{PanZoomDebugInfo, PanZoomView};
