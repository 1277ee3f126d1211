// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backdrop Raster Reference Backend.
//!
//! This crate provides a small, stateful implementation of the
//! `backdrop_raster` surface traits for **operation recording and state
//! tracing**.
//!
//! It is intentionally *not* a reference renderer:
//! - It does **not** rasterize to pixels.
//! - It does **not** establish "golden" rendering behavior across backends.
//! - It is intended primarily for tests and debugging that want to assert on
//!   the operations a controller emitted and the committed transform at the
//!   time each operation was applied.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use backdrop_raster::{BlitFilter, ComposeSurface, PaintSurface, RasterSurface};
use kurbo::{Affine, Rect};

/// Operation recorded by the reference backend, in application order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The surface was resized.
    Resize {
        /// New width in device pixels.
        width: f64,
        /// New height in device pixels.
        height: f64,
    },
    /// The committed transform was replaced.
    SetTransform(Affine),
    /// A region was cleared under `transform`.
    ClearRect {
        /// Cleared region in current-transform coordinates.
        rect: Rect,
        /// Committed transform at the time of the clear.
        transform: Affine,
    },
    /// A rectangle outline was stroked under `transform`.
    StrokeRect {
        /// Stroked rectangle in current-transform coordinates.
        rect: Rect,
        /// Line width in current-transform units.
        line_width: f64,
        /// Committed transform at the time of the stroke.
        transform: Affine,
    },
    /// The surface contents were self-copied by a device-pixel offset.
    Shift {
        /// Horizontal offset in device pixels.
        dx: f64,
        /// Vertical offset in device pixels.
        dy: f64,
    },
    /// A scaled region copy from another surface.
    CopyScaled {
        /// Source region in the source surface's device pixels.
        src_rect: Rect,
        /// Destination region in this surface's device pixels.
        dst_rect: Rect,
        /// Sampling mode used for the copy.
        filter: BlitFilter,
    },
}

/// Recording implementation of the Backdrop surface traits.
///
/// Tracks a size and a committed transform, and logs every operation as an
/// [`Event`]. Useful as either surface: it implements [`PaintSurface`] and
/// [`ComposeSurface`] (with another `RefRaster` as the copy source).
#[derive(Clone, Debug)]
pub struct RefRaster {
    width: f64,
    height: f64,
    transform: Affine,
    events: Vec<Event>,
}

impl RefRaster {
    /// Creates a surface of the given device-pixel size with an identity
    /// transform and an empty event log.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: Affine::IDENTITY,
            events: Vec::new(),
        }
    }

    /// Returns the recorded events in application order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Clears the event log, keeping size and transform.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl RasterSurface for RefRaster {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.events.push(Event::Resize { width, height });
    }
}

impl PaintSurface for RefRaster {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.events.push(Event::SetTransform(transform));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.events.push(Event::ClearRect {
            rect,
            transform: self.transform,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f64) {
        self.events.push(Event::StrokeRect {
            rect,
            line_width,
            transform: self.transform,
        });
    }
}

impl ComposeSurface<Self> for RefRaster {
    fn shift(&mut self, dx: f64, dy: f64) {
        self.events.push(Event::Shift { dx, dy });
    }

    fn copy_scaled(&mut self, _src: &Self, src_rect: Rect, dst_rect: Rect, filter: BlitFilter) {
        self.events.push(Event::CopyScaled {
            src_rect,
            dst_rect,
            filter,
        });
    }
}
