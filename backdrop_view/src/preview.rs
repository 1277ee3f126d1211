// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

/// Reference cached by the previous composite, used to derive an
/// incremental delta for the partial-blit fast path.
#[derive(Clone, Copy, Debug)]
struct CachedRef {
    rx: f64,
    ry: f64,
    zoom: f64,
}

/// Transient overlay state for cheap zoom feedback.
///
/// While a zoom gesture is in flight the compositor re-uses already-rendered
/// backing pixels with this secondary scale and reference offset instead of
/// repainting content. A preview zoom of exactly `1` means no approximation
/// is active: the displayed image is authoritative and the compositor must
/// take the full-resolution path.
///
/// The preview is never authoritative; the settle timer always folds it back
/// into a full redraw.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ZoomPreview {
    zoom: f64,
    rx: f64,
    ry: f64,
    cached: Option<CachedRef>,
}

impl ZoomPreview {
    pub(crate) fn new() -> Self {
        Self {
            zoom: 1.0,
            rx: 0.0,
            ry: 0.0,
            cached: None,
        }
    }

    /// Deactivates the approximation. The cached composite reference is kept;
    /// it is harmless because the partial-blit path requires an active,
    /// zoomed-out preview.
    pub(crate) fn reset(&mut self) {
        self.zoom = 1.0;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.zoom != 1.0
    }

    pub(crate) fn zoom(&self) -> f64 {
        self.zoom
    }

    pub(crate) fn rx(&self) -> f64 {
        self.rx
    }

    pub(crate) fn ry(&self) -> f64 {
        self.ry
    }

    /// Starts an approximation from the authoritative reference offset,
    /// adjusted so the gesture point `(x, y)` keeps its on-screen position
    /// under the approximate magnification.
    pub(crate) fn seed(&mut self, ref_x: f64, ref_y: f64, x: f64, y: f64, factor: f64) {
        self.rx = ref_x + x * (1.0 - 1.0 / factor);
        self.ry = ref_y + y * (1.0 - 1.0 / factor);
        self.zoom = factor;
    }

    /// Folds another zoom step into an active approximation. The incremental
    /// anchor adjustment is divided by the current preview zoom because the
    /// reference lives in backing pixels while the gesture point is in
    /// visible-surface pixels already magnified by `zoom`.
    pub(crate) fn compose(&mut self, x: f64, y: f64, factor: f64) {
        self.rx += x * (1.0 - 1.0 / factor) / self.zoom;
        self.ry += y * (1.0 - 1.0 / factor) / self.zoom;
        self.zoom *= factor;
    }

    /// Applies a visible-surface pan delta to the approximate reference.
    pub(crate) fn pan_by(&mut self, dx: f64, dy: f64) {
        self.rx += dx / self.zoom;
        self.ry += dy / self.zoom;
    }

    /// Returns the visible-surface pixel delta for the partial-blit fast
    /// path, if it applies.
    ///
    /// The fast path requires a zoomed-out preview (`zoom < 1`) whose zoom is
    /// unchanged since the previously composited frame, i.e. only the
    /// reference moved. Any zoom-magnitude change falls through to a full
    /// composite.
    pub(crate) fn blit_delta(&self) -> Option<Vec2> {
        let cached = self.cached?;
        if self.zoom >= 1.0 || cached.zoom != self.zoom {
            return None;
        }
        Some(Vec2::new(
            -(self.rx - cached.rx) * self.zoom,
            -(self.ry - cached.ry) * self.zoom,
        ))
    }

    /// Caches the current reference and zoom for the next frame's delta
    /// computation. Called after every composite.
    pub(crate) fn cache_current(&mut self) {
        self.cached = Some(CachedRef {
            rx: self.rx,
            ry: self.ry,
            zoom: self.zoom,
        });
    }
}
