// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

use backdrop_raster::{BlitFilter, ComposeSurface, PaintSurface};
use backdrop_timing::{FrameSlot, TimerHandle, TimerQueue};
use kurbo::{Affine, Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`

use crate::modes::InputUnits;
use crate::preview::ZoomPreview;

/// Debounce delay before an interactive gesture settles into a full redraw.
const SETTLE_DELAY_MS: u64 = 500;

/// Minimum interval between composites during rapid zoom input (one 60 Hz
/// frame, in whole milliseconds).
const COMPOSITE_THROTTLE_MS: u64 = 1000 / 60;

/// Absolute magnification cap.
const MAX_SCALE: f64 = 20.0;

/// `value` limited to `[min, max]`, with `max` winning if the range is
/// inverted.
fn trim(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

fn rect_xywh(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::from_origin_size((x, y), (w, h))
}

#[derive(Clone, Copy, Debug)]
enum FrameTask {
    Redraw,
}

#[derive(Clone, Copy, Debug)]
enum TimerTask {
    /// End of the composite throttle window: unlatch and composite once.
    EndThrottle,
    /// Settle debounce elapsed: fold the preview back into a full redraw.
    Settle,
}

/// Pan/zoom viewport controller over a backing/visible surface pair.
///
/// The controller owns both surfaces for the duration of its life and is
/// their only writer: content is painted into the backing surface `B` during
/// full redraws, and the visible surface `V` only ever receives composited
/// copies of backing pixels. Construction expects a backing surface at least
/// as large as the visible one; the surplus is panning headroom.
///
/// Interactive calls ([`PanZoomView::pan`], [`PanZoomView::zoom`]) mutate
/// viewport state and composite cheaply; expensive content repaints are
/// deferred to a coalesced next-frame task and to the settle debounce. See
/// the crate docs for the host-driving contract.
pub struct PanZoomView<B, V> {
    backing: B,
    visible: V,

    width: f64,
    height: f64,
    shadow_width: f64,
    shadow_height: f64,

    scale: f64,
    ref_x: f64,
    ref_y: f64,
    pan_x: f64,
    pan_y: f64,

    preview: ZoomPreview,
    drawings: Vec<Box<dyn FnMut(&mut B)>>,

    frame: FrameSlot<FrameTask>,
    timers: TimerQueue<TimerTask>,
    settle: Option<TimerHandle>,
    throttled: bool,

    device_pixel_ratio: f64,
    now_ms: u64,
}

impl<B, V> core::fmt::Debug for PanZoomView<B, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PanZoomView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("shadow_width", &self.shadow_width)
            .field("shadow_height", &self.shadow_height)
            .field("scale", &self.scale)
            .field("ref_x", &self.ref_x)
            .field("ref_y", &self.ref_y)
            .field("pan_x", &self.pan_x)
            .field("pan_y", &self.pan_y)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}

impl<B, V> PanZoomView<B, V>
where
    B: PaintSurface,
    V: ComposeSurface<B>,
{
    /// Creates a controller over the given surface pair and performs the
    /// initial [`PanZoomView::clear`].
    ///
    /// # Preconditions
    ///
    /// Both surfaces must have positive dimensions and the backing surface
    /// must be at least as large as the visible one. Violations leave the
    /// behavior unspecified (checked with `debug_assert!` only).
    #[must_use]
    pub fn new(backing: B, visible: V) -> Self {
        let width = visible.width();
        let height = visible.height();
        let shadow_width = backing.width();
        let shadow_height = backing.height();
        debug_assert!(
            width > 0.0 && height > 0.0 && shadow_width > 0.0 && shadow_height > 0.0,
            "surfaces must have positive dimensions"
        );
        debug_assert!(
            shadow_width >= width && shadow_height >= height,
            "backing surface must be at least as large as the visible surface"
        );

        let mut view = Self {
            backing,
            visible,
            width,
            height,
            shadow_width,
            shadow_height,
            scale: 1.0,
            ref_x: 0.0,
            ref_y: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            preview: ZoomPreview::new(),
            drawings: Vec::new(),
            frame: FrameSlot::new(),
            timers: TimerQueue::new(),
            settle: None,
            throttled: false,
            device_pixel_ratio: 1.0,
            now_ms: 0,
        };
        view.clear();
        view
    }

    /// Resets all interaction state and the draw list, and schedules a full
    /// redraw.
    ///
    /// Afterwards the viewport is recentered in the backing surface with
    /// maximal pan headroom in every direction: `scale = 1`,
    /// `ref = round((shadow - visible) / 2)`, no pending pan, no active
    /// preview, identity backing transform. Idempotent.
    pub fn clear(&mut self) {
        self.drawings.clear();
        self.scale = 1.0;
        self.ref_x = ((self.shadow_width - self.width) / 2.0).round();
        self.ref_y = ((self.shadow_height - self.height) / 2.0).round();
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.preview = ZoomPreview::new();
        self.backing.set_transform(Affine::IDENTITY);
        self.request_redraw();
    }

    /// Resizes the visible surface and adapts the viewport.
    ///
    /// The backing surface grows to stay at least as large as the visible
    /// one (it never shrinks), and the reference offset shifts by half the
    /// size delta so the same content stays centered. A ±1 pixel re-pan
    /// probe then triggers overflow correction if the enlarged viewport
    /// would exceed the backing bounds; if it fires it already performed the
    /// needed redraw, otherwise one is scheduled explicitly.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.visible.resize(width, height);
        if width > self.backing.width() || height > self.backing.height() {
            self.backing.resize(
                self.backing.width().max(width),
                self.backing.height().max(height),
            );
        }
        self.shadow_width = self.backing.width();
        self.shadow_height = self.backing.height();
        self.ref_x = (self.ref_x - (width - self.width) / 2.0).round();
        self.ref_y = (self.ref_y - (height - self.height) / 2.0).round();
        self.width = width;
        self.height = height;
        if self.pan(-1.0, -1.0, InputUnits::Device) || self.pan(1.0, 1.0, InputUnits::Device) {
            return;
        }
        self.request_redraw();
    }

    /// Appends a drawing callable invoked during every future full redraw
    /// until the next [`PanZoomView::clear`].
    ///
    /// Callables run in registration order against the backing surface,
    /// under a transform prepared by the controller; they paint in content
    /// coordinates.
    pub fn add_drawing(&mut self, draw: impl FnMut(&mut B) + 'static) {
        self.drawings.push(Box::new(draw));
    }

    /// Returns `true` iff no zoom approximation is active, i.e. the
    /// displayed image is full-resolution and authoritative.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.preview.is_active()
    }

    /// Maps a visible-surface point to content space.
    ///
    /// This is the exact inverse of the content-to-backing transform; it is
    /// stable under any sequence of interactive updates, so callers can use
    /// it for hit-testing content.
    #[must_use]
    pub fn visible_to_content(&self, p: Point) -> Point {
        Point::new(
            (p.x + self.ref_x - self.pan_x) / self.scale,
            (p.y + self.ref_y - self.pan_y) / self.scale,
        )
    }

    /// Maps a visible-surface point to backing-surface pixel space through
    /// the backing surface's committed transform.
    ///
    /// Used to keep the pan offset consistent across a zoom performed
    /// incrementally against an already-transformed backing surface.
    #[must_use]
    pub fn visible_to_backing(&self, p: Point) -> Point {
        self.backing.transform()
            * Point::new(p.x + self.ref_x - self.pan_x, p.y + self.ref_y - self.pan_y)
    }

    /// Schedules exactly one full redraw on the next frame.
    ///
    /// Cancels any pending settle and deactivates the preview (the redraw is
    /// authoritative). Multiple calls before the frame runs coalesce; only
    /// the state at the time the frame executes matters.
    pub fn request_redraw(&mut self) {
        self.cancel_settle();
        self.preview.reset();
        self.frame.set(FrameTask::Redraw);
    }

    /// Pans the viewport by `(dx, dy)`.
    ///
    /// Deltas are clamped so the viewport window stays inside the backing
    /// surface; sub-half-pixel residuals snap to zero, and a zero delta
    /// returns immediately. If the clamped delta would still exhaust the
    /// panning headroom by a pixel or more, the reference is recentered, the
    /// drift folded into the pending pan, and a full redraw scheduled.
    /// Otherwise the preview reference shifts and the visible surface is
    /// recomposited cheaply.
    ///
    /// Returns `true` iff a full redraw was triggered.
    pub fn pan(&mut self, dx: f64, dy: f64, units: InputUnits) -> bool {
        let mut dx = dx;
        let mut dy = dy;
        if units == InputUnits::Logical && self.device_pixel_ratio != 1.0 {
            dx *= self.device_pixel_ratio;
            dy *= self.device_pixel_ratio;
        }
        let (w, h) = (self.width, self.height);
        let (sw, sh) = (self.shadow_width, self.shadow_height);

        dx = trim(
            dx,
            self.pan_x - self.ref_x,
            self.scale * sw - (self.ref_x + w) + self.pan_x,
        );
        dy = trim(
            dy,
            self.pan_y - self.ref_y,
            self.scale * sh - (self.ref_y + h) + self.pan_y,
        );
        if dx.abs() < 0.5 {
            dx = 0.0;
        }
        if dy.abs() < 0.5 {
            dy = 0.0;
        }
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.cancel_settle();

        // How much of the delta fits inside the unscaled backing margin.
        let over_x = trim(dx, -self.ref_x, sw - w - self.ref_x);
        let over_y = trim(dy, -self.ref_y, sh - h - self.ref_y);
        self.ref_x += dx;
        self.ref_y += dy;
        if (dx - over_x).abs() >= 1.0 || (dy - over_y).abs() >= 1.0 {
            // Headroom exhausted: fold the reference drift into the pending
            // pan and recenter.
            let x = self.ref_x;
            let y = self.ref_y;
            self.ref_x = (sw - w) / 2.0;
            self.ref_y = (sh - h) / 2.0;
            self.pan_x -= x - self.ref_x;
            self.pan_y -= y - self.ref_y;
            self.fix_overflow();
            self.request_redraw();
            return true;
        }

        self.preview.pan_by(dx, dy);
        self.refresh();
        if self.preview.is_active() {
            self.arm_settle();
        }
        false
    }

    /// Zooms by `factor` around the gesture point `anchor`.
    ///
    /// The factor is clamped to
    /// `[1 / (scale · min(shadow_w/width, shadow_h/height)), 20 / scale]`:
    /// the lower bound keeps the backing surface covering the visible one,
    /// the upper bound caps absolute magnification at 20×. A clamped factor
    /// of exactly 1 is a no-op.
    ///
    /// Visual feedback goes through the preview (composited at most once per
    /// 60 Hz interval), while the zoom is committed into the backing
    /// transform immediately, keeping the gesture point stationary on
    /// screen. The settle timer then converges everything back to a crisp
    /// full redraw.
    pub fn zoom(&mut self, factor: f64, anchor: Point, units: InputUnits) {
        let mut x = anchor.x;
        let mut y = anchor.y;
        if units == InputUnits::Logical && self.device_pixel_ratio != 1.0 {
            x *= self.device_pixel_ratio;
            y *= self.device_pixel_ratio;
        }
        let (w, h) = (self.width, self.height);
        let (sw, sh) = (self.shadow_width, self.shadow_height);

        let min_factor = 1.0 / (self.scale * (sw / w).min(sh / h));
        let factor = trim(factor, min_factor, MAX_SCALE / self.scale);
        if factor == 1.0 {
            return;
        }
        self.cancel_settle();

        if self.preview.is_active() {
            self.preview.compose(x, y, factor);
        } else {
            self.preview.seed(self.ref_x, self.ref_y, x, y, factor);
        }

        if !self.throttled {
            self.throttled = true;
            self.timers
                .schedule(self.now_ms + COMPOSITE_THROTTLE_MS, TimerTask::EndThrottle);
        }

        // Commit the zoom into the backing transform immediately. The
        // gesture point is captured three times: scaling the transform and
        // recentring the reference each shift its backing-space location,
        // and both shifts must be absorbed into the pending pan to keep it
        // stationary on screen.
        let anchor = Point::new(x, y);
        let p1 = self.visible_to_backing(anchor);
        self.backing
            .set_transform(self.backing.transform() * Affine::scale(factor));
        let saved = self.backing.transform();
        let p2 = self.visible_to_backing(anchor);
        self.pan_x -= (p2.x - p1.x) / self.scale;
        self.pan_y -= (p2.y - p1.y) / self.scale;
        self.backing.set_transform(
            saved
                * Affine::translate(Vec2::new(
                    -(p2.x - p1.x) / self.scale,
                    -(p2.y - p1.y) / self.scale,
                )),
        );
        self.scale *= factor;
        self.ref_x = (sw - w) / 2.0;
        self.ref_y = (sh - h) / 2.0;
        let p3 = self.visible_to_backing(anchor);
        self.backing.set_transform(saved);
        self.pan_x -= (p2.x - p3.x) / self.scale;
        self.pan_y -= (p2.y - p3.y) / self.scale;

        self.arm_settle();
    }

    /// Clamps the pending pan into the range implied by the backing bounds,
    /// folding any excess into the reference so the total transform is
    /// unchanged.
    fn fix_overflow(&mut self) {
        if self.pan_x > 0.0 {
            self.ref_x -= self.pan_x;
            self.pan_x = 0.0;
        }
        if self.pan_y > 0.0 {
            self.ref_y -= self.pan_y;
            self.pan_y = 0.0;
        }
        let min_x = -self.shadow_width * (self.scale - 1.0);
        if self.pan_x < min_x {
            let diff = self.pan_x - min_x;
            self.ref_x -= diff;
            self.pan_x -= diff;
        }
        let min_y = -self.shadow_height * (self.scale - 1.0);
        if self.pan_y < min_y {
            let diff = self.pan_y - min_y;
            self.ref_y -= diff;
            self.pan_y -= diff;
        }
    }

    fn arm_settle(&mut self) {
        let handle = self
            .timers
            .schedule(self.now_ms + SETTLE_DELAY_MS, TimerTask::Settle);
        if let Some(old) = self.settle.replace(handle) {
            self.timers.cancel(old);
        }
    }

    fn cancel_settle(&mut self) {
        if let Some(handle) = self.settle.take() {
            self.timers.cancel(handle);
        }
    }

    /// Settle: the debounced transition from approximate interactive state
    /// back to an authoritative full-resolution redraw.
    fn settle_now(&mut self) {
        self.preview.reset();
        // Pan by one pixel and back so overflow correction fires if needed;
        // either probe performing the redraw makes the explicit one moot.
        if self.pan(1.0, 1.0, InputUnits::Device) || self.pan(-1.0, -1.0, InputUnits::Device) {
            return;
        }
        self.request_redraw();
    }

    /// Repaints the backing surface and composites. Runs on the scheduled
    /// frame, never synchronously from an interactive call.
    fn redraw_now(&mut self) {
        let bounds = rect_xywh(0.0, 0.0, self.shadow_width, self.shadow_height);
        let saved = self.backing.transform();
        self.backing.set_transform(Affine::IDENTITY);
        self.backing.clear_rect(bounds);
        self.backing.set_transform(
            Affine::translate(Vec2::new(self.pan_x, self.pan_y)) * Affine::scale(self.scale),
        );
        // Boundary rectangle at the content origin as a visual reference,
        // one device pixel wide regardless of scale.
        self.backing.stroke_rect(bounds, 1.0 / self.scale);
        for draw in &mut self.drawings {
            draw(&mut self.backing);
        }
        self.backing.set_transform(saved);
        self.refresh();
    }

    /// Composites backing pixels into the visible surface.
    ///
    /// With an unchanged zoomed-out preview the already-composited content
    /// is shifted and only the newly exposed strips are backfilled;
    /// otherwise the relevant backing region is copied wholesale, with
    /// smoothing disabled while magnifying so previews stay crisp.
    fn refresh(&mut self) {
        let (w, h) = (self.width, self.height);
        let zoom = self.preview.zoom();
        let (rx, ry) = (self.preview.rx(), self.preview.ry());

        if let Some(delta) = self.preview.blit_delta() {
            let (dx, dy) = (delta.x, delta.y);
            self.visible.shift(dx, dy);
            let strip_w = dx.abs();
            if dx != 0.0 {
                let x = if dx > 0.0 { 0.0 } else { w + dx };
                self.visible.copy_scaled(
                    &self.backing,
                    rect_xywh(rx + x / zoom, ry, strip_w / zoom, h / zoom),
                    rect_xywh(x, 0.0, strip_w, h),
                    BlitFilter::Smooth,
                );
            }
            if dy != 0.0 {
                let x = if dx > 0.0 { dx } else { 0.0 };
                let y = if dy > 0.0 { 0.0 } else { h + dy };
                let strip_h = dy.abs();
                self.visible.copy_scaled(
                    &self.backing,
                    rect_xywh(
                        rx + x / zoom,
                        ry + y / zoom,
                        (w - strip_w) / zoom,
                        strip_h / zoom,
                    ),
                    rect_xywh(x, y, w - strip_w, strip_h),
                    BlitFilter::Smooth,
                );
            }
        } else {
            let src_x = if zoom == 1.0 { self.ref_x } else { rx }.round();
            let src_y = if zoom == 1.0 { self.ref_y } else { ry }.round();
            self.visible.copy_scaled(
                &self.backing,
                rect_xywh(src_x, src_y, w / zoom, h / zoom),
                rect_xywh(0.0, 0.0, w, h),
                BlitFilter::for_preview_zoom(zoom),
            );
        }
        self.preview.cache_current();
    }

    /// Returns `true` if a frame task is pending and the host should invoke
    /// [`PanZoomView::run_frame`] before the next repaint.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.frame.is_armed()
    }

    /// Runs the pending frame task (the coalesced full redraw), if any.
    pub fn run_frame(&mut self, now_ms: u64) {
        self.advance_clock(now_ms);
        if let Some(FrameTask::Redraw) = self.frame.take() {
            self.redraw_now();
        }
    }

    /// Returns the earliest pending timer deadline on the host clock.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Delivers all timers due at `now_ms`: the composite throttle unlatch
    /// and the settle debounce.
    pub fn run_due_timers(&mut self, now_ms: u64) {
        self.advance_clock(now_ms);
        while let Some(task) = self.timers.pop_due(self.now_ms) {
            match task {
                TimerTask::EndThrottle => {
                    self.throttled = false;
                    self.refresh();
                }
                TimerTask::Settle => {
                    self.settle = None;
                    self.settle_now();
                }
            }
        }
    }

    /// Advances the controller's view of the host clock without delivering
    /// timers. Useful from input handlers so debounce deadlines are computed
    /// from the actual gesture time.
    pub fn advance_clock(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Sets the device pixel ratio applied to [`InputUnits::Logical`] input.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        debug_assert!(ratio > 0.0, "device pixel ratio must be positive");
        self.device_pixel_ratio = ratio;
    }

    /// Current uniform zoom factor of the authoritative transform.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Committed top-left position of the visible window within the backing
    /// surface's pixel space.
    #[must_use]
    pub fn reference(&self) -> Point {
        Point::new(self.ref_x, self.ref_y)
    }

    /// Translation accumulated since the last full redraw, not yet folded
    /// into the reference offset.
    #[must_use]
    pub fn pending_pan(&self) -> Vec2 {
        Vec2::new(self.pan_x, self.pan_y)
    }

    /// Number of registered drawing callables.
    #[must_use]
    pub fn drawing_count(&self) -> usize {
        self.drawings.len()
    }

    /// The visible surface extent as a rectangle at the origin.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        rect_xywh(0.0, 0.0, self.width, self.height)
    }

    /// The backing surface extent as a rectangle at the origin.
    #[must_use]
    pub fn backing_rect(&self) -> Rect {
        rect_xywh(0.0, 0.0, self.shadow_width, self.shadow_height)
    }

    /// Shared access to the backing surface.
    #[must_use]
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Shared access to the visible surface.
    #[must_use]
    pub fn visible(&self) -> &V {
        &self.visible
    }

    /// Tears the controller down, returning the surfaces to the caller.
    #[must_use]
    pub fn into_surfaces(self) -> (B, V) {
        (self.backing, self.visible)
    }

    /// Snapshot of the current controller state for debugging and
    /// inspection.
    #[must_use]
    pub fn debug_info(&self) -> PanZoomDebugInfo {
        PanZoomDebugInfo {
            visible_rect: self.visible_rect(),
            backing_rect: self.backing_rect(),
            scale: self.scale,
            reference: self.reference(),
            pending_pan: self.pending_pan(),
            preview_zoom: self.preview.zoom(),
            frame_armed: self.frame.is_armed(),
            settle_armed: self.settle.is_some(),
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }
}

/// Debug snapshot of a [`PanZoomView`] state.
#[derive(Clone, Copy, Debug)]
pub struct PanZoomDebugInfo {
    /// Visible surface extent.
    pub visible_rect: Rect,
    /// Backing surface extent.
    pub backing_rect: Rect,
    /// Current uniform zoom factor.
    pub scale: f64,
    /// Committed reference offset into the backing surface.
    pub reference: Point,
    /// Pending pan not yet folded into the reference.
    pub pending_pan: Vec2,
    /// Active preview zoom (`1.0` when the view is authoritative).
    pub preview_zoom: f64,
    /// Whether a full redraw is scheduled for the next frame.
    pub frame_armed: bool,
    /// Whether the settle debounce is armed.
    pub settle_armed: bool,
    /// Scaling applied to logical-pixel input.
    pub device_pixel_ratio: f64,
}
