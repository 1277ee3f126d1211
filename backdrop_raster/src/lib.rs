// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backdrop Raster: backend-agnostic raster surface and 2D context traits.
//!
//! This crate defines the small capability set that the Backdrop viewport
//! controller (`backdrop_view`) requires from its two caller-provided
//! surfaces. It deliberately contains no implementation: concrete backends
//! (an HTML canvas binding, a CPU raster buffer, a GPU texture pair, or the
//! event-recording reference backend in `backdrop_raster_ref`) implement
//! these traits on top of whatever technology they like.
//!
//! # Position in the stack
//!
//! - **Viewport control** (`backdrop_view`): pan/zoom state, clamping,
//!   redraw scheduling, and compositing decisions.
//! - **Surface traits (this crate)**: the operations the controller is
//!   allowed to perform on each surface.
//! - **Backends**: concrete surfaces that own pixels (or record operations).
//!
//! # Two surfaces, two capability sets
//!
//! The controller drives two surfaces with disjoint writer roles:
//!
//! - The **backing surface** ([`PaintSurface`]) is an off-screen raster at
//!   full resolution. Content is painted into it through a committed affine
//!   transform during full redraws, and the transform itself is mutated when
//!   a zoom gesture is committed.
//! - The **visible surface** ([`ComposeSurface`]) is the on-screen target.
//!   It only ever receives composited copies of backing pixels; nothing
//!   paints content into it directly.
//!
//! Keeping the capabilities apart makes the exclusive-writer policy a type
//! error rather than a convention.
//!
//! All copy operations use *replace* semantics (destination pixels are
//! overwritten, not blended), matching a `copy` composite operation.
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Affine, Rect};

/// Common surface capabilities: extent queries and resizing.
///
/// Dimensions are expressed in device pixels as `f64`, matching the
/// coordinate types used throughout the controller. Implementations are
/// expected to hold integral sizes.
pub trait RasterSurface {
    /// Surface width in device pixels.
    fn width(&self) -> f64;

    /// Surface height in device pixels.
    fn height(&self) -> f64;

    /// Resizes the surface to the given device-pixel dimensions.
    ///
    /// Resizing may discard the surface contents; the controller always
    /// schedules a full repaint after growing a surface, so backends need
    /// not preserve pixels across a resize.
    fn resize(&mut self, width: f64, height: f64);
}

/// Capability set of the backing surface: transformed content painting.
///
/// The controller is the only writer of a [`PaintSurface`]. It paints during
/// full redraws and adjusts the committed transform when committing a zoom;
/// caller-registered draw callables run against the same surface under a
/// transform the controller has prepared.
pub trait PaintSurface: RasterSurface {
    /// Returns the committed affine transform of this surface.
    ///
    /// The committed transform accumulates the scale factors applied by zoom
    /// commits. It maps pre-transform drawing coordinates to surface pixels.
    fn transform(&self) -> Affine;

    /// Replaces the committed affine transform.
    ///
    /// Passing [`Affine::IDENTITY`] resets the surface to untransformed
    /// pixel coordinates.
    fn set_transform(&mut self, transform: Affine);

    /// Clears `rect` to transparent, interpreted under the current transform.
    fn clear_rect(&mut self, rect: Rect);

    /// Strokes the outline of `rect` under the current transform.
    ///
    /// `line_width` is in current-transform units, so a caller that wants a
    /// one-device-pixel outline under a scale of `s` passes `1.0 / s`.
    fn stroke_rect(&mut self, rect: Rect, line_width: f64);
}

/// Capability set of the visible surface: compositing only.
///
/// `Src` is the backing surface type pixels are copied from. The two
/// operations are exactly what the controller's compositor needs: a
/// whole-surface self-copy for the partial-blit fast path, and a scaled
/// region copy for everything else.
pub trait ComposeSurface<Src: ?Sized>: RasterSurface {
    /// Replaces the surface contents with a copy of itself offset by
    /// `(dx, dy)` device pixels.
    ///
    /// Pixels shifted in from outside the surface are unspecified; the
    /// caller is expected to backfill the exposed strips immediately.
    fn shift(&mut self, dx: f64, dy: f64);

    /// Copies `src_rect` of `src`, scaled to fill `dst_rect` of this
    /// surface, replacing the destination pixels.
    ///
    /// Rectangles are in the respective surfaces' device-pixel coordinates.
    /// `filter` selects the sampling mode used when `src_rect` and
    /// `dst_rect` differ in size.
    fn copy_scaled(&mut self, src: &Src, src_rect: Rect, dst_rect: Rect, filter: BlitFilter);
}

/// Sampling mode for scaled copies.
///
/// This is the moral equivalent of a 2D context's image-smoothing toggle:
/// [`BlitFilter::Smooth`] interpolates between source pixels,
/// [`BlitFilter::Pixelated`] snaps to the nearest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlitFilter {
    /// Nearest-neighbor sampling.
    Pixelated,
    /// Interpolated sampling.
    #[default]
    Smooth,
}

impl BlitFilter {
    /// Selects the filter for compositing through a zoom preview:
    /// [`BlitFilter::Smooth`] at `zoom >= 1`, [`BlitFilter::Pixelated`] for
    /// zoomed-out previews.
    #[must_use]
    pub fn for_preview_zoom(zoom: f64) -> Self {
        if zoom >= 1.0 {
            Self::Smooth
        } else {
            Self::Pixelated
        }
    }
}
