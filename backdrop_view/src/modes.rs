// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Unit interpretation for pan deltas and zoom anchor points.
///
/// Raw input events are typically delivered in logical (CSS) pixels, while
/// the controller works in device pixels of the visible surface. This enum
/// says which space the caller is passing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputUnits {
    /// Values come straight from input events in logical pixels and are
    /// multiplied by the configured device pixel ratio.
    #[default]
    Logical,
    /// Values are already in device pixels of the visible surface and are
    /// used as-is. Internal corrective pans use this.
    Device,
}
