// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end interaction sessions driven through the recording backend.

use std::cell::RefCell;
use std::rc::Rc;

use backdrop_raster::RasterSurface as _;
use backdrop_raster_ref::{Event, RefRaster};
use backdrop_view::{InputUnits, PanZoomView};
use kurbo::Point;

fn new_view() -> PanZoomView<RefRaster, RefRaster> {
    PanZoomView::new(RefRaster::new(800.0, 800.0), RefRaster::new(200.0, 200.0))
}

/// Delivers every pending timer and frame until the controller goes idle,
/// like a host event loop that outlives the interaction.
fn drain(view: &mut PanZoomView<RefRaster, RefRaster>, mut now_ms: u64) -> u64 {
    loop {
        while let Some(deadline) = view.next_deadline() {
            now_ms = now_ms.max(deadline);
            view.run_due_timers(now_ms);
        }
        if !view.needs_frame() {
            return now_ms;
        }
        view.run_frame(now_ms);
    }
}

#[test]
fn drawings_replay_in_registration_order_on_every_redraw() {
    let order: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let mut view = new_view();

    for id in 0..3_u32 {
        let order = Rc::clone(&order);
        view.add_drawing(move |_| order.borrow_mut().push(id));
    }
    assert_eq!(view.drawing_count(), 3);

    // Initial redraw.
    let now = drain(&mut view, 0);
    assert_eq!(*order.borrow(), [0, 1, 2]);

    // A forced redraw replays the full list in the same order.
    view.request_redraw();
    drain(&mut view, now);
    assert_eq!(*order.borrow(), [0, 1, 2, 0, 1, 2]);
}

#[test]
fn clear_drops_registered_drawings() {
    let order: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let mut view = new_view();
    {
        let order = Rc::clone(&order);
        view.add_drawing(move |_| order.borrow_mut().push(7));
    }
    let now = drain(&mut view, 0);
    assert_eq!(*order.borrow(), [7]);

    view.clear();
    drain(&mut view, now);
    assert_eq!(*order.borrow(), [7], "cleared drawings must not replay");
    assert_eq!(view.drawing_count(), 0);
}

#[test]
fn gesture_storm_settles_to_an_authoritative_view() {
    let mut view = new_view();
    let mut now = drain(&mut view, 0);

    // A burst of interleaved wheel and drag input.
    for step in 0..20 {
        let factor = if step % 3 == 0 { 1.2 } else { 0.9 };
        view.zoom(factor, Point::new(100.0, 100.0), InputUnits::Device);
        view.pan(f64::from(step) - 10.0, 5.0, InputUnits::Device);
        now += 10;
        view.run_due_timers(now);
        view.run_frame(now);
    }
    now = drain(&mut view, now);
    assert!(view.is_ready(), "idle loop must settle the preview");

    // Settling must not have disturbed the committed mapping: another
    // settle cycle changes nothing.
    let info = view.debug_info();
    view.zoom(1.0001, Point::new(0.0, 0.0), InputUnits::Device);
    drain(&mut view, now);
    let after = view.debug_info();
    assert!((after.scale - info.scale).abs() < 1e-3);
}

#[test]
fn committed_mapping_is_consistent_after_arbitrary_sessions() {
    let mut view = new_view();
    let mut now = drain(&mut view, 0);

    let gestures: &[(f64, f64, f64)] = &[
        (2.0, 40.0, 160.0),
        (0.5, 150.0, 20.0),
        (3.0, 100.0, 100.0),
        (0.25, 10.0, 190.0),
    ];
    for &(factor, x, y) in gestures {
        view.zoom(factor, Point::new(x, y), InputUnits::Device);
        view.pan(13.0, -29.0, InputUnits::Device);
        now = drain(&mut view, now);

        let info = view.debug_info();
        // The committed window always lies inside the backing surface.
        assert!(info.reference.x >= 0.0 && info.reference.x <= 600.0);
        assert!(info.reference.y >= 0.0 && info.reference.y <= 600.0);
        // Scale stays within the clamped range.
        assert!(info.scale >= 0.25 && info.scale <= 20.0);
        // The content mapping round-trips through a fixed screen point.
        let p = Point::new(60.0, 60.0);
        let content = view.visible_to_content(p);
        let back = Point::new(
            content.x * info.scale - info.reference.x + info.pending_pan.x,
            content.y * info.scale - info.reference.y + info.pending_pan.y,
        );
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }
}

#[test]
fn visible_surface_only_ever_receives_composites() {
    let mut view = new_view();
    let now = drain(&mut view, 0);
    view.zoom(0.5, Point::new(100.0, 100.0), InputUnits::Device);
    view.pan(30.0, 0.0, InputUnits::Device);
    drain(&mut view, now);

    for event in view.visible().events() {
        assert!(
            matches!(event, Event::Shift { .. } | Event::CopyScaled { .. }),
            "content op leaked onto the visible surface: {event:?}"
        );
    }
    // And the backing surface saw the repaints.
    assert!(
        view.backing()
            .events()
            .iter()
            .any(|e| matches!(e, Event::ClearRect { .. }))
    );
}

#[test]
fn into_surfaces_returns_the_recorded_pair() {
    let mut view = new_view();
    drain(&mut view, 0);
    view.pan(12.0, 0.0, InputUnits::Device);

    let (backing, visible) = view.into_surfaces();
    assert_eq!(backing.width(), 800.0);
    assert_eq!(visible.width(), 200.0);
    assert!(!visible.events().is_empty());
}

#[test]
fn resize_session_keeps_compositing_consistent() {
    let mut view = new_view();
    let mut now = drain(&mut view, 0);

    view.zoom(2.0, Point::new(100.0, 100.0), InputUnits::Device);
    now = drain(&mut view, now);

    // Grow past the backing width: the backing follows, content recenters.
    view.resize(900.0, 300.0);
    drain(&mut view, now);

    let info = view.debug_info();
    assert_eq!(info.visible_rect.width(), 900.0);
    assert!(info.backing_rect.width() >= 900.0);
    assert!(info.backing_rect.height() >= 300.0);
    assert!(view.is_ready());
}
