// Copyright 2026 the Backdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use backdrop_raster_ref::RefRaster;
use backdrop_view::{InputUnits, PanZoomView};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_delta(&mut self, magnitude: f64) -> f64 {
        (f64::from(self.next_u32()) / f64::from(u32::MAX) - 0.5) * 2.0 * magnitude
    }
}

fn fresh_view(backing: f64, visible: f64) -> PanZoomView<RefRaster, RefRaster> {
    let mut view = PanZoomView::new(
        RefRaster::new(backing, backing),
        RefRaster::new(visible, visible),
    );
    view.run_frame(0);
    view
}

/// Runs all pending timers and frames so the next iteration starts idle.
fn drain(view: &mut PanZoomView<RefRaster, RefRaster>, mut now_ms: u64) {
    loop {
        while let Some(deadline) = view.next_deadline() {
            now_ms = now_ms.max(deadline);
            view.run_due_timers(now_ms);
        }
        if !view.needs_frame() {
            return;
        }
        view.run_frame(now_ms);
    }
}

fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("backdrop_view");
    group.sample_size(50);

    for &(backing, visible) in &[(2_048.0_f64, 512.0_f64), (8_192.0_f64, 1_024.0_f64)] {
        group.bench_function(format!("pan_burst(backing={backing},visible={visible})"), |b| {
            b.iter_batched(
                || (fresh_view(backing, visible), Lcg::new(0xBACD_0000_0000_0001)),
                |(mut view, mut rng)| {
                    for _ in 0..256 {
                        let dx = rng.gen_delta(40.0);
                        let dy = rng.gen_delta(40.0);
                        black_box(view.pan(dx, dy, InputUnits::Device));
                    }
                    black_box(view);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(
            format!("zoom_gesture_storm(backing={backing},visible={visible})"),
            |b| {
                b.iter_batched(
                    || (fresh_view(backing, visible), Lcg::new(0xBACD_0000_0000_0002)),
                    |(mut view, mut rng)| {
                        let anchor = Point::new(visible / 2.0, visible / 2.0);
                        let mut now = 0_u64;
                        for step in 0..128_u64 {
                            let factor = if step % 2 == 0 { 1.1 } else { 0.92 };
                            view.zoom(factor, anchor, InputUnits::Device);
                            view.pan(rng.gen_delta(10.0), rng.gen_delta(10.0), InputUnits::Device);
                            now += 8;
                            view.run_due_timers(now);
                            view.run_frame(now);
                        }
                        black_box(view);
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        group.bench_function(
            format!("zoomed_out_pan_blits(backing={backing},visible={visible})"),
            |b| {
                b.iter_batched(
                    || {
                        let mut view = fresh_view(backing, visible);
                        // Zoom out and let the throttle composite cache the
                        // reference so pans hit the partial-blit path.
                        view.zoom(
                            0.5,
                            Point::new(visible / 2.0, visible / 2.0),
                            InputUnits::Device,
                        );
                        view.run_due_timers(16);
                        view
                    },
                    |mut view| {
                        for step in 0..256_i32 {
                            let dx = if step % 2 == 0 { 12.0 } else { -12.0 };
                            view.pan(dx, 3.0, InputUnits::Device);
                        }
                        black_box(view);
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        group.bench_function(
            format!("settle_cycle(backing={backing},visible={visible})"),
            |b| {
                b.iter_batched(
                    || fresh_view(backing, visible),
                    |mut view| {
                        view.zoom(
                            2.0,
                            Point::new(visible / 4.0, visible / 4.0),
                            InputUnits::Device,
                        );
                        drain(&mut view, 0);
                        black_box(view.is_ready());
                        black_box(view);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.bench_function("redraw_with_drawings(n=64)", |b| {
        b.iter_batched(
            || {
                let mut view = fresh_view(2_048.0, 512.0);
                for _ in 0..64 {
                    view.add_drawing(|surface| {
                        black_box(surface);
                    });
                }
                view
            },
            |mut view| {
                view.request_redraw();
                view.run_frame(0);
                black_box(view);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_viewport);
criterion_main!(benches);
