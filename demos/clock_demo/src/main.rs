// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless clock: an outer layer draws an inner layer whose text changes
//! once per simulated second.
//!
//! Every tick rebuilds both layers from scratch. Frame events go to a
//! [`PrettyPrintSink`](strata_debug::pretty::PrettyPrintSink) on stdout, and
//! whenever the outer layer is invalidated a render plan is built and
//! summarised. Ticks within the same second produce no plan at all.
//!
//! Run with `RUST_LOG=debug` (or `trace`) to see the canvas's own logging.

use strata_core::canvas::Canvas;
use strata_core::color::Color;
use strata_core::font::{FontDesc, FontId};
use strata_core::invalidation::Invalidation;
use strata_core::kurbo::{Point, Size};
use strata_core::layer::LayerId;
use strata_core::renderer::Renderer;
use strata_core::trace::Tracer;
use strata_debug::pretty::PrettyPrintSink;
use strata_render::{RenderInfo, RenderItem, build_plan};

/// Simulated tick interval in milliseconds.
const TICK_MS: u64 = 250;
/// Simulated run length in milliseconds.
const RUN_MS: u64 = 3_000;

/// Window background the root layer is composited over.
const CORNFLOWER: Color = Color::rgb(0x6495ed);

/// Fixed-advance text measurement standing in for a platform renderer.
#[derive(Debug, Default)]
struct MonoRenderer {
    heights: Vec<(FontId, u32)>,
}

impl MonoRenderer {
    fn height(&self, font: FontId) -> f64 {
        self.heights
            .iter()
            .find(|(id, _)| *id == font)
            .map_or(16.0, |&(_, h)| f64::from(h))
    }
}

impl Renderer for MonoRenderer {
    fn make_font(&mut self, font: FontId, desc: &FontDesc<'_>) {
        self.heights.retain(|(id, _)| *id != font);
        self.heights.push((font, desc.height));
    }

    fn measure(&mut self, font: FontId, text: &str) -> Size {
        let height = self.height(font);
        let chars = text.chars().count() as f64;
        Size::new(chars * height * 0.5, height)
    }

    fn release_font(&mut self, font: FontId) {
        self.heights.retain(|(id, _)| *id != font);
    }

    fn free(&mut self) {
        log::info!("renderer freed {} fonts", self.heights.len());
        self.heights.clear();
    }
}

struct Clock {
    outer: LayerId,
    inner: LayerId,
    font: FontId,
}

impl Clock {
    fn new(canvas: &mut Canvas<MonoRenderer>) -> Self {
        let font = canvas.make_font(&FontDesc::new("Segoe UI", 16));
        let outer = canvas.create_layer();
        let inner = canvas.create_layer();
        canvas.resize(outer, Size::new(256.0, 256.0));
        canvas.resize(inner, Size::new(256.0, 256.0));
        Self { outer, inner, font }
    }

    fn build(&self, canvas: &mut Canvas<MonoRenderer>, seconds: u64) {
        canvas.clear(self.outer);
        canvas.draw_layer(self.outer, self.inner, Point::ZERO);

        canvas.clear(self.inner);
        let text = format!("Time: {seconds}");
        canvas.draw_text(self.inner, Point::ZERO, self.font, Color::BLACK, &text);
    }
}

fn main() {
    env_logger::init();

    let mut canvas = Canvas::new(MonoRenderer::default());
    let clock = Clock::new(&mut canvas);
    let mut sink = PrettyPrintSink::with_writer(std::io::stdout());

    let mut now_ms = 0;
    while now_ms < RUN_MS {
        clock.build(&mut canvas, now_ms / 1000);

        let mut tracer = Tracer::new(&mut sink);
        let changes = canvas.begin_rendering_traced(&mut tracer);

        if canvas.invalidation(clock.outer) != Invalidation::None {
            let info = RenderInfo {
                background: CORNFLOWER,
                ..RenderInfo::root(&canvas, clock.outer)
            };
            let plan = build_plan(&canvas, &info);
            let texts: Vec<_> = plan
                .items
                .iter()
                .filter_map(|item| match item {
                    RenderItem::Text { text, .. } => Some(text.as_str()),
                    RenderItem::Fill { .. } => None,
                })
                .collect();
            println!(
                "t={now_ms}ms: {} layers changed, {} items, damage={:?}, text={texts:?}",
                changes.len(),
                plan.items.len(),
                plan.damage.bounds(),
            );
        }

        canvas.end_rendering_traced(&mut tracer);
        now_ms += TICK_MS;
    }

    canvas.free_font(clock.font);
}
