// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The incremental tree walk.
//!
//! [`build_plan`] visits a layer and, recursively, the children it draws.
//! A layer is repainted (background fill plus every visible command) when it
//! needs a redraw itself or when an ancestor is being repainted. Layers at
//! [`Invalidation::ChildChanged`] are only traversed. Subtrees at
//! [`Invalidation::None`] under a layer that is not being repainted are
//! skipped entirely.

use alloc::string::ToString;

use kurbo::{Point, Rect, Vec2};
use strata_core::canvas::Canvas;
use strata_core::color::Color;
use strata_core::draw::DrawCommand;
use strata_core::invalidation::Invalidation;
use strata_core::layer::LayerId;
use strata_core::renderer::Renderer;

use crate::plan::{RenderItem, RenderPlan};

/// Where and how to render a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderInfo {
    /// The layer to render.
    pub layer: LayerId,
    /// Visible area, in the layer's own coordinates.
    pub clip: Rect,
    /// Translation from the layer's coordinates to device space.
    pub offset: Vec2,
    /// Background the layer is composited over.
    pub background: Color,
}

impl RenderInfo {
    /// Renders all of `layer` at the device origin over a transparent
    /// background.
    #[must_use]
    pub fn root<R: Renderer>(canvas: &Canvas<R>, layer: LayerId) -> Self {
        Self {
            layer,
            clip: Rect::from_origin_size(Point::ZERO, canvas.size(layer)),
            offset: Vec2::ZERO,
            background: Color::TRANSPARENT,
        }
    }
}

/// Builds the device-space draw operations needed to bring the output of
/// `info.layer` up to date.
///
/// Call between [`Canvas::begin_rendering`] and [`Canvas::end_rendering`].
///
/// # Panics
///
/// Panics if `info.layer` is stale.
#[must_use]
pub fn build_plan<R: Renderer>(canvas: &Canvas<R>, info: &RenderInfo) -> RenderPlan {
    let mut plan = RenderPlan::new();
    walk(canvas, info, false, &mut plan);
    plan
}

fn walk<R: Renderer>(canvas: &Canvas<R>, info: &RenderInfo, repaint: bool, plan: &mut RenderPlan) {
    let background = Color::blend_over(canvas.background(info.layer), info.background);
    let repaint = repaint || canvas.invalidation(info.layer).needs_redraw();

    if repaint {
        let device = info.clip + info.offset;
        plan.items.push(RenderItem::Fill {
            rect: device,
            color: background,
        });
        plan.damage.add(device);
    }

    for command in canvas.draws(info.layer) {
        let bounds = command.bounds();
        if !overlaps(bounds, info.clip) {
            continue;
        }
        match command {
            DrawCommand::Rect { color, .. } if repaint => {
                plan.items.push(RenderItem::Fill {
                    rect: bounds.intersect(info.clip) + info.offset,
                    color,
                });
            }
            DrawCommand::Text {
                font, color, text, ..
            } if repaint => {
                plan.items.push(RenderItem::Text {
                    origin: bounds.origin() + info.offset,
                    font,
                    color,
                    text: text.to_string(),
                });
            }
            DrawCommand::Rect { .. } | DrawCommand::Text { .. } => {}
            DrawCommand::Layer { layer, .. } => {
                if !repaint && canvas.invalidation(layer) == Invalidation::None {
                    continue;
                }
                let origin = bounds.origin().to_vec2();
                let own = Rect::from_origin_size(Point::ZERO, canvas.size(layer));
                let clip = (info.clip - origin).intersect(own);
                if clip.width() <= 0.0 || clip.height() <= 0.0 {
                    continue;
                }
                let child = RenderInfo {
                    layer,
                    clip,
                    offset: info.offset + origin,
                    background,
                };
                walk(canvas, &child, repaint, plan);
            }
        }
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    let i = a.intersect(b);
    i.width() > 0.0 && i.height() > 0.0
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Size;
    use strata_core::font::{FontDesc, FontId};

    use super::*;
    use crate::damage::DamageRegion;

    #[derive(Debug, Default)]
    struct FixedAdvance;

    impl Renderer for FixedAdvance {
        fn make_font(&mut self, _font: FontId, _desc: &FontDesc<'_>) {}

        fn measure(&mut self, _font: FontId, text: &str) -> Size {
            Size::new(8.0 * text.len() as f64, 16.0)
        }
    }

    const PAPER: Color = Color::rgb(0xf0f0f0);
    const INK: Color = Color::rgb(0x202020);

    struct Clock {
        canvas: Canvas<FixedAdvance>,
        outer: LayerId,
        inner: LayerId,
        font: FontId,
    }

    impl Clock {
        fn new() -> Self {
            let mut canvas = Canvas::new(FixedAdvance);
            let font = canvas.make_font(&FontDesc::new("Segoe UI", 16));
            let outer = canvas.create_layer();
            let inner = canvas.create_layer();
            canvas.resize(outer, Size::new(200.0, 100.0));
            canvas.resize(inner, Size::new(100.0, 20.0));
            canvas.set_background(outer, PAPER);
            Self {
                canvas,
                outer,
                inner,
                font,
            }
        }

        fn build(&mut self, time: &str) {
            let c = &mut self.canvas;
            c.clear(self.inner);
            c.draw_text(self.inner, Point::new(2.0, 2.0), self.font, INK, time);
            c.clear(self.outer);
            c.fill_rect(self.outer, Rect::new(0.0, 0.0, 200.0, 4.0), INK);
            c.draw_layer(self.outer, self.inner, Point::new(40.0, 30.0));
        }

        fn frame(&mut self, time: &str) -> RenderPlan {
            self.build(time);
            self.canvas.begin_rendering();
            let info = RenderInfo::root(&self.canvas, self.outer);
            let plan = build_plan(&self.canvas, &info);
            self.canvas.end_rendering();
            plan
        }
    }

    #[test]
    fn first_frame_paints_everything() {
        let mut clock = Clock::new();
        let plan = clock.frame("12:00");
        assert_eq!(
            plan.items,
            [
                RenderItem::Fill {
                    rect: Rect::new(0.0, 0.0, 200.0, 100.0),
                    color: PAPER,
                },
                RenderItem::Fill {
                    rect: Rect::new(0.0, 0.0, 200.0, 4.0),
                    color: INK,
                },
                RenderItem::Fill {
                    rect: Rect::new(40.0, 30.0, 140.0, 50.0),
                    color: PAPER,
                },
                RenderItem::Text {
                    origin: Point::new(42.0, 32.0),
                    font: clock.font,
                    color: INK,
                    text: "12:00".into(),
                },
            ]
        );
    }

    #[test]
    fn unchanged_frame_paints_nothing() {
        let mut clock = Clock::new();
        clock.frame("12:00");
        let plan = clock.frame("12:00");
        assert!(plan.is_empty());
        assert!(plan.damage.is_empty());
    }

    #[test]
    fn changed_child_repaints_only_itself() {
        let mut clock = Clock::new();
        clock.frame("12:00");
        let plan = clock.frame("12:01");
        assert_eq!(plan.items.len(), 2);
        assert!(matches!(
            &plan.items[1],
            RenderItem::Text { origin, text, .. }
                if *origin == Point::new(42.0, 32.0) && text == "12:01"
        ));
        assert_eq!(
            plan.damage,
            DamageRegion::Rects(alloc::vec![Rect::new(40.0, 30.0, 140.0, 50.0)])
        );
    }

    #[test]
    fn partial_clip_skips_invisible_commands() {
        let mut clock = Clock::new();
        clock.build("12:00");
        clock.canvas.begin_rendering();
        let info = RenderInfo {
            clip: Rect::new(0.0, 10.0, 200.0, 100.0),
            ..RenderInfo::root(&clock.canvas, clock.outer)
        };
        let plan = build_plan(&clock.canvas, &info);
        let fills: Vec<_> = plan
            .items
            .iter()
            .filter_map(|item| match item {
                RenderItem::Fill { rect, .. } => Some(*rect),
                RenderItem::Text { .. } => None,
            })
            .collect();
        // The top rule lies outside the clip.
        assert_eq!(
            fills,
            [
                Rect::new(0.0, 10.0, 200.0, 100.0),
                Rect::new(40.0, 30.0, 140.0, 50.0)
            ]
        );
    }

    #[test]
    fn child_clip_is_child_local() {
        let mut clock = Clock::new();
        clock.build("12:00");
        clock.canvas.begin_rendering();
        // Only the right half of the inner layer is visible.
        let info = RenderInfo {
            clip: Rect::new(90.0, 0.0, 200.0, 100.0),
            ..RenderInfo::root(&clock.canvas, clock.outer)
        };
        let plan = build_plan(&clock.canvas, &info);
        assert!(plan.items.contains(&RenderItem::Fill {
            rect: Rect::new(90.0, 30.0, 140.0, 50.0),
            color: PAPER,
        }));
        // The text starts at x=42 and is 40 wide: outside the clip.
        assert!(
            !plan
                .items
                .iter()
                .any(|item| matches!(item, RenderItem::Text { .. }))
        );
    }

    #[test]
    fn translucent_backgrounds_compose() {
        let mut clock = Clock::new();
        let tint = Color::new(0, 0, 0xff, 0x80);
        clock.canvas.set_background(clock.inner, tint);
        let plan = clock.frame("12:00");
        let expected = Color::blend_over(tint, PAPER);
        assert!(plan.items.contains(&RenderItem::Fill {
            rect: Rect::new(40.0, 30.0, 140.0, 50.0),
            color: expected,
        }));
    }
}
