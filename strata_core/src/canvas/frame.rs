// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame invalidation pass.
//!
//! [`Canvas::begin_rendering`] runs once all layers are rebuilt:
//!
//! 1. **Detect** — every live layer whose stream differs from last frame's
//!    (different length, or diverged during the rebuild) is raised to
//!    [`SelfChanged`](Invalidation::SelfChanged). Every layer needing a
//!    redraw then marks its ancestors
//!    [`ChildChanged`](Invalidation::ChildChanged), stopping at the first one
//!    already marked.
//! 2. **Sync bounds** — every [`Resized`](Invalidation::Resized) layer has
//!    the embedded bounds of each child rewritten to the child's size.
//!
//! The renderer then walks the tree, and [`Canvas::end_rendering`] resets
//! all levels to [`None`](Invalidation::None).
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`LayerId`]
//! handles, the same identity backends key their per-layer caches on.
//!
//! [`LayerId`]: crate::layer::LayerId

use alloc::vec::Vec;

use kurbo::Rect;

use crate::draw::{self, LAYER_RECORD_SIZE};
use crate::invalidation::Invalidation;
use crate::layer::INVALID;
use crate::renderer::Renderer;
use crate::trace::{
    ChildBoundsEvent, FrameBeginEvent, FrameEndEvent, LayerInvalidatedEvent, Tracer,
};

use super::Canvas;

/// The layers invalidated by a single [`Canvas::begin_rendering`] call.
///
/// Each list holds raw slot indices in ascending order, one list per final
/// level. Layers at [`Invalidation::None`] are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameChanges {
    /// Frame counter of the frame being rendered.
    pub frame_index: u64,
    /// Layers that only have changed descendants.
    pub child_changed: Vec<u32>,
    /// Layers whose own content changed.
    pub self_changed: Vec<u32>,
    /// Layers with a resized child (their content may also have changed).
    pub resized: Vec<u32>,
}

impl FrameChanges {
    /// Returns `true` if nothing needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.child_changed.is_empty() && self.self_changed.is_empty() && self.resized.is_empty()
    }

    /// Number of invalidated layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.child_changed.len() + self.self_changed.len() + self.resized.len()
    }

    /// Iterates over the layers whose own pixels must be repainted.
    pub fn redraws(&self) -> impl Iterator<Item = u32> + '_ {
        self.self_changed.iter().chain(&self.resized).copied()
    }

    fn push(&mut self, idx: u32, level: Invalidation) {
        match level {
            Invalidation::None => {}
            Invalidation::ChildChanged => self.child_changed.push(idx),
            Invalidation::SelfChanged => self.self_changed.push(idx),
            Invalidation::Resized => self.resized.push(idx),
        }
    }
}

impl<R: Renderer> Canvas<R> {
    /// Detects changed layers, propagates to ancestors and syncs child
    /// bounds.
    ///
    /// Call once per frame after every layer has been rebuilt and before the
    /// tree is rendered.
    pub fn begin_rendering(&mut self) -> FrameChanges {
        self.begin_rendering_traced(&mut Tracer::none())
    }

    /// Like [`begin_rendering`](Self::begin_rendering), reporting to `tracer`.
    pub fn begin_rendering_traced(&mut self, tracer: &mut Tracer<'_>) -> FrameChanges {
        let frame_index = self.frame_index;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            live_layers: self.layers.live_count(),
        });

        let slot_count = self.layers.slot_count();

        // Pass 1: detect and propagate.
        for idx in 0..slot_count {
            let Some(layer) = self.layers.at_mut(idx) else {
                continue;
            };
            if layer.render_pos != Some(layer.draws_pos) {
                log::trace!(
                    "layer {idx}: stream changed ({:?} -> {} bytes)",
                    layer.render_pos,
                    layer.draws_pos
                );
                layer.invalidation.raise(Invalidation::SelfChanged);
            }
            layer.render_pos = Some(layer.draws_pos);
            if layer.invalidation.needs_redraw() {
                let parent = layer.parent;
                self.propagate_child_changed(parent);
            }
        }

        // Pass 2: sync child bounds of resized layers.
        for idx in 0..slot_count {
            if self.layers.at(idx).map(|l| l.invalidation) != Some(Invalidation::Resized) {
                continue;
            }
            self.sync_child_bounds(idx, frame_index, tracer);
        }

        let mut changes = FrameChanges {
            frame_index,
            ..FrameChanges::default()
        };
        for (id, layer) in self.layers.iter() {
            if layer.invalidation == Invalidation::None {
                continue;
            }
            log::trace!("layer {}: {}", id.idx, layer.invalidation);
            tracer.layer_invalidated(&LayerInvalidatedEvent {
                frame_index,
                layer_index: id.idx,
                level: layer.invalidation,
            });
            changes.push(id.idx, layer.invalidation);
        }
        changes
    }

    /// Resets every layer's level to [`Invalidation::None`] and advances the
    /// frame counter.
    pub fn end_rendering(&mut self) {
        self.end_rendering_traced(&mut Tracer::none());
    }

    /// Like [`end_rendering`](Self::end_rendering), reporting to `tracer`.
    pub fn end_rendering_traced(&mut self, tracer: &mut Tracer<'_>) {
        let mut invalidated_layers = 0;
        for layer in self.layers.iter_mut() {
            if layer.invalidation != Invalidation::None {
                invalidated_layers += 1;
            }
            layer.invalidation = Invalidation::None;
        }
        tracer.frame_end(&FrameEndEvent {
            frame_index: self.frame_index,
            invalidated_layers,
        });
        self.frame_index += 1;
    }

    fn propagate_child_changed(&mut self, mut idx: u32) {
        while idx != INVALID {
            let Some(layer) = self.layers.at_mut(idx) else {
                return;
            };
            if layer.invalidation >= Invalidation::ChildChanged {
                return;
            }
            layer.invalidation = Invalidation::ChildChanged;
            idx = layer.parent;
        }
    }

    fn sync_child_bounds(&mut self, idx: u32, frame_index: u64, tracer: &mut Tracer<'_>) {
        let count = self.layers.at(idx).map_or(0, |l| l.num_children);
        for i in 0..count {
            let Some(child) = self.layers.at(idx).map(|l| l.children[i]) else {
                return;
            };
            let Some(size) = self.layers.get(child.layer).map(|c| c.size) else {
                continue;
            };
            let bounds = Rect::from_origin_size(child.offset, size);
            let Some(parent) = self.layers.at_mut(idx) else {
                return;
            };
            let record = &mut parent.draws[child.draw_pos..child.draw_pos + LAYER_RECORD_SIZE];
            draw::patch_bounds(record, bounds);
            tracer.child_bounds(&ChildBoundsEvent {
                frame_index,
                parent_index: idx,
                child_index: child.layer.idx,
                bounds,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::color::Color;
    use crate::layer::LayerId;
    use crate::testing::RecordingRenderer;

    type TestCanvas = Canvas<RecordingRenderer>;

    fn canvas() -> TestCanvas {
        Canvas::new(RecordingRenderer::default())
    }

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    /// root ─ mid ─ leaf, each with one rect (the leaf) or its child.
    fn chain(c: &mut TestCanvas) -> [LayerId; 3] {
        let root = c.create_layer();
        let mid = c.create_layer();
        let leaf = c.create_layer();
        build_chain(c, [root, mid, leaf], Color::WHITE);
        [root, mid, leaf]
    }

    fn build_chain(c: &mut TestCanvas, [root, mid, leaf]: [LayerId; 3], color: Color) {
        c.clear(leaf);
        c.fill_rect(leaf, rect(), color);
        c.clear(mid);
        c.draw_layer(mid, leaf, Point::new(5.0, 5.0));
        c.clear(root);
        c.draw_layer(root, mid, Point::new(1.0, 1.0));
    }

    #[test]
    fn first_frame_marks_everything() {
        let mut c = canvas();
        let [root, mid, leaf] = chain(&mut c);
        let changes = c.begin_rendering();
        assert_eq!(changes.len(), 3);
        for id in [root, mid, leaf] {
            assert_eq!(c.invalidation(id), Invalidation::SelfChanged);
        }
        c.end_rendering();
        assert_eq!(c.invalidation(root), Invalidation::None);
        assert_eq!(c.frame_index(), 1);
    }

    #[test]
    fn idempotent_redraw_is_clean() {
        let mut c = canvas();
        let ids = chain(&mut c);
        c.begin_rendering();
        c.end_rendering();

        build_chain(&mut c, ids, Color::WHITE);
        let changes = c.begin_rendering();
        assert!(changes.is_empty());
        for id in ids {
            assert_eq!(c.invalidation(id), Invalidation::None);
        }
    }

    #[test]
    fn change_propagates_to_every_ancestor() {
        let mut c = canvas();
        let ids @ [root, mid, leaf] = chain(&mut c);
        c.begin_rendering();
        c.end_rendering();

        build_chain(&mut c, ids, Color::BLACK);
        let changes = c.begin_rendering();
        assert_eq!(c.invalidation(leaf), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(mid), Invalidation::ChildChanged);
        assert_eq!(c.invalidation(root), Invalidation::ChildChanged);
        assert_eq!(changes.self_changed, [leaf.index()]);
        assert_eq!(changes.child_changed, [root.index(), mid.index()]);
        assert_eq!(changes.redraws().collect::<Vec<_>>(), [leaf.index()]);
    }

    #[test]
    fn background_change_propagates() {
        let mut c = canvas();
        let ids @ [root, mid, leaf] = chain(&mut c);
        c.begin_rendering();
        c.end_rendering();

        build_chain(&mut c, ids, Color::WHITE);
        c.set_background(mid, Color::WHITE);
        c.begin_rendering();
        assert_eq!(c.invalidation(leaf), Invalidation::None);
        assert_eq!(c.invalidation(mid), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(root), Invalidation::ChildChanged);
    }

    /// root ─ mid ─ {left, right}; `colors` fill the two leaves.
    fn build_fork(
        c: &mut TestCanvas,
        [root, mid, left, right]: [LayerId; 4],
        colors: [Color; 2],
    ) {
        c.clear(left);
        c.fill_rect(left, rect(), colors[0]);
        c.clear(right);
        c.fill_rect(right, rect(), colors[1]);
        c.clear(mid);
        c.draw_layer(mid, left, Point::ZERO);
        c.draw_layer(mid, right, Point::new(10.0, 0.0));
        c.clear(root);
        c.draw_layer(root, mid, Point::ZERO);
    }

    #[test]
    fn changed_siblings_share_one_ancestor_path() {
        let mut c = canvas();
        let ids @ [root, mid, left, right] = core::array::from_fn(|_| c.create_layer());
        build_fork(&mut c, ids, [Color::WHITE; 2]);
        c.begin_rendering();
        c.end_rendering();

        build_fork(&mut c, ids, [Color::BLACK; 2]);
        let changes = c.begin_rendering();
        assert_eq!(c.invalidation(left), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(right), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(mid), Invalidation::ChildChanged);
        assert_eq!(c.invalidation(root), Invalidation::ChildChanged);
        assert_eq!(changes.self_changed, [left.index(), right.index()]);
        assert_eq!(changes.child_changed, [root.index(), mid.index()]);
    }

    #[test]
    fn propagation_stops_at_first_child_changed_ancestor() {
        let mut c = canvas();
        let ids @ [root, mid, left, _] = core::array::from_fn(|_| c.create_layer());
        build_fork(&mut c, ids, [Color::WHITE; 2]);
        c.begin_rendering();
        c.end_rendering();

        // As if a sibling had already marked `mid` this frame.
        c.layers.live_mut(mid).invalidation = Invalidation::ChildChanged;
        c.propagate_child_changed(mid.index());
        assert_eq!(c.invalidation(root), Invalidation::None);

        c.layers.live_mut(mid).invalidation = Invalidation::None;
        c.propagate_child_changed(c.layers.live(left).parent);
        assert_eq!(c.invalidation(mid), Invalidation::ChildChanged);
        assert_eq!(c.invalidation(root), Invalidation::ChildChanged);
    }

    #[test]
    fn propagation_does_not_lower_levels() {
        let mut c = canvas();
        let ids @ [root, mid, leaf] = chain(&mut c);
        c.begin_rendering();
        c.end_rendering();

        build_chain(&mut c, ids, Color::BLACK);
        c.set_background(root, Color::WHITE);
        c.begin_rendering();
        assert_eq!(c.invalidation(leaf), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(mid), Invalidation::ChildChanged);
        assert_eq!(c.invalidation(root), Invalidation::SelfChanged);
    }

    #[test]
    fn child_bounds_follow_resize() {
        let mut c = canvas();
        let parent = c.create_layer();
        let child = c.create_layer();
        c.resize(child, Size::new(50.0, 20.0));
        c.draw_layer(parent, child, Point::new(10.0, 10.0));
        c.begin_rendering();
        c.end_rendering();

        // Parent's draws are left alone.
        c.resize(child, Size::new(60.0, 20.0));
        let changes = c.begin_rendering();
        assert_eq!(c.invalidation(parent), Invalidation::Resized);
        assert_eq!(changes.resized, [parent.index()]);
        let bounds = c.children(parent).next().map(|e| e.bounds);
        assert_eq!(bounds, Some(Rect::new(10.0, 10.0, 70.0, 30.0)));
    }

    #[test]
    fn two_layer_scenario() {
        let mut c = canvas();
        let a = c.create_layer();
        let b = c.create_layer();
        c.resize(a, Size::new(100.0, 50.0));
        c.resize(b, Size::new(50.0, 20.0));

        let build = |c: &mut TestCanvas| {
            c.clear(b);
            c.fill_rect(b, Rect::new(0.0, 0.0, 50.0, 20.0), Color::rgb(0x336699));
            c.clear(a);
            c.draw_layer(a, b, Point::new(10.0, 10.0));
        };

        // Frame 1.
        build(&mut c);
        c.begin_rendering();
        assert_eq!(c.invalidation(a), Invalidation::SelfChanged);
        assert_eq!(c.invalidation(b), Invalidation::SelfChanged);
        let bounds = c.children(a).next().map(|e| e.bounds);
        assert_eq!(bounds, Some(Rect::new(10.0, 10.0, 60.0, 30.0)));
        c.end_rendering();

        // Frame 2.
        c.resize(b, Size::new(60.0, 20.0));
        build(&mut c);
        c.begin_rendering();
        assert_eq!(c.invalidation(a), Invalidation::Resized);
        assert_eq!(c.invalidation(b), Invalidation::SelfChanged);
        let bounds = c.children(a).next().map(|e| e.bounds);
        assert_eq!(bounds, Some(Rect::new(10.0, 10.0, 70.0, 30.0)));
        c.end_rendering();
    }

    #[test]
    fn destroyed_layers_are_skipped() {
        let mut c = canvas();
        let a = c.create_layer();
        let b = c.create_layer();
        c.destroy_layer(a);
        let changes = c.begin_rendering();
        assert_eq!(changes.self_changed, [b.index()]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_frame_reports_events() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Sink {
            begins: usize,
            invalidated: Vec<(u32, Invalidation)>,
            bounds: Vec<Rect>,
            ends: Vec<usize>,
        }
        impl TraceSink for Sink {
            fn on_frame_begin(&mut self, _: &FrameBeginEvent) {
                self.begins += 1;
            }
            fn on_layer_invalidated(&mut self, e: &LayerInvalidatedEvent) {
                self.invalidated.push((e.layer_index, e.level));
            }
            fn on_child_bounds(&mut self, e: &ChildBoundsEvent) {
                self.bounds.push(e.bounds);
            }
            fn on_frame_end(&mut self, e: &FrameEndEvent) {
                self.ends.push(e.invalidated_layers);
            }
        }

        let mut c = canvas();
        let parent = c.create_layer();
        let child = c.create_layer();
        c.draw_layer(parent, child, Point::ZERO);
        c.begin_rendering();
        c.end_rendering();

        let mut sink = Sink::default();
        c.resize(child, Size::new(4.0, 4.0));
        let mut tracer = Tracer::new(&mut sink);
        c.begin_rendering_traced(&mut tracer);
        c.end_rendering_traced(&mut tracer);
        drop(tracer);

        assert_eq!(sink.begins, 1);
        assert_eq!(
            sink.invalidated,
            [
                (parent.index(), Invalidation::Resized),
                (child.index(), Invalidation::SelfChanged)
            ]
        );
        assert_eq!(sink.bounds, [Rect::new(0.0, 0.0, 4.0, 4.0)]);
        assert_eq!(sink.ends, [2]);
    }
}
