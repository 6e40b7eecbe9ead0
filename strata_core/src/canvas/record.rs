// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rebuilding a layer's command buffer.
//!
//! A layer is rebuilt by calling [`Canvas::clear`] followed by the draw calls
//! that describe its content. Each draw call appends one record. While the
//! rebuilt stream matches what the renderer consumed last frame byte range by
//! byte range, draw calls write nothing at all; the first mismatch switches
//! the rest of the rebuild to plain appends, and
//! [`Canvas::begin_rendering`] later sees the layer as changed.

use kurbo::{Point, Rect};

use crate::color::Color;
use crate::draw::{self, LAYER_RECORD_SIZE, RECT_RECORD_SIZE};
use crate::font::FontId;
use crate::invalidation::Invalidation;
use crate::layer::{Child, INVALID, LayerId};
use crate::renderer::Renderer;

use super::Canvas;

impl<R: Renderer> Canvas<R> {
    /// Starts rebuilding `id`: rewinds its command stream and detaches every
    /// child it draws.
    ///
    /// The previous stream is kept for comparison, so issuing the same draw
    /// calls again leaves the layer unchanged.
    pub fn clear(&mut self, id: LayerId) {
        self.detach_children(id);
        let layer = self.layers.live_mut(id);
        layer.draws_pos = 0;
        layer.num_children = 0;
    }

    /// Appends a solid fill of `rect`.
    pub fn fill_rect(&mut self, id: LayerId, rect: Rect, color: Color) {
        let layer = self.layers.live_mut(id);
        let pos = layer.advance(RECT_RECORD_SIZE);
        if layer
            .reusable(pos, RECT_RECORD_SIZE)
            .is_some_and(|record| draw::rect_matches(record, rect, color))
        {
            return;
        }
        draw::encode_rect(layer.record_mut(pos, RECT_RECORD_SIZE), rect, color);
    }

    /// Appends `text` with its top-left corner at `origin`.
    ///
    /// The text is measured with the renderer only if it differs from the
    /// record it replaces.
    ///
    /// # Panics
    ///
    /// Panics if `font` is not live.
    pub fn draw_text(&mut self, id: LayerId, origin: Point, font: FontId, color: Color, text: &str) {
        assert!(self.fonts.contains(font), "stale FontId: {font:?}");
        let size = draw::text_record_size(text.len());
        let layer = self.layers.live_mut(id);
        let pos = layer.advance(size);
        if layer
            .reusable(pos, size)
            .is_some_and(|record| draw::text_matches(record, origin, font, color, text))
        {
            return;
        }
        let extent = self.renderer.measure(font, text);
        let bounds = Rect::from_origin_size(origin, extent);
        draw::encode_text(layer.record_mut(pos, size), bounds, font, color, text);
    }

    /// Draws `child` into `id` with its top-left corner at `offset`, making
    /// `id` its parent.
    ///
    /// Children are composited in the order they are drawn.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` is `id` or one of its
    /// ancestors, or if `child` is already drawn by a layer.
    pub fn draw_layer(&mut self, id: LayerId, child: LayerId, offset: Point) {
        assert!(id != child, "cannot draw {id:?} into itself");
        let child_layer = self.layers.live(child);
        assert!(
            child_layer.parent == INVALID,
            "{child:?} is already drawn by layer {}",
            child_layer.parent
        );
        let mut ancestor = self.layers.live(id).parent;
        while ancestor != INVALID {
            assert!(
                ancestor != child.idx,
                "cannot draw an ancestor {child:?} into {id:?}"
            );
            ancestor = self.layers.at(ancestor).map_or(INVALID, |l| l.parent);
        }
        let bounds = Rect::from_origin_size(offset, child_layer.size);

        let layer = self.layers.live_mut(id);
        let pos = layer.advance(LAYER_RECORD_SIZE);
        let ix = layer.num_children;
        let entry = Child {
            layer: child,
            offset,
            draw_pos: pos,
        };

        let reused = layer
            .reusable(pos, LAYER_RECORD_SIZE)
            .is_some_and(|record| draw::layer_matches(record, offset, child));
        if reused {
            assert!(
                layer.children.get(ix) == Some(&entry),
                "retained child {ix} of {id:?} does not match {child:?} at byte {pos}"
            );
            // The child may have been resized while detached.
            let record = &mut layer.draws[pos..pos + LAYER_RECORD_SIZE];
            if draw::record_bounds(record) != bounds {
                draw::patch_bounds(record, bounds);
                layer.invalidation.raise(Invalidation::Resized);
            }
        } else {
            draw::encode_layer(layer.record_mut(pos, LAYER_RECORD_SIZE), bounds, child);
            layer.children.truncate(ix);
            layer.children.push(entry);
        }
        layer.num_children = ix + 1;

        self.layers.live_mut(child).parent = id.idx;
    }
}
