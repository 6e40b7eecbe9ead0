// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: layer table, font table and renderer.
//!
//! A [`Canvas`] is the single owner of every layer and font it hands out
//! handles for, and of the [`Renderer`] it forwards font work to. Several
//! canvases can coexist; handles are only meaningful for the canvas that
//! created them.
//!
//! Operations are split by concern:
//!
//! - this module: configuration, layer and font lifecycle, and queries,
//! - `record`: rebuilding a layer's command buffer
//!   ([`clear`](Canvas::clear), [`fill_rect`](Canvas::fill_rect),
//!   [`draw_text`](Canvas::draw_text), [`draw_layer`](Canvas::draw_layer)),
//! - `frame`: the per-frame invalidation pass
//!   ([`begin_rendering`](Canvas::begin_rendering),
//!   [`end_rendering`](Canvas::end_rendering)).
//!
//! # Panics
//!
//! Every method taking a [`LayerId`] or [`FontId`] panics if the handle is
//! stale. Use [`is_alive`](Canvas::is_alive) and [`font`](Canvas::font) to
//! probe without panicking.

mod frame;
mod record;

pub use frame::FrameChanges;

use kurbo::Size;

use crate::color::Color;
use crate::draw::Draws;
use crate::font::{FontDesc, FontId, FontInfo, FontTable};
use crate::invalidation::Invalidation;
use crate::layer::{Children, INVALID, Layer, LayerId, LayerSlots};
use crate::renderer::Renderer;

/// Allocation hints for new layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Bytes reserved for a new layer's command buffer.
    pub initial_draw_capacity: usize,
    /// Child slots reserved for a new layer.
    pub initial_child_capacity: usize,
}

impl CanvasConfig {
    /// Room for a couple of draws and a handful of children.
    pub const DEFAULT: Self = Self {
        initial_draw_capacity: 128,
        initial_child_capacity: 4,
    };
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A retained tree of layers and the fonts they draw with.
///
/// See the [module documentation](self) for an overview.
#[derive(Debug)]
pub struct Canvas<R: Renderer> {
    layers: LayerSlots,
    fonts: FontTable,
    renderer: R,
    config: CanvasConfig,
    frame_index: u64,
}

impl<R: Renderer> Canvas<R> {
    /// Creates an empty canvas that owns `renderer`.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, CanvasConfig::DEFAULT)
    }

    /// Creates an empty canvas with explicit allocation hints.
    #[must_use]
    pub fn with_config(renderer: R, config: CanvasConfig) -> Self {
        Self {
            layers: LayerSlots::default(),
            fonts: FontTable::default(),
            renderer,
            config,
            frame_index: 0,
        }
    }

    /// Returns the allocation hints in use.
    #[must_use]
    pub fn config(&self) -> CanvasConfig {
        self.config
    }

    /// Returns the renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Number of completed frames (calls to [`end_rendering`](Self::end_rendering)).
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // -- Layer lifecycle --

    /// Creates an empty, zero-sized layer with a transparent background and
    /// no parent.
    pub fn create_layer(&mut self) -> LayerId {
        let layer = Layer::new(
            self.config.initial_draw_capacity,
            self.config.initial_child_capacity,
        );
        let id = self.layers.insert(layer);
        log::debug!("created layer {id:?}");
        id
    }

    /// Destroys a layer, releasing its command buffer and slot.
    ///
    /// Children still drawn by the layer are detached, not destroyed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or the layer is still drawn by a parent.
    pub fn destroy_layer(&mut self, id: LayerId) {
        let layer = self.layers.live(id);
        assert!(
            layer.parent == INVALID,
            "cannot destroy {id:?}: it is still drawn by layer {}",
            layer.parent
        );
        self.detach_children(id);
        self.layers.remove(id);
        log::debug!("destroyed layer {id:?}");
    }

    /// Returns `true` if `id` refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        self.layers.get(id).is_some()
    }

    /// Number of live layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.live_count()
    }

    /// Iterates over live layers in slot order.
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.iter().map(|(id, _)| id)
    }

    // -- Layer state --

    /// Returns the layer's size.
    #[must_use]
    pub fn size(&self, id: LayerId) -> Size {
        self.layers.live(id).size
    }

    /// Sets the layer's size.
    ///
    /// A change marks the layer [`SelfChanged`](Invalidation::SelfChanged)
    /// and its parent, if any, [`Resized`](Invalidation::Resized).
    pub fn resize(&mut self, id: LayerId, size: Size) {
        let layer = self.layers.live_mut(id);
        if layer.size == size {
            return;
        }
        layer.size = size;
        layer.invalidation.raise(Invalidation::SelfChanged);
        let parent = layer.parent;
        if let Some(parent) = self.layers.at_mut(parent) {
            parent.invalidation.raise(Invalidation::Resized);
        }
    }

    /// Returns the layer's background color.
    #[must_use]
    pub fn background(&self, id: LayerId) -> Color {
        self.layers.live(id).background
    }

    /// Sets the layer's background color.
    ///
    /// A change marks the layer [`SelfChanged`](Invalidation::SelfChanged).
    pub fn set_background(&mut self, id: LayerId, color: Color) {
        let layer = self.layers.live_mut(id);
        if layer.background != color {
            layer.background = color;
            layer.invalidation.raise(Invalidation::SelfChanged);
        }
    }

    /// Returns the layer's invalidation level for the current frame.
    #[must_use]
    pub fn invalidation(&self, id: LayerId) -> Invalidation {
        self.layers.live(id).invalidation
    }

    /// Returns the layer currently drawing `id`, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.layers.id_at(self.layers.live(id).parent)
    }

    /// Iterates over the layers `id` draws, in draw order.
    pub fn children(&self, id: LayerId) -> Children<'_> {
        Children::new(self.layers.live(id))
    }

    /// Returns the layer's current command stream.
    #[must_use]
    pub fn draw_bytes(&self, id: LayerId) -> &[u8] {
        self.layers.live(id).draw_bytes()
    }

    /// Iterates over the layer's current draw commands.
    pub fn draws(&self, id: LayerId) -> Draws<'_> {
        Draws::new(self.draw_bytes(id))
    }

    // -- Fonts --

    /// Returns a font matching `desc`, sharing a live one if possible.
    ///
    /// The renderer's [`make_font`](Renderer::make_font) is called only when
    /// a new slot is filled. Every call must be balanced by a
    /// [`free_font`](Self::free_font).
    pub fn make_font(&mut self, desc: &FontDesc<'_>) -> FontId {
        let (font, created) = self.fonts.acquire(desc);
        if created {
            log::debug!(
                "materialising font {font:?}: \"{}\" @ {}",
                desc.family,
                desc.height
            );
            self.renderer.make_font(font, desc);
        }
        font
    }

    /// Drops one reference to `font`, releasing it at zero.
    ///
    /// # Panics
    ///
    /// Panics if `font` is not live, which includes freeing it more often
    /// than it was made.
    pub fn free_font(&mut self, font: FontId) {
        if self.fonts.release(font) {
            log::debug!("releasing font {font:?}");
            self.renderer.release_font(font);
        }
    }

    /// Returns a live font's description and reference count.
    #[must_use]
    pub fn font(&self, font: FontId) -> Option<FontInfo<'_>> {
        self.fonts.get(font)
    }

    /// Number of live fonts.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    // -- Internals --

    /// Clears the parent link of every child `id` currently draws.
    fn detach_children(&mut self, id: LayerId) {
        let count = self.layers.live(id).num_children;
        for i in 0..count {
            let child = self.layers.live(id).children[i].layer;
            if let Some(child) = self.layers.get_mut(child)
                && child.parent == id.idx
            {
                child.parent = INVALID;
            }
        }
    }
}

impl<R: Renderer> Drop for Canvas<R> {
    fn drop(&mut self) {
        log::debug!(
            "dropping canvas with {} layers and {} fonts",
            self.layers.live_count(),
            self.fonts.len()
        );
        self.renderer.free();
    }
}
