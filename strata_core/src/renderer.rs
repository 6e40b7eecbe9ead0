// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for pixel renderers.
//!
//! The core never touches pixels. A *renderer* is the platform piece that
//! owns device fonts and, outside this crate, walks command buffers to
//! produce pixels. The [`Canvas`](crate::canvas::Canvas) holds exactly one
//! renderer and forwards to it:
//!
//! - [`make_font`](Renderer::make_font) when a font slot is filled,
//! - [`measure`](Renderer::measure) when a changed text draw needs its
//!   extent (never for a text draw reused from the previous frame),
//! - [`release_font`](Renderer::release_font) when a slot's reference count
//!   drops to zero,
//! - [`free`](Renderer::free) once, when the canvas is dropped.
//!
//! All calls are synchronous and infallible at this layer. Backend failures
//! are the renderer's concern to surface or swallow.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_paint(canvas: &mut Canvas<GdiRenderer>, dc: &mut Dc, dirty: Rect) {
//!     // Rebuild every layer that wants to change.
//!     canvas.clear(clock);
//!     canvas.draw_text(clock, Point::ZERO, font, Color::BLACK, &now());
//!
//!     // Detect what changed and propagate to ancestors.
//!     canvas.begin_rendering();
//!
//!     // Walk the tree, skipping unchanged subtrees and clipped commands.
//!     paint(canvas, dc, root, dirty);
//!
//!     canvas.end_rendering();
//! }
//! ```

use kurbo::Size;

use crate::font::{FontDesc, FontId};

/// Font and measurement services consumed by a [`Canvas`](crate::canvas::Canvas).
pub trait Renderer {
    /// Materialises a backend font in slot `font`.
    ///
    /// A slot index can be handed out again after it was released, so
    /// implementations should replace whatever they hold for that slot.
    fn make_font(&mut self, font: FontId, desc: &FontDesc<'_>);

    /// Measures `text` set in `font`.
    fn measure(&mut self, font: FontId, text: &str) -> Size;

    /// Called when slot `font` is no longer referenced.
    fn release_font(&mut self, font: FontId) {
        _ = font;
    }

    /// Releases every backend resource. Called once, on canvas teardown.
    fn free(&mut self) {}
}
