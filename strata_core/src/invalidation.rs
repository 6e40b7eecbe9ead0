// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame invalidation levels.
//!
//! Every layer carries one [`Invalidation`] level per frame. Triggers only
//! ever raise the level (a layer's level is the maximum of everything that
//! happened to it this frame), and [`Canvas::end_rendering`] resets all
//! layers back to [`Invalidation::None`].
//!
//! # Triggers
//!
//! - **Content** — the command buffer differs from what the renderer
//!   consumed last frame. Detected in
//!   [`Canvas::begin_rendering`]; raises the layer to
//!   [`SelfChanged`](Invalidation::SelfChanged).
//! - **Background / size** — [`set_background`](crate::canvas::Canvas::set_background) and
//!   [`resize`](crate::canvas::Canvas::resize) raise the layer to
//!   [`SelfChanged`](Invalidation::SelfChanged) immediately.
//! - **Child size** — [`resize`](crate::canvas::Canvas::resize) raises the parent to
//!   [`Resized`](Invalidation::Resized) so its embedded child bounds are
//!   patched during [`begin_rendering`](crate::canvas::Canvas::begin_rendering).
//! - **Propagation** — any layer at `SelfChanged` or above raises each of its
//!   ancestors to [`ChildChanged`](Invalidation::ChildChanged), stopping at
//!   the first ancestor that is already at least `ChildChanged`.
//!
//! [`Canvas::end_rendering`]: crate::canvas::Canvas::end_rendering
//! [`Canvas::begin_rendering`]: crate::canvas::Canvas::begin_rendering

use core::fmt;

/// How much of a layer has to be redrawn this frame, in increasing severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Invalidation {
    /// Nothing in this layer or its subtree changed.
    #[default]
    None,
    /// The layer itself is unchanged, but some descendant changed.
    ChildChanged,
    /// The layer's own content, background, or size changed.
    SelfChanged,
    /// A child's size changed, so embedded child bounds were recomputed.
    Resized,
}

impl Invalidation {
    /// Raises `self` to at least `level`.
    #[inline]
    pub fn raise(&mut self, level: Self) {
        if level > *self {
            *self = level;
        }
    }

    /// Returns `true` if the layer's own pixels must be repainted.
    #[inline]
    #[must_use]
    pub const fn needs_redraw(self) -> bool {
        matches!(self, Self::SelfChanged | Self::Resized)
    }

    /// Short lowercase name, used by diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ChildChanged => "child",
            Self::SelfChanged => "self",
            Self::Resized => "resized",
        }
    }
}

impl fmt::Display for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
