// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use strata_core::color::Color;
use strata_core::font::FontId;

use crate::damage::DamageRegion;

/// A single draw operation in the render plan, in device space.
///
/// Items are produced in back-to-front order, matching the order layers and
/// commands were drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderItem {
    /// Fill `rect` with `color`, already clipped to the layer's visible area.
    Fill {
        /// Device-space rectangle.
        rect: Rect,
        /// Fill color. Layer background fills carry the composited
        /// background of all ancestors.
        color: Color,
    },
    /// Draw `text` with its top-left corner at `origin`.
    Text {
        /// Device-space origin.
        origin: Point,
        /// Font slot, as materialised through
        /// [`Renderer::make_font`](strata_core::renderer::Renderer::make_font).
        font: FontId,
        /// Text color.
        color: Color,
        /// The text.
        text: String,
    },
}

/// An ordered list of draw operations for a single frame.
///
/// Backends translate this into native device-context calls or GPU draws.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
    /// Device-space area touched by `items`.
    pub damage: DamageRegion,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            damage: DamageRegion::None,
        }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.damage = DamageRegion::None;
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for RenderPlan {
    fn default() -> Self {
        Self::new()
    }
}
