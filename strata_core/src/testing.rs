// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::Size;

use crate::font::{FontDesc, FontId};
use crate::renderer::Renderer;

/// A renderer with fixed-advance measurement that records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) fonts_made: Vec<FontId>,
    pub(crate) fonts_released: Vec<FontId>,
    pub(crate) measures: usize,
    /// Shared so it can be read after the owning canvas is dropped.
    pub(crate) frees: Rc<Cell<usize>>,
}

impl RecordingRenderer {
    /// Horizontal advance of every character.
    pub(crate) const ADVANCE: f64 = 8.0;
    /// Height of every measured run.
    pub(crate) const LINE_HEIGHT: f64 = 16.0;
}

impl Renderer for RecordingRenderer {
    fn make_font(&mut self, font: FontId, _desc: &FontDesc<'_>) {
        self.fonts_made.push(font);
    }

    fn measure(&mut self, _font: FontId, text: &str) -> Size {
        self.measures += 1;
        let chars = text.chars().count() as f64;
        Size::new(chars * Self::ADVANCE, Self::LINE_HEIGHT)
    }

    fn release_font(&mut self, font: FontId) {
        self.fonts_released.push(font);
    }

    fn free(&mut self) {
        self.frees.set(self.frees.get() + 1);
    }
}
