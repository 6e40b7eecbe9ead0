// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use kurbo::{Point, Rect};

use crate::draw;

use super::id::LayerId;
use super::store::{Child, Layer};

/// One child of a layer, as embedded in its parent's command buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildEntry {
    /// The child layer.
    pub layer: LayerId,
    /// Where the child's top-left corner sits in the parent.
    pub offset: Point,
    /// Area the child covers in the parent, as last written to the parent's
    /// layer record.
    pub bounds: Rect,
}

/// An iterator over the direct children of a layer, in draw order.
///
/// Created by [`Canvas::children`](crate::canvas::Canvas::children).
#[derive(Clone, Debug)]
pub struct Children<'a> {
    layer: &'a Layer,
    children: core::slice::Iter<'a, Child>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(layer: &'a Layer) -> Self {
        Self {
            layer,
            children: layer.live_children().iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ChildEntry;

    fn next(&mut self) -> Option<ChildEntry> {
        let child = self.children.next()?;
        let record = &self.layer.draws[child.draw_pos..child.draw_pos + draw::LAYER_RECORD_SIZE];
        Some(ChildEntry {
            layer: child.layer,
            offset: child.offset,
            bounds: draw::record_bounds(record),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}
