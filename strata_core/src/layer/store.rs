// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer state and the generational slot table that owns it.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::color::Color;
use crate::invalidation::Invalidation;

use super::id::{INVALID, LayerId};

/// One entry of a layer's child list.
///
/// Entries past `Layer::num_children` are left over from the previous frame
/// and are what the reuse fast path checks against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Child {
    pub(crate) layer: LayerId,
    pub(crate) offset: Point,
    /// Byte position of the layer record that embeds this child.
    pub(crate) draw_pos: usize,
}

/// State of a single live layer.
#[derive(Debug)]
pub(crate) struct Layer {
    pub(crate) size: Size,
    pub(crate) background: Color,

    // -- Command buffer --
    /// Backing bytes. Only `..draws_pos` is this frame's stream; bytes past it
    /// are retained from earlier frames and never shrink.
    pub(crate) draws: Vec<u8>,
    pub(crate) draws_pos: usize,
    /// Length of the stream the renderer consumed last frame. `None` before
    /// the first frame and as soon as this frame's stream diverges from it.
    pub(crate) render_pos: Option<usize>,

    // -- Topology --
    pub(crate) children: Vec<Child>,
    pub(crate) num_children: usize,
    pub(crate) parent: u32,

    pub(crate) invalidation: Invalidation,
}

impl Layer {
    pub(crate) fn new(draw_capacity: usize, child_capacity: usize) -> Self {
        Self {
            size: Size::ZERO,
            background: Color::TRANSPARENT,
            draws: Vec::with_capacity(draw_capacity),
            draws_pos: 0,
            render_pos: None,
            children: Vec::with_capacity(child_capacity),
            num_children: 0,
            parent: INVALID,
            invalidation: Invalidation::None,
        }
    }

    /// Claims the next `size` bytes of the stream and returns their start.
    pub(crate) fn advance(&mut self, size: usize) -> usize {
        let pos = self.draws_pos;
        self.draws_pos = pos + size;
        pos
    }

    /// Returns the retained record at `pos..pos + size` if the reuse fast path
    /// may compare against it.
    ///
    /// That is the case while the range lies within last frame's stream and
    /// nothing earlier in this frame has diverged.
    pub(crate) fn reusable(&self, pos: usize, size: usize) -> Option<&[u8]> {
        let end = self.render_pos?;
        if pos + size <= end {
            Some(&self.draws[pos..pos + size])
        } else {
            None
        }
    }

    /// Marks the stream as diverged and returns `pos..pos + size` for writing,
    /// growing the buffer if needed.
    pub(crate) fn record_mut(&mut self, pos: usize, size: usize) -> &mut [u8] {
        self.render_pos = None;
        let end = pos + size;
        if self.draws.len() < end {
            let grown = end.max(self.draws.len() * 2).max(self.draws.capacity());
            self.draws.resize(grown, 0);
        }
        &mut self.draws[pos..end]
    }

    /// This frame's command stream.
    pub(crate) fn draw_bytes(&self) -> &[u8] {
        &self.draws[..self.draws_pos]
    }

    /// This frame's child list.
    pub(crate) fn live_children(&self) -> &[Child] {
        &self.children[..self.num_children]
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    layer: Option<Layer>,
}

/// Index-stable layer storage.
///
/// Destroyed layers leave a free slot that the next insertion reuses, with a
/// bumped generation so stale handles are detected.
#[derive(Debug, Default)]
pub(crate) struct LayerSlots {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
}

impl LayerSlots {
    pub(crate) fn insert(&mut self, layer: Layer) -> LayerId {
        if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.layer = Some(layer);
            LayerId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = match u32::try_from(self.slots.len()) {
                Ok(idx) if idx != INVALID => idx,
                _ => panic!("layer table exceeds {INVALID} slots"),
            };
            self.slots.push(Slot {
                generation: 0,
                layer: Some(layer),
            });
            LayerId { idx, generation: 0 }
        }
    }

    /// Frees the slot of a live layer and returns its state.
    pub(crate) fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let layer = slot.layer.take()?;
        self.free_list.push(id.idx);
        Some(layer)
    }

    pub(crate) fn get(&self, id: LayerId) -> Option<&Layer> {
        let slot = self.slots.get(id.idx as usize)?;
        if slot.generation == id.generation {
            slot.layer.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation == id.generation {
            slot.layer.as_mut()
        } else {
            None
        }
    }

    /// Like [`get`](Self::get), but panics on a stale handle.
    #[track_caller]
    pub(crate) fn live(&self, id: LayerId) -> &Layer {
        match self.get(id) {
            Some(layer) => layer,
            None => panic!("stale LayerId: {id:?}"),
        }
    }

    /// Like [`get_mut`](Self::get_mut), but panics on a stale handle.
    #[track_caller]
    pub(crate) fn live_mut(&mut self, id: LayerId) -> &mut Layer {
        match self.get_mut(id) {
            Some(layer) => layer,
            None => panic!("stale LayerId: {id:?}"),
        }
    }

    /// Returns the live layer at raw slot `idx`, skipping generation checks.
    pub(crate) fn at(&self, idx: u32) -> Option<&Layer> {
        self.slots.get(idx as usize)?.layer.as_ref()
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub(crate) fn at_mut(&mut self, idx: u32) -> Option<&mut Layer> {
        self.slots.get_mut(idx as usize)?.layer.as_mut()
    }

    /// Returns the handle of the live layer at raw slot `idx`.
    pub(crate) fn id_at(&self, idx: u32) -> Option<LayerId> {
        let slot = self.slots.get(idx as usize)?;
        slot.layer.as_ref().map(|_| LayerId {
            idx,
            generation: slot.generation,
        })
    }

    /// Number of slots, live or free. Raw indices are below this.
    pub(crate) fn slot_count(&self) -> u32 {
        // `insert` keeps the slot count below `INVALID`.
        u32::try_from(self.slots.len()).unwrap_or(INVALID)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Iterates over live layers in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        (0..self.slot_count()).filter_map(move |idx| {
            let slot = &self.slots[idx as usize];
            slot.layer.as_ref().map(|layer| {
                (
                    LayerId {
                        idx,
                        generation: slot.generation,
                    },
                    layer,
                )
            })
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.layer.as_mut())
    }
}
