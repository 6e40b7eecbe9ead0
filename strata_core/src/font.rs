// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-counted, deduplicated font handles.
//!
//! Fonts are owned by the [`Canvas`](crate::canvas::Canvas) and materialised
//! by its [`Renderer`](crate::renderer::Renderer). Requesting a font whose
//! family and height match a live entry returns the same [`FontId`] and bumps
//! its reference count; the renderer is only told about new slots.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// A handle to a font slot in a canvas.
///
/// The slot index is what the renderer uses to key its backend font
/// objects. The generation changes every time a freed slot is filled again,
/// so a handle to a released font never compares equal to its successor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl FontId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontId({}@gen{})", self.idx, self.generation)
    }
}

/// Describes a font to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontDesc<'a> {
    /// Family name, passed through to the renderer.
    pub family: &'a str,
    /// Cell height in device pixels.
    pub height: u32,
}

impl<'a> FontDesc<'a> {
    /// Creates a font descriptor.
    #[must_use]
    pub const fn new(family: &'a str, height: u32) -> Self {
        Self { family, height }
    }
}

/// A read-only view of a live font slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontInfo<'a> {
    /// Family name.
    pub family: &'a str,
    /// Cell height in device pixels.
    pub height: u32,
    /// Number of outstanding [`make_font`](crate::canvas::Canvas::make_font)
    /// calls not yet balanced by [`free_font`](crate::canvas::Canvas::free_font).
    pub refs: u32,
}

#[derive(Debug)]
struct FontEntry {
    family: Box<str>,
    height: u32,
    refs: u32,
}

#[derive(Debug)]
struct FontSlot {
    generation: u32,
    entry: Option<FontEntry>,
}

/// Sparse font slot table. Free slots are reused lowest-index first, with a
/// bumped generation.
#[derive(Debug, Default)]
pub(crate) struct FontTable {
    slots: Vec<FontSlot>,
}

impl FontTable {
    /// Takes a reference to the font matching `desc`, creating it if needed.
    ///
    /// Returns the handle and whether a new slot was filled.
    pub(crate) fn acquire(&mut self, desc: &FontDesc<'_>) -> (FontId, bool) {
        let existing = self.slots.iter_mut().enumerate().find_map(|(idx, slot)| {
            let generation = slot.generation;
            slot.entry
                .as_mut()
                .filter(|e| e.height == desc.height && *e.family == *desc.family)
                .map(|e| (idx, generation, e))
        });
        if let Some((idx, generation, entry)) = existing {
            entry.refs += 1;
            let id = FontId {
                idx: slot_index(idx),
                generation,
            };
            return (id, false);
        }

        let entry = FontEntry {
            family: Box::from(desc.family),
            height: desc.height,
            refs: 1,
        };
        let id = match self.slots.iter().position(|s| s.entry.is_none()) {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = Some(entry);
                FontId {
                    idx: slot_index(idx),
                    generation: slot.generation,
                }
            }
            None => {
                let idx = slot_index(self.slots.len());
                self.slots.push(FontSlot {
                    generation: 0,
                    entry: Some(entry),
                });
                FontId { idx, generation: 0 }
            }
        };
        (id, true)
    }

    /// Drops one reference. Returns `true` if the slot was freed.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not name a live font.
    pub(crate) fn release(&mut self, id: FontId) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            panic!("stale FontId: {id:?}");
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.slots[id.idx as usize].entry = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn get(&self, id: FontId) -> Option<FontInfo<'_>> {
        let slot = self.slots.get(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.as_ref()?;
        Some(FontInfo {
            family: &entry.family,
            height: entry.height,
            refs: entry.refs,
        })
    }

    pub(crate) fn contains(&self, id: FontId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    fn entry_mut(&mut self, id: FontId) -> Option<&mut FontEntry> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation == id.generation {
            slot.entry.as_mut()
        } else {
            None
        }
    }
}

fn slot_index(idx: usize) -> u32 {
    match u32::try_from(idx) {
        Ok(idx) => idx,
        Err(_) => panic!("font table exceeds u32::MAX slots"),
    }
}
