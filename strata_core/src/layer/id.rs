// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity.

use core::fmt;

/// Sentinel value meaning "no layer" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a layer in a [`Canvas`](crate::canvas::Canvas).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a layer is destroyed and its slot is reused. The
/// slot index alone is the stable identity renderers use to key per-layer
/// caches (see [`index`](Self::index)).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    /// Slot index into the canvas's layer table.
    pub(crate) idx: u32,
    /// Generation counter; must match the slot's generation.
    pub(crate) generation: u32,
}

impl LayerId {
    /// Returns the slot index.
    ///
    /// Stable for the lifetime of the layer; reused after it is destroyed.
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

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({}@gen{})", self.idx, self.generation)
    }
}
