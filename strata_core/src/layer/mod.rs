// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in the canvas's tree. Each layer has:
//!
//! - An identity ([`LayerId`]): a generational handle that becomes stale when
//!   the layer is destroyed, so misuse is caught at the API level.
//! - A size and a background color.
//! - A command buffer of packed draw records (see [`draw`](crate::draw)),
//!   rebuilt by the caller each time the layer's content changes.
//! - Topology: at most one parent, and an ordered list of children. A child
//!   is attached by *drawing* it into its parent, so child order is draw
//!   order.
//! - An [`Invalidation`](crate::invalidation::Invalidation) level for the
//!   current frame.
//!
//! Layers live in a slot table with a free list. Slot indices are stable for
//! the lifetime of a layer and are reused after it is destroyed.

mod id;
mod store;
mod traverse;

pub use id::{INVALID, LayerId};
pub use traverse::{ChildEntry, Children};

pub(crate) use store::{Child, Layer, LayerSlots};
