// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plans and damage tracking for strata layer trees.
//!
//! This crate provides the intermediate representation between
//! [`strata_core`]'s invalidation pass and backend-specific rasterisation.
//! It defines:
//!
//! - [`build_plan`] — walks a layer tree between
//!   [`begin_rendering`](strata_core::canvas::Canvas::begin_rendering) and
//!   [`end_rendering`](strata_core::canvas::Canvas::end_rendering), skipping
//!   unchanged subtrees and clipped commands
//! - [`RenderItem`] — a single device-space draw operation
//! - [`RenderPlan`] — an ordered list of draw operations for one frame
//! - [`DamageRegion`] — spatial damage tracking for partial presentation

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod plan;
mod walk;

pub use damage::DamageRegion;
pub use plan::{RenderItem, RenderPlan};
pub use walk::{RenderInfo, build_plan};
