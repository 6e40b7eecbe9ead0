// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained layer tree and command buffers for incremental 2D rendering.
//!
//! `strata_core` keeps, for every layer of a UI, a compact byte buffer of
//! drawing commands, and works out each frame which layers' output actually
//! changed. It is `no_std` compatible (with `alloc`) and never touches
//! pixels: rasterisation and glyph measurement belong to a
//! [`Renderer`](renderer::Renderer).
//!
//! # Architecture
//!
//! The crate is organized around a frame loop:
//!
//! ```text
//!   caller: clear + fill_rect / draw_text / draw_layer   (per changed layer)
//!       │
//!       ▼
//!   Canvas::begin_rendering() ──► FrameChanges
//!       │   detect changed streams, propagate to ancestors,
//!       │   sync bounds of resized children
//!       ▼
//!   renderer walks the tree: invalidation(), draws(), size(), background()
//!       │
//!       ▼
//!   Canvas::end_rendering()    (levels reset, frame_index + 1)
//! ```
//!
//! **[`canvas`]** — Owns layers, fonts and the renderer. Draw calls that
//! reproduce last frame's stream write nothing, so rebuilding an unchanged
//! layer is cheap and leaves it clean.
//!
//! **[`layer`]** — Generational layer handles and the child iterator.
//!
//! **[`draw`]** — The packed record format and its [`Draws`](draw::Draws)
//! decoder.
//!
//! **[`invalidation`]** — The four per-frame levels and how they are raised.
//!
//! **[`font`]** — Reference-counted, deduplicated font handles.
//!
//! **[`renderer`]** — The [`Renderer`](renderer::Renderer) trait backends
//! implement.
//!
//! **[`color`]** — 8-bit RGBA colors and source-over blending.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! Geometry types come from [`kurbo`], re-exported for convenience.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub use kurbo;

pub mod canvas;
pub mod color;
pub mod draw;
pub mod font;
pub mod invalidation;
pub mod layer;
pub mod renderer;
pub mod trace;

#[cfg(test)]
mod testing;
