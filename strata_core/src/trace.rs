// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Canvas::begin_rendering_traced`](crate::canvas::Canvas::begin_rendering_traced)
//! and [`Canvas::end_rendering_traced`](crate::canvas::Canvas::end_rendering_traced)
//! call as they work. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use kurbo::Rect;

use crate::invalidation::Invalidation;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when `begin_rendering` starts scanning layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Number of live layers being scanned.
    pub live_layers: usize,
}

/// Emitted once per layer whose level for the frame is above
/// [`Invalidation::None`], after propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerInvalidatedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the layer.
    pub layer_index: u32,
    /// Final level for the frame.
    pub level: Invalidation,
}

/// Emitted when a resized parent's embedded child bounds are rewritten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildBoundsEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the parent layer.
    pub parent_index: u32,
    /// Slot index of the child layer.
    pub child_index: u32,
    /// New bounds of the child in the parent.
    pub bounds: Rect,
}

/// Emitted when `end_rendering` resets per-frame state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEndEvent {
    /// Frame counter of the frame that just ended.
    pub frame_index: u64,
    /// Number of layers that were above [`Invalidation::None`].
    pub invalidated_layers: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame lifecycle.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when `begin_rendering` starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called for every invalidated layer.
    fn on_layer_invalidated(&mut self, e: &LayerInvalidatedEvent) {
        _ = e;
    }

    /// Called for every child record patched to a new size.
    fn on_child_bounds(&mut self, e: &ChildBoundsEvent) {
        _ = e;
    }

    /// Called when `end_rendering` resets the frame.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerInvalidatedEvent`].
    #[inline]
    pub fn layer_invalidated(&mut self, e: &LayerInvalidatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_invalidated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ChildBoundsEvent`].
    #[inline]
    pub fn child_bounds(&mut self, e: &ChildBoundsEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_child_bounds(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
