// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    ChildBoundsEvent, FrameBeginEvent, FrameEndEvent, LayerInvalidatedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] frame={} layers={}",
            e.frame_index, e.live_layers,
        );
    }

    fn on_layer_invalidated(&mut self, e: &LayerInvalidatedEvent) {
        let _ = writeln!(
            self.writer,
            "[layer] frame={} layer={} level={}",
            e.frame_index, e.layer_index, e.level,
        );
    }

    fn on_child_bounds(&mut self, e: &ChildBoundsEvent) {
        let b = e.bounds;
        let _ = writeln!(
            self.writer,
            "[bounds] frame={} parent={} child={} ({}, {})-({}, {})",
            e.frame_index, e.parent_index, e.child_index, b.x0, b.y0, b.x1, b.y1,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let _ = writeln!(
            self.writer,
            "[end] frame={} invalidated={}",
            e.frame_index, e.invalidated_layers,
        );
    }
}
