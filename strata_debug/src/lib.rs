// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and tree dumps for strata diagnostics.
//!
//! This crate provides development helpers on top of `strata_core`:
//!
//! - [`pretty::PrettyPrintSink`] — a [`TraceSink`](strata_core::trace::TraceSink)
//!   writing human-readable one-line-per-event output.
//! - [`dump::dump_tree`] — an indented listing of a layer subtree and its
//!   draw commands.

pub mod dump;
pub mod pretty;
