// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed draw-command stream stored in each layer.
//!
//! A layer's command buffer is a flat concatenation of variable-length
//! records. Every record starts with the same 40-byte prefix and its total
//! size is always a multiple of 8, so a reader can skip any record without
//! understanding it:
//!
//! ```text
//!   offset  size  field
//!   0       4     kind (u32 LE: 0 = rect, 1 = text, 2 = layer)
//!   4       4     record size in bytes (u32 LE, multiple of 8)
//!   8       32    bounds: x0, y0, x1, y1 (f64 LE, layer-local)
//!   40      ..    kind-specific payload, zero-padded to the record size
//! ```
//!
//! Payloads:
//!
//! - **rect** — `color: [u8; 4]`.
//! - **text** — `font: u32`, `font_generation: u32`, `color: [u8; 4]`,
//!   `len: u32`, then `len` UTF-8 bytes.
//! - **layer** — `index: u32`, `generation: u32` of the child layer.
//!
//! All multi-byte values are little-endian. [`Draws`] decodes a buffer into
//! [`DrawCommand`] views without copying.

use kurbo::{Point, Rect};

use crate::color::Color;
use crate::font::FontId;
use crate::layer::LayerId;

const KIND_OFFSET: usize = 0;
const SIZE_OFFSET: usize = 4;
const BOUNDS_OFFSET: usize = 8;
const PAYLOAD_OFFSET: usize = 40;

/// Size of the common record prefix (kind, size, bounds).
pub const HEADER_SIZE: usize = PAYLOAD_OFFSET;

/// Size of a rect record.
pub const RECT_RECORD_SIZE: usize = align_draw_size(PAYLOAD_OFFSET + 4);

/// Size of a layer record.
pub const LAYER_RECORD_SIZE: usize = align_draw_size(PAYLOAD_OFFSET + 8);

const TEXT_FONT_OFFSET: usize = PAYLOAD_OFFSET;
const TEXT_FONT_GENERATION_OFFSET: usize = PAYLOAD_OFFSET + 4;
const TEXT_COLOR_OFFSET: usize = PAYLOAD_OFFSET + 8;
const TEXT_LEN_OFFSET: usize = PAYLOAD_OFFSET + 12;
const TEXT_BYTES_OFFSET: usize = PAYLOAD_OFFSET + 16;

const LAYER_INDEX_OFFSET: usize = PAYLOAD_OFFSET;
const LAYER_GENERATION_OFFSET: usize = PAYLOAD_OFFSET + 4;

/// Rounds a record size up to the 8-byte record alignment.
#[inline]
#[must_use]
pub const fn align_draw_size(size: usize) -> usize {
    (size + 7) & !7
}

/// Returns the size of a text record holding `len` bytes of text.
///
/// # Panics
///
/// Panics if the record would not fit the 32-bit size field.
#[must_use]
pub fn text_record_size(len: usize) -> usize {
    let size = align_draw_size(TEXT_BYTES_OFFSET + len);
    assert!(
        u32::try_from(size).is_ok(),
        "text draw of {len} bytes exceeds the record size limit"
    );
    size
}

/// The type tag of a draw record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// A solid rectangle fill.
    Rect,
    /// A run of text in one font and color.
    Text,
    /// An embedded child layer.
    Layer,
}

impl DrawKind {
    const fn tag(self) -> u32 {
        match self {
            Self::Rect => 0,
            Self::Text => 1,
            Self::Layer => 2,
        }
    }

    const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Rect),
            1 => Some(Self::Text),
            2 => Some(Self::Layer),
            _ => None,
        }
    }

    const fn min_record_size(self) -> usize {
        match self {
            Self::Rect => RECT_RECORD_SIZE,
            Self::Text => TEXT_BYTES_OFFSET,
            Self::Layer => LAYER_RECORD_SIZE,
        }
    }
}

/// A decoded view of one draw record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    /// Fill `bounds` with `color`.
    Rect {
        /// Filled area, layer-local.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// Draw `text` with its top-left corner at `bounds.origin()`.
    Text {
        /// Measured extent of the text, layer-local.
        bounds: Rect,
        /// Font slot the text was measured with.
        font: FontId,
        /// Text color.
        color: Color,
        /// The text itself.
        text: &'a str,
    },
    /// Composite a child layer with its top-left corner at `bounds.origin()`.
    Layer {
        /// Area covered by the child, layer-local. Kept in sync with the
        /// child's size by [`Canvas::begin_rendering`](crate::canvas::Canvas::begin_rendering).
        bounds: Rect,
        /// The child layer.
        layer: LayerId,
    },
}

impl DrawCommand<'_> {
    /// Returns the record type.
    #[must_use]
    pub const fn kind(&self) -> DrawKind {
        match self {
            Self::Rect { .. } => DrawKind::Rect,
            Self::Text { .. } => DrawKind::Text,
            Self::Layer { .. } => DrawKind::Layer,
        }
    }

    /// Returns the bounding rectangle, in the owning layer's coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        match self {
            Self::Rect { bounds, .. } | Self::Text { bounds, .. } | Self::Layer { bounds, .. } => {
                *bounds
            }
        }
    }
}

/// Iterator over the records of a command buffer.
///
/// Each step advances by the record's declared size. Iteration stops at the
/// end of the buffer or at the first record that cannot be decoded.
#[derive(Clone, Debug)]
pub struct Draws<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Draws<'a> {
    /// Creates an iterator over a raw command buffer, such as the one
    /// returned by [`Canvas::draw_bytes`](crate::canvas::Canvas::draw_bytes).
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Byte offset of the next record.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    fn decode(record: &'a [u8], kind: DrawKind) -> Option<DrawCommand<'a>> {
        if record.len() < kind.min_record_size() {
            return None;
        }
        let bounds = read_rect(record, BOUNDS_OFFSET);
        Some(match kind {
            DrawKind::Rect => DrawCommand::Rect {
                bounds,
                color: read_color(record, PAYLOAD_OFFSET),
            },
            DrawKind::Text => {
                let len = read_u32(record, TEXT_LEN_OFFSET) as usize;
                let bytes = record.get(TEXT_BYTES_OFFSET..TEXT_BYTES_OFFSET + len)?;
                DrawCommand::Text {
                    bounds,
                    font: read_font(record),
                    color: read_color(record, TEXT_COLOR_OFFSET),
                    text: core::str::from_utf8(bytes).ok()?,
                }
            }
            DrawKind::Layer => DrawCommand::Layer {
                bounds,
                layer: read_layer(record),
            },
        })
    }
}

impl<'a> Iterator for Draws<'a> {
    type Item = DrawCommand<'a>;

    fn next(&mut self) -> Option<DrawCommand<'a>> {
        let rest = self.data.get(self.pos..)?;
        if rest.len() < HEADER_SIZE {
            return None;
        }
        let kind = DrawKind::from_tag(read_u32(rest, KIND_OFFSET))?;
        let size = read_u32(rest, SIZE_OFFSET) as usize;
        if size < HEADER_SIZE || size % 8 != 0 || size > rest.len() {
            return None;
        }
        let command = Self::decode(&rest[..size], kind)?;
        self.pos += size;
        Some(command)
    }
}

// ---------------------------------------------------------------------------
// Encoding
//
// Every encoder receives exactly the byte range of the record it writes.
// ---------------------------------------------------------------------------

pub(crate) fn encode_rect(record: &mut [u8], bounds: Rect, color: Color) {
    write_header(record, DrawKind::Rect, bounds);
    record[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 4].copy_from_slice(&color.to_bytes());
    record[PAYLOAD_OFFSET + 4..].fill(0);
}

pub(crate) fn encode_text(record: &mut [u8], bounds: Rect, font: FontId, color: Color, text: &str) {
    write_header(record, DrawKind::Text, bounds);
    write_u32(record, TEXT_FONT_OFFSET, font.idx);
    write_u32(record, TEXT_FONT_GENERATION_OFFSET, font.generation);
    record[TEXT_COLOR_OFFSET..TEXT_COLOR_OFFSET + 4].copy_from_slice(&color.to_bytes());
    write_u32(record, TEXT_LEN_OFFSET, checked_u32(text.len()));
    let end = TEXT_BYTES_OFFSET + text.len();
    record[TEXT_BYTES_OFFSET..end].copy_from_slice(text.as_bytes());
    record[end..].fill(0);
}

pub(crate) fn encode_layer(record: &mut [u8], bounds: Rect, layer: LayerId) {
    write_header(record, DrawKind::Layer, bounds);
    write_u32(record, LAYER_INDEX_OFFSET, layer.idx);
    write_u32(record, LAYER_GENERATION_OFFSET, layer.generation);
    record[LAYER_GENERATION_OFFSET + 4..].fill(0);
}

/// Reads the bounds of an encoded record.
pub(crate) fn record_bounds(record: &[u8]) -> Rect {
    read_rect(record, BOUNDS_OFFSET)
}

/// Overwrites the bounds of an existing record in place.
pub(crate) fn patch_bounds(record: &mut [u8], bounds: Rect) {
    write_rect(record, BOUNDS_OFFSET, bounds);
}

// ---------------------------------------------------------------------------
// Matching
//
// Matchers compare the logical content a draw call is about to write with the
// record already occupying that byte range. Derived data (measured text
// extents, child bounds) is deliberately not part of the comparison.
// ---------------------------------------------------------------------------

pub(crate) fn rect_matches(record: &[u8], bounds: Rect, color: Color) -> bool {
    header_matches(record, DrawKind::Rect)
        && read_rect(record, BOUNDS_OFFSET) == bounds
        && read_color(record, PAYLOAD_OFFSET) == color
}

pub(crate) fn text_matches(
    record: &[u8],
    origin: Point,
    font: FontId,
    color: Color,
    text: &str,
) -> bool {
    header_matches(record, DrawKind::Text)
        && read_point(record, BOUNDS_OFFSET) == origin
        && read_font(record) == font
        && read_color(record, TEXT_COLOR_OFFSET) == color
        && read_u32(record, TEXT_LEN_OFFSET) as usize == text.len()
        && record[TEXT_BYTES_OFFSET..TEXT_BYTES_OFFSET + text.len()] == *text.as_bytes()
}

pub(crate) fn layer_matches(record: &[u8], origin: Point, layer: LayerId) -> bool {
    header_matches(record, DrawKind::Layer)
        && read_point(record, BOUNDS_OFFSET) == origin
        && read_layer(record) == layer
}

fn header_matches(record: &[u8], kind: DrawKind) -> bool {
    read_u32(record, KIND_OFFSET) == kind.tag()
        && read_u32(record, SIZE_OFFSET) as usize == record.len()
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn write_header(record: &mut [u8], kind: DrawKind, bounds: Rect) {
    write_u32(record, KIND_OFFSET, kind.tag());
    write_u32(record, SIZE_OFFSET, checked_u32(record.len()));
    write_rect(record, BOUNDS_OFFSET, bounds);
}

fn checked_u32(v: usize) -> u32 {
    match u32::try_from(v) {
        Ok(v) => v,
        Err(_) => panic!("draw record field {v} does not fit in 32 bits"),
    }
}

fn write_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn write_f64(buf: &mut [u8], at: usize, v: f64) {
    buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

fn write_rect(buf: &mut [u8], at: usize, r: Rect) {
    write_f64(buf, at, r.x0);
    write_f64(buf, at + 8, r.y0);
    write_f64(buf, at + 16, r.x1);
    write_f64(buf, at + 24, r.y1);
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut bytes = [0; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(bytes)
}

fn read_f64(buf: &[u8], at: usize) -> f64 {
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    f64::from_le_bytes(bytes)
}

fn read_point(buf: &[u8], at: usize) -> Point {
    Point::new(read_f64(buf, at), read_f64(buf, at + 8))
}

fn read_rect(buf: &[u8], at: usize) -> Rect {
    Rect::new(
        read_f64(buf, at),
        read_f64(buf, at + 8),
        read_f64(buf, at + 16),
        read_f64(buf, at + 24),
    )
}

fn read_color(buf: &[u8], at: usize) -> Color {
    let mut bytes = [0; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    Color::from_bytes(bytes)
}

fn read_font(record: &[u8]) -> FontId {
    FontId {
        idx: read_u32(record, TEXT_FONT_OFFSET),
        generation: read_u32(record, TEXT_FONT_GENERATION_OFFSET),
    }
}

fn read_layer(record: &[u8]) -> LayerId {
    LayerId {
        idx: read_u32(record, LAYER_INDEX_OFFSET),
        generation: read_u32(record, LAYER_GENERATION_OFFSET),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Size;

    use super::*;

    fn layer_id(idx: u32) -> LayerId {
        LayerId { idx, generation: 0 }
    }

    fn font_id(idx: u32) -> FontId {
        FontId { idx, generation: 0 }
    }

    #[test]
    fn record_sizes_are_aligned() {
        assert_eq!(RECT_RECORD_SIZE, 48);
        assert_eq!(LAYER_RECORD_SIZE, 48);
        assert_eq!(text_record_size(0), 56);
        assert_eq!(text_record_size(1), 64);
        assert_eq!(text_record_size(8), 64);
        assert_eq!(text_record_size(9), 72);
        for len in 0..40 {
            assert_eq!(text_record_size(len) % 8, 0);
        }
    }

    #[test]
    fn decodes_a_mixed_stream() {
        let text = "Time: 12";
        let text_size = text_record_size(text.len());
        let mut buf = vec![0xaa_u8; RECT_RECORD_SIZE + text_size + LAYER_RECORD_SIZE];

        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let (a, rest) = buf.split_at_mut(RECT_RECORD_SIZE);
        let (b, c) = rest.split_at_mut(text_size);
        encode_rect(a, rect, Color::WHITE);
        let text_bounds = Rect::from_origin_size((5.0, 6.0), Size::new(40.0, 10.0));
        encode_text(b, text_bounds, font_id(3), Color::BLACK, text);
        let child_bounds = Rect::new(10.0, 10.0, 60.0, 30.0);
        encode_layer(c, child_bounds, layer_id(7));

        let mut draws = Draws::new(&buf);
        assert_eq!(
            draws.next(),
            Some(DrawCommand::Rect {
                bounds: rect,
                color: Color::WHITE
            })
        );
        assert_eq!(draws.offset(), RECT_RECORD_SIZE);
        assert_eq!(
            draws.next(),
            Some(DrawCommand::Text {
                bounds: text_bounds,
                font: font_id(3),
                color: Color::BLACK,
                text,
            })
        );
        assert_eq!(
            draws.next(),
            Some(DrawCommand::Layer {
                bounds: child_bounds,
                layer: layer_id(7),
            })
        );
        assert_eq!(draws.next(), None);
    }

    #[test]
    fn padding_is_zeroed() {
        let mut buf = vec![0xff_u8; text_record_size(1)];
        encode_text(&mut buf, Rect::ZERO, font_id(0), Color::BLACK, "x");
        assert!(buf[TEXT_BYTES_OFFSET + 1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn truncated_stream_stops_iteration() {
        let mut buf = vec![0_u8; RECT_RECORD_SIZE];
        encode_rect(&mut buf, Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        let truncated: Vec<u8> = buf[..RECT_RECORD_SIZE - 8].to_vec();
        assert_eq!(Draws::new(&truncated).count(), 0);
    }

    #[test]
    fn unknown_kind_stops_iteration() {
        let mut buf = vec![0_u8; RECT_RECORD_SIZE];
        encode_rect(&mut buf, Rect::ZERO, Color::WHITE);
        buf[0] = 9;
        assert_eq!(Draws::new(&buf).next(), None);
    }

    #[test]
    fn matchers_compare_logical_content() {
        let mut buf = vec![0_u8; RECT_RECORD_SIZE];
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        encode_rect(&mut buf, rect, Color::WHITE);
        assert!(rect_matches(&buf, rect, Color::WHITE));
        assert!(!rect_matches(&buf, rect, Color::BLACK));
        assert!(!rect_matches(&buf, Rect::new(0.0, 0.0, 8.0, 9.0), Color::WHITE));
        assert!(!layer_matches(&buf, Point::ZERO, layer_id(0)));
    }

    #[test]
    fn text_match_ignores_measured_extent() {
        let mut buf = vec![0_u8; text_record_size(2)];
        let bounds = Rect::new(4.0, 4.0, 30.0, 16.0);
        encode_text(&mut buf, bounds, font_id(1), Color::BLACK, "hi");
        assert!(text_matches(
            &buf,
            Point::new(4.0, 4.0),
            font_id(1),
            Color::BLACK,
            "hi"
        ));
        assert!(!text_matches(
            &buf,
            Point::new(4.0, 4.0),
            font_id(2),
            Color::BLACK,
            "hi"
        ));
        assert!(!text_matches(
            &buf,
            Point::new(4.0, 4.0),
            font_id(1),
            Color::BLACK,
            "ho"
        ));
    }

    #[test]
    fn text_match_checks_font_generation() {
        let mut buf = vec![0_u8; text_record_size(2)];
        encode_text(&mut buf, Rect::ZERO, font_id(0), Color::BLACK, "hi");
        let reused = FontId {
            idx: 0,
            generation: 1,
        };
        assert!(!text_matches(&buf, Point::ZERO, reused, Color::BLACK, "hi"));
        assert!(matches!(
            Draws::new(&buf).next(),
            Some(DrawCommand::Text { font, .. }) if font == font_id(0)
        ));
    }

    #[test]
    fn layer_match_checks_generation() {
        let mut buf = vec![0_u8; LAYER_RECORD_SIZE];
        encode_layer(&mut buf, Rect::new(1.0, 1.0, 2.0, 2.0), layer_id(4));
        assert!(layer_matches(&buf, Point::new(1.0, 1.0), layer_id(4)));
        let reused = LayerId {
            idx: 4,
            generation: 1,
        };
        assert!(!layer_matches(&buf, Point::new(1.0, 1.0), reused));
    }

    #[test]
    fn patch_bounds_keeps_payload() {
        let mut buf = vec![0_u8; LAYER_RECORD_SIZE];
        encode_layer(&mut buf, Rect::new(10.0, 10.0, 60.0, 30.0), layer_id(2));
        patch_bounds(&mut buf, Rect::new(10.0, 10.0, 70.0, 30.0));
        assert_eq!(
            Draws::new(&buf).next(),
            Some(DrawCommand::Layer {
                bounds: Rect::new(10.0, 10.0, 70.0, 30.0),
                layer: layer_id(2),
            })
        );
    }
}
