// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented layer-tree listings.
//!
//! [`dump_tree`] writes one line per layer and one line per draw command,
//! indenting children under the layer that draws them:
//!
//! ```text
//! layer 0 200x100 level=self bg=#f0f0f0ff
//!   rect (0, 0)-(200, 4) #202020ff
//!   layer 1 100x20 at (40, 30) level=self bg=#00000000
//!     text (2, 2)-(42, 18) font=0 #202020ff "12:00"
//! ```

use std::io::{self, Write};

use strata_core::canvas::Canvas;
use strata_core::color::Color;
use strata_core::draw::DrawCommand;
use strata_core::kurbo::{Point, Rect};
use strata_core::layer::LayerId;
use strata_core::renderer::Renderer;

/// Writes the subtree rooted at `root` to `out`.
///
/// # Panics
///
/// Panics if `root` is stale.
pub fn dump_tree<R: Renderer, W: Write>(
    canvas: &Canvas<R>,
    root: LayerId,
    out: &mut W,
) -> io::Result<()> {
    dump_layer(canvas, root, None, 0, out)
}

fn dump_layer<R: Renderer, W: Write>(
    canvas: &Canvas<R>,
    layer: LayerId,
    origin: Option<Point>,
    depth: usize,
    out: &mut W,
) -> io::Result<()> {
    let size = canvas.size(layer);
    write!(
        out,
        "{:indent$}layer {} {}x{}",
        "",
        layer.index(),
        size.width,
        size.height,
        indent = depth * 2
    )?;
    if let Some(p) = origin {
        write!(out, " at ({}, {})", p.x, p.y)?;
    }
    writeln!(
        out,
        " level={} bg={}",
        canvas.invalidation(layer),
        hex(canvas.background(layer))
    )?;

    let indent = (depth + 1) * 2;
    for command in canvas.draws(layer) {
        match command {
            DrawCommand::Rect { bounds, color } => {
                writeln!(out, "{:indent$}rect {} {}", "", rect(bounds), hex(color))?;
            }
            DrawCommand::Text {
                bounds,
                font,
                color,
                text,
            } => {
                writeln!(
                    out,
                    "{:indent$}text {} font={} {} {text:?}",
                    "",
                    rect(bounds),
                    font.index(),
                    hex(color)
                )?;
            }
            DrawCommand::Layer { bounds, layer } => {
                if canvas.is_alive(layer) {
                    dump_layer(canvas, layer, Some(bounds.origin()), depth + 1, out)?;
                } else {
                    writeln!(out, "{:indent$}layer {layer:?} (dead)", "")?;
                }
            }
        }
    }
    Ok(())
}

fn rect(r: Rect) -> String {
    format!("({}, {})-({}, {})", r.x0, r.y0, r.x1, r.y1)
}

fn hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::font::{FontDesc, FontId};
    use strata_core::kurbo::Size;

    struct FixedAdvance;

    impl Renderer for FixedAdvance {
        fn make_font(&mut self, _font: FontId, _desc: &FontDesc<'_>) {}

        fn measure(&mut self, _font: FontId, text: &str) -> Size {
            Size::new(8.0 * text.len() as f64, 16.0)
        }
    }

    #[test]
    fn dumps_nested_layers() {
        let mut canvas = Canvas::new(FixedAdvance);
        let font = canvas.make_font(&FontDesc::new("Segoe UI", 16));
        let outer = canvas.create_layer();
        let inner = canvas.create_layer();
        canvas.resize(outer, Size::new(200.0, 100.0));
        canvas.resize(inner, Size::new(100.0, 20.0));
        canvas.set_background(outer, Color::rgb(0xf0f0f0));
        let ink = Color::rgb(0x202020);
        canvas.draw_text(inner, Point::new(2.0, 2.0), font, ink, "12:00");
        canvas.fill_rect(outer, Rect::new(0.0, 0.0, 200.0, 4.0), ink);
        canvas.draw_layer(outer, inner, Point::new(40.0, 30.0));
        canvas.begin_rendering();

        let mut out = Vec::new();
        dump_tree(&canvas, outer, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "layer 0 200x100 level=self bg=#f0f0f0ff\n  \
             rect (0, 0)-(200, 4) #202020ff\n  \
             layer 1 100x20 at (40, 30) level=self bg=#00000000\n    \
             text (2, 2)-(42, 18) font=0 #202020ff \"12:00\"\n"
        );
    }
}
