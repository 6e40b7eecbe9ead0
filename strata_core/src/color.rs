// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 8-bit straight-alpha colors.

/// An RGBA color with 8 bits per channel and straight (non-premultiplied)
/// alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (`0` is fully transparent).
    pub a: u8,
}

impl Color {
    /// Fully transparent black. This is the default layer background.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 0xff);
    /// Opaque white.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff, 0xff);

    /// Creates a color from its four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from a `0xRRGGBB` value.
    #[must_use]
    pub const fn rgb(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::new(r, g, b, 0xff)
    }

    /// Creates a color from a `0xRRGGBBAA` value.
    #[must_use]
    pub const fn rgba(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes();
        Self::new(r, g, b, a)
    }

    /// Returns the channels as `[r, g, b, a]`.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates a color from `[r, g, b, a]`.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Returns `true` if the color has any coverage.
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.a != 0
    }

    /// Composites `src` over `dst` (Porter-Duff source-over).
    #[must_use]
    pub fn blend_over(src: Self, dst: Self) -> Self {
        match (src.a, dst.a) {
            (0xff, _) | (_, 0) => return src,
            (0, _) => return dst,
            _ => {}
        }

        // Work in alpha * 255 units to stay in integers.
        let sa = u32::from(src.a);
        let da = u32::from(dst.a) * (255 - sa) / 255;
        let out_a = sa + da;
        let channel = |s: u8, d: u8| -> u8 {
            let v = (u32::from(s) * sa + u32::from(d) * da + out_a / 2) / out_a;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        let a = u8::try_from(out_a).unwrap_or(u8::MAX);

        Self::new(
            channel(src.r, dst.r),
            channel(src.g, dst.g),
            channel(src.b, dst.b),
            a,
        )
    }
}
