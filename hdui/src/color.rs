//! Colour values parsed from the hex strings used by layouts.

/// RGBA colour with float channels in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `#RRGGBB`.
    ///
    /// Anything shorter than six hex digits yields opaque black, and a pair
    /// that is not valid hex reads as zero. Characters past the sixth are
    /// ignored, so `RRGGBBAA` keeps full alpha.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() < 6 {
            return Self::BLACK;
        }

        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(0) as f32
                / 255.0
        };

        Self::rgba(channel(0..2), channel(2..4), channel(4..6), 1.0)
    }

    /// Parse a hex colour and replace its alpha.
    pub fn from_hex_with_alpha(hex: &str, alpha: f32) -> Self {
        Self::from_hex(hex).with_alpha(alpha)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiply the alpha channel by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    /// Convert to 8-bit RGBA, clamping out-of-range channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Linear interpolation between two colours, `t` in 0..1.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}
