//! Colors for backdrop painting
//!
//! Paint colors are straight-alpha floats in `0.0..=1.0`. Config files may
//! specify them with any CSS color syntax:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `hsl()`, `hwb()`, `oklch()` and friends
//! - Named: `red`, `cyan`, `transparent`, etc.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// A straight-alpha RGBA color with float channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from hue (degrees), saturation and lightness
    /// (both `0.0..=1.0`).
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::new(l, l, l, 1.0);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };

        Self::new(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0), 1.0)
    }

    pub fn from_rgba8(px: Rgba<u8>) -> Self {
        Self::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> Rgba<u8> {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([q(self.r), q(self.g), q(self.b), q(self.a)])
    }

    /// Same hue with a replaced alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }
}

/// The three glow colors used by the backdrop modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeonPalette {
    /// Rain streaks
    pub cyan: Color,
    /// Embers
    pub orange: Color,
    /// Cyclone dots
    pub pink: Color,
}

impl Default for NeonPalette {
    fn default() -> Self {
        Self {
            cyan: Color::from_hsl(186.0, 1.0, 0.55),
            orange: Color::from_hsl(24.0, 1.0, 0.55),
            pink: Color::from_hsl(320.0, 1.0, 0.62),
        }
    }
}

/// Parse a CSS color string into a [`Color`].
///
/// ```
/// use aura_haven::color::{parse_color, Color};
///
/// let red = parse_color("#F00").unwrap();
/// assert_eq!(red.to_rgba8(), image::Rgba([255, 0, 0, 255]));
///
/// let cyan = parse_color("hsl(180, 100%, 50%)").unwrap();
/// assert_eq!(cyan.to_rgba8(), image::Rgba([0, 255, 255, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    let rgba = if let Some(hex) = s.strip_prefix('#') { parse_hex(hex)? } else { parse_css(s)? };
    Ok(Color::from_rgba8(rgba))
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

fn parse_css(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb {
        CssColor::RGBA(c) => Ok(Rgba([c.red, c.green, c.blue, c.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(c) => Ok(Color::new(c.r, c.g, c.b, c.alpha).to_rgba8()),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
