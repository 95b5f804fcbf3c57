//! # Colors
//!
//! Device colors used by drawing commands, plus the fixed palette that
//! barcode geometry encoders reference by small integer codes.

use serde::{Deserialize, Serialize};

/// A device color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Gray level, 0.0 = black, 1.0 = white.
    Gray(f64),
    /// RGB components in 0.0..=1.0.
    Rgb(f64, f64, f64),
}

impl Color {
    pub const BLACK: Color = Color::Gray(0.0);
    pub const WHITE: Color = Color::Gray(1.0);

    /// Look up a color by name (`black`, `white`, `red`, ...).
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "cyan" => Color::Rgb(0.0, 1.0, 1.0),
            "blue" => Color::Rgb(0.0, 0.0, 1.0),
            "magenta" => Color::Rgb(1.0, 0.0, 1.0),
            "red" => Color::Rgb(1.0, 0.0, 0.0),
            "yellow" => Color::Rgb(1.0, 1.0, 0.0),
            "green" => Color::Rgb(0.0, 1.0, 0.0),
            _ => return None,
        };
        Some(color)
    }

    /// Parse a color from a name or a `#rrggbb` hex string.
    pub fn parse(value: &str) -> Option<Color> {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .ok()
                    .map(|v| v as f64 / 255.0)
            };
            return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }
        Self::named(value)
    }

    /// Perceived luminance in 0.0..=1.0 (used by the preview rasterizer).
    pub fn luminance(&self) -> f64 {
        match *self {
            Color::Gray(g) => g.clamp(0.0, 1.0),
            Color::Rgb(r, g, b) => (0.299 * r + 0.587 * g + 0.114 * b).clamp(0.0, 1.0),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Mapping from encoder color codes (1-8) to colors.
///
/// | Code | Color |
/// |------|-------|
/// | 1 | cyan |
/// | 2 | blue |
/// | 3 | magenta |
/// | 4 | red |
/// | 5 | yellow |
/// | 6 | green |
/// | 7 | black |
/// | 8 | white |
///
/// Any other code resolves to the caller's foreground color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    entries: [Color; 8],
}

impl ColorTable {
    pub const STANDARD: ColorTable = ColorTable {
        entries: [
            Color::Rgb(0.0, 1.0, 1.0),
            Color::Rgb(0.0, 0.0, 1.0),
            Color::Rgb(1.0, 0.0, 1.0),
            Color::Rgb(1.0, 0.0, 0.0),
            Color::Rgb(1.0, 1.0, 0.0),
            Color::Rgb(0.0, 1.0, 0.0),
            Color::BLACK,
            Color::WHITE,
        ],
    };

    /// Look up a code in the table only.
    pub fn get(&self, code: u8) -> Option<Color> {
        match code {
            1..=8 => Some(self.entries[code as usize - 1]),
            _ => None,
        }
    }

    /// Resolve a code, falling back to `foreground` for codes outside the table.
    pub fn resolve(&self, code: u8, foreground: Option<Color>) -> Option<Color> {
        self.get(code).or(foreground)
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
