//! Linear barcode encoding via the `barcoders` crate.
//!
//! `barcoders` yields a flat module sequence (1 = bar). Runs of bars are
//! merged into one rectangle each and an optional human-readable line is
//! placed under the bars.
//!
//! ## Parameters
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `module_width` | number | 1.0 |
//! | `bar_height` | number | 50.0 |
//! | `quiet_zone` | modules | 10 |
//! | `show_text` | bool | true |
//! | `font_size` | number | 10.0 |
//! | `bar_color` | color code | 0 (foreground) |
//! | `fg_color` / `bg_color` | name or `#rrggbb` | black / white |

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code11::Code11;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::tf::TF;

use super::{BarcodeEncoder, EncodedBarcode, EncoderParams, HAlign, Rect, TextString, VectorGeometry};
use crate::color::Color;
use crate::error::{QrBillError, Result};

/// Linear symbologies supported by [`Barcoders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Code39,
    Code93,
    Code128,
    Code11,
    Codabar,
    Ean13,
    Ean8,
    Itf,
}

impl Symbology {
    /// Parse a symbology name (case-insensitive, `-`/`_` ignored).
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "code39" => Some(Self::Code39),
            "code93" => Some(Self::Code93),
            "code128" => Some(Self::Code128),
            "code11" => Some(Self::Code11),
            "codabar" => Some(Self::Codabar),
            "ean13" => Some(Self::Ean13),
            "ean8" => Some(Self::Ean8),
            "itf" | "interleaved2of5" => Some(Self::Itf),
            _ => None,
        }
    }

    /// Encode `data` into modules (1 = bar, 0 = space).
    fn modules(self, data: &str) -> Result<Vec<u8>> {
        let encoded = match self {
            Self::Code39 => Code39::new(data).map(|b| b.encode()),
            Self::Code93 => Code93::new(data).map(|b| b.encode()),
            // Character set B covers the printable ASCII range
            Self::Code128 => Code128::new(format!("\u{0181}{}", data)).map(|b| b.encode()),
            Self::Code11 => Code11::new(data).map(|b| b.encode()),
            Self::Codabar => Codabar::new(data).map(|b| b.encode()),
            Self::Ean13 => EAN13::new(data).map(|b| b.encode()),
            Self::Ean8 => EAN8::new(data).map(|b| b.encode()),
            Self::Itf => TF::interleaved(data).map(|b| b.encode()),
        };
        encoded.map_err(|e| QrBillError::Encode(format!("{:?} encoding failed: {:?}", self, e)))
    }
}

/// [`BarcodeEncoder`] backed by the `barcoders` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Barcoders;

fn number(params: &EncoderParams, key: &str, default: f64) -> f64 {
    params.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
}

fn color(params: &EncoderParams, key: &str, default: Color) -> Result<Color> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => value.as_str().and_then(Color::parse).ok_or_else(|| {
            QrBillError::Encode(format!("parameter {} is not a valid color: {}", key, value))
        }),
    }
}

impl BarcodeEncoder for Barcoders {
    fn encode(
        &self,
        symbology: &str,
        data: &str,
        params: &EncoderParams,
    ) -> Result<EncodedBarcode> {
        let symbology = Symbology::parse(symbology)
            .ok_or_else(|| QrBillError::Encode(format!("unknown symbology: {}", symbology)))?;
        let modules = symbology.modules(data)?;

        let module_width = number(params, "module_width", 1.0);
        let bar_height = number(params, "bar_height", 50.0);
        let quiet = number(params, "quiet_zone", 10.0) * module_width;
        let font_size = number(params, "font_size", 10.0);
        let show_text = params
            .get("show_text")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let bar_color = params
            .get("bar_color")
            .and_then(|v| v.as_u64())
            .map_or(0, |c| c.min(u8::MAX as u64) as u8);

        // Merge runs of bars into single rectangles
        let mut rects = Vec::new();
        let mut run_start: Option<usize> = None;
        for (i, &module) in modules.iter().chain(std::iter::once(&0)).enumerate() {
            match (module == 1, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    rects.push(Rect {
                        x: quiet + start as f64 * module_width,
                        y: 0.0,
                        width: (i - start) as f64 * module_width,
                        height: bar_height,
                        color: bar_color,
                    });
                    run_start = None;
                }
                _ => {}
            }
        }

        let width = 2.0 * quiet + modules.len() as f64 * module_width;
        let mut height = bar_height;
        let mut strings = Vec::new();
        if show_text {
            strings.push(TextString {
                x: width / 2.0,
                y: bar_height + font_size,
                text: data.to_string(),
                font_size,
                halign: HAlign::Center,
                color: 0,
            });
            height += font_size * 1.25;
        }

        Ok(EncodedBarcode {
            geometry: VectorGeometry {
                width,
                height,
                rects,
                circles: Vec::new(),
                strings,
            },
            foreground: Some(color(params, "fg_color", Color::BLACK)?),
            background: color(params, "bg_color", Color::WHITE)?,
        })
    }
}
