//! # Encoder Seams
//!
//! Symbol *encoding* (Reed-Solomon, version selection, bar patterns) is not
//! done here. Encoders are collaborators behind two traits:
//!
//! - [`QrEncoder`]: data bytes → [`ModuleGrid`]
//! - [`BarcodeEncoder`]: data + opaque parameters → [`VectorGeometry`]
//!
//! Default adapters are provided over the `qrcode` and `barcoders` crates.
//! Results are consumed once per render call and never cached.

mod barcode;
mod qr;

pub use barcode::{Barcoders, Symbology};
pub use qr::{QrErrorLevel, QrMode, QrOptions, QrcodeEncoder};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::color::Color;
use crate::error::{QrBillError, Result};

// ============================================================================
// MODULE GRID
// ============================================================================

/// A rectangular matrix of dark/light QR modules.
///
/// Every row has the same length; this is checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    rows: usize,
    cols: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Build a grid from row vectors (`true` = dark).
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(QrBillError::Configuration(format!(
                "module grid row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            modules: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid from row-major modules with `cols` modules per row.
    pub fn from_flat(cols: usize, modules: Vec<bool>) -> Result<Self> {
        if cols == 0 {
            return Ok(Self {
                rows: 0,
                cols: 0,
                modules: Vec::new(),
            });
        }
        if modules.len() % cols != 0 {
            return Err(QrBillError::Configuration(format!(
                "{} modules cannot form rows of {}",
                modules.len(),
                cols
            )));
        }
        Ok(Self {
            rows: modules.len() / cols,
            cols,
            modules,
        })
    }

    /// Parse a grid from text art: `#` is dark, anything else is light.
    ///
    /// ```
    /// use qrbill::encode::ModuleGrid;
    ///
    /// let grid = ModuleGrid::from_art(&["#.#", "..#"]).unwrap();
    /// assert_eq!(grid.col_count(), 3);
    /// assert!(grid.is_dark(1, 2));
    /// ```
    pub fn from_art(lines: &[&str]) -> Result<Self> {
        Self::new(
            lines
                .iter()
                .map(|line| line.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Modules of one row, left to right.
    pub fn row(&self, index: usize) -> &[bool] {
        &self.modules[index * self.cols..(index + 1) * self.cols]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks_exact panics on 0; an empty grid has no rows anyway
        self.modules.chunks_exact(self.cols.max(1))
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.cols + col]
    }
}

/// Produces a module grid for the given data.
pub trait QrEncoder {
    fn encode(&self, data: &[u8], options: &QrOptions) -> Result<ModuleGrid>;
}

// ============================================================================
// VECTOR GEOMETRY
// ============================================================================

/// Horizontal anchoring of a text string relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A filled rectangle. `(x, y)` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: u8,
}

/// A filled circle centered at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    pub color: u8,
}

/// A text string; `y` is the baseline measured from the top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextString {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub halign: HAlign,
    pub color: u8,
}

/// Vector description of a symbol as produced by a barcode encoder.
///
/// `width`/`height` are the native bounding box. Coordinates are top-down.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VectorGeometry {
    pub width: f64,
    pub height: f64,
    pub rects: Vec<Rect>,
    pub circles: Vec<Circle>,
    pub strings: Vec<TextString>,
}

impl VectorGeometry {
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.circles.is_empty() && self.strings.is_empty()
    }
}

/// Encoder-specific parameters, forwarded unexamined.
pub type EncoderParams = BTreeMap<String, serde_json::Value>;

/// Result of a barcode encoding call.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBarcode {
    pub geometry: VectorGeometry,
    /// Color for codes outside the color table. `None` means "no fallback".
    pub foreground: Option<Color>,
    pub background: Color,
}

/// Produces vector geometry for a symbology.
pub trait BarcodeEncoder {
    fn encode(&self, symbology: &str, data: &str, params: &EncoderParams)
    -> Result<EncodedBarcode>;
}
