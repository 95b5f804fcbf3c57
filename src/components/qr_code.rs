//! QR code graphic object.

use super::Graphic;
use crate::color::Color;
use crate::encode::{ModuleGrid, QrEncoder, QrErrorLevel, QrMode, QrOptions, QrcodeEncoder};
use crate::error::{QrBillError, Result};
use crate::ir::{Point, Program};
use crate::layout::{Block, Sides};
use crate::render::scanline::{self, RenderParams};

/// A QR code drawn with one dashed stroke per module row.
///
/// ## Example
///
/// ```
/// use qrbill::color::Color;
/// use qrbill::components::QrCode;
/// use qrbill::encode::QrErrorLevel;
///
/// let qr = QrCode::new("https://example.com")
///     .size(72.0)
///     .level(QrErrorLevel::H)
///     .light_color(Color::WHITE);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QrCode {
    data: String,
    at: Point,
    size: Option<f64>,
    dark_color: Color,
    light_color: Option<Color>,
    options: QrOptions,
}

impl QrCode {
    /// A black QR code at the origin. The size must be set before rendering
    /// unless a layout box chooses it.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            at: Point::ORIGIN,
            size: None,
            dark_color: Color::BLACK,
            light_color: None,
            options: QrOptions::default(),
        }
    }

    pub fn at(mut self, at: Point) -> Self {
        self.at = at;
        self
    }

    /// Edge length of the whole code.
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn dark_color(mut self, color: Color) -> Self {
        self.dark_color = color;
        self
    }

    /// Fill the light modules; by default they are left unpainted.
    pub fn light_color(mut self, color: Color) -> Self {
        self.light_color = Some(color);
        self
    }

    /// Fixed symbol version (1-40).
    pub fn code_size(mut self, version: i16) -> Self {
        self.options.version = Some(version);
        self
    }

    /// Largest symbol version when choosing automatically.
    pub fn max_code_size(mut self, version: i16) -> Self {
        self.options.max_version = Some(version);
        self
    }

    pub fn level(mut self, level: QrErrorLevel) -> Self {
        self.options.level = level;
        self
    }

    /// Encode the whole data in a single segment mode.
    pub fn mode(mut self, mode: QrMode) -> Self {
        self.options.mode = Some(mode);
        self
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Encode the data into a module grid.
    pub fn encode(&self, encoder: &dyn QrEncoder) -> Result<ModuleGrid> {
        encoder.encode(self.data.as_bytes(), &self.options)
    }

    fn params(&self, at: Point, size: f64) -> RenderParams {
        let params = RenderParams::new(size).at(at).dark_color(self.dark_color);
        match self.light_color {
            Some(light) => params.light_color(light),
            None => params,
        }
    }

    /// Encode and draw at the configured position and size.
    pub fn render(&self) -> Result<Program> {
        self.render_with(&QrcodeEncoder)
    }

    pub fn render_with(&self, encoder: &dyn QrEncoder) -> Result<Program> {
        let size = self
            .size
            .ok_or_else(|| QrBillError::Configuration("QR code size is not set".into()))?;
        let grid = self.encode(encoder)?;
        scanline::render(&grid, &self.params(self.at, size))
    }

    /// A layout block whose edge is the smaller available side minus
    /// `padding`.
    pub fn into_block(self, padding: Sides) -> Block {
        Block::Square {
            padding,
            graphic: Box::new(self),
        }
    }
}

impl Graphic for QrCode {
    fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()> {
        let grid = self.encode(&QrcodeEncoder)?;
        let params = self.params(Point::ORIGIN, width.min(height));
        scanline::render_into(&grid, &params, program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Op;

    #[test]
    fn test_render_needs_size() {
        let err = QrCode::new("x").render().unwrap_err();
        assert!(matches!(err, QrBillError::Configuration(_)));
    }

    #[test]
    fn test_render_one_stroke_per_row() {
        let qr = QrCode::new("hello").code_size(1).size(42.0);
        let program = qr.render().unwrap();
        assert_eq!(program.count(|op| matches!(op, Op::Line { .. })), 21);
        assert!(program.iter().any(|op| *op == Op::SetLineWidth(2.0)));
    }

    #[test]
    fn test_draw_fits_smaller_side() {
        let qr = QrCode::new("hello").code_size(1);
        let mut program = Program::new();
        qr.draw(84.0, 42.0, &mut program).unwrap();
        assert!(program.iter().any(|op| *op == Op::SetLineWidth(2.0)));
    }

    #[test]
    fn test_mode_forwarded() {
        let qr = QrCode::new("12345678901234567890").mode(QrMode::Numeric);
        assert_eq!(qr.encode(&QrcodeEncoder).unwrap().col_count(), 21);

        let err = QrCode::new("abc")
            .mode(QrMode::Numeric)
            .size(42.0)
            .render()
            .unwrap_err();
        assert!(matches!(err, QrBillError::Encode(_)));
    }

    #[test]
    fn test_colors_forwarded() {
        let program = QrCode::new("hello")
            .size(10.0)
            .dark_color(Color::Rgb(0.0, 0.0, 1.0))
            .light_color(Color::WHITE)
            .render()
            .unwrap();
        assert!(program
            .iter()
            .any(|op| *op == Op::SetStrokeColor(Color::Rgb(0.0, 0.0, 1.0))));
        assert_eq!(program.count(|op| matches!(op, Op::FillRect { .. })), 1);
    }
}
