//! Linear barcode graphic object.

use super::Graphic;
use crate::color::ColorTable;
use crate::encode::{BarcodeEncoder, Barcoders, EncodedBarcode, EncoderParams};
use crate::error::Result;
use crate::ir::{Point, Program};
use crate::layout::{Block, FontMetrics, StandardMetrics};
use crate::render::vector::{self, Composite, CompositeOptions};

/// A barcode encoded by a [`BarcodeEncoder`] and composited from its vector
/// geometry.
///
/// Parameters other than position, size and font are passed to the encoder
/// untouched.
///
/// ## Example
///
/// ```
/// use qrbill::components::Barcode;
///
/// let barcode = Barcode::new("code128", "Hello")
///     .width(200.0)
///     .param("bar_height", 30);
///
/// let composite = barcode.render().unwrap();
/// assert_eq!(composite.width, 200.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Barcode {
    symbology: String,
    data: String,
    at: Point,
    width: Option<f64>,
    height: Option<f64>,
    font: String,
    params: EncoderParams,
}

impl Barcode {
    pub fn new(symbology: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            symbology: symbology.into(),
            data: data.into(),
            at: Point::ORIGIN,
            width: None,
            height: None,
            font: "Helvetica".into(),
            params: EncoderParams::new(),
        }
    }

    pub fn at(mut self, at: Point) -> Self {
        self.at = at;
        self
    }

    /// Rendered width; with no height the aspect ratio is kept.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Rendered height; with no width the aspect ratio is kept.
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Font for the human-readable text.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Add an encoder parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: EncoderParams) -> Self {
        self.params.extend(params);
        self
    }

    pub fn encode(&self, encoder: &dyn BarcodeEncoder) -> Result<EncodedBarcode> {
        encoder.encode(&self.symbology, &self.data, &self.params)
    }

    fn options(&self, encoded: &EncodedBarcode, at: Point, size: (Option<f64>, Option<f64>)) -> CompositeOptions {
        CompositeOptions {
            at,
            width: size.0,
            height: size.1,
            color_table: ColorTable::STANDARD,
            foreground: encoded.foreground,
            background: encoded.background,
            font: self.font.clone(),
        }
    }

    /// Encode and composite at the configured position and size.
    pub fn render(&self) -> Result<Composite> {
        self.render_with(&Barcoders, &StandardMetrics)
    }

    pub fn render_with(
        &self,
        encoder: &dyn BarcodeEncoder,
        metrics: &dyn FontMetrics,
    ) -> Result<Composite> {
        let encoded = self.encode(encoder)?;
        let options = self.options(&encoded, self.at, (self.width, self.height));
        vector::composite(&encoded.geometry, &options, metrics)
    }

    /// A fixed-size layout block at the rendered size.
    pub fn into_block(self) -> Result<Block> {
        let encoded = self.encode(&Barcoders)?;
        let (width, height) = vector::target_size(
            encoded.geometry.width,
            encoded.geometry.height,
            self.width,
            self.height,
        )?;
        Ok(Block::graphic(width, height, self))
    }
}

impl Graphic for Barcode {
    fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()> {
        let encoded = self.encode(&Barcoders)?;
        let options = self.options(&encoded, Point::ORIGIN, (Some(width), Some(height)));
        let composite = vector::composite(&encoded.geometry, &options, &StandardMetrics)?;
        program.extend(composite.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrBillError;
    use crate::ir::Op;

    #[test]
    fn test_aspect_ratio_kept() {
        let native = Barcode::new("code39", "ABC").render().unwrap();
        let scaled = Barcode::new("code39", "ABC")
            .width(native.width / 2.0)
            .render()
            .unwrap();
        assert!((scaled.height - native.height / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_params_pass_through() {
        let composite = Barcode::new("code39", "ABC")
            .param("show_text", false)
            .render()
            .unwrap();
        assert_eq!(
            composite.program.count(|op| matches!(op, Op::Text(_))),
            0
        );
    }

    #[test]
    fn test_symbology_case_insensitive() {
        assert!(Barcode::new("Code128", "x").render().is_ok());
        assert!(matches!(
            Barcode::new("nope", "x").render(),
            Err(QrBillError::Encode(_))
        ));
    }

    #[test]
    fn test_into_block_size() {
        let block = Barcode::new("code39", "ABC").height(20.0).into_block().unwrap();
        let Block::Graphic { height, .. } = block else {
            panic!("expected a graphic block");
        };
        assert_eq!(height, 20.0);
    }
}
