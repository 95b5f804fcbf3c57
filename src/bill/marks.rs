//! Fixed graphics of the bill: blank-field corner marks and the Swiss cross.

use crate::color::Color;
use crate::components::Graphic;
use crate::error::Result;
use crate::ir::{Op, Point, Program};
use crate::units::mm;

/// Arm length of a corner mark.
pub const CORNER_MARK_LENGTH_MM: f64 = 3.0;
const CORNER_MARK_LINE_WIDTH: f64 = 0.75;

/// Edge length of the Swiss cross overlay.
pub const CROSS_SIZE_MM: f64 = 7.0;

/// An empty field for manual entry, outlined by four L-shaped corner marks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankField;

impl Graphic for BlankField {
    fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()> {
        let arm = mm(CORNER_MARK_LENGTH_MM);
        let p = Point::new;
        program.push(Op::SetStrokeColor(Color::BLACK));
        program.push(Op::SetLineWidth(CORNER_MARK_LINE_WIDTH));
        program.extend([
            Op::Polyline(vec![p(0.0, arm), p(0.0, 0.0), p(arm, 0.0)]),
            Op::Polyline(vec![p(width - arm, 0.0), p(width, 0.0), p(width, arm)]),
            Op::Polyline(vec![
                p(width, height - arm),
                p(width, height),
                p(width - arm, height),
            ]),
            Op::Polyline(vec![p(arm, height), p(0.0, height), p(0.0, height - arm)]),
        ]);
        Ok(())
    }
}

/// The Swiss cross placed over the middle of the QR code.
///
/// ```text
/// ┌───────┐  white 7mm square
/// │ ┌───┐ │  black 6mm square, 0.5mm inset
/// │ │ ✚ │ │  white bars 1.17mm × 3.9mm
/// │ └───┘ │
/// └───────┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SwissCross;

impl Graphic for SwissCross {
    fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()> {
        let sx = width / mm(CROSS_SIZE_MM);
        let sy = height / mm(CROSS_SIZE_MM);
        let rect = |x: f64, y: f64, w: f64, h: f64| Op::FillRect {
            x: mm(x) * sx,
            y: mm(y) * sy,
            width: mm(w) * sx,
            height: mm(h) * sy,
        };
        program.extend([
            Op::SetFillColor(Color::WHITE),
            rect(0.0, 0.0, 7.0, 7.0),
            Op::SetFillColor(Color::BLACK),
            rect(0.5, 0.5, 6.0, 6.0),
            Op::SetFillColor(Color::WHITE),
            rect(2.93, 1.67, 1.17, 3.9),
            rect(1.57, 3.04, 3.9, 1.17),
        ]);
        Ok(())
    }
}
