//! # Vector Geometry Compositor
//!
//! Turns barcode geometry (rectangles, circles, strings) into drawing
//! commands:
//!
//! 1. one background rectangle covering the native bounding box
//! 2. per color code, one fill color change followed by all its shapes
//! 3. one text command per string, anchored by its horizontal alignment
//!
//! Geometry is top-down; it is flipped into the bottom-up drawing space and
//! the whole symbol is scaled by a single transform.

use crate::color::{Color, ColorTable};
use crate::encode::{Circle, HAlign, Rect, VectorGeometry};
use crate::error::{QrBillError, Result};
use crate::ir::{Op, Point, Program, TextRun};
use crate::layout::FontMetrics;

/// Placement and coloring options for [`composite`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOptions {
    /// Bottom-left corner of the symbol.
    pub at: Point,
    /// Requested width; see [`target_size`].
    pub width: Option<f64>,
    /// Requested height; see [`target_size`].
    pub height: Option<f64>,
    pub color_table: ColorTable,
    /// Color for codes outside the table. `None` makes such codes an error.
    pub foreground: Option<Color>,
    pub background: Color,
    pub font: String,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            at: Point::ORIGIN,
            width: None,
            height: None,
            color_table: ColorTable::STANDARD,
            foreground: Some(Color::BLACK),
            background: Color::WHITE,
            font: "Helvetica".into(),
        }
    }
}

/// A composited symbol and its final dimensions.
#[derive(Debug, Clone)]
pub struct Composite {
    pub program: Program,
    pub width: f64,
    pub height: f64,
}

/// Resolve the rendered size from the native size and the requested sides.
///
/// - neither side: native size
/// - both sides: independent scale factors (aspect ratio not kept)
/// - one side: uniform scale, the other side derived
pub fn target_size(
    native_width: f64,
    native_height: f64,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<(f64, f64)> {
    let needs_scale = width.is_some() || height.is_some();
    if needs_scale && !(native_width > 0.0 && native_height > 0.0) {
        return Err(QrBillError::Configuration(format!(
            "cannot scale geometry with native size {}x{}",
            native_width, native_height
        )));
    }

    let size = match (width, height) {
        (None, None) => (native_width, native_height),
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, native_height * w / native_width),
        (None, Some(h)) => (native_width * h / native_height, h),
    };
    Ok(size)
}

enum Shape<'a> {
    Rect(&'a Rect),
    Circle(&'a Circle),
}

/// Composite `geometry` into drawing commands.
///
/// All color codes are resolved before anything is emitted, so an unknown
/// code without a fallback produces an error and no commands.
pub fn composite(
    geometry: &VectorGeometry,
    options: &CompositeOptions,
    metrics: &dyn FontMetrics,
) -> Result<Composite> {
    let native_w = geometry.width;
    let native_h = geometry.height;
    let (width, height) = target_size(native_w, native_h, options.width, options.height)?;
    let (sx, sy) = if native_w > 0.0 && native_h > 0.0 {
        (width / native_w, height / native_h)
    } else {
        (1.0, 1.0)
    };

    let resolve = |code: u8| {
        options
            .color_table
            .resolve(code, options.foreground)
            .ok_or_else(|| {
                QrBillError::Configuration(format!(
                    "color code {} is not in the color table and no foreground is set",
                    code
                ))
            })
    };

    // Group shapes by color code in order of first appearance
    let mut groups: Vec<(u8, Color, Vec<Shape>)> = Vec::new();
    let shapes = geometry
        .rects
        .iter()
        .map(|r| (r.color, Shape::Rect(r)))
        .chain(geometry.circles.iter().map(|c| (c.color, Shape::Circle(c))));
    for (code, shape) in shapes {
        match groups.iter_mut().find(|(c, _, _)| *c == code) {
            Some((_, _, members)) => members.push(shape),
            None => groups.push((code, resolve(code)?, vec![shape])),
        }
    }
    let text_colors = geometry
        .strings
        .iter()
        .map(|s| resolve(s.color))
        .collect::<Result<Vec<_>>>()?;

    let mut program = Program::new();
    program.scoped(|p| {
        p.push(Op::Translate {
            x: options.at.x,
            y: options.at.y,
        });
        p.push(Op::Scale { sx, sy });

        p.push(Op::SetFillColor(options.background));
        p.push(Op::FillRect {
            x: 0.0,
            y: 0.0,
            width: native_w,
            height: native_h,
        });

        for (_, color, members) in &groups {
            p.push(Op::SetFillColor(*color));
            for shape in members {
                p.push(match shape {
                    Shape::Rect(r) => Op::FillRect {
                        x: r.x,
                        y: native_h - r.y - r.height,
                        width: r.width,
                        height: r.height,
                    },
                    Shape::Circle(c) => Op::FillCircle {
                        cx: c.x,
                        cy: native_h - c.y,
                        radius: c.diameter / 2.0,
                    },
                });
            }
        }

        let mut current = groups.last().map(|(_, color, _)| *color);
        for (string, color) in geometry.strings.iter().zip(text_colors) {
            if current != Some(color) {
                p.push(Op::SetFillColor(color));
                current = Some(color);
            }
            let text_width = metrics.text_width(&string.text, &options.font, string.font_size);
            let x = match string.halign {
                HAlign::Left => string.x,
                HAlign::Center => string.x - text_width / 2.0,
                HAlign::Right => string.x - text_width,
            };
            p.push(Op::Text(TextRun {
                x,
                y: native_h - string.y,
                text: string.text.clone(),
                font: options.font.clone(),
                size: string.font_size,
            }));
        }
        Ok(())
    })?;

    tracing::trace!(
        groups = groups.len(),
        strings = geometry.strings.len(),
        width,
        height,
        "composited vector geometry"
    );

    Ok(Composite {
        program,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::TextString;
    use crate::layout::StandardMetrics;

    fn rect(x: f64, color: u8) -> Rect {
        Rect {
            x,
            y: 0.0,
            width: 1.0,
            height: 10.0,
            color,
        }
    }

    fn geometry() -> VectorGeometry {
        VectorGeometry {
            width: 40.0,
            height: 20.0,
            rects: vec![rect(0.0, 7), rect(2.0, 4), rect(4.0, 7)],
            circles: vec![Circle {
                x: 10.0,
                y: 5.0,
                diameter: 4.0,
                color: 4,
            }],
            strings: Vec::new(),
        }
    }

    #[test]
    fn test_target_size() {
        assert_eq!(target_size(100.0, 50.0, None, None).unwrap(), (100.0, 50.0));
        assert_eq!(
            target_size(100.0, 50.0, Some(50.0), None).unwrap(),
            (50.0, 25.0)
        );
        assert_eq!(
            target_size(100.0, 50.0, None, Some(100.0)).unwrap(),
            (200.0, 100.0)
        );
        assert_eq!(
            target_size(100.0, 50.0, Some(10.0), Some(40.0)).unwrap(),
            (10.0, 40.0)
        );
        assert!(target_size(0.0, 50.0, Some(10.0), None).is_err());
    }

    #[test]
    fn test_color_groups_minimize_toggles() {
        let result = composite(&geometry(), &CompositeOptions::default(), &StandardMetrics).unwrap();
        let fills: Vec<&Op> = result
            .program
            .iter()
            .filter(|op| matches!(op, Op::SetFillColor(_)))
            .collect();
        // background + black group + red group
        assert_eq!(fills.len(), 3);
        assert_eq!(*fills[1], Op::SetFillColor(Color::BLACK));
        assert_eq!(*fills[2], Op::SetFillColor(Color::Rgb(1.0, 0.0, 0.0)));

        // Red group holds the red rect and the circle back to back
        let ops = &result.program.ops;
        let red = ops
            .iter()
            .position(|op| *op == Op::SetFillColor(Color::Rgb(1.0, 0.0, 0.0)))
            .unwrap();
        assert!(matches!(ops[red + 1], Op::FillRect { x, .. } if x == 2.0));
        assert!(matches!(ops[red + 2], Op::FillCircle { .. }));
    }

    #[test]
    fn test_y_axis_flipped() {
        let result = composite(&geometry(), &CompositeOptions::default(), &StandardMetrics).unwrap();
        assert!(result.program.iter().any(|op| *op
            == Op::FillRect {
                x: 0.0,
                y: 10.0,
                width: 1.0,
                height: 10.0
            }));
        assert!(result.program.iter().any(|op| *op
            == Op::FillCircle {
                cx: 10.0,
                cy: 15.0,
                radius: 2.0
            }));
    }

    #[test]
    fn test_single_scale_transform() {
        let options = CompositeOptions {
            width: Some(20.0),
            ..Default::default()
        };
        let result = composite(&geometry(), &options, &StandardMetrics).unwrap();
        assert_eq!(result.width, 20.0);
        assert_eq!(result.height, 10.0);
        assert_eq!(
            result.program.count(|op| matches!(op, Op::Scale { .. })),
            1
        );
        assert!(result
            .program
            .iter()
            .any(|op| *op == Op::Scale { sx: 0.5, sy: 0.5 }));
    }

    #[test]
    fn test_text_alignment() {
        let mut geometry = VectorGeometry {
            width: 100.0,
            height: 30.0,
            ..Default::default()
        };
        for halign in [HAlign::Left, HAlign::Center, HAlign::Right] {
            geometry.strings.push(TextString {
                x: 50.0,
                y: 25.0,
                text: "0000".into(),
                font_size: 10.0,
                halign,
                color: 0,
            });
        }
        let result = composite(&geometry, &CompositeOptions::default(), &StandardMetrics).unwrap();
        let xs: Vec<f64> = result
            .program
            .iter()
            .filter_map(|op| match op {
                Op::Text(run) => Some(run.x),
                _ => None,
            })
            .collect();
        // "0000" is 4 * 5.56 = 22.24 wide
        assert!((xs[0] - 50.0).abs() < 1e-9);
        assert!((xs[1] - (50.0 - 11.12)).abs() < 1e-9);
        assert!((xs[2] - (50.0 - 22.24)).abs() < 1e-9);
        assert!(result.program.iter().any(
            |op| matches!(op, Op::Text(run) if (run.y - 5.0).abs() < 1e-9)
        ));
    }

    #[test]
    fn test_unknown_code_without_fallback() {
        let mut g = geometry();
        g.rects.push(rect(6.0, 0));
        let options = CompositeOptions {
            foreground: None,
            ..Default::default()
        };
        let err = composite(&g, &options, &StandardMetrics).unwrap_err();
        assert!(matches!(err, QrBillError::Configuration(_)));
    }

    #[test]
    fn test_empty_geometry_draws_background_only() {
        let g = VectorGeometry {
            width: 10.0,
            height: 5.0,
            ..Default::default()
        };
        let result = composite(&g, &CompositeOptions::default(), &StandardMetrics).unwrap();
        assert_eq!(
            result.program.count(|op| matches!(op, Op::FillRect { .. })),
            1
        );
        assert_eq!(
            result.program.count(|op| matches!(op, Op::SetFillColor(_))),
            1
        );
    }
}
