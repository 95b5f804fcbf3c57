//! # Module-Grid Scanline Renderer
//!
//! Draws a QR module grid with one dashed stroke per row instead of one
//! rectangle per dark module.
//!
//! ```text
//! row:      ■ ■ ■ □ □ ■ □
//! pattern:  [3m, 2m, 1m, 1m]      (on, off, on, off)
//!
//! row:      □ □ ■ ■ □ □ □
//! pattern:  [0, 2m, 2m, 3m]       (leading zero keeps index 0 "on")
//! ```
//!
//! The line is stroked with width = module edge and butt caps, so adjacent
//! rows and dash segments tile without gaps or overlap.

use crate::color::Color;
use crate::encode::ModuleGrid;
use crate::error::{QrBillError, Result};
use crate::ir::{LineCap, Op, Point, Program};

/// Where and how to draw a module grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Bottom-left corner of the rendered square.
    pub origin: Point,
    /// Full edge length; module edge = `size / col_count`.
    pub size: f64,
    pub dark_color: Color,
    /// Background fill. `None` leaves light modules unpainted.
    pub light_color: Option<Color>,
}

impl RenderParams {
    /// Black modules, no background, at the origin.
    pub fn new(size: f64) -> Self {
        Self {
            origin: Point::ORIGIN,
            size,
            dark_color: Color::BLACK,
            light_color: None,
        }
    }

    pub fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn dark_color(mut self, color: Color) -> Self {
        self.dark_color = color;
        self
    }

    pub fn light_color(mut self, color: Color) -> Self {
        self.light_color = Some(color);
        self
    }
}

/// Run-length encode one row into an on/off dash pattern.
///
/// Element 0 is always "on"; a row starting light gets a zero-length
/// leading segment.
pub fn dash_pattern(row: &[bool], module: f64) -> Vec<f64> {
    let Some(&first) = row.first() else {
        return Vec::new();
    };

    let mut pattern = vec![0.0];
    let mut current = first;
    for &dark in row {
        if dark == current {
            if let Some(last) = pattern.last_mut() {
                *last += module;
            }
        } else {
            current = dark;
            pattern.push(module);
        }
    }

    if !first {
        pattern.insert(0, 0.0);
    }
    pattern
}

/// Render `grid` into a standalone program.
pub fn render(grid: &ModuleGrid, params: &RenderParams) -> Result<Program> {
    let mut program = Program::new();
    render_into(grid, params, &mut program)?;
    Ok(program)
}

/// Append the drawing commands for `grid` to `program`.
///
/// Nothing is appended when the parameters are rejected.
pub fn render_into(grid: &ModuleGrid, params: &RenderParams, program: &mut Program) -> Result<()> {
    let cols = grid.col_count();
    if cols == 0 {
        return Err(QrBillError::Configuration(
            "module grid has no columns".into(),
        ));
    }
    if !(params.size > 0.0 && params.size.is_finite()) {
        return Err(QrBillError::Configuration(format!(
            "QR code size must be positive, got {}",
            params.size
        )));
    }

    let size = params.size;
    let module = size / cols as f64;

    program.scoped(|p| {
        p.push(Op::Translate {
            x: params.origin.x,
            y: params.origin.y,
        });
        if let Some(light) = params.light_color {
            p.push(Op::SetFillColor(light));
            p.push(Op::FillRect {
                x: 0.0,
                y: 0.0,
                width: size,
                height: size,
            });
        }
        p.push(Op::SetLineCap(LineCap::Butt));
        p.push(Op::SetLineWidth(module));
        p.push(Op::SetStrokeColor(params.dark_color));

        for (index, row) in grid.rows().enumerate() {
            // Center of the row's module band, counted from the top edge
            let y = size - module * (index as f64 + 0.5);
            p.push(Op::SetDashPattern(dash_pattern(row, module)));
            p.push(Op::Line {
                from: Point::new(0.0, y),
                to: Point::new(size, y),
            });
        }
        Ok(())
    })?;

    tracing::trace!(rows = grid.row_count(), cols, module, "rendered module grid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(lines: &[&str]) -> ModuleGrid {
        ModuleGrid::from_art(lines).unwrap()
    }

    fn patterns(program: &Program) -> Vec<Vec<f64>> {
        program
            .iter()
            .filter_map(|op| match op {
                Op::SetDashPattern(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_dash_pattern_dark_start() {
        let row = [true, true, true, false, false, true, false];
        assert_eq!(dash_pattern(&row, 10.0), vec![30.0, 20.0, 10.0, 10.0]);
    }

    #[test]
    fn test_dash_pattern_light_start() {
        let row = [false, false, true, true, false, false, false];
        assert_eq!(dash_pattern(&row, 10.0), vec![0.0, 20.0, 20.0, 30.0]);
    }

    #[test]
    fn test_uniform_rows() {
        assert_eq!(dash_pattern(&[true; 5], 2.0), vec![10.0]);
        assert_eq!(dash_pattern(&[false; 5], 2.0), vec![0.0, 10.0]);
    }

    #[test]
    fn test_one_stroke_per_row() {
        let g = grid(&["#.#", "...", "###"]);
        let program = render(&g, &RenderParams::new(30.0)).unwrap();
        assert_eq!(program.count(|op| matches!(op, Op::Line { .. })), 3);
        assert_eq!(
            patterns(&program),
            vec![
                vec![10.0, 10.0, 10.0],
                vec![0.0, 30.0],
                vec![30.0],
            ]
        );
    }

    #[test]
    fn test_row_positions_and_state() {
        let g = grid(&["##", ".#"]);
        let params = RenderParams::new(20.0).at(Point::new(5.0, 7.0));
        let program = render(&g, &params).unwrap();
        assert_eq!(
            program.ops,
            vec![
                Op::SaveState,
                Op::Translate { x: 5.0, y: 7.0 },
                Op::SetLineCap(LineCap::Butt),
                Op::SetLineWidth(10.0),
                Op::SetStrokeColor(Color::BLACK),
                Op::SetDashPattern(vec![20.0]),
                Op::Line {
                    from: Point::new(0.0, 15.0),
                    to: Point::new(20.0, 15.0)
                },
                Op::SetDashPattern(vec![0.0, 10.0, 10.0]),
                Op::Line {
                    from: Point::new(0.0, 5.0),
                    to: Point::new(20.0, 5.0)
                },
                Op::RestoreState,
            ]
        );
    }

    #[test]
    fn test_light_color_background() {
        let g = grid(&["#."]);
        let params = RenderParams::new(8.0).light_color(Color::WHITE);
        let program = render(&g, &params).unwrap();
        let fills = program.count(|op| matches!(op, Op::FillRect { .. }));
        assert_eq!(fills, 1);
        assert!(program.iter().any(|op| *op
            == Op::FillRect {
                x: 0.0,
                y: 0.0,
                width: 8.0,
                height: 8.0
            }));
    }

    #[test]
    fn test_pattern_sums_to_size() {
        let g = grid(&[
            "#..##.#.#..##",
            "..#.###..#.#.",
            "#############",
            ".............",
        ]);
        let size = 97.3;
        let program = render(&g, &RenderParams::new(size)).unwrap();
        for pattern in patterns(&program) {
            let sum: f64 = pattern.iter().sum();
            assert!((sum - size).abs() < 1e-9, "{} != {}", sum, size);
        }
    }

    #[test]
    fn test_invalid_params() {
        let empty = ModuleGrid::new(Vec::new()).unwrap();
        assert!(matches!(
            render(&empty, &RenderParams::new(10.0)),
            Err(QrBillError::Configuration(_))
        ));
        let g = grid(&["#"]);
        assert!(matches!(
            render(&g, &RenderParams::new(0.0)),
            Err(QrBillError::Configuration(_))
        ));
        assert!(matches!(
            render(&g, &RenderParams::new(-4.0)),
            Err(QrBillError::Configuration(_))
        ));
    }
}
