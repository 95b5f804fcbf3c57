//! Top-to-bottom stacking fitter.
//!
//! Blocks are placed in order from the top of their container; each one gets
//! the full container width and whatever height is left. Content that does
//! not fit in its fixed frame makes the whole region fail.

use super::{
    Block, BoxFitter, FitResult, FontMetrics, Paragraph, Placement, Region, RegionFit, Row,
    StandardMetrics, Stack, TextAlign, wrap,
};
use crate::components::Graphic;
use crate::error::{QrBillError, Result};
use crate::ir::{Op, Program, TextRun};

/// Rounding slack when comparing lengths.
const EPS: f64 = 1e-6;

fn overflow(what: &str, needed: f64, available: f64) -> QrBillError {
    QrBillError::LayoutOverflow(format!(
        "{} needs {:.2}pt but only {:.2}pt are available",
        what, needed, available
    ))
}

/// Default [`BoxFitter`].
#[derive(Debug, Clone, Default)]
pub struct StackFitter<M: FontMetrics = StandardMetrics> {
    metrics: M,
}

impl StackFitter {
    /// Fitter with Helvetica metrics.
    pub fn standard() -> Self {
        Self {
            metrics: StandardMetrics,
        }
    }
}

impl<M: FontMetrics> StackFitter<M> {
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Place `block` with its top-left corner at `(x, top)`.
    ///
    /// Returns the height used.
    fn place(
        &self,
        block: &Block,
        x: f64,
        top: f64,
        width: f64,
        available: f64,
        out: &mut Vec<Placement>,
    ) -> Result<f64> {
        match block {
            Block::Text(paragraph) => self.place_text(paragraph, x, top, width, available, out),
            Block::Spacer(height) => {
                if *height > available + EPS {
                    return Err(overflow("spacer", *height, available));
                }
                Ok(*height)
            }
            Block::Graphic {
                width: w,
                height: h,
                graphic,
            } => {
                if *w > width + EPS {
                    return Err(overflow("graphic width", *w, width));
                }
                if *h > available + EPS {
                    return Err(overflow("graphic", *h, available));
                }
                out.push(draw(graphic.as_ref(), x, top - h, *w, *h)?);
                Ok(*h)
            }
            Block::Square { padding, graphic } => {
                let edge = (width - padding.horizontal()).min(available - padding.vertical());
                if edge <= 0.0 {
                    return Err(overflow(
                        "square",
                        padding.vertical(),
                        available,
                    ));
                }
                out.push(draw(
                    graphic.as_ref(),
                    x + padding.left,
                    top - padding.top - edge,
                    edge,
                    edge,
                )?);
                Ok(edge + padding.vertical())
            }
            // Only meaningful inside a stack, which handles it
            Block::Positioned { .. } => Ok(0.0),
            Block::Row(row) => self.place_row(row, x, top, width, available, out),
            Block::Stack(stack) => self.place_stack(stack, x, top, width, available, out),
        }
    }

    fn place_text(
        &self,
        paragraph: &Paragraph,
        x: f64,
        top: f64,
        width: f64,
        available: f64,
        out: &mut Vec<Placement>,
    ) -> Result<f64> {
        let padding = paragraph.padding;
        let content_width = width - padding.horizontal();
        let lines = wrap(&paragraph.spans, content_width, &self.metrics);
        let needed = lines.iter().map(|l| l.line_height).sum::<f64>() + padding.vertical();

        let height = match paragraph.height {
            Some(fixed) if needed > fixed + EPS => {
                return Err(overflow("text", needed, fixed));
            }
            Some(fixed) => fixed,
            None => needed,
        };
        if height > available + EPS {
            return Err(overflow("text", height, available));
        }

        let mut program = Program::new();
        let mut line_top = height - padding.top;
        for line in &lines {
            let start = padding.left
                + match paragraph.align {
                    TextAlign::Left => 0.0,
                    TextAlign::Right => content_width - line.width,
                };
            let font = line
                .runs
                .first()
                .map_or("Helvetica", |r| paragraph.spans[r.span].style.font.as_str());
            let baseline = line_top - self.metrics.ascent(font, line.size);
            for run in &line.runs {
                let style = &paragraph.spans[run.span].style;
                program.push(Op::Text(TextRun {
                    x: start + run.x,
                    y: baseline,
                    text: run.text.clone(),
                    font: style.font.clone(),
                    size: style.size,
                }));
            }
            line_top -= line.line_height;
        }

        out.push(Placement {
            x,
            y: top - height,
            width,
            height,
            program,
        });
        Ok(height)
    }

    fn place_row(
        &self,
        row: &Row,
        x: f64,
        top: f64,
        width: f64,
        available: f64,
        out: &mut Vec<Placement>,
    ) -> Result<f64> {
        let fixed: f64 = row.cells.iter().filter_map(|c| c.width).sum();
        let flexible = row.cells.iter().filter(|c| c.width.is_none()).count();
        let remaining = width - fixed;
        if remaining < -EPS {
            return Err(overflow("row width", fixed, width));
        }
        let share = if flexible > 0 {
            remaining / flexible as f64
        } else {
            0.0
        };

        let mut cell_x = x;
        let mut height: f64 = 0.0;
        for cell in &row.cells {
            let cell_width = cell.width.unwrap_or(share);
            let used = self.place(&cell.block, cell_x, top, cell_width, available, out)?;
            height = height.max(used);
            cell_x += cell_width;
        }
        Ok(height)
    }

    fn place_stack(
        &self,
        stack: &Stack,
        x: f64,
        top: f64,
        width: f64,
        available: f64,
        out: &mut Vec<Placement>,
    ) -> Result<f64> {
        let outer_width = stack.width.unwrap_or(width);
        if outer_width > width + EPS {
            return Err(overflow("container width", outer_width, width));
        }
        let outer_height = stack.height.unwrap_or(available);
        if outer_height > available + EPS {
            return Err(overflow("container", outer_height, available));
        }

        let padding = stack.padding;
        let content_x = x + padding.left;
        let content_width = outer_width - padding.horizontal();
        let mut remaining = outer_height - padding.vertical();
        let mut cursor = top - padding.top;
        let mut used = 0.0;
        for child in &stack.children {
            let h = self.place(child, content_x, cursor, content_width, remaining, out)?;
            cursor -= h;
            remaining -= h;
            used += h;
        }

        let height = stack.height.unwrap_or(used + padding.vertical());
        let bottom = top - height + padding.bottom;
        for child in &stack.children {
            if let Block::Positioned {
                x: px,
                y: py,
                width: w,
                height: h,
                graphic,
            } = child
            {
                out.push(draw(graphic.as_ref(), content_x + px, bottom + py, *w, *h)?);
            }
        }
        Ok(height)
    }
}

fn draw(graphic: &dyn Graphic, x: f64, y: f64, width: f64, height: f64) -> Result<Placement> {
    let mut program = Program::new();
    graphic.draw(width, height, &mut program)?;
    Ok(Placement {
        x,
        y,
        width,
        height,
        program,
    })
}

impl<M: FontMetrics> BoxFitter for StackFitter<M> {
    fn fit(&self, regions: &[Region]) -> Result<FitResult> {
        let mut result = FitResult::default();
        for region in regions {
            let mut placements = Vec::new();
            let top = region.y + region.height;
            let fit = match self.place(
                &region.block,
                region.x,
                top,
                region.width,
                region.height,
                &mut placements,
            ) {
                Ok(_) => RegionFit {
                    name: region.name.clone(),
                    success: true,
                    overflow: None,
                    placements,
                },
                Err(QrBillError::LayoutOverflow(reason)) => RegionFit {
                    name: region.name.clone(),
                    success: false,
                    overflow: Some(reason),
                    placements: Vec::new(),
                },
                Err(e) => return Err(e),
            };
            tracing::debug!(
                region = %fit.name,
                success = fit.success,
                placements = fit.placements.len(),
                "fitted region"
            );
            result.regions.push(fit);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::layout::{Row, Sides, TextStyle};

    /// Fills its box.
    #[derive(Debug)]
    struct Solid;

    impl Graphic for Solid {
        fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()> {
            program.push(Op::SetFillColor(Color::BLACK));
            program.push(Op::FillRect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            });
            Ok(())
        }
    }

    fn style() -> TextStyle {
        TextStyle {
            font: "Helvetica".into(),
            size: 10.0,
            line_height: 11.0,
        }
    }

    fn region(block: impl Into<Block>) -> Region {
        Region {
            name: "test".into(),
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            block: block.into(),
        }
    }

    fn fit(block: impl Into<Block>) -> RegionFit {
        let result = StackFitter::standard().fit(&[region(block)]).unwrap();
        result.regions.into_iter().next().unwrap()
    }

    #[test]
    fn test_stack_places_top_down() {
        let stack = Stack::new()
            .child(Paragraph::new("one", &style()))
            .child(Block::Spacer(4.0))
            .child(Block::graphic(20.0, 10.0, Solid));
        let fit = fit(stack);
        assert!(fit.success);
        assert_eq!(fit.placements.len(), 2);
        // Region top is y = 70; text takes 11pt, spacer 4pt
        assert_eq!(fit.placements[0].y, 59.0);
        assert_eq!(fit.placements[1].y, 45.0);
        assert_eq!(fit.placements[1].x, 10.0);
    }

    #[test]
    fn test_fixed_height_overflow() {
        let mut stack = Stack::new().height(20.0);
        for _ in 0..3 {
            stack.push(Paragraph::new("line", &style()));
        }
        let fit = fit(stack);
        assert!(!fit.success);
        assert!(fit.placements.is_empty());
        assert!(fit.overflow.unwrap().contains("needs"));
    }

    #[test]
    fn test_square_takes_smaller_side() {
        let stack = Stack::new().height(50.0).child(Block::Square {
            padding: Sides::new(5.0, 5.0, 5.0, 0.0),
            graphic: Box::new(Solid),
        });
        let fit = fit(stack);
        let square = &fit.placements[0];
        assert_eq!(square.width, 40.0);
        assert_eq!(square.height, 40.0);
        assert_eq!(square.y, 70.0 - 5.0 - 40.0);
    }

    #[test]
    fn test_row_shares_width() {
        let row = Row::new()
            .cell(Some(30.0), Block::graphic(30.0, 5.0, Solid))
            .cell(None, Block::graphic(70.0, 8.0, Solid));
        let fit = fit(Stack::new().child(row).child(Block::graphic(1.0, 1.0, Solid)));
        assert_eq!(fit.placements[1].x, 40.0);
        // Next block starts below the tallest cell
        assert_eq!(fit.placements[2].y, 70.0 - 8.0 - 1.0);
    }

    #[test]
    fn test_positioned_outside_flow() {
        let stack = Stack::new()
            .height(50.0)
            .child(Block::Positioned {
                x: 3.0,
                y: 4.0,
                width: 5.0,
                height: 5.0,
                graphic: Box::new(Solid),
            })
            .child(Block::graphic(10.0, 10.0, Solid));
        let fit = fit(stack);
        assert_eq!(fit.placements[0].y, 60.0);
        assert_eq!((fit.placements[1].x, fit.placements[1].y), (13.0, 24.0));
    }

    #[test]
    fn test_right_aligned_text() {
        let fit = fit(Paragraph::new("0000", &style()).align(TextAlign::Right));
        let Op::Text(run) = &fit.placements[0].program.ops[0] else {
            panic!("expected text");
        };
        assert!((run.x - (100.0 - 22.24)).abs() < 1e-9);
        assert!((run.y - (11.0 - 7.18)).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_height_paragraph() {
        let fit = fit(Paragraph::new("Receipt", &style()).height(20.0));
        assert_eq!(fit.placements[0].height, 20.0);
    }

    #[test]
    fn test_draw_translates_placements() {
        let result = StackFitter::standard()
            .fit(&[region(Block::graphic(5.0, 5.0, Solid))])
            .unwrap();
        let mut program = Program::new();
        result.draw(&mut program).unwrap();
        assert_eq!(program.ops[0], Op::SaveState);
        assert_eq!(program.ops[1], Op::Translate { x: 10.0, y: 65.0 });
        assert_eq!(program.ops.last(), Some(&Op::RestoreState));
    }
}
