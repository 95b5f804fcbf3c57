//! # Canvas Replay
//!
//! The drawing surface is external to this crate. Anything that implements
//! [`Canvas`] (a PDF content stream writer, an SVG builder, a test recorder)
//! can consume a [`Program`].

use super::ops::{LineCap, Op, Point, Program, TextRun};
use crate::color::Color;

/// An external vector drawing surface.
pub trait Canvas {
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn transform(&mut self, matrix: [f64; 6]);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap_style(&mut self, cap: LineCap);
    fn set_dash_pattern(&mut self, pattern: &[f64]);
    fn draw_line(&mut self, from: Point, to: Point);
    fn stroke_polyline(&mut self, points: &[Point]);
    fn fill_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64);
    fn draw_text(&mut self, run: &TextRun);
}

impl Program {
    /// Replay every op onto `canvas`, in order.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        for op in &self.ops {
            match op {
                Op::SaveState => canvas.save_state(),
                Op::RestoreState => canvas.restore_state(),
                Op::Translate { x, y } => canvas.translate(*x, *y),
                Op::Scale { sx, sy } => canvas.scale(*sx, *sy),
                Op::Transform(m) => canvas.transform(*m),
                Op::SetStrokeColor(c) => canvas.set_stroke_color(*c),
                Op::SetFillColor(c) => canvas.set_fill_color(*c),
                Op::SetLineWidth(w) => canvas.set_line_width(*w),
                Op::SetLineCap(cap) => canvas.set_line_cap_style(*cap),
                Op::SetDashPattern(p) => canvas.set_dash_pattern(p),
                Op::Line { from, to } => canvas.draw_line(*from, *to),
                Op::Polyline(points) => canvas.stroke_polyline(points),
                Op::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => canvas.fill_rectangle(*x, *y, *width, *height),
                Op::FillCircle { cx, cy, radius } => canvas.fill_circle(*cx, *cy, *radius),
                Op::Text(run) => canvas.draw_text(run),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records method names in call order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        depth: i32,
    }

    impl Canvas for Recorder {
        fn save_state(&mut self) {
            self.depth += 1;
            self.calls.push("save");
        }
        fn restore_state(&mut self) {
            self.depth -= 1;
            self.calls.push("restore");
        }
        fn translate(&mut self, _: f64, _: f64) {
            self.calls.push("translate");
        }
        fn scale(&mut self, _: f64, _: f64) {
            self.calls.push("scale");
        }
        fn transform(&mut self, _: [f64; 6]) {
            self.calls.push("transform");
        }
        fn set_stroke_color(&mut self, _: Color) {
            self.calls.push("stroke_color");
        }
        fn set_fill_color(&mut self, _: Color) {
            self.calls.push("fill_color");
        }
        fn set_line_width(&mut self, _: f64) {
            self.calls.push("line_width");
        }
        fn set_line_cap_style(&mut self, _: LineCap) {
            self.calls.push("line_cap");
        }
        fn set_dash_pattern(&mut self, _: &[f64]) {
            self.calls.push("dash");
        }
        fn draw_line(&mut self, _: Point, _: Point) {
            self.calls.push("line");
        }
        fn stroke_polyline(&mut self, _: &[Point]) {
            self.calls.push("polyline");
        }
        fn fill_rectangle(&mut self, _: f64, _: f64, _: f64, _: f64) {
            self.calls.push("rect");
        }
        fn fill_circle(&mut self, _: f64, _: f64, _: f64) {
            self.calls.push("circle");
        }
        fn draw_text(&mut self, _: &TextRun) {
            self.calls.push("text");
        }
    }

    #[test]
    fn test_replay_order() {
        let mut program = Program::new();
        program
            .scoped(|p| {
                p.push(Op::Translate { x: 1.0, y: 2.0 });
                p.push(Op::SetDashPattern(vec![1.0, 2.0]));
                p.push(Op::Line {
                    from: Point::ORIGIN,
                    to: Point::new(10.0, 0.0),
                });
                Ok(())
            })
            .unwrap();

        let mut recorder = Recorder::default();
        program.replay(&mut recorder);
        assert_eq!(
            recorder.calls,
            vec!["save", "translate", "dash", "line", "restore"]
        );
        assert_eq!(recorder.depth, 0);
    }
}
