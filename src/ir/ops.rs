//! # IR Opcodes
//!
//! This module defines the intermediate representation (IR) for vector
//! drawing. The IR is a sequence of opcodes that can be inspected,
//! optimized, rasterized for preview, or replayed onto any [`Canvas`].
//!
//! ## Design Philosophy
//!
//! The IR sits between the renderers and the drawing surface:
//!
//! ```text
//! Renderers → IR (inspectable) → Optimizer → Canvas / Preview
//! ```
//!
//! Each opcode represents a single, atomic operation. Graphics state changes
//! are individual ops (not combined) to enable fine-grained optimization.
//! Coordinates are PDF points with the origin in the bottom-left corner.
//!
//! [`Canvas`]: super::Canvas

use serde::Serialize;

use crate::color::Color;
use crate::error::Result;

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Line cap style for stroked paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineCap {
    /// Stroke ends exactly at the endpoint, so abutting dashes tile.
    #[default]
    Butt,
    Round,
    Square,
}

/// A positioned run of text.
///
/// `(x, y)` is the left end of the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font: String,
    pub size: f64,
}

/// Graphics state tracked for optimization.
///
/// Mirrors the subset of the drawing surface's graphics state that ops can
/// change. Saved and restored together with `SaveState`/`RestoreState`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub dash_pattern: Vec<f64>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            dash_pattern: Vec::new(),
        }
    }
}

/// IR opcodes - the drawing command set.
///
/// Each variant represents a single atomic operation. The IR can be:
/// - Inspected for debugging (`{:#?}`) or exported as JSON
/// - Optimized to remove redundant state changes
/// - Replayed onto a [`Canvas`](super::Canvas)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Op {
    // ========== Graphics State ==========
    /// Push the graphics state.
    SaveState,

    /// Pop the graphics state. Always paired with a preceding `SaveState`.
    RestoreState,

    /// Translate the coordinate system.
    Translate { x: f64, y: f64 },

    /// Scale the coordinate system.
    Scale { sx: f64, sy: f64 },

    /// Concatenate an affine matrix `[a, b, c, d, e, f]`.
    Transform([f64; 6]),

    SetStrokeColor(Color),

    SetFillColor(Color),

    SetLineWidth(f64),

    SetLineCap(LineCap),

    /// Alternating on/off segment lengths, starting with "on".
    /// An empty pattern means a solid line.
    SetDashPattern(Vec<f64>),

    // ========== Painting ==========
    /// Stroke a straight line.
    Line { from: Point, to: Point },

    /// Stroke an open polyline.
    Polyline(Vec<Point>),

    /// Fill an axis-aligned rectangle; `(x, y)` is the bottom-left corner.
    FillRect { x: f64, y: f64, width: f64, height: f64 },

    /// Fill a circle.
    FillCircle { cx: f64, cy: f64, radius: f64 },

    /// Draw a run of text with the current fill color.
    Text(TextRun),
}

/// A compiled IR program.
///
/// Contains a sequence of ops that can be optimized and replayed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple ops to the program.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Run `body` between `SaveState` and `RestoreState`.
    ///
    /// The restore is emitted even when `body` fails, so the program stays
    /// balanced on every exit path.
    pub fn scoped<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Program) -> Result<()>,
    {
        self.push(Op::SaveState);
        let result = body(self);
        self.push(Op::RestoreState);
        result
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// Count ops matching a predicate.
    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
