//! # Box Layout
//!
//! Content is described as a tree of [`Block`]s, grouped into fixed
//! [`Region`]s, and handed to a [`BoxFitter`] which reports per region
//! whether everything fits and where each piece goes.
//!
//! ```text
//! Region (fixed frame)
//! └── Stack (optional fixed width/height, padding)
//!     ├── Text        wrapped paragraph of styled spans
//!     ├── Spacer      vertical gap
//!     ├── Graphic     fixed-size drawing
//!     ├── Square      drawing sized min(available width, available height)
//!     ├── Positioned  drawing at a fixed offset, outside the flow
//!     ├── Row         side-by-side cells
//!     └── Stack       nested container
//! ```
//!
//! All coordinates are points with the origin at the bottom-left.

mod fitter;
mod metrics;
mod text;

pub use fitter::StackFitter;
pub use metrics::{FontMetrics, StandardMetrics};
pub use text::{Line, Run, wrap};

use std::fmt;

use crate::components::Graphic;
use crate::error::Result;
use crate::ir::{Op, Program};

/// Padding on each side of a block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    pub const ZERO: Sides = Sides {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn all(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn bottom(value: f64) -> Self {
        Self {
            bottom: value,
            ..Self::ZERO
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Font, size and fixed line spacing of a text span.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub size: f64,
    pub line_height: f64,
}

/// A piece of text in one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

/// A wrapped paragraph. `\n` forces a line break.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub align: TextAlign,
    /// Fixed height; the text must fit inside it.
    pub height: Option<f64>,
    pub padding: Sides,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: &TextStyle) -> Self {
        Self::spans(vec![Span {
            text: text.into(),
            style: style.clone(),
        }])
    }

    pub fn spans(spans: Vec<Span>) -> Self {
        Self {
            spans,
            align: TextAlign::Left,
            height: None,
            padding: Sides::ZERO,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }
}

/// A vertical container.
#[derive(Debug, Default)]
pub struct Stack {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Sides,
    pub children: Vec<Block>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }

    pub fn child(mut self, block: impl Into<Block>) -> Self {
        self.children.push(block.into());
        self
    }

    pub fn push(&mut self, block: impl Into<Block>) {
        self.children.push(block.into());
    }
}

/// One cell of a [`Row`]. `width: None` shares the remaining width.
#[derive(Debug)]
pub struct Cell {
    pub width: Option<f64>,
    pub block: Block,
}

/// Cells laid out left to right; the row is as tall as its tallest cell.
#[derive(Debug, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, width: Option<f64>, block: impl Into<Block>) -> Self {
        self.cells.push(Cell {
            width,
            block: block.into(),
        });
        self
    }
}

/// A unit of content.
pub enum Block {
    Text(Paragraph),
    Spacer(f64),
    Graphic {
        width: f64,
        height: f64,
        graphic: Box<dyn Graphic>,
    },
    /// Square edge = min(available width, available height) minus padding.
    Square {
        padding: Sides,
        graphic: Box<dyn Graphic>,
    },
    /// Placed at `(x, y)` from the bottom-left of the enclosing stack's
    /// content box; takes no space in the flow.
    Positioned {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        graphic: Box<dyn Graphic>,
    },
    Row(Row),
    Stack(Stack),
}

impl Block {
    pub fn graphic(width: f64, height: f64, graphic: impl Graphic + 'static) -> Self {
        Self::Graphic {
            width,
            height,
            graphic: Box::new(graphic),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Spacer(_) => "spacer",
            Self::Graphic { .. } => "graphic",
            Self::Square { .. } => "square",
            Self::Positioned { .. } => "positioned",
            Self::Row(_) => "row",
            Self::Stack(_) => "stack",
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(p) => f.debug_tuple("Text").field(p).finish(),
            Self::Spacer(h) => f.debug_tuple("Spacer").field(h).finish(),
            Self::Row(r) => f.debug_tuple("Row").field(r).finish(),
            Self::Stack(s) => f.debug_tuple("Stack").field(s).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Self::Text(p)
    }
}

impl From<Stack> for Block {
    fn from(s: Stack) -> Self {
        Self::Stack(s)
    }
}

impl From<Row> for Block {
    fn from(r: Row) -> Self {
        Self::Row(r)
    }
}

/// A fixed frame to fill with content.
#[derive(Debug)]
pub struct Region {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub block: Block,
}

/// A fitted piece of content; `program` is relative to `(x, y)`.
#[derive(Debug, Clone)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub program: Program,
}

/// Fit outcome of one region.
#[derive(Debug, Clone)]
pub struct RegionFit {
    pub name: String,
    pub success: bool,
    /// Why the region did not fit.
    pub overflow: Option<String>,
    pub placements: Vec<Placement>,
}

/// Fit outcome of all regions.
#[derive(Debug, Clone, Default)]
pub struct FitResult {
    pub regions: Vec<RegionFit>,
}

impl FitResult {
    pub fn success(&self) -> bool {
        self.regions.iter().all(|r| r.success)
    }

    /// Regions that did not fit, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.regions.iter().filter(|r| !r.success).map(|r| {
            (
                r.name.as_str(),
                r.overflow.as_deref().unwrap_or("content does not fit"),
            )
        })
    }

    /// Append every placement, in order, to `program`.
    pub fn draw(&self, program: &mut Program) -> Result<()> {
        for placement in self.regions.iter().flat_map(|r| &r.placements) {
            program.scoped(|p| {
                p.push(Op::Translate {
                    x: placement.x,
                    y: placement.y,
                });
                p.extend(placement.program.iter().cloned());
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// Places blocks into regions.
pub trait BoxFitter {
    fn fit(&self, regions: &[Region]) -> Result<FitResult>;
}
