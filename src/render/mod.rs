//! # Rendering Module
//!
//! Turns encoder output into drawing commands.
//!
//! ## Modules
//!
//! - [`scanline`]: QR module grid → one dashed stroke per row
//! - [`vector`]: barcode geometry → color-grouped, scaled fills and text
//!
//! ## Usage Example
//!
//! ```
//! use qrbill::encode::ModuleGrid;
//! use qrbill::ir::Op;
//! use qrbill::render::scanline::{self, RenderParams};
//!
//! let grid = ModuleGrid::from_art(&["#.#", ".#.", "#.#"]).unwrap();
//! let program = scanline::render(&grid, &RenderParams::new(30.0)).unwrap();
//!
//! // One stroke per row
//! assert_eq!(program.count(|op| matches!(op, Op::Line { .. })), 3);
//! ```

pub mod scanline;
pub mod vector;
