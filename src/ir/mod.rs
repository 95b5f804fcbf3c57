//! # Intermediate Representation (IR)
//!
//! This module provides the IR layer for vector drawing. The IR is a
//! "bytecode" representation that sits between the renderers and the
//! external drawing surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌───────────┐     ┌──────────┐
//! │  Renderers  │ ──► │     IR      │ ──► │ Optimizer │ ──► │  Canvas  │
//! │             │     │  (Vec<Op>)  │     │           │     │ (replay) │
//! └─────────────┘     └─────────────┘     └───────────┘     └──────────┘
//! ```
//!
//! ## Benefits of IR
//!
//! 1. **Inspectable**: Debug and visualize what will be drawn
//! 2. **Optimizable**: Remove redundant graphics state changes
//! 3. **Testable**: Unit test renderers without a real drawing surface
//! 4. **Atomic**: A render either produces a whole program or an error
//!
//! ## Example
//!
//! ```
//! use qrbill::color::Color;
//! use qrbill::ir::{Op, Program};
//!
//! let mut program = Program::new();
//! program.push(Op::SetFillColor(Color::WHITE));
//! program.push(Op::FillRect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 });
//!
//! // Inspect the IR
//! println!("{:#?}", program);
//!
//! let optimized = program.optimize();
//! assert_eq!(optimized.len(), 2);
//! ```

mod canvas;
mod ops;
mod optimize;

pub use canvas::Canvas;
pub use ops::*;
