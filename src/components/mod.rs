//! # Graphic Objects
//!
//! Configuration-object style drawables: build with named setters, then
//! draw into a [`Program`].
//!
//! ```
//! use qrbill::components::QrCode;
//! use qrbill::ir::Point;
//!
//! let qr = QrCode::new("https://example.com")
//!     .at(Point::new(10.0, 10.0))
//!     .size(100.0);
//!
//! let program = qr.render().unwrap();
//! assert!(!program.is_empty());
//! ```
//!
//! ## Graphic Trait
//!
//! Everything the layout engine can place implements [`Graphic`]: it draws
//! itself into a box of a given size whose bottom-left corner is the origin.

mod barcode;
mod qr_code;

pub use barcode::*;
pub use qr_code::*;

use crate::error::Result;
use crate::ir::Program;

/// A drawable that fills a box chosen by its container.
pub trait Graphic {
    /// Append drawing commands for a `width` × `height` box at the origin.
    fn draw(&self, width: f64, height: f64, program: &mut Program) -> Result<()>;
}
