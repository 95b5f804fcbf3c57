//! # QRBill - Swiss QR-bill Library
//!
//! QRBill validates Swiss payment data and lays it out as a QR-bill payment
//! slip. It provides:
//!
//! - **Validation**: field-by-field checks of a payment record, including
//!   IBAN and QR/creditor reference check digits
//! - **Layout**: the 210mm × 105mm receipt and payment part, fitted into
//!   fixed regions
//! - **Graphics**: QR codes drawn as dashed scanlines and barcodes composited
//!   from vector geometry
//! - **Output**: a drawing-command [`ir::Program`] that any
//!   [`ir::Canvas`] can replay, plus a PNG preview
//!
//! ## Quick Start
//!
//! ```
//! use qrbill::bill::{self, AddressRecord, PaymentRecord};
//!
//! let creditor = AddressRecord::structured("Robert Schneider AG", "2501", "Biel", "CH")
//!     .street("Rue du Lac", "1268")
//!     .iban("CH44 3199 9123 0008 8901 2");
//! let mut record = PaymentRecord::new(creditor, "CHF");
//! record.amount = Some(1949.75);
//! record.reference_type = Some("QRR".into());
//! record.reference = Some("21 00000 00003 13947 14300 0901".into());
//!
//! let bill = bill::validate(&record)?;
//! let program = bill::compose(&bill)?;
//! let png = qrbill::preview::render_png(&program, 595.28, 297.64, 72.0)?;
//! assert!(!png.is_empty());
//!
//! # Ok::<(), qrbill::QrBillError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bill`] | Payment record, validation, formatting, bill layout |
//! | [`checksum`] | QRR mod 10, SCOR and IBAN mod 97 check digits |
//! | [`components`] | `QrCode` and `Barcode` graphic objects |
//! | [`config`] | Bill text styles |
//! | [`encode`] | QR and barcode encoder seams |
//! | [`render`] | Scanline renderer and vector compositor |
//! | [`layout`] | Box fitting and font metrics |
//! | [`ir`] | Drawing commands and canvas replay |
//! | [`preview`] | PNG rasterizer |
//! | [`color`], [`units`] | Colors, mm/pt conversion and bill geometry |
//! | [`error`] | Error types |

pub mod bill;
pub mod checksum;
pub mod color;
pub mod components;
pub mod config;
pub mod encode;
pub mod error;
pub mod ir;
pub mod layout;
pub mod preview;
pub mod render;
pub mod units;

// Re-exports for convenience
pub use bill::{Bill, PaymentRecord};
pub use error::QrBillError;
