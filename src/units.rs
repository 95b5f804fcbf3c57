//! # Units and Bill Geometry
//!
//! All drawing happens in PDF points (1/72 inch) with the origin in the
//! bottom-left corner. The QR-bill is specified in millimeters.
//!
//! ```text
//! ├──── 62mm ────┼─────────────── 148mm ───────────────┤
//! │   receipt    │            payment part             │ 105mm
//! └──────────────┴─────────────────────────────────────┘
//!                         210mm total
//! ```

/// Points per millimeter.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimeters to points.
///
/// ```
/// use qrbill::units::mm;
///
/// assert!((mm(25.4) - 72.0).abs() < 1e-9);
/// ```
#[inline]
pub fn mm(value: f64) -> f64 {
    value * PT_PER_MM
}

/// Convert points to millimeters.
#[inline]
pub fn to_mm(points: f64) -> f64 {
    points / PT_PER_MM
}

/// Fixed dimensions of the payment slip, in millimeters.
#[derive(Debug, Clone, Copy)]
pub struct BillGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub receipt_width_mm: f64,
    pub payment_width_mm: f64,
    pub padding_mm: f64,
}

impl BillGeometry {
    /// Swiss QR-bill: 210mm x 105mm, receipt 62mm, payment part 148mm.
    pub const QR_BILL: Self = Self {
        width_mm: 210.0,
        height_mm: 105.0,
        receipt_width_mm: 62.0,
        payment_width_mm: 148.0,
        padding_mm: 5.0,
    };

    #[inline]
    pub fn width(&self) -> f64 {
        mm(self.width_mm)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        mm(self.height_mm)
    }

    #[inline]
    pub fn receipt_width(&self) -> f64 {
        mm(self.receipt_width_mm)
    }

    #[inline]
    pub fn payment_width(&self) -> f64 {
        mm(self.payment_width_mm)
    }

    #[inline]
    pub fn padding(&self) -> f64 {
        mm(self.padding_mm)
    }
}

impl Default for BillGeometry {
    fn default() -> Self {
        Self::QR_BILL
    }
}
