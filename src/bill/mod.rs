//! # Swiss QR-bill
//!
//! A QR-bill is a 210mm × 105mm payment slip: a 62mm receipt on the left and
//! a 148mm payment part carrying the QR code on the right.
//!
//! ```text
//! PaymentRecord ──validate──► Bill ──compose──► Program
//!   (raw, serde)             (immutable)       (drawing commands)
//! ```
//!
//! ## Modules
//!
//! - [`record`]: raw, caller-owned input (JSON-loadable)
//! - [`validate()`]: ordered, fail-fast checks producing a [`Bill`]
//! - [`format`]: amount, address and QR payload text
//! - [`compose`](mod@compose): the two-region layout
//! - [`marks`]: blank-field corner marks and the Swiss cross
//!
//! ## Example
//!
//! ```
//! use qrbill::bill::{self, AddressRecord, PaymentRecord};
//!
//! let creditor = AddressRecord::structured("Max Muster", "8000", "Seldwyla", "CH")
//!     .iban("CH44 3199 9123 0008 8901 2");
//! let mut record = PaymentRecord::new(creditor, "CHF");
//! record.amount = Some(2500.25);
//!
//! let bill = bill::validate(&record).unwrap();
//! assert_eq!(bill.creditor().iban(), "CH4431999123000889012");
//! assert_eq!(bill::format::amount(2500.25), "2 500.25");
//! ```

pub mod compose;
pub mod format;
pub mod marks;
mod i18n;
pub mod record;
mod validate;

pub use compose::{compose, compose_with};
pub use i18n::Lang;
pub use record::{AddressRecord, AlternativeSchemes, PaymentRecord};
pub use validate::validate;

use serde::Serialize;

/// Payment currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Currency {
    Chf,
    Eur,
}

impl Currency {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "CHF" => Some(Self::Chf),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Chf => "CHF",
            Self::Eur => "EUR",
        }
    }
}

/// How the postal address is split into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AddressType {
    /// Street + building number, postal code + town (`S`).
    #[default]
    Structured,
    /// Two free-form lines (`K`).
    Combined,
}

impl AddressType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "structured" => Some(Self::Structured),
            "combined" => Some(Self::Combined),
            _ => None,
        }
    }

    /// Type marker used in the QR payload.
    pub fn code(self) -> &'static str {
        match self {
            Self::Structured => "S",
            Self::Combined => "K",
        }
    }
}

/// Payment reference scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReferenceType {
    /// QR reference, 27 digits with recursive mod 10 check digit.
    Qrr,
    /// ISO 11649 creditor reference.
    Scor,
    /// No reference.
    #[default]
    Non,
}

impl ReferenceType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "QRR" => Some(Self::Qrr),
            "SCOR" => Some(Self::Scor),
            "NON" => Some(Self::Non),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Qrr => "QRR",
            Self::Scor => "SCOR",
            Self::Non => "NON",
        }
    }
}

/// A validated postal address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    name: String,
    address_type: AddressType,
    address_line1: Option<String>,
    address_line2: Option<String>,
    postal_code: Option<String>,
    town: Option<String>,
    country: String,
}

impl Address {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn address_line1(&self) -> Option<&str> {
        self.address_line1.as_deref()
    }

    pub fn address_line2(&self) -> Option<&str> {
        self.address_line2.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn town(&self) -> Option<&str> {
        self.town.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

/// The creditor: account plus address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Creditor {
    iban: String,
    address: Address,
}

impl Creditor {
    /// IBAN without whitespace.
    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// A validated, normalized QR-bill.
///
/// Only obtainable through [`validate`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    lang: Lang,
    creditor: Creditor,
    debtor: Option<Address>,
    amount: Option<f64>,
    currency: Currency,
    reference_type: ReferenceType,
    reference: Option<String>,
    message: Option<String>,
    billing_information: Option<String>,
    alternative_schemes: Vec<String>,
}

impl Bill {
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Label in the bill's language.
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        self.lang.text(key)
    }

    pub fn creditor(&self) -> &Creditor {
        &self.creditor
    }

    pub fn debtor(&self) -> Option<&Address> {
        self.debtor.as_ref()
    }

    /// `Some(0.0)` marks a notification that must not be paid.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn reference_type(&self) -> ReferenceType {
        self.reference_type
    }

    /// Compact reference; QRR references always carry their check digit.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn billing_information(&self) -> Option<&str> {
        self.billing_information.as_deref()
    }

    pub fn alternative_schemes(&self) -> &[String] {
        &self.alternative_schemes
    }

    /// The QR code payload.
    pub fn payload(&self) -> String {
        format::payload(self)
    }
}
