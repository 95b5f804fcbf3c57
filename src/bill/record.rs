//! Raw payment record as supplied by the caller.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and JSON input. Nothing here is checked; pass
//! the record to [`validate`](super::validate) to get a [`Bill`](super::Bill).

use serde::{Deserialize, Serialize};

/// A postal address (creditor or debtor), unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    /// Only meaningful for the creditor.
    pub iban: Option<String>,
    pub name: Option<String>,
    /// `structured` (default) or `combined`.
    pub address_type: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    pub town: Option<String>,
    pub country: Option<String>,
}

impl AddressRecord {
    /// A structured address.
    pub fn structured(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        town: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            postal_code: Some(postal_code.into()),
            town: Some(town.into()),
            country: Some(country.into()),
            ..Default::default()
        }
    }

    /// A combined address: free-form street line and postal-code/town line.
    pub fn combined(
        name: impl Into<String>,
        line1: impl Into<String>,
        line2: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            address_type: Some("combined".into()),
            address_line1: Some(line1.into()),
            address_line2: Some(line2.into()),
            country: Some(country.into()),
            ..Default::default()
        }
    }

    pub fn iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    /// Street and building number for structured addresses.
    pub fn street(mut self, street: impl Into<String>, number: impl Into<String>) -> Self {
        self.address_line1 = Some(street.into());
        self.address_line2 = Some(number.into());
        self
    }
}

/// Alternative procedure lines; JSON accepts a single string or an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlternativeSchemes {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl AlternativeSchemes {
    /// Normalize to a list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(scheme) => vec![scheme.clone()],
            Self::Many(schemes) => schemes.clone(),
        }
    }
}

impl From<&str> for AlternativeSchemes {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for AlternativeSchemes {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

/// Payment data for one QR-bill, unvalidated.
///
/// ```
/// use qrbill::bill::{AddressRecord, PaymentRecord};
///
/// let record: PaymentRecord = serde_json::from_str(r#"{
///     "currency": "CHF",
///     "amount": 12.5,
///     "creditor": {
///         "iban": "CH4431999123000889012",
///         "name": "Max Muster",
///         "postal_code": "8000",
///         "town": "Seldwyla",
///         "country": "CH"
///     },
///     "alternative_schemes": "eBill/B/41010560425610173"
/// }"#).unwrap();
/// assert_eq!(record.alternative_schemes.to_vec().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRecord {
    /// `en` (default), `de`, `fr` or `it`.
    pub lang: Option<String>,
    pub creditor: Option<AddressRecord>,
    pub debtor: Option<AddressRecord>,
    /// `0` marks a notification that must not be paid.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    /// `QRR`, `SCOR` or `NON` (default).
    pub reference_type: Option<String>,
    pub reference: Option<String>,
    pub message: Option<String>,
    pub billing_information: Option<String>,
    pub alternative_schemes: AlternativeSchemes,
}

impl PaymentRecord {
    /// A record with the mandatory creditor and currency set.
    pub fn new(creditor: AddressRecord, currency: impl Into<String>) -> Self {
        Self {
            creditor: Some(creditor),
            currency: Some(currency.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_schemes_forms() {
        let one: PaymentRecord =
            serde_json::from_str(r#"{"alternative_schemes": "a/b"}"#).unwrap();
        assert_eq!(one.alternative_schemes.to_vec(), vec!["a/b".to_string()]);

        let many: PaymentRecord =
            serde_json::from_str(r#"{"alternative_schemes": ["a/b", "c/d"]}"#).unwrap();
        assert_eq!(many.alternative_schemes.to_vec().len(), 2);

        let none: PaymentRecord = serde_json::from_str("{}").unwrap();
        assert!(none.alternative_schemes.to_vec().is_empty());
    }

    #[test]
    fn test_address_builders() {
        let address = AddressRecord::structured("Max", "8000", "Seldwyla", "CH")
            .street("Musterstrasse", "123")
            .iban("CH4431999123000889012");
        assert_eq!(address.address_line2.as_deref(), Some("123"));
        assert_eq!(address.address_type, None);

        let combined = AddressRecord::combined("Max", "Musterstrasse 123", "8000 Seldwyla", "CH");
        assert_eq!(combined.address_type.as_deref(), Some("combined"));
        assert_eq!(combined.postal_code, None);
    }
}
