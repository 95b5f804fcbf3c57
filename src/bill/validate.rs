//! Payment record validation.
//!
//! Checks run in a fixed order and stop at the first failure, so a given
//! record always reports the same field:
//!
//! 1. currency
//! 2. amount (`0` turns the bill into a "do not pay" notification)
//! 3. creditor (IBAN first), then debtor
//! 4. reference type and reference
//! 5. message and billing information
//! 6. alternative schemes
//!
//! The caller's record is never modified.

use super::record::{AddressRecord, PaymentRecord};
use super::{Address, AddressType, Bill, Creditor, Currency, Lang, ReferenceType};
use crate::checksum;
use crate::error::{QrBillError, Result};

pub const MAX_AMOUNT: f64 = 999_999_999.99;
pub const MIN_AMOUNT: f64 = 0.01;

/// Combined limit of message and billing information.
const MAX_ADDITIONAL_INFO: usize = 140;
const MAX_ALTERNATIVE_SCHEMES: usize = 2;
const MAX_ALTERNATIVE_SCHEME_LEN: usize = 100;

fn len(value: &str) -> usize {
    value.chars().count()
}

/// Field path of an address part, e.g. `debtor.town`.
fn path(role: &str, field: &str) -> String {
    format!("{}.{}", role, field)
}

fn check_len(field: &str, label: &str, value: &str, max: usize) -> Result<()> {
    let actual = len(value);
    if actual > max {
        return Err(QrBillError::validation(
            field,
            format!(
                "{} must not contain more than {} characters, got {}",
                label, max, actual
            ),
        ));
    }
    Ok(())
}

/// Turn a checksum engine error into a validation error on `field`.
fn checksum_failure(field: &str, err: QrBillError) -> QrBillError {
    match err {
        QrBillError::Format(message) | QrBillError::Checksum(message) => {
            QrBillError::validation(field, message)
        }
        other => other,
    }
}

fn validate_address(role: &str, record: &AddressRecord) -> Result<Address> {
    let address_type = match record.address_type.as_deref() {
        None => AddressType::Structured,
        Some(value) => AddressType::parse(value).ok_or_else(|| {
            QrBillError::validation(
                path(role, "address_type"),
                format!(
                    "Address type must be structured or combined, not {:?}",
                    value
                ),
            )
        })?,
    };
    let structured = address_type == AddressType::Structured;

    let name = record.name.as_deref().ok_or_else(|| {
        QrBillError::validation(path(role, "name"), "Name in address must be provided")
    })?;
    check_len(&path(role, "name"), "Name in address", name, 70)?;

    if let Some(line1) = &record.address_line1 {
        check_len(&path(role, "address_line1"), "Address line 1", line1, 70)?;
    }

    let line2_field = path(role, "address_line2");
    match (&record.address_line2, structured) {
        (Some(line2), true) => check_len(
            &line2_field,
            "Address line 2 of a structured address",
            line2,
            16,
        )?,
        (Some(line2), false) => check_len(
            &line2_field,
            "Address line 2 of a combined address",
            line2,
            70,
        )?,
        (None, true) => {}
        (None, false) => {
            return Err(QrBillError::validation(
                line2_field,
                "Address line 2 must be provided for a combined address",
            ));
        }
    }

    for (field, label, value, max) in [
        ("postal_code", "Postal code", &record.postal_code, 16),
        ("town", "Town", &record.town, 35),
    ] {
        let field = path(role, field);
        match (value, structured) {
            (Some(value), true) => check_len(&field, label, value, max)?,
            (Some(_), false) => {
                return Err(QrBillError::validation(
                    field,
                    format!("{} must not be provided for a combined address", label),
                ));
            }
            (None, true) => {
                return Err(QrBillError::validation(
                    field,
                    format!("{} must be provided for a structured address", label),
                ));
            }
            (None, false) => {}
        }
    }

    let country = record.country.as_deref().ok_or_else(|| {
        QrBillError::validation(path(role, "country"), "Country must be provided")
    })?;
    if len(country) != 2 {
        return Err(QrBillError::validation(
            path(role, "country"),
            format!("Country must be a two-letter ISO-3166-1 code, not {:?}", country),
        ));
    }

    Ok(Address {
        name: name.to_string(),
        address_type,
        address_line1: record.address_line1.clone(),
        address_line2: record.address_line2.clone(),
        postal_code: record.postal_code.clone(),
        town: record.town.clone(),
        country: country.to_string(),
    })
}

fn validate_creditor(record: Option<&AddressRecord>) -> Result<Creditor> {
    let record =
        record.ok_or_else(|| QrBillError::validation("creditor", "Creditor must be provided"))?;
    let iban = record
        .iban
        .as_deref()
        .ok_or_else(|| QrBillError::validation("creditor.iban", "IBAN of the creditor is missing"))?;
    let iban = checksum::iban(iban).map_err(|e| checksum_failure("creditor.iban", e))?;
    let address = validate_address("creditor", record)?;
    Ok(Creditor { iban, address })
}

fn validate_reference(
    reference_type: Option<&str>,
    reference: Option<&str>,
) -> Result<(ReferenceType, Option<String>)> {
    let reference_type = match reference_type {
        None => ReferenceType::Non,
        Some(value) => ReferenceType::parse(value).ok_or_else(|| {
            QrBillError::validation(
                "reference_type",
                "Reference type must be one of QRR, SCOR or NON",
            )
        })?,
    };

    let reference = match (reference_type, reference) {
        (ReferenceType::Non, None) => None,
        (ReferenceType::Non, Some(_)) => {
            return Err(QrBillError::validation(
                "reference",
                "Reference must not be provided for NON reference type",
            ));
        }
        (kind, None) => {
            return Err(QrBillError::validation(
                "reference",
                format!("Reference must be filled in for {} reference type", kind.code()),
            ));
        }
        (ReferenceType::Qrr, Some(value)) => Some(
            checksum::qrr_reference(value).map_err(|e| checksum_failure("reference", e))?,
        ),
        (ReferenceType::Scor, Some(value)) => Some(
            checksum::scor_reference(value).map_err(|e| checksum_failure("reference", e))?,
        ),
    };
    Ok((reference_type, reference))
}

/// Validate `record` and build the normalized [`Bill`].
///
/// Normalization fills defaults (`structured` addresses, `NON` references,
/// `en` labels), strips whitespace from the IBAN and references, appends a
/// missing QRR check digit, and replaces the message of a zero-amount bill
/// with the localized "do not use for payment" notice.
pub fn validate(record: &PaymentRecord) -> Result<Bill> {
    let lang = match record.lang.as_deref() {
        None => Lang::default(),
        Some(tag) => Lang::parse(tag).unwrap_or_else(|| {
            tracing::warn!(tag, "unknown language, labels stay in English");
            Lang::En
        }),
    };

    let currency = record
        .currency
        .as_deref()
        .and_then(Currency::parse)
        .ok_or_else(|| {
            QrBillError::validation(
                "currency",
                match &record.currency {
                    Some(code) => format!("Currency must be CHF or EUR, not {:?}", code),
                    None => "Currency must be provided".to_string(),
                },
            )
        })?;

    let mut message = record.message.clone();
    match record.amount {
        Some(amount) if amount == 0.0 => {
            message = Some(lang.text("DO NOT USE FOR PAYMENT").to_string());
        }
        Some(amount) if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) => {
            return Err(QrBillError::validation(
                "amount",
                format!(
                    "Amount must be between 0.01 and 999 999 999.99, got {}",
                    amount
                ),
            ));
        }
        _ => {}
    }

    let creditor = validate_creditor(record.creditor.as_ref())?;
    let debtor = record
        .debtor
        .as_ref()
        .map(|d| validate_address("debtor", d))
        .transpose()?;

    let (reference_type, reference) =
        validate_reference(record.reference_type.as_deref(), record.reference.as_deref())?;

    if let Some(message) = &message {
        check_len("message", "Message", message, MAX_ADDITIONAL_INFO)?;
    }
    if let Some(info) = &record.billing_information {
        check_len(
            "billing_information",
            "Billing information",
            info,
            MAX_ADDITIONAL_INFO,
        )?;
    }
    let combined = message.as_deref().map_or(0, len)
        + record.billing_information.as_deref().map_or(0, len);
    if combined > MAX_ADDITIONAL_INFO {
        return Err(QrBillError::validation(
            "billing_information",
            format!(
                "Message and billing information together must not contain more than {} characters, got {}",
                MAX_ADDITIONAL_INFO, combined
            ),
        ));
    }

    let alternative_schemes = record.alternative_schemes.to_vec();
    if alternative_schemes.len() > MAX_ALTERNATIVE_SCHEMES
        || alternative_schemes
            .iter()
            .any(|s| len(s) > MAX_ALTERNATIVE_SCHEME_LEN)
    {
        return Err(QrBillError::validation(
            "alternative_schemes",
            "Alternative schemes must at most contain 2 strings with not more than 100 characters each",
        ));
    }

    tracing::debug!(
        lang = lang.tag(),
        currency = currency.code(),
        reference_type = reference_type.code(),
        debtor = debtor.is_some(),
        "validated payment record"
    );

    Ok(Bill {
        lang,
        creditor,
        debtor,
        amount: record.amount,
        currency,
        reference_type,
        reference,
        message,
        billing_information: record.billing_information.clone(),
        alternative_schemes,
    })
}
