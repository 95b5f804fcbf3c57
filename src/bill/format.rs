//! Text formatting for the bill: amounts, addresses and the QR payload.

use super::{Address, AddressType, Bill};

/// Format an amount with two decimals and space-grouped thousands.
///
/// ```
/// use qrbill::bill::format::amount;
///
/// assert_eq!(amount(2500.25), "2 500.25");
/// assert_eq!(amount(999_999_999.99), "999 999 999.99");
/// assert_eq!(amount(7.0), "7.00");
/// ```
pub fn amount(value: f64) -> String {
    let plain = format!("{:.2}", value);
    let (int, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let (sign, digits) = match int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int),
    };

    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped.push('.');
    grouped.push_str(frac);
    grouped
}

/// Amount as written into the QR payload: two decimals, no grouping.
pub fn payload_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Multi-line address text as printed on the bill.
///
/// ```text
/// structured:  name            combined:  name
///              line1 line2                line1        (if present)
///              CC-postal town             CC-line2
/// ```
pub fn address(address: &Address) -> String {
    let mut lines = vec![address.name().to_string()];
    match address.address_type() {
        AddressType::Structured => {
            let street: Vec<&str> = [address.address_line1(), address.address_line2()]
                .into_iter()
                .flatten()
                .collect();
            if !street.is_empty() {
                lines.push(street.join(" "));
            }
            lines.push(format!(
                "{}-{} {}",
                address.country(),
                address.postal_code().unwrap_or_default(),
                address.town().unwrap_or_default()
            ));
        }
        AddressType::Combined => {
            if let Some(line1) = address.address_line1() {
                lines.push(line1.to_string());
            }
            lines.push(format!(
                "{}-{}",
                address.country(),
                address.address_line2().unwrap_or_default()
            ));
        }
    }
    lines.join("\n")
}

/// IBAN followed by the creditor address.
pub fn creditor_block(bill: &Bill) -> String {
    format!(
        "{}\n{}",
        bill.creditor().iban(),
        address(bill.creditor().address())
    )
}

/// Message and billing information, one per line.
pub fn additional_information(bill: &Bill) -> Option<String> {
    let parts: Vec<&str> = [bill.message(), bill.billing_information()]
        .into_iter()
        .flatten()
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

fn push_address(fields: &mut Vec<String>, address: &Address) {
    fields.push(address.address_type().code().to_string());
    fields.push(address.name().to_string());
    for part in [
        address.address_line1(),
        address.address_line2(),
        address.postal_code(),
        address.town(),
    ] {
        fields.push(part.unwrap_or_default().to_string());
    }
    fields.push(address.country().to_string());
}

/// Number of empty "ultimate creditor" fields in the payload.
const ULTIMATE_CREDITOR_FIELDS: usize = 7;

/// Build the QR code payload (CR-LF separated fields).
///
/// | Block | Fields |
/// |-------|--------|
/// | header | `SPC`, `0200`, `1` |
/// | creditor | IBAN, type, name, line 1, line 2, postal code, town, country |
/// | ultimate creditor | 7 empty fields |
/// | amount | amount or empty, currency |
/// | debtor | type .. country, only if present |
/// | reference | type, reference, message, `EPD` |
/// | billing | billing information, only if present |
pub fn payload(bill: &Bill) -> String {
    let mut fields: Vec<String> = ["SPC", "0200", "1"].map(String::from).to_vec();

    fields.push(bill.creditor().iban().to_string());
    push_address(&mut fields, bill.creditor().address());

    fields.extend(std::iter::repeat_n(String::new(), ULTIMATE_CREDITOR_FIELDS));

    fields.push(bill.amount().map(payload_amount).unwrap_or_default());
    fields.push(bill.currency().code().to_string());

    if let Some(debtor) = bill.debtor() {
        push_address(&mut fields, debtor);
    }

    fields.push(bill.reference_type().code().to_string());
    fields.push(bill.reference().unwrap_or_default().to_string());
    fields.push(bill.message().unwrap_or_default().to_string());
    fields.push("EPD".to_string());

    if let Some(info) = bill.billing_information() {
        fields.push(info.to_string());
    }

    fields.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{validate, AddressRecord, PaymentRecord};
    use pretty_assertions::assert_eq;

    fn bill(configure: impl FnOnce(&mut PaymentRecord)) -> Bill {
        let creditor = AddressRecord::structured("Max Muster & Söhne", "8000", "Seldwyla", "CH")
            .street("Musterstrasse", "123")
            .iban("CH4431999123000889012");
        let mut record = PaymentRecord::new(creditor, "CHF");
        configure(&mut record);
        validate(&record).unwrap()
    }

    #[test]
    fn test_amount_grouping() {
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(100.0), "100.00");
        assert_eq!(amount(1000.0), "1 000.00");
        assert_eq!(amount(1234567.891), "1 234 567.89");
    }

    #[test]
    fn test_structured_address() {
        let b = bill(|_| {});
        assert_eq!(
            address(b.creditor().address()),
            "Max Muster & Söhne\nMusterstrasse 123\nCH-8000 Seldwyla"
        );
    }

    #[test]
    fn test_structured_address_without_street() {
        let b = bill(|r| {
            r.debtor = Some(AddressRecord::structured("Simon", "9400", "Rorschach", "CH"))
        });
        assert_eq!(address(b.debtor().unwrap()), "Simon\nCH-9400 Rorschach");
    }

    #[test]
    fn test_combined_address() {
        let b = bill(|r| {
            r.debtor = Some(AddressRecord::combined(
                "Simon Muster",
                "Musterstrasse 1",
                "8000 Seldwyla",
                "CH",
            ))
        });
        assert_eq!(
            address(b.debtor().unwrap()),
            "Simon Muster\nMusterstrasse 1\nCH-8000 Seldwyla"
        );
    }

    #[test]
    fn test_additional_information() {
        assert_eq!(additional_information(&bill(|_| {})), None);
        let b = bill(|r| {
            r.message = Some("Invoice 1".into());
            r.billing_information = Some("//S1/10/1".into());
        });
        assert_eq!(
            additional_information(&b).as_deref(),
            Some("Invoice 1\n//S1/10/1")
        );
    }

    #[test]
    fn test_payload_minimal() {
        let b = bill(|_| {});
        let expected = [
            "SPC",
            "0200",
            "1",
            "CH4431999123000889012",
            "S",
            "Max Muster & Söhne",
            "Musterstrasse",
            "123",
            "8000",
            "Seldwyla",
            "CH",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "CHF",
            "NON",
            "",
            "",
            "EPD",
        ]
        .join("\r\n");
        assert_eq!(payload(&b), expected);
    }

    #[test]
    fn test_payload_full() {
        let b = bill(|r| {
            r.amount = Some(2500.25);
            r.debtor = Some(AddressRecord::combined(
                "Simon Muster",
                "Musterstrasse 1",
                "8000 Seldwyla",
                "CH",
            ));
            r.reference_type = Some("QRR".into());
            r.reference = Some("21000000000313947143000901".into());
            r.message = Some("Order 7".into());
            r.billing_information = Some("//S1/10/1".into());
        });
        let fields: Vec<String> = payload(&b).split("\r\n").map(String::from).collect();
        assert_eq!(fields[18], "2500.25");
        assert_eq!(fields[19], "CHF");
        assert_eq!(&fields[20..27], &[
            "K",
            "Simon Muster",
            "Musterstrasse 1",
            "8000 Seldwyla",
            "",
            "",
            "CH",
        ]);
        assert_eq!(&fields[27..], &[
            "QRR",
            "210000000003139471430009017",
            "Order 7",
            "EPD",
            "//S1/10/1",
        ]);
    }
}
