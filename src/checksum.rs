//! # Checksum Engine
//!
//! Check-digit algorithms for the two reference schemes of the QR-bill and
//! for the creditor IBAN.
//!
//! | Scheme | Algorithm | Shape |
//! |--------|-----------|-------|
//! | QRR | recursive mod 10 (table driven) | 26 digits + 1 check digit |
//! | SCOR | ISO 7064 MOD 97-10 | `RF` + 2 check digits + payload, 5-25 chars |
//! | IBAN | ISO 13616 MOD 97-10 | `CH`/`LI` + 2 check digits + 17, 21 chars |
//!
//! Every function strips whitespace first and returns the compact form.
//! Shape problems are [`QrBillError::Format`], wrong check digits are
//! [`QrBillError::Checksum`].

use crate::error::{QrBillError, Result};

/// State transition table of the recursive mod 10 algorithm.
///
/// `QRR_TABLE[state][digit]` is the next state.
const QRR_TABLE: [[u8; 10]; 10] = [
    [0, 9, 4, 6, 8, 2, 7, 1, 3, 5],
    [9, 4, 6, 8, 2, 7, 1, 3, 5, 0],
    [4, 6, 8, 2, 7, 1, 3, 5, 0, 9],
    [6, 8, 2, 7, 1, 3, 5, 0, 9, 4],
    [8, 2, 7, 1, 3, 5, 0, 9, 4, 6],
    [2, 7, 1, 3, 5, 0, 9, 4, 6, 8],
    [7, 1, 3, 5, 0, 9, 4, 6, 8, 2],
    [1, 3, 5, 0, 9, 4, 6, 8, 2, 7],
    [3, 5, 0, 9, 4, 6, 8, 2, 7, 1],
    [5, 0, 9, 4, 6, 8, 2, 7, 1, 3],
];

/// Length of a QRR reference without its check digit.
pub const QRR_PAYLOAD_LEN: usize = 26;

fn compact(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compute the QRR check digit over ASCII digits.
///
/// Characters that are not ASCII digits make this a [`QrBillError::Format`].
pub fn qrr_check_digit(digits: &str) -> Result<u8> {
    let mut state = 0u8;
    for c in digits.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| QrBillError::Format(format!("'{}' is not a digit", c)))?;
        state = QRR_TABLE[state as usize][digit as usize];
    }
    Ok((10 - state) % 10)
}

/// Validate or complete a QRR reference.
///
/// 26 digits get the check digit appended; 27 digits must end with the
/// correct one.
///
/// ```
/// use qrbill::checksum::qrr_reference;
///
/// assert_eq!(
///     qrr_reference("21 00000 00003 13947 14300 0901").unwrap(),
///     "210000000003139471430009017"
/// );
/// ```
pub fn qrr_reference(reference: &str) -> Result<String> {
    let mut value = compact(reference);
    let len = value.len();
    if !(len == QRR_PAYLOAD_LEN || len == QRR_PAYLOAD_LEN + 1)
        || !value.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(QrBillError::Format(
            "QRR reference must contain 26 or 27 digits".into(),
        ));
    }

    let check = qrr_check_digit(&value[..QRR_PAYLOAD_LEN])?;
    let expected = char::from(b'0' + check);
    match value.chars().nth(QRR_PAYLOAD_LEN) {
        None => value.push(expected),
        Some(given) if given == expected => {}
        Some(_) => {
            return Err(QrBillError::Checksum(format!(
                "QRR reference contains an invalid check digit, should be {}",
                check
            )));
        }
    }
    Ok(value)
}

/// Remainder of the decimal expansion of `chars` modulo 97, with letters
/// expanded to two digits each (`A` = 10 ... `Z` = 35).
///
/// Computed incrementally so arbitrarily long inputs never overflow.
fn mod97(chars: impl Iterator<Item = char>) -> Option<u32> {
    let mut rem = 0u32;
    for c in chars {
        rem = match c.to_ascii_uppercase() {
            d @ '0'..='9' => (rem * 10 + (d as u32 - '0' as u32)) % 97,
            l @ 'A'..='Z' => (rem * 100 + (l as u32 - 55)) % 97,
            _ => return None,
        };
    }
    Some(rem)
}

/// Move the first four characters to the end and check `mod 97 == 1`.
fn iso7064_valid(value: &str) -> bool {
    let (head, tail) = value.split_at(4);
    mod97(tail.chars().chain(head.chars())) == Some(1)
}

/// Validate a SCOR (ISO 11649 creditor) reference.
///
/// The length and character check runs before the `RF` prefix check, so
/// some malformed inputs report the length error.
///
/// ```
/// use qrbill::checksum::scor_reference;
///
/// assert_eq!(scor_reference("RF48 5000056789012345").unwrap(), "RF485000056789012345");
/// assert!(scor_reference("RF48 5000056789012345d").is_err());
/// ```
pub fn scor_reference(reference: &str) -> Result<String> {
    let value = compact(reference);
    let len = value.chars().count();
    if !(5..=25).contains(&len) || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(QrBillError::Format(
            "SCOR reference must contain between 5 and 25 alpha-numeric characters".into(),
        ));
    }
    let bytes = value.as_bytes();
    if !(bytes.starts_with(b"RF") && bytes[2].is_ascii_digit() && bytes[3].is_ascii_digit()) {
        return Err(QrBillError::Format(
            "SCOR reference must start with RF and check digits".into(),
        ));
    }
    if !iso7064_valid(&value) {
        return Err(QrBillError::Checksum(
            "SCOR reference has invalid check digits".into(),
        ));
    }
    Ok(value)
}

/// Validate a Swiss or Liechtenstein IBAN.
pub fn iban(value: &str) -> Result<String> {
    let value = compact(value);
    let len = value.chars().count();
    if len != 21 {
        return Err(QrBillError::Format(format!(
            "IBAN must contain exactly 21 characters, got {}",
            len
        )));
    }
    if !(value.starts_with("CH") || value.starts_with("LI")) {
        return Err(QrBillError::Format(
            "IBAN must be a CH or LI account".into(),
        ));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(QrBillError::Format(
            "IBAN must only contain letters and digits".into(),
        ));
    }
    if !iso7064_valid(&value) {
        return Err(QrBillError::Checksum("IBAN has invalid check digits".into()));
    }
    Ok(value)
}
