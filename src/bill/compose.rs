//! # Bill Layout
//!
//! Builds the receipt and payment part as layout blocks, fits both into
//! their fixed frames, and draws them followed by the separator lines and
//! scissors.
//!
//! ```text
//! ┌─ receipt 62mm ─┬──────────── payment part 148mm ───────────┐
//! │ Receipt        │ Payment part  │ Account / Payable to      │
//! │ Account ...    │ ┌──────────┐  │ Reference                 │
//! │ Reference      │ │    QR    │  │ Additional information    │
//! │ Payable by     │ │    ✚     │  │ Payable by                │
//! │                │ └──────────┘  │                           │
//! │ Currency Amount│ Currency Amount                           │
//! │  Acceptance pt │ alternative procedures                    │
//! └────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! Either the whole bill fits and is drawn, or nothing is drawn and a
//! [`QrBillError::LayoutOverflow`] names the region that did not fit.

use super::format;
use super::marks::{BlankField, CROSS_SIZE_MM, SwissCross};
use super::{Bill, ReferenceType};
use crate::color::Color;
use crate::components::QrCode;
use crate::config::BillStyle;
use crate::encode::QrErrorLevel;
use crate::error::{QrBillError, Result};
use crate::ir::{Op, Point, Program, TextRun};
use crate::layout::{
    Block, BoxFitter, Paragraph, Region, Row, Sides, Span, Stack, StackFitter, TextAlign,
    TextStyle,
};
use crate::units::{BillGeometry, mm};

const SECTION_HEADING_MM: f64 = 7.0;

const RECEIPT_INFO_MM: f64 = 56.0;
const RECEIPT_AMOUNT_MM: f64 = 14.0;
const RECEIPT_CURRENCY_COLUMN_MM: f64 = 26.0;

const PAYMENT_LEFT_COLUMN_MM: f64 = 51.0;
const PAYMENT_COLUMN_HEIGHT_MM: f64 = 85.0;
const PAYMENT_AMOUNT_MM: f64 = 22.0;
const PAYMENT_CURRENCY_COLUMN_MM: f64 = 23.0;
const QR_PADDING_MM: f64 = 5.0;

const SEPARATOR_LINE_WIDTH: f64 = 0.5;
const SCISSORS: &str = "\u{2702}";
const SCISSORS_FONT: &str = "ZapfDingbats";
const SCISSORS_SIZE: f64 = 15.0;

/// Text styles resolved from a [`BillStyle`].
struct Styles {
    section_heading: TextStyle,
    payment_heading: TextStyle,
    payment_value: TextStyle,
    receipt_heading: TextStyle,
    receipt_value: TextStyle,
    alt_heading: TextStyle,
    alt_value: TextStyle,
}

impl Styles {
    fn new(style: &BillStyle) -> Self {
        Self {
            section_heading: style.section_heading.text_style(),
            payment_heading: style.payment_heading.text_style(),
            payment_value: style.payment_value.text_style(),
            receipt_heading: style.receipt_heading.text_style(),
            receipt_value: style.receipt_value.text_style(),
            alt_heading: style.alternative_procedures_heading.text_style(),
            alt_value: style.alternative_procedures_value.text_style(),
        }
    }
}

fn heading(text: &str, style: &TextStyle) -> Paragraph {
    Paragraph::new(text, style)
}

/// A value followed by a blank line.
fn value(text: impl Into<String>, style: &TextStyle) -> Paragraph {
    Paragraph::new(text, style).padding(Sides::bottom(style.line_height))
}

/// An amount-block label, 1mm above its value.
fn label(text: &str, style: &TextStyle) -> Paragraph {
    Paragraph::new(text, style).padding(Sides::bottom(mm(1.0)))
}

fn blank_field(width_mm: f64, height_mm: f64) -> Block {
    Block::graphic(mm(width_mm), mm(height_mm), BlankField)
}

/// Account, reference and payer blocks shared by both parts.
fn push_party_info(
    info: &mut Stack,
    bill: &Bill,
    heading_style: &TextStyle,
    value_style: &TextStyle,
    additional_information: bool,
    blank: (f64, f64),
) {
    info.push(heading(bill.text("Account / Payable to"), heading_style));
    info.push(value(format::creditor_block(bill), value_style));

    if bill.reference_type() != ReferenceType::Non {
        info.push(heading(bill.text("Reference"), heading_style));
        info.push(value(bill.reference().unwrap_or_default(), value_style));
    }

    if additional_information {
        if let Some(text) = format::additional_information(bill) {
            info.push(heading(bill.text("Additional information"), heading_style));
            info.push(value(text, value_style));
        }
    }

    match bill.debtor() {
        Some(debtor) => {
            info.push(heading(bill.text("Payable by"), heading_style));
            info.push(value(format::address(debtor), value_style));
        }
        None => {
            info.push(heading(bill.text("Payable by (name/address)"), heading_style));
            info.push(blank_field(blank.0, blank.1));
        }
    }
}

fn receipt(bill: &Bill, styles: &Styles, geometry: &BillGeometry) -> Stack {
    let mut info = Stack::new().height(mm(RECEIPT_INFO_MM));
    push_party_info(
        &mut info,
        bill,
        &styles.receipt_heading,
        &styles.receipt_value,
        false,
        (52.0, 20.0),
    );

    let heading_style = &styles.receipt_heading;
    let value_style = &styles.receipt_value;
    let currency = bill.currency().code();
    let amount = match bill.amount() {
        Some(amount) => Row::new()
            .cell(
                Some(mm(RECEIPT_CURRENCY_COLUMN_MM)),
                Stack::new()
                    .child(label(bill.text("Currency"), heading_style))
                    .child(value(currency, value_style)),
            )
            .cell(
                None,
                Stack::new()
                    .child(label(bill.text("Amount"), heading_style))
                    .child(value(format::amount(amount), value_style)),
            ),
        None => Row::new()
            .cell(
                None,
                Stack::new()
                    .child(label(
                        &format!("{}   {}", bill.text("Currency"), bill.text("Amount")),
                        heading_style,
                    ))
                    .child(value(currency, value_style)),
            )
            .cell(
                Some(mm(31.0)),
                Stack::new()
                    .child(Block::Spacer(2.0))
                    .child(blank_field(30.0, 10.0)),
            ),
    };

    Stack::new()
        .width(mm(geometry.receipt_width_mm))
        .padding(Sides::all(mm(geometry.padding_mm)))
        .child(heading(bill.text("Receipt"), &styles.section_heading).height(mm(SECTION_HEADING_MM)))
        .child(info)
        .child(Stack::new().height(mm(RECEIPT_AMOUNT_MM)).child(amount))
        .child(heading(bill.text("Acceptance point"), heading_style).align(TextAlign::Right))
}

fn payment_amount(bill: &Bill, styles: &Styles) -> Stack {
    let heading_style = &styles.payment_heading;
    let value_style = &styles.payment_value;
    let currency = bill.currency().code();
    let amount = Stack::new().height(mm(PAYMENT_AMOUNT_MM));
    match bill.amount() {
        Some(amount_value) => amount.child(
            Row::new()
                .cell(
                    Some(mm(PAYMENT_CURRENCY_COLUMN_MM)),
                    Stack::new()
                        .child(label(bill.text("Currency"), heading_style))
                        .child(value(currency, value_style)),
                )
                .cell(
                    None,
                    Stack::new()
                        .child(label(bill.text("Amount"), heading_style))
                        .child(value(format::amount(amount_value), value_style)),
                ),
        ),
        None => amount
            .child(label(
                &format!("{}    {}", bill.text("Currency"), bill.text("Amount")),
                heading_style,
            ))
            .child(
                Row::new()
                    .cell(None, value(currency, value_style))
                    .cell(Some(mm(41.0)), blank_field(40.0, 15.0)),
            ),
    }
}

fn payment(bill: &Bill, styles: &Styles, geometry: &BillGeometry) -> Stack {
    // The QR code takes the square left between heading and amount block
    let qr_edge = (PAYMENT_LEFT_COLUMN_MM - QR_PADDING_MM).min(
        PAYMENT_COLUMN_HEIGHT_MM - SECTION_HEADING_MM - PAYMENT_AMOUNT_MM - 2.0 * QR_PADDING_MM,
    );
    let qr_center_y = PAYMENT_AMOUNT_MM + QR_PADDING_MM + qr_edge / 2.0;
    let qr = QrCode::new(bill.payload()).level(QrErrorLevel::M);

    let left = Stack::new()
        .height(mm(PAYMENT_COLUMN_HEIGHT_MM))
        .child(
            heading(bill.text("Payment part"), &styles.section_heading)
                .height(mm(SECTION_HEADING_MM)),
        )
        .child(qr.into_block(Sides::new(
            mm(QR_PADDING_MM),
            mm(QR_PADDING_MM),
            mm(QR_PADDING_MM),
            0.0,
        )))
        .child(Block::Positioned {
            x: mm(qr_edge / 2.0 - CROSS_SIZE_MM / 2.0),
            y: mm(qr_center_y - CROSS_SIZE_MM / 2.0),
            width: mm(CROSS_SIZE_MM),
            height: mm(CROSS_SIZE_MM),
            graphic: Box::new(SwissCross),
        })
        .child(payment_amount(bill, styles));

    let mut info = Stack::new().height(mm(PAYMENT_COLUMN_HEIGHT_MM));
    push_party_info(
        &mut info,
        bill,
        &styles.payment_heading,
        &styles.payment_value,
        true,
        (65.0, 25.0),
    );

    let mut part = Stack::new()
        .width(mm(geometry.payment_width_mm))
        .padding(Sides::all(mm(geometry.padding_mm)))
        .child(
            Row::new()
                .cell(Some(mm(PAYMENT_LEFT_COLUMN_MM)), left)
                .cell(None, info),
        );

    for scheme in bill.alternative_schemes() {
        let (provider, data) = match scheme.split_once('/') {
            Some((provider, data)) => (provider, Some(data)),
            None => (scheme.as_str(), None),
        };
        let mut spans = vec![Span {
            text: provider.to_string(),
            style: styles.alt_heading.clone(),
        }];
        if let Some(data) = data {
            spans.push(Span {
                text: data.to_string(),
                style: styles.alt_value.clone(),
            });
        }
        part.push(Paragraph::spans(spans));
    }
    part
}

/// The receipt and payment-part regions of `bill`.
pub fn regions(bill: &Bill, style: &BillStyle) -> Vec<Region> {
    let geometry = BillGeometry::QR_BILL;
    let styles = Styles::new(style);
    vec![
        Region {
            name: "receipt".into(),
            x: 0.0,
            y: 0.0,
            width: geometry.receipt_width(),
            height: geometry.height(),
            block: receipt(bill, &styles, &geometry).into(),
        },
        Region {
            name: "payment part".into(),
            x: geometry.receipt_width(),
            y: 0.0,
            width: geometry.payment_width(),
            height: geometry.height(),
            block: payment(bill, &styles, &geometry).into(),
        },
    ]
}

/// Dashed separator lines and the two scissors symbols.
fn separators(program: &mut Program, geometry: &BillGeometry) -> Result<()> {
    let width = geometry.width();
    let height = geometry.height();
    let receipt = geometry.receipt_width();
    let scissors = |x: f64, y: f64| {
        Op::Text(TextRun {
            x,
            y,
            text: SCISSORS.into(),
            font: SCISSORS_FONT.into(),
            size: SCISSORS_SIZE,
        })
    };

    program.scoped(|p| {
        p.push(Op::SetStrokeColor(Color::BLACK));
        p.push(Op::SetLineWidth(SEPARATOR_LINE_WIDTH));
        p.push(Op::SetDashPattern(vec![2.0]));
        p.push(Op::Line {
            from: Point::new(receipt, 0.0),
            to: Point::new(receipt, height),
        });
        p.push(Op::Line {
            from: Point::new(0.0, height),
            to: Point::new(width, height),
        });
        Ok(())
    })?;

    program.push(scissors(mm(5.0), mm(103.1)));
    program.scoped(|p| {
        p.push(Op::Transform([0.0, -1.0, 1.0, 0.0, mm(60.175), mm(100.0)]));
        p.push(scissors(0.0, 0.0));
        Ok(())
    })
}

/// Lay out and draw `bill` with the default style.
pub fn compose(bill: &Bill) -> Result<Program> {
    compose_with(bill, &BillStyle::default(), &StackFitter::standard())
}

/// Lay out and draw `bill`.
///
/// Fails with [`QrBillError::LayoutOverflow`] before drawing anything if
/// either region does not fit.
pub fn compose_with(bill: &Bill, style: &BillStyle, fitter: &dyn BoxFitter) -> Result<Program> {
    let geometry = BillGeometry::QR_BILL;
    let fit = fitter.fit(&regions(bill, style))?;
    if !fit.success() {
        let reasons: Vec<String> = fit
            .failures()
            .map(|(region, reason)| format!("{}: {}", region, reason))
            .collect();
        return Err(QrBillError::LayoutOverflow(format!(
            "the QR-bill could not be fit ({})",
            reasons.join("; ")
        )));
    }

    let mut program = Program::new();
    program.scoped(|p| {
        p.push(Op::SetFillColor(Color::BLACK));
        fit.draw(p)?;
        separators(p, &geometry)
    })?;

    let program = program.optimize();
    tracing::debug!(ops = program.len(), "composed QR-bill");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{AddressRecord, PaymentRecord, validate};
    use crate::layout::FitResult;

    fn record() -> PaymentRecord {
        let creditor = AddressRecord::structured("Max Muster & Söhne", "8000", "Seldwyla", "CH")
            .street("Musterstrasse", "123")
            .iban("CH4431999123000889012");
        PaymentRecord::new(creditor, "CHF")
    }

    fn texts(program: &Program) -> Vec<String> {
        program
            .iter()
            .filter_map(|op| match op {
                Op::Text(run) => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    fn fit(bill: &Bill) -> FitResult {
        StackFitter::standard()
            .fit(&regions(bill, &BillStyle::default()))
            .unwrap()
    }

    #[test]
    fn test_minimal_bill_fits() {
        let bill = validate(&record()).unwrap();
        let program = compose(&bill).unwrap();
        let texts = texts(&program);
        for label in [
            "Receipt",
            "Payment part",
            "Account / Payable to",
            "Payable by (name/address)",
            "Acceptance point",
            "CH4431999123000889012",
        ] {
            assert!(texts.iter().any(|t| t == label), "missing {}", label);
        }
        // Without a reference the reference block is omitted
        assert!(!texts.iter().any(|t| t == "Reference"));
        // Two blank payer fields and two blank amount fields
        assert_eq!(program.count(|op| matches!(op, Op::Polyline(_))), 16);
    }

    #[test]
    fn test_amount_block() {
        let mut r = record();
        r.amount = Some(2500.25);
        let program = compose(&validate(&r).unwrap()).unwrap();
        let texts = texts(&program);
        assert_eq!(texts.iter().filter(|t| *t == "2 500.25").count(), 2);
        // Only the payer fields are blank
        assert_eq!(program.count(|op| matches!(op, Op::Polyline(_))), 8);
    }

    #[test]
    fn test_localized_labels() {
        let mut r = record();
        r.lang = Some("it".into());
        let program = compose(&validate(&r).unwrap()).unwrap();
        let texts = texts(&program);
        assert!(texts.iter().any(|t| t == "Ricevuta"));
        assert!(texts.iter().any(|t| t == "Valuta Importo"));
    }

    #[test]
    fn test_reference_and_additional_information() {
        let mut r = record();
        r.reference_type = Some("QRR".into());
        r.reference = Some("21000000000313947143000901".into());
        r.message = Some("Order".into());
        let program = compose(&validate(&r).unwrap()).unwrap();
        let texts = texts(&program);
        assert_eq!(texts.iter().filter(|t| *t == "Reference").count(), 2);
        assert_eq!(
            texts.iter().filter(|t| *t == "Additional information").count(),
            1
        );
        assert!(texts.iter().any(|t| t == "210000000003139471430009017"));
    }

    #[test]
    fn test_alternative_schemes_split_at_first_slash() {
        let mut r = record();
        r.alternative_schemes = "eBill/B/41010560425610173".into();
        let program = compose(&validate(&r).unwrap()).unwrap();
        let texts = texts(&program);
        assert!(texts.iter().any(|t| t == "eBill"));
        assert!(texts.iter().any(|t| t == "B/41010560425610173"));
    }

    #[test]
    fn test_cross_centered_on_qr_code() {
        let bill = validate(&record()).unwrap();
        let fit = fit(&bill);
        let payment = &fit.regions[1];
        let qr = payment
            .placements
            .iter()
            .find(|p| p.program.iter().any(|op| matches!(op, Op::SetDashPattern(_))))
            .unwrap();
        let cross = payment
            .placements
            .iter()
            .find(|p| (p.width - mm(CROSS_SIZE_MM)).abs() < 1e-9)
            .unwrap();
        assert!((qr.width - mm(46.0)).abs() < 1e-6);
        let qr_center = (qr.x + qr.width / 2.0, qr.y + qr.height / 2.0);
        let cross_center = (cross.x + cross.width / 2.0, cross.y + cross.height / 2.0);
        assert!((qr_center.0 - cross_center.0).abs() < 1e-6);
        assert!((qr_center.1 - cross_center.1).abs() < 1e-6);
    }

    #[test]
    fn test_separators_and_scissors() {
        let bill = validate(&record()).unwrap();
        let program = compose(&bill).unwrap();
        assert!(program.iter().any(|op| *op
            == Op::Line {
                from: Point::new(mm(62.0), 0.0),
                to: Point::new(mm(62.0), mm(105.0)),
            }));
        assert_eq!(texts(&program).iter().filter(|t| *t == SCISSORS).count(), 2);
        assert!(program.iter().any(|op| *op == Op::SetDashPattern(vec![2.0])));
    }

    #[test]
    fn test_long_message_overflows() {
        // Longer than validation allows; exercises the layout alone
        let mut r = record();
        r.message = Some("Lorem ipsum ".repeat(10));
        let valid = validate(&r).unwrap();
        let long = Bill {
            message: Some("Lorem ipsum dolor sit amet ".repeat(52)),
            ..valid
        };
        let err = compose(&long).unwrap_err();
        assert!(matches!(err, QrBillError::LayoutOverflow(_)));
        assert!(err.to_string().contains("payment part"));
    }

    #[test]
    fn test_all_text_inside_bill() {
        let mut r = record();
        r.amount = Some(999_999_999.99);
        r.debtor = Some(AddressRecord::combined(
            "Simon Muster",
            "Musterstrasse 1",
            "8000 Seldwyla",
            "CH",
        ));
        let bill = validate(&r).unwrap();
        let fit = fit(&bill);
        assert!(fit.success());
        for placement in fit.regions.iter().flat_map(|r| &r.placements) {
            assert!(placement.y >= -1e-6, "{:?}", placement);
            assert!(placement.y + placement.height <= mm(105.0) + 1e-6);
        }
    }
}
