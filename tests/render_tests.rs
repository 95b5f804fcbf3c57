//! # Rendering Tests
//!
//! Rasterizes drawing programs and checks pixels, so the scanline renderer,
//! the vector compositor and the bill layout are verified by what they
//! actually paint.

use image::GrayImage;
use qrbill::bill::{self, PaymentRecord};
use qrbill::components::{Barcode, QrCode};
use qrbill::encode::QrcodeEncoder;
use qrbill::preview;
use qrbill::units::{BillGeometry, mm};

const SAMPLE_BILL_JSON: &str = include_str!("../src/fixtures/sample-bill.json");

fn dark(image: &GrayImage, x: u32, y: u32) -> bool {
    image.get_pixel(x, y).0[0] < 128
}

fn dark_ratio(image: &GrayImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> f64 {
    let total = (xs.len() * ys.len()) as f64;
    let count = ys
        .flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| dark(image, x, y))
        .count();
    count as f64 / total
}

#[test]
fn test_qr_scanlines_match_modules() {
    let qr = QrCode::new("https://example.com").code_size(2).size(100.0);
    let grid = qr.encode(&QrcodeEncoder).unwrap();
    assert_eq!(grid.col_count(), 25);

    // 4pt modules at 72 dpi: 4px per module
    let program = qr.render().unwrap();
    let image = preview::rasterize(&program, 100.0, 100.0, 72.0).unwrap();
    for row in 0..grid.row_count() {
        for col in 0..grid.col_count() {
            let (x, y) = (col as u32 * 4 + 2, row as u32 * 4 + 2);
            assert_eq!(
                dark(&image, x, y),
                grid.is_dark(row, col),
                "module ({}, {})",
                row,
                col
            );
        }
    }
}

#[test]
fn test_barcode_bars_painted() {
    let composite = Barcode::new("code128", "QRBILL")
        .height(40.0)
        .param("show_text", false)
        .render()
        .unwrap();
    let image = preview::rasterize(&composite.program, composite.width, composite.height, 144.0)
        .unwrap();
    let middle = image.height() / 2;
    let row: Vec<bool> = (0..image.width()).map(|x| dark(&image, x, middle)).collect();
    assert!(row.iter().any(|d| *d));
    assert!(row.iter().any(|d| !*d));
    // Bars alternate, so a row has several dark/light transitions
    let transitions = row.windows(2).filter(|w| w[0] != w[1]).count();
    assert!(transitions > 20, "only {} transitions", transitions);
}

#[test]
fn test_bill_preview() {
    let record: PaymentRecord = serde_json::from_str(SAMPLE_BILL_JSON).unwrap();
    let bill = bill::validate(&record).unwrap();
    let program = bill::compose(&bill).unwrap();

    let geometry = BillGeometry::QR_BILL;
    let image = preview::rasterize(&program, geometry.width(), geometry.height(), 72.0).unwrap();
    assert_eq!(image.dimensions(), (595, 298));

    // Dashed separator between receipt and payment part
    let x = mm(62.0) as u32;
    let column: Vec<bool> = (0..image.height()).map(|y| dark(&image, x, y)).collect();
    assert!(column.iter().filter(|d| **d).count() > 100);
    assert!(column.iter().filter(|d| !**d).count() > 50);

    // The QR code is roughly half dark
    let qr_left = mm(67.0) as u32;
    let qr_top = mm(105.0 - 78.0) as u32;
    let side = mm(46.0) as u32;
    let ratio = dark_ratio(&image, qr_left + 4..qr_left + side - 4, qr_top + 4..qr_top + side - 4);
    assert!(ratio > 0.3 && ratio < 0.8, "QR dark ratio {}", ratio);

    // The receipt's right margin stays empty
    let margin = mm(58.0) as u32..mm(60.0) as u32;
    assert_eq!(dark_ratio(&image, margin, 20..mm(95.0) as u32), 0.0);
}

#[test]
fn test_bill_png() {
    let record: PaymentRecord = serde_json::from_str(SAMPLE_BILL_JSON).unwrap();
    let program = bill::compose(&bill::validate(&record).unwrap()).unwrap();
    let png = preview::render_png(&program, mm(210.0), mm(105.0), 150.0).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 1240);
    assert_eq!(decoded.height(), 620);
}
