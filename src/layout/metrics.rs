//! Font metrics.
//!
//! Glyph shaping lives outside this crate; layout only needs advance widths.
//! [`StandardMetrics`] carries the AFM widths of the two base-14 fonts the
//! bill uses (Helvetica and Helvetica-Bold), which are metrically compatible
//! with Arial and Liberation Sans.

/// Advance-width provider.
pub trait FontMetrics {
    /// Width of `text` set in `font` at `size` points.
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64;

    /// Distance from the top of a line to its baseline.
    fn ascent(&self, _font: &str, size: f64) -> f64 {
        size * 0.718
    }
}

/// Helvetica widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

/// Fallback advance for characters outside the tables.
const DEFAULT_ADVANCE: u16 = 556;

/// Helvetica / Helvetica-Bold metrics; any font name containing `Bold`
/// uses the bold table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl StandardMetrics {
    fn advance(table: &[u16; 95], c: char) -> u16 {
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            _ => DEFAULT_ADVANCE,
        }
    }
}

impl FontMetrics for StandardMetrics {
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64 {
        let table = if font.contains("Bold") {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        };
        let units: u32 = text.chars().map(|c| Self::advance(table, c) as u32).sum();
        units as f64 * size / 1000.0
    }
}
