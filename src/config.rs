//! # Bill Style Configuration
//!
//! Fonts and sizes of the QR-bill text parts. Defaults follow the QR-bill
//! style guide:
//!
//! | Part | Font | Size | Line height |
//! |------|------|------|-------------|
//! | section heading | Helvetica-Bold | 11 | 13 |
//! | payment heading | Helvetica-Bold | 8 | 11 |
//! | payment value | Helvetica | 10 | 11 |
//! | receipt heading | Helvetica-Bold | 6 | 9 |
//! | receipt value | Helvetica | 8 | 9 |
//! | alternative procedures heading | Helvetica-Bold | 7 | 8 |
//! | alternative procedures value | Helvetica | 7 | 8 |
//!
//! Value parts are followed by one blank line of their own line height.
//!
//! ## Usage
//!
//! ```
//! use qrbill::config::BillStyle;
//!
//! // Override a single part; everything else keeps its default
//! let style: BillStyle = serde_json::from_str(
//!     r#"{ "payment_value": { "size": 9 } }"#,
//! ).unwrap();
//! assert_eq!(style.payment_value.size, 9.0);
//! assert_eq!(style.payment_value.line_height, 11.0);
//! assert_eq!(style.receipt_value.size, 8.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::layout::TextStyle;

/// Font settings of one text part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartStyle {
    pub font: String,
    pub size: f64,
    pub line_height: f64,
}

impl PartStyle {
    fn regular(size: f64, line_height: f64) -> Self {
        Self {
            font: "Helvetica".into(),
            size,
            line_height,
        }
    }

    fn bold(size: f64, line_height: f64) -> Self {
        Self {
            font: "Helvetica-Bold".into(),
            size,
            line_height,
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: self.font.clone(),
            size: self.size,
            line_height: self.line_height,
        }
    }
}

/// Deserializes a part from a partial object, filling gaps from `base`.
#[derive(Deserialize)]
struct PartOverride {
    font: Option<String>,
    size: Option<f64>,
    line_height: Option<f64>,
}

impl PartOverride {
    fn apply(self, base: PartStyle) -> PartStyle {
        PartStyle {
            font: self.font.unwrap_or(base.font),
            size: self.size.unwrap_or(base.size),
            line_height: self.line_height.unwrap_or(base.line_height),
        }
    }
}

/// Text styles of every bill part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillStyle {
    pub section_heading: PartStyle,
    pub payment_heading: PartStyle,
    pub payment_value: PartStyle,
    pub receipt_heading: PartStyle,
    pub receipt_value: PartStyle,
    pub alternative_procedures_heading: PartStyle,
    pub alternative_procedures_value: PartStyle,
}

impl Default for BillStyle {
    fn default() -> Self {
        Self {
            section_heading: PartStyle::bold(11.0, 13.0),
            payment_heading: PartStyle::bold(8.0, 11.0),
            payment_value: PartStyle::regular(10.0, 11.0),
            receipt_heading: PartStyle::bold(6.0, 9.0),
            receipt_value: PartStyle::regular(8.0, 9.0),
            alternative_procedures_heading: PartStyle::bold(7.0, 8.0),
            alternative_procedures_value: PartStyle::regular(7.0, 8.0),
        }
    }
}

impl<'de> Deserialize<'de> for BillStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Overrides {
            section_heading: Option<PartOverride>,
            payment_heading: Option<PartOverride>,
            payment_value: Option<PartOverride>,
            receipt_heading: Option<PartOverride>,
            receipt_value: Option<PartOverride>,
            alternative_procedures_heading: Option<PartOverride>,
            alternative_procedures_value: Option<PartOverride>,
        }

        let o = Overrides::deserialize(deserializer)?;
        let d = BillStyle::default();
        let merge = |part: Option<PartOverride>, base: PartStyle| match part {
            Some(part) => part.apply(base),
            None => base,
        };
        Ok(BillStyle {
            section_heading: merge(o.section_heading, d.section_heading),
            payment_heading: merge(o.payment_heading, d.payment_heading),
            payment_value: merge(o.payment_value, d.payment_value),
            receipt_heading: merge(o.receipt_heading, d.receipt_heading),
            receipt_value: merge(o.receipt_value, d.receipt_value),
            alternative_procedures_heading: merge(
                o.alternative_procedures_heading,
                d.alternative_procedures_heading,
            ),
            alternative_procedures_value: merge(
                o.alternative_procedures_value,
                d.alternative_procedures_value,
            ),
        })
    }
}

impl BillStyle {
    /// Load a style from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = BillStyle::default();
        assert_eq!(style.section_heading.size, 11.0);
        assert_eq!(style.payment_heading.font, "Helvetica-Bold");
        assert_eq!(style.receipt_value.line_height, 9.0);
        assert_eq!(style.alternative_procedures_value.size, 7.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        let style: BillStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(style, BillStyle::default());
    }

    #[test]
    fn test_unknown_part_rejected() {
        assert!(serde_json::from_str::<BillStyle>(r#"{"footer": {}}"#).is_err());
    }

    #[test]
    fn test_font_override() {
        let style: BillStyle =
            serde_json::from_str(r#"{"receipt_heading": {"font": "Arial-Bold"}}"#).unwrap();
        assert_eq!(style.receipt_heading.font, "Arial-Bold");
        assert_eq!(style.receipt_heading.size, 6.0);
    }
}
