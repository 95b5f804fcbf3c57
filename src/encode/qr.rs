//! QR module-grid encoding via the `qrcode` crate.

use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, QrResult, Version};
use serde::{Deserialize, Serialize};

use super::{ModuleGrid, QrEncoder};
use crate::error::{QrBillError, Result};

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

/// QR segment mode for the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrMode {
    /// Digits `0-9`
    Numeric,
    /// Digits, uppercase `A-Z` and ` $%*+-./:`
    Alphanumeric,
    Byte,
    /// Shift JIS double-byte characters
    Kanji,
}

impl QrMode {
    fn accepts(self, data: &[u8]) -> bool {
        match self {
            Self::Numeric => data.iter().all(u8::is_ascii_digit),
            Self::Alphanumeric => data
                .iter()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase() || b" $%*+-./:".contains(b)),
            Self::Byte => true,
            Self::Kanji => {
                data.len() % 2 == 0
                    && data.chunks(2).all(|pair| {
                        let cp = u16::from(pair[0]) << 8 | u16::from(pair[1]);
                        (0x8140..=0x9FFC).contains(&cp) || (0xE040..=0xEBBF).contains(&cp)
                    })
            }
        }
    }

    fn push(self, bits: &mut Bits, data: &[u8]) -> QrResult<()> {
        match self {
            Self::Numeric => bits.push_numeric_data(data),
            Self::Alphanumeric => bits.push_alphanumeric_data(data),
            Self::Byte => bits.push_byte_data(data),
            Self::Kanji => bits.push_kanji_data(data),
        }
    }
}

/// Options forwarded to the QR encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QrOptions {
    /// Fixed symbol version (1-40). `None` picks the smallest that fits.
    pub version: Option<i16>,
    /// Largest acceptable version when picking automatically.
    pub max_version: Option<i16>,
    pub level: QrErrorLevel,
    /// Single segment mode. `None` lets the encoder mix modes optimally.
    pub mode: Option<QrMode>,
}

fn encode_error(err: QrError) -> QrBillError {
    QrBillError::Encode(format!("QR code generation failed: {}", err))
}

/// Encode `data` as one segment in `mode`, at the fixed version or the
/// smallest one up to `max_version` that holds it.
fn encode_in_mode(
    data: &[u8],
    mode: QrMode,
    options: &QrOptions,
    ec_level: EcLevel,
) -> Result<QrCode> {
    if !mode.accepts(data) {
        return Err(QrBillError::Encode(format!(
            "data cannot be encoded in {:?} mode",
            mode
        )));
    }
    let versions = match options.version {
        Some(v) => v..=v,
        None => 1..=options.max_version.unwrap_or(40),
    };
    for v in versions {
        let mut bits = Bits::new(Version::Normal(v));
        match mode
            .push(&mut bits, data)
            .and_then(|()| bits.push_terminator(ec_level))
        {
            Ok(()) => return QrCode::with_bits(bits, ec_level).map_err(encode_error),
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(encode_error(e)),
        }
    }
    Err(QrBillError::Encode(format!(
        "{} bytes do not fit a QR code in {:?} mode",
        data.len(),
        mode
    )))
}

/// [`QrEncoder`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeEncoder;

impl QrEncoder for QrcodeEncoder {
    fn encode(&self, data: &[u8], options: &QrOptions) -> Result<ModuleGrid> {
        let ec_level = match options.level {
            QrErrorLevel::L => EcLevel::L,
            QrErrorLevel::M => EcLevel::M,
            QrErrorLevel::Q => EcLevel::Q,
            QrErrorLevel::H => EcLevel::H,
        };

        let code = match (options.mode, options.version) {
            (Some(mode), _) => encode_in_mode(data, mode, options, ec_level)?,
            (None, Some(v)) => {
                QrCode::with_version(data, Version::Normal(v), ec_level).map_err(encode_error)?
            }
            (None, None) => {
                QrCode::with_error_correction_level(data, ec_level).map_err(encode_error)?
            }
        };

        if let (Some(max), Version::Normal(v)) = (options.max_version, code.version()) {
            if v > max {
                return Err(QrBillError::Encode(format!(
                    "data needs QR version {}, maximum is {}",
                    v, max
                )));
            }
        }

        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        ModuleGrid::from_flat(code.width(), modules)
    }
}
