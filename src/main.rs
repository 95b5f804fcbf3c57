//! # QRBill CLI
//!
//! Command-line interface for validating and previewing Swiss QR-bills.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a payment record and write a PNG preview
//! qrbill bill invoice.json --png bill.png
//!
//! # Print the QR payload or the drawing commands
//! qrbill bill invoice.json --payload
//! qrbill bill invoice.json --ops
//!
//! # Check a reference number (a 26-digit QRR gets its check digit appended)
//! qrbill reference "21 00000 00003 13947 14300 0901"
//! qrbill reference RF18539007547034
//!
//! # Standalone QR code or barcode previews
//! qrbill qr "https://example.com" --png qr.png
//! qrbill qr 0123456789 --level h --mode numeric
//! qrbill barcode code128 "Hello" --height 40 --png barcode.png
//!
//! # More logging (RUST_LOG also works)
//! qrbill -v bill invoice.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use qrbill::{
    QrBillError,
    bill::{self, PaymentRecord},
    checksum,
    components::{Barcode, QrCode},
    config::BillStyle,
    encode::{QrErrorLevel, QrMode},
    ir::Program,
    layout::StackFitter,
    preview,
    units::BillGeometry,
};

/// QRBill - Swiss QR-bill utility
#[derive(Parser, Debug)]
#[command(name = "qrbill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a payment record (JSON) and lay out the bill
    Bill {
        /// Payment record file
        file: PathBuf,

        /// Text style overrides (JSON)
        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,

        /// Write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Preview resolution
        #[arg(long, default_value_t = preview::DEFAULT_DPI)]
        dpi: f64,

        /// Print the QR code payload
        #[arg(long)]
        payload: bool,

        /// Print the drawing commands as JSON
        #[arg(long)]
        ops: bool,
    },

    /// Validate a QR or creditor reference
    Reference {
        reference: String,

        /// Reference kind (guessed from the `RF` prefix when omitted)
        #[arg(long, value_enum)]
        kind: Option<ReferenceKind>,
    },

    /// Draw a QR code
    Qr {
        data: String,

        /// Edge length in points
        #[arg(long, default_value_t = 144.0)]
        size: f64,

        /// Error correction level
        #[arg(long, value_enum, ignore_case = true, default_value_t = Level::M)]
        level: Level,

        /// Encode the data in a single segment mode
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        #[arg(long, default_value_t = preview::DEFAULT_DPI)]
        dpi: f64,
    },

    /// Draw a linear barcode
    Barcode {
        /// code39, code93, code128, code11, codabar, ean13, ean8 or itf
        symbology: String,

        data: String,

        /// Width in points
        #[arg(long)]
        width: Option<f64>,

        /// Height in points
        #[arg(long)]
        height: Option<f64>,

        /// Write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        #[arg(long, default_value_t = preview::DEFAULT_DPI)]
        dpi: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReferenceKind {
    Qrr,
    Scor,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Level {
    L,
    M,
    Q,
    H,
}

impl From<Level> for QrErrorLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::L => Self::L,
            Level::M => Self::M,
            Level::Q => Self::Q,
            Level::H => Self::H,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

impl From<Mode> for QrMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Numeric => Self::Numeric,
            Mode::Alphanumeric => Self::Alphanumeric,
            Mode::Byte => Self::Byte,
            Mode::Kanji => Self::Kanji,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), QrBillError> {
    match cli.command {
        Commands::Bill {
            file,
            style,
            png,
            dpi,
            payload,
            ops,
        } => {
            let text = std::fs::read_to_string(&file)?;
            let record: PaymentRecord = serde_json::from_str(&text)?;
            let bill = bill::validate(&record)?;

            if payload {
                println!("{}", bill.payload());
            }

            let style = match style {
                Some(path) => BillStyle::from_file(path)?,
                None => BillStyle::default(),
            };
            let program = bill::compose_with(&bill, &style, &StackFitter::standard())?;

            if ops {
                println!("{}", serde_json::to_string_pretty(&program)?);
            }

            let geometry = BillGeometry::QR_BILL;
            if let Some(path) = png {
                save_png(&path, &program, geometry.width(), geometry.height(), dpi)?;
            }
            if !payload && !ops {
                println!(
                    "{} is a valid QR-bill ({} drawing commands)",
                    file.display(),
                    program.len()
                );
            }
        }

        Commands::Reference { reference, kind } => {
            let kind = kind.unwrap_or_else(|| {
                if reference.trim_start().to_ascii_uppercase().starts_with("RF") {
                    ReferenceKind::Scor
                } else {
                    ReferenceKind::Qrr
                }
            });
            let normalized = match kind {
                ReferenceKind::Qrr => checksum::qrr_reference(&reference)?,
                ReferenceKind::Scor => checksum::scor_reference(&reference)?,
            };
            println!("{}", normalized);
        }

        Commands::Qr {
            data,
            size,
            level,
            mode,
            png,
            dpi,
        } => {
            let mut qr = QrCode::new(data).size(size).level(level.into());
            if let Some(mode) = mode {
                qr = qr.mode(mode.into());
            }
            let program = qr.render()?;
            output(png.as_deref(), &program, size, size, dpi)?;
        }

        Commands::Barcode {
            symbology,
            data,
            width,
            height,
            png,
            dpi,
        } => {
            let mut barcode = Barcode::new(symbology, data);
            if let Some(width) = width {
                barcode = barcode.width(width);
            }
            if let Some(height) = height {
                barcode = barcode.height(height);
            }
            let composite = barcode.render()?;
            output(
                png.as_deref(),
                &composite.program,
                composite.width,
                composite.height,
                dpi,
            )?;
        }
    }

    Ok(())
}

/// Write a PNG when a path is given, otherwise print the commands as JSON.
fn output(
    png: Option<&Path>,
    program: &Program,
    width: f64,
    height: f64,
    dpi: f64,
) -> Result<(), QrBillError> {
    match png {
        Some(path) => save_png(path, program, width, height, dpi),
        None => {
            println!("{}", serde_json::to_string_pretty(program)?);
            Ok(())
        }
    }
}

fn save_png(
    path: &Path,
    program: &Program,
    width: f64,
    height: f64,
    dpi: f64,
) -> Result<(), QrBillError> {
    let png = preview::render_png(program, width, height, dpi)?;
    std::fs::write(path, png)?;
    println!("Saved to {}", path.display());
    Ok(())
}
