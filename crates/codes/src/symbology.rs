use crate::error::CodeError;
use crate::raster::{CodeImage, ModuleGrid};
use barcoders::sym::code128::Code128;
use datamatrix::{DataMatrix, SymbolList};
use qrcode::{EcLevel, QrCode};
use std::fmt;

/// Pixel size of one module for QR and Code 128 symbols.
pub const DEFAULT_MAGNIFICATION: u32 = 3;
/// Pixel size of one DataMatrix module when it is the only code on the label.
pub const SOLE_DATAMATRIX_MAGNIFICATION: u32 = 5;
/// Height of Code 128 bars in pixels.
pub const BAR_HEIGHT_PX: u32 = 36;

const QR_QUIET_ZONE: u32 = 4;
const CODE128_QUIET_ZONE: u32 = 10;
const DATAMATRIX_QUIET_ZONE: u32 = 1;

// Code set selectors understood by `barcoders`.
const CODE_SET_B: char = 'Ɓ';
const CODE_SET_C: char = 'Ć';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Qr,
    Code128,
    DataMatrix,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Qr => "QR",
            Self::Code128 => "Code 128",
            Self::DataMatrix => "DataMatrix",
        })
    }
}

fn require_payload(symbology: Symbology, payload: &str) -> Result<(), CodeError> {
    if payload.trim().is_empty() {
        return Err(CodeError::EmptyPayload(symbology));
    }
    Ok(())
}

fn encode_error(symbology: Symbology, payload: &str, message: impl fmt::Debug) -> CodeError {
    CodeError::Encode {
        symbology,
        payload: payload.to_string(),
        message: format!("{message:?}"),
    }
}

/// Encodes `payload` as a QR code (error correction level M).
pub fn qr_code(payload: &str, magnification: u32) -> Result<CodeImage, CodeError> {
    require_payload(Symbology::Qr, payload)?;
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| encode_error(Symbology::Qr, payload, e))?;

    let width = code.width();
    let mut grid = ModuleGrid::new(width, width);
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == qrcode::Color::Dark {
            grid.set_dark(i % width, i / width);
        }
    }
    CodeImage::encode(&grid.rasterize(magnification, magnification, QR_QUIET_ZONE))
}

/// Encodes `payload` as a Code 128 barcode without human-readable text.
///
/// Even-length numeric payloads use code set C, everything else code set B.
pub fn code128(payload: &str, magnification: u32) -> Result<CodeImage, CodeError> {
    require_payload(Symbology::Code128, payload)?;
    let numeric = payload.bytes().all(|b| b.is_ascii_digit());
    let set = if numeric && payload.len() % 2 == 0 { CODE_SET_C } else { CODE_SET_B };

    let barcode = Code128::new(format!("{set}{payload}"))
        .map_err(|e| encode_error(Symbology::Code128, payload, e))?;
    let grid = ModuleGrid::from_bars(&barcode.encode());
    CodeImage::encode(&grid.rasterize(magnification, BAR_HEIGHT_PX, CODE128_QUIET_ZONE))
}

/// Encodes `payload` as the smallest DataMatrix symbol that fits.
pub fn datamatrix(payload: &str, magnification: u32) -> Result<CodeImage, CodeError> {
    require_payload(Symbology::DataMatrix, payload)?;
    let code = DataMatrix::encode(payload.as_bytes(), SymbolList::default())
        .map_err(|e| encode_error(Symbology::DataMatrix, payload, e))?;

    let bitmap = code.bitmap();
    let mut grid = ModuleGrid::new(bitmap.width(), bitmap.height());
    for (x, y) in bitmap.pixels() {
        grid.set_dark(x, y);
    }
    CodeImage::encode(&grid.rasterize(magnification, magnification, DATAMATRIX_QUIET_ZONE))
}
