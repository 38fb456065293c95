/*!
 * PNG encoder backed by the `qrcode` and `image` crates.
 */

use image::imageops::{self, FilterType};
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::path::Path;

use super::{EcLevel, QrEncoder};
use crate::errors::EncodeError;

/// Writes QR symbols as grayscale PNG files
#[derive(Debug, Clone, Default)]
pub struct QrCodeEncoder;

impl QrCodeEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Render `payload` into an in-memory grayscale image of exactly `pixel_size` pixels per side
    pub fn render(
        &self,
        payload: &str,
        level: EcLevel,
        pixel_size: u32,
    ) -> Result<image::GrayImage, EncodeError> {
        if pixel_size == 0 {
            return Err(EncodeError::Image("pixel size must be positive".to_string()));
        }

        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into())
            .map_err(|e| EncodeError::Symbol(e.to_string()))?;

        let symbol = code
            .render::<Luma<u8>>()
            .min_dimensions(pixel_size, pixel_size)
            .build();

        // The renderer snaps to whole modules, so the result is usually a bit larger
        if symbol.width() == pixel_size && symbol.height() == pixel_size {
            Ok(symbol)
        } else {
            Ok(imageops::resize(&symbol, pixel_size, pixel_size, FilterType::Nearest))
        }
    }
}

impl QrEncoder for QrCodeEncoder {
    fn encode_to_file(
        &self,
        payload: &str,
        level: EcLevel,
        pixel_size: u32,
        destination: &Path,
    ) -> Result<(), EncodeError> {
        let image = self.render(payload, level, pixel_size)?;
        image
            .save_with_format(destination, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => EncodeError::Io(io),
                other => EncodeError::Image(other.to_string()),
            })
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::Low => qrcode::EcLevel::L,
            EcLevel::Medium => qrcode::EcLevel::M,
            EcLevel::Quartile => qrcode::EcLevel::Q,
            EcLevel::High => qrcode::EcLevel::H,
        }
    }
}
