/*!
 * QR encoder implementations.
 *
 * The batch engine only depends on the `QrEncoder` trait:
 * - `qr`: renders symbols with the `qrcode` crate and writes PNG files
 * - `mock`: configurable in-memory stand-in used by tests and benchmarks
 */

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

use crate::errors::EncodeError;

/// QR error-correction level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EcLevel {
    /// Recovers about 7% of the symbol
    Low,
    /// Recovers about 15% of the symbol
    #[default]
    Medium,
    /// Recovers about 25% of the symbol
    Quartile,
    /// Recovers about 30% of the symbol
    High,
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Quartile => "quartile",
            Self::High => "high",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for EcLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "low" | "l" => Ok(Self::Low),
            "medium" | "m" => Ok(Self::Medium),
            "quartile" | "q" => Ok(Self::Quartile),
            "high" | "h" => Ok(Self::High),
            _ => Err(anyhow::anyhow!("Invalid error-correction level: {}", s)),
        }
    }
}

/// Common trait for all QR encoders
///
/// Implementations must be shareable across worker threads.
pub trait QrEncoder: Send + Sync + Debug {
    /// Encode `payload` and write a `pixel_size` x `pixel_size` image to `destination`
    ///
    /// # Arguments
    /// * `payload` - Text to encode
    /// * `level` - Error-correction level
    /// * `pixel_size` - Width and height of the image in pixels
    /// * `destination` - File to create or overwrite
    fn encode_to_file(
        &self,
        payload: &str,
        level: EcLevel,
        pixel_size: u32,
        destination: &Path,
    ) -> Result<(), EncodeError>;
}

pub mod mock;
pub mod qr;

pub use self::mock::{MockBehavior, MockEncoder};
pub use self::qr::QrCodeEncoder;
