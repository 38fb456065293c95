/*!
 * Tests for the PNG encoder
 */

use anyhow::Result;
use image::GenericImageView;
use qrbatch::encoder::{EcLevel, QrCodeEncoder, QrEncoder};
use crate::common;

#[test]
fn test_encode_to_file_withShortPayload_shouldWriteSquarePng() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("alice.png");

    QrCodeEncoder::new().encode_to_file("123", EcLevel::Medium, 256, &path)?;

    let image = image::open(&path)?;
    assert_eq!(image.dimensions(), (256, 256));
    Ok(())
}

#[test]
fn test_encode_to_file_withNonPngExtension_shouldStillWritePng() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("bob.jpg");

    QrCodeEncoder::new().encode_to_file("456", EcLevel::Low, 128, &path)?;

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
}

#[test]
fn test_render_withSamePayload_shouldBeDeterministic() -> Result<()> {
    let encoder = QrCodeEncoder::new();
    let first = encoder.render("carol", EcLevel::High, 200)?;
    let second = encoder.render("carol", EcLevel::High, 200)?;
    assert_eq!(first.as_raw(), second.as_raw());
    Ok(())
}

#[test]
fn test_render_withHigherEcLevel_shouldNotShrinkSymbol() -> Result<()> {
    // Both render to the same pixel size regardless of module count
    let encoder = QrCodeEncoder::new();
    let low = encoder.render("https://example.com/some/long/path", EcLevel::Low, 300)?;
    let high = encoder.render("https://example.com/some/long/path", EcLevel::High, 300)?;
    assert_eq!(low.dimensions(), high.dimensions());
    Ok(())
}
