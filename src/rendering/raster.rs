//! Immutable pixel buffers produced by capturing or slicing sections

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// A captured raster block.
///
/// Pixels are never mutated after construction; slicing produces new images.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// An image filled with a single colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    /// Decode PNG/JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| {
            Error::ImageError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// True when the image holds no pixel rows or columns.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Copy the rows `[top, top + height)` into a new image of the same width.
    pub fn crop_rows(&self, top: u32, height: u32) -> Self {
        let view = image::imageops::crop_imm(&self.pixels, 0, top, self.width(), height);
        Self::new(view.to_image())
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.pixels.clone()).write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Encode as baseline JPEG; alpha is discarded.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Err(Error::ImageError("cannot encode an empty image".into()));
        }
        let rgb = DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
        Ok(out)
    }

    /// Hex SHA-256 over the dimensions and raw pixels.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_be_bytes());
        hasher.update(self.height().to_be_bytes());
        hasher.update(self.pixels.as_raw());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> RasterImage {
        let mut img = RgbaImage::new(width, height);
        for (_, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(y % 256) as u8, 0, 0, 255]);
        }
        RasterImage::new(img)
    }

    #[test]
    fn crop_rows_keeps_width_and_content() {
        let img = striped(4, 10);
        let part = img.crop_rows(3, 2);
        assert_eq!(part.width(), 4);
        assert_eq!(part.height(), 2);
        assert_eq!(part.pixels().get_pixel(0, 0)[0], 3);
        assert_eq!(part.pixels().get_pixel(3, 1)[0], 4);
    }

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let img = striped(3, 5);
        let decoded = RasterImage::from_bytes(&img.to_png().unwrap()).unwrap();
        assert_eq!(decoded.fingerprint(), img.fingerprint());
    }

    #[test]
    fn jpeg_rejects_empty_image() {
        let img = RasterImage::solid(4, 0, [255, 255, 255, 255]);
        assert!(img.is_empty());
        assert!(img.to_jpeg(90).is_err());
        let ok = RasterImage::solid(4, 4, [255, 255, 255, 255]).to_jpeg(90).unwrap();
        assert_eq!(&ok[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn fingerprint_depends_on_dimensions() {
        let a = RasterImage::solid(2, 8, [0, 0, 0, 255]);
        let b = RasterImage::solid(4, 4, [0, 0, 0, 255]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
