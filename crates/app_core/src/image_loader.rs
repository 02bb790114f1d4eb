//! Image decoding for fetched cache files

use crate::AppError;
use image::{GenericImageView, ImageReader};
use std::io::Cursor;

/// Decoded RGBA8 image ready for texture upload
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Decodes raw bytes, shrinking anything larger than `max_dimension`
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    max_dimension: u32,
}

impl ImageDecoder {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Decode an image; the format is sniffed from the bytes since cache
    /// file names carry no reliable extension
    pub fn decode(&self, name: &str, bytes: &[u8]) -> Result<LoadedImage, AppError> {
        tracing::debug!("Decoding {} ({} bytes)", name, bytes.len());

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;

        let img = reader.decode()?;

        let (w, h) = img.dimensions();
        let img = if w > self.max_dimension || h > self.max_dimension {
            img.thumbnail(self.max_dimension, self.max_dimension)
        } else {
            img
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(LoadedImage {
            name: name.to_string(),
            width,
            height,
            data: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_small_image_untouched() {
        let decoder = ImageDecoder::new(64);
        let loaded = decoder.decode("small", &png_bytes(16, 8)).unwrap();
        assert_eq!((loaded.width, loaded.height), (16, 8));
        assert_eq!(loaded.data.len(), 16 * 8 * 4);
        assert_eq!(&loaded.data[..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn test_decode_shrinks_large_image() {
        let decoder = ImageDecoder::new(32);
        let loaded = decoder.decode("wide", &png_bytes(128, 64)).unwrap();
        assert_eq!((loaded.width, loaded.height), (32, 16));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let decoder = ImageDecoder::new(32);
        let err = decoder.decode("junk", b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }
}
