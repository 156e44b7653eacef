//! Decoded RGBA rasters and their encoded form at the library boundary.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use resize_scale::Dimensions;

use crate::error::{ResizeError, ResizeResult};

/// A decoded RGBA8 bitmap plus the format it was decoded from.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub pixels: RgbaImage,
    /// `None` for rasters produced in memory (padded canvases, rescaled output).
    pub format: Option<ImageFormat>,
}

/// Encoded image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels, format: None }
    }

    /// Decode PNG/JPEG/WEBP bytes. `source_hint` names the origin for error messages.
    pub fn decode(bytes: &[u8], source_hint: &str) -> ResizeResult<Self> {
        if bytes.is_empty() {
            return Err(ResizeError::decode(source_hint, "no image data"));
        }
        let format = image::guess_format(bytes)
            .map_err(|e| ResizeError::decode(source_hint, e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ResizeError::decode(source_hint, e.to_string()))?;
        let pixels = decoded.into_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ResizeError::decode(source_hint, "image has a zero-length side"));
        }
        Ok(Self {
            pixels,
            format: Some(format),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Encode as `format`. JPEG drops the alpha channel.
    pub fn encode(&self, format: ImageFormat) -> ResizeResult<EncodedImage> {
        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        let written = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(self.pixels.clone())
                .into_rgb8()
                .write_to(&mut cursor, format),
            _ => self.pixels.write_to(&mut cursor, format),
        };
        written.map_err(|e| {
            ResizeError::render("encode", e.to_string())
                .with_metadata("format", format!("{:?}", format))
        })?;
        Ok(EncodedImage {
            bytes,
            mime_type: format.to_mime_type().to_string(),
        })
    }

    pub fn encode_png(&self) -> ResizeResult<EncodedImage> {
        self.encode(ImageFormat::Png)
    }
}

impl EncodedImage {
    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_keeps_pixels_and_alpha() {
        let raster = RasterImage::new(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 0])));
        let encoded = raster.encode_png().unwrap();
        assert_eq!(encoded.mime_type, "image/png");

        let decoded = RasterImage::decode(&encoded.bytes, "test").unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(3, 2));
        assert_eq!(decoded.format, Some(ImageFormat::Png));
        assert_eq!(decoded.pixels.get_pixel(2, 1), &Rgba([1, 2, 3, 0]));
    }

    #[test]
    fn jpeg_encodes_without_alpha() {
        let raster = RasterImage::new(RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 128])));
        let encoded = raster.encode(ImageFormat::Jpeg).unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(encoded.extension(), "jpg");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = RasterImage::decode(b"definitely not an image", "upload").unwrap_err();
        assert_eq!(err.category(), "decode");
        assert!(err.to_string().contains("upload"));

        let err = RasterImage::decode(&[], "upload").unwrap_err();
        assert_eq!(err.category(), "decode");
    }
}
