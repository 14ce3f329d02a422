use crate::constants::{
    JPEG_QUALITY, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_IMAGE_DIMENSION,
    MAX_IMAGE_FILE_SIZE, OXIPNG_PRESET, PNG_QUALITY, WEBP_QUALITY, ZOPFLI_ITERATIONS,
};
use crate::error::{Result, SqueezeError};
use crate::formats::{AssetKind, ImageKind, Stage};
use crate::pipeline::Transform;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPDecoder;
use image::{DynamicImage, ImageReader};
use oxipng::{Deflaters, Options};
use std::io::Cursor;
use std::num::NonZeroU8;
use std::path::Path;

/// Quality targets used when re-encoding each raster format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageQuality {
    /// Drives oxipng's deflate effort; PNG output is always lossless.
    pub png: u8,
    pub jpeg: u8,
    pub webp: f32,
}

impl Default for ImageQuality {
    fn default() -> Self {
        Self {
            png: PNG_QUALITY,
            jpeg: JPEG_QUALITY,
            webp: WEBP_QUALITY,
        }
    }
}

/// Checks the encoded size and declared dimensions before any decode.
///
/// # Security
/// - Enforces maximum file size limit to prevent DoS attacks
/// - Validates image dimensions from the header to prevent memory exhaustion
pub fn check_image_limits(data: &[u8], kind: ImageKind) -> Result<()> {
    let size = data.len() as u64;
    if size > MAX_IMAGE_FILE_SIZE {
        return Err(SqueezeError::FileTooLarge(size, MAX_IMAGE_FILE_SIZE));
    }

    let mut reader = ImageReader::new(Cursor::new(data));
    reader.set_format(kind.to_image_format());
    let (width, height) = reader.into_dimensions()?;
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(SqueezeError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }
    Ok(())
}

/// Chooses oxipng's deflater from a quality target.
///
/// >=90 uses Zopfli, >=70 uses high libdeflate compression, lower uses standard compression.
pub fn deflater_for_quality(quality: u8) -> Deflaters {
    if quality >= 90 {
        if let Some(iterations) = NonZeroU8::new(ZOPFLI_ITERATIONS) {
            return Deflaters::Zopfli { iterations };
        }
    }
    if quality >= 70 {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    }
}

/// Losslessly recompresses a PNG with oxipng.
pub fn optimize_png(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.deflate = deflater_for_quality(quality);

    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| SqueezeError::PngOptimization(e.to_string()))
}

/// Decodes and re-encodes a JPEG at `quality`.
pub fn reencode_jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?;
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut output, quality);
    img.write_with_encoder(encoder)?;
    Ok(output)
}

/// Decodes and re-encodes a still WebP lossily at `quality`.
///
/// Animated WebP files are returned unchanged since only the first frame
/// would survive a decode.
pub fn reencode_webp(data: &[u8], quality: f32) -> Result<Vec<u8>> {
    if WebPDecoder::new(Cursor::new(data))?.has_animation() {
        return Ok(data.to_vec());
    }

    let img = image::load_from_memory_with_format(data, image::ImageFormat::WebP)?;
    let img = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let encoder = webp::Encoder::from_image(&img)
        .map_err(|e| SqueezeError::WebPEncoding(e.to_string()))?;
    Ok(encoder.encode(quality).to_vec())
}

/// Re-encodes `data` as `kind` using the quality targets in `quality`.
pub fn reencode(data: &[u8], kind: ImageKind, quality: &ImageQuality) -> Result<Vec<u8>> {
    check_image_limits(data, kind)?;
    match kind {
        ImageKind::Png => optimize_png(data, quality.png),
        ImageKind::Jpeg => reencode_jpeg(data, quality.jpeg),
        ImageKind::WebP => reencode_webp(data, quality.webp),
    }
}

/// The image stage. Re-encoded bytes replace the original only when smaller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageOptimizer {
    pub quality: ImageQuality,
}

impl ImageOptimizer {
    pub fn new(quality: ImageQuality) -> Self {
        Self { quality }
    }
}

impl Transform for ImageOptimizer {
    fn stage(&self) -> Stage {
        Stage::OptimizeImage
    }

    fn apply(&self, _path: &Path, kind: AssetKind, input: &[u8]) -> Result<Vec<u8>> {
        let Some(image_kind) = kind.image_kind() else {
            return Ok(input.to_vec());
        };

        let output = reencode(input, image_kind, &self.quality)?;
        if output.len() < input.len() {
            Ok(output)
        } else {
            Ok(input.to_vec())
        }
    }
}
