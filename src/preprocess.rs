//! Image decoding and tensor preparation for the leaf classifier.
//!
//! Uploaded or captured bytes are decoded to RGB, resized to the model's
//! square input, scaled to [0, 1] and wrapped in a batch of one.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use ndarray::Array4;

use crate::error::{Error, Result};

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;
pub const CHANNELS: usize = 3;

const ACCEPTED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png];

/// Decodes JPEG or PNG bytes into an RGB image.
///
/// The format is taken from the magic bytes, not from a file name or a
/// browser-supplied content type.
pub fn decode_input(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    let format = image::guess_format(bytes)
        .map_err(|_| Error::UnsupportedFormat("unknown".into()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(Error::UnsupportedFormat(format!("{:?}", format)));
    }
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Resizes to `INPUT_SIZE × INPUT_SIZE` and normalizes to an NHWC tensor of
/// shape `[1, 224, 224, 3]`.
///
/// The aspect ratio is not preserved; non-square sources are stretched.
pub fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let resized = image.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);
    let rgb = resized.to_rgb8();
    let side = INPUT_SIZE as usize;
    Array4::from_shape_fn((1, side, side, CHANNELS), |(_, y, x, c)| {
        rgb.get_pixel(x as u32, y as u32).0[c] as f32 / 255.0
    })
}
