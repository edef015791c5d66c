//! JPEG and BMP decoding through the `image` crate

use ::image::ImageFormat;

use super::{binary_raster, checked_dimensions, DecodedRaster, RasterFormat};
use crate::error::CodecError;

pub(crate) fn decode_raster(format: RasterFormat, bytes: &[u8]) -> Result<DecodedRaster, CodecError> {
    let (image_format, name) = image_format(format)?;
    let decoded = ::image::load_from_memory_with_format(bytes, image_format)
        .map_err(|e| CodecError::backend(name, e))?;

    let rgb = decoded.to_rgb8();
    let (width, height) = checked_dimensions(rgb.width(), rgb.height(), name)?;
    let pixels = rgb
        .into_raw()
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect();
    Ok(binary_raster(width, height, pixels))
}

/// The `image` crate format backing a raster format.
pub(crate) fn image_format(format: RasterFormat) -> Result<(ImageFormat, &'static str), CodecError> {
    match format {
        RasterFormat::Jpeg => Ok((ImageFormat::Jpeg, "jpeg")),
        RasterFormat::Bmp => Ok((ImageFormat::Bmp, "bmp")),
        other => Err(CodecError::UnsupportedFormat(other.name().to_string())),
    }
}
