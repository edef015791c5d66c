//! TIFF decoder

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};

use super::{binary_raster, checked_dimensions, samples_to_rgb, DecodedRaster};
use crate::error::CodecError;

const FORMAT: &str = "tiff";

/// Decode the first TIFF page; 8- and 16-bit grey, RGB and RGBA are supported.
pub(crate) fn decode_tiff(bytes: &[u8]) -> Result<DecodedRaster, CodecError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to create TIFF decoder: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to get TIFF dimensions: {}", e)))?;
    let (width, height) = checked_dimensions(width, height, FORMAT)?;

    let color_type = decoder
        .colortype()
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to get TIFF color type: {}", e)))?;
    let channels = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::GrayA(_) => 2,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(CodecError::backend(
                FORMAT,
                format!("unsupported TIFF color type: {:?}", other),
            ))
        }
    };

    let image = decoder
        .read_image()
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to read TIFF image: {}", e)))?;

    let pixels = match image {
        DecodingResult::U8(buf) => samples_to_rgb(&buf, channels, width, height, FORMAT)?,
        DecodingResult::U16(buf) => samples_to_rgb(&buf, channels, width, height, FORMAT)?,
        _ => {
            return Err(CodecError::backend(
                FORMAT,
                "only 8-bit and 16-bit unsigned TIFF samples are supported",
            ))
        }
    };

    Ok(binary_raster(width, height, pixels))
}
