//! PNG decoder

use std::io::Cursor;

use super::{binary_raster, checked_dimensions, samples_to_rgb, DecodedRaster};
use crate::error::CodecError;

const FORMAT: &str = "png";

/// Decode PNG bytes; palettes and low bit depths are expanded, 16-bit keeps its high byte.
pub(crate) fn decode_png(bytes: &[u8]) -> Result<DecodedRaster, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to read PNG info: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        checked_dimensions(info.width, info.height, FORMAT)?
    };

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| CodecError::backend(FORMAT, "failed to determine PNG buffer size"))?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::backend(FORMAT, format!("failed to read PNG frame: {}", e)))?;
    let bytes = &buf[..frame_info.buffer_size()];

    let (color_type, bit_depth) = reader.output_color_type();
    let channels = match color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(CodecError::backend(FORMAT, "indexed PNG was not expanded"));
        }
    };

    let pixels = match bit_depth {
        png::BitDepth::Sixteen => {
            // PNG 16-bit is big-endian
            let samples: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            samples_to_rgb(&samples, channels, width, height, FORMAT)?
        }
        _ => samples_to_rgb(bytes, channels, width, height, FORMAT)?,
    };
    Ok(binary_raster(width, height, pixels))
}
