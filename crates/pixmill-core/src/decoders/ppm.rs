//! Plain-text PPM (P3) parsing
//!
//! Lines starting with `#` are comments and are dropped before tokenising.
//! After the magic number come width, height and the maximum channel value,
//! then `width * height` RGB triples in row-major order. Anything after the
//! last pixel is ignored.

use std::path::Path;

use crate::error::{CodecError, ImageError, PixelError};
use crate::image::Image;
use crate::pixel::Pixel;

use super::{DecodedRaster, RasterFormat};

const MAGIC: &str = "P3";

/// Parse PPM text into an image called `name`.
pub fn parse_ppm(text: &str, name: &str) -> Result<Image, CodecError> {
    parse_ppm_raster(text)?.into_image(name)
}

/// Read and parse a PPM file.
pub fn decode_ppm_file<P: AsRef<Path>>(path: P, name: &str) -> Result<Image, CodecError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| CodecError::from_io(path, e))?;
    let image = super::decode_bytes(RasterFormat::Ppm, &bytes)?.into_image(name)?;
    log::debug!(
        "parsed PPM {}x{} (max {}) from {}",
        image.width(),
        image.height(),
        image.max_channel(),
        path.display()
    );
    Ok(image)
}

pub(crate) fn parse_ppm_raster(text: &str) -> Result<DecodedRaster, CodecError> {
    let mut tokens = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace);

    match tokens.next() {
        Some(MAGIC) => {}
        Some(other) => {
            return Err(CodecError::InvalidFormat(format!(
                "expected magic number {}, found '{}'",
                MAGIC, other
            )))
        }
        None => return Err(CodecError::InvalidFormat("file is empty".to_string())),
    }

    let width = next_dimension(&mut tokens, "width")?;
    let height = next_dimension(&mut tokens, "height")?;
    let declared_max = next_integer(&mut tokens, "maximum channel value")?;
    let max_channel =
        u8::try_from(declared_max).map_err(|_| ImageError::InvalidMaxChannel(declared_max))?;

    let count = width
        .checked_mul(height)
        .ok_or_else(|| CodecError::InvalidFormat(format!("{}x{} is too large", width, height)))?;
    let mut pixels = Vec::with_capacity(count.min(1 << 20));
    for index in 0..count {
        let r = next_integer(&mut tokens, "red channel")?;
        let g = next_integer(&mut tokens, "green channel")?;
        let b = next_integer(&mut tokens, "blue channel")?;
        let pixel = Pixel::new(r, g, b).map_err(|source| CodecError::InvalidPixel { index, source })?;
        if !pixel.fits(max_channel) {
            let value = i64::from(pixel.value());
            return Err(CodecError::InvalidPixel {
                index,
                source: PixelError::OutOfRange {
                    value,
                    max: max_channel,
                },
            });
        }
        pixels.push(pixel.to_rgb());
    }

    Ok(DecodedRaster {
        width,
        height,
        max_channel,
        pixels,
    })
}

fn next_integer<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<i64, CodecError> {
    let token = tokens
        .next()
        .ok_or_else(|| CodecError::InvalidFormat(format!("missing {}", what)))?;
    token
        .parse::<i64>()
        .map_err(|_| CodecError::InvalidFormat(format!("{} '{}' is not an integer", what, token)))
}

fn next_dimension<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<usize, CodecError> {
    let value = next_integer(tokens, what)?;
    usize::try_from(value)
        .map_err(|_| CodecError::InvalidFormat(format!("{} {} is negative", what, value)))
}
