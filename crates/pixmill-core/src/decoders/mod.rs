//! Raster decoders
//!
//! Plain-text PPM is parsed here; PNG, TIFF, JPEG and BMP go through their
//! codec crates and come back as 8-bit RGB.

pub mod ppm;

mod png;
mod raster;
mod tiff;


use std::fmt;
use std::path::Path;

use crate::error::CodecError;
use crate::image::{Image, DEFAULT_MAX_CHANNEL};
use crate::pixel::Pixel;

/// File formats the engine can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterFormat {
    Ppm,
    Png,
    Tiff,
    Jpeg,
    Bmp,
}

impl RasterFormat {
    pub const ALL: [RasterFormat; 5] = [
        RasterFormat::Ppm,
        RasterFormat::Png,
        RasterFormat::Tiff,
        RasterFormat::Jpeg,
        RasterFormat::Bmp,
    ];

    /// Resolve a file extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Result<Self, CodecError> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        match extension.as_str() {
            "ppm" => Ok(RasterFormat::Ppm),
            "png" => Ok(RasterFormat::Png),
            "tif" | "tiff" => Ok(RasterFormat::Tiff),
            "jpg" | "jpeg" => Ok(RasterFormat::Jpeg),
            "bmp" => Ok(RasterFormat::Bmp),
            _ => Err(CodecError::UnsupportedFormat(extension)),
        }
    }

    /// Resolve the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CodecError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                CodecError::UnsupportedFormat(format!("{} (no file extension)", path.display()))
            })?;
        Self::from_extension(extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RasterFormat::Ppm => "ppm",
            RasterFormat::Png => "png",
            RasterFormat::Tiff => "tiff",
            RasterFormat::Jpeg => "jpeg",
            RasterFormat::Bmp => "bmp",
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded raster data before it becomes a named [`Image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRaster {
    pub width: usize,
    pub height: usize,

    /// Declared maximum channel value; 255 for every binary format.
    pub max_channel: u8,

    /// Row-major RGB triples
    pub pixels: Vec<[u8; 3]>,
}

impl DecodedRaster {
    /// Attach a name, validating geometry and channel range.
    pub fn into_image(self, name: impl Into<String>) -> Result<Image, CodecError> {
        let pixels = self.pixels.into_iter().map(Pixel::from_rgb).collect();
        Ok(Image::from_raw(
            self.width,
            self.height,
            i64::from(self.max_channel),
            pixels,
            name,
        )?)
    }
}

impl From<&Image> for DecodedRaster {
    fn from(image: &Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            max_channel: image.max_channel(),
            pixels: image.pixels().iter().map(Pixel::to_rgb).collect(),
        }
    }
}

/// Decode an in-memory file of the given format.
pub fn decode_bytes(format: RasterFormat, bytes: &[u8]) -> Result<DecodedRaster, CodecError> {
    match format {
        RasterFormat::Ppm => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| CodecError::InvalidFormat(format!("PPM text is not UTF-8: {}", e)))?;
            ppm::parse_ppm_raster(text)
        }
        RasterFormat::Png => png::decode_png(bytes),
        RasterFormat::Tiff => tiff::decode_tiff(bytes),
        RasterFormat::Jpeg | RasterFormat::Bmp => raster::decode_raster(format, bytes),
    }
}

/// Read and decode a file, choosing the codec from its extension.
pub fn decode_file<P: AsRef<Path>>(path: P, name: &str) -> Result<Image, CodecError> {
    let path = path.as_ref();
    let format = RasterFormat::from_path(path)?;
    if format == RasterFormat::Ppm {
        return ppm::decode_ppm_file(path, name);
    }

    let bytes = std::fs::read(path).map_err(|e| CodecError::from_io(path, e))?;
    let raster = decode_bytes(format, &bytes)?;
    log::debug!(
        "decoded {} {}x{} from {}",
        format,
        raster.width,
        raster.height,
        path.display()
    );
    raster.into_image(name)
}

/// Samples a binary codec may hand back.
trait Sample: Copy {
    fn to_u8(self) -> u8;
}

impl Sample for u8 {
    #[inline]
    fn to_u8(self) -> u8 {
        self
    }
}

impl Sample for u16 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self >> 8) as u8
    }
}

/// Interleaved samples to RGB triples.
///
/// One channel is grey, two is grey with alpha, three is RGB and four is RGBA.
/// Alpha is dropped.
fn samples_to_rgb<T: Sample>(
    buf: &[T],
    channels: usize,
    width: usize,
    height: usize,
    format: &'static str,
) -> Result<Vec<[u8; 3]>, CodecError> {
    if !(1..=4).contains(&channels) {
        return Err(CodecError::backend(
            format,
            format!("unsupported channel count {}", channels),
        ));
    }

    let expected_len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            CodecError::backend(format, format!("{}x{} is too large", width, height))
        })?;
    if buf.len() < expected_len {
        return Err(CodecError::backend(
            format,
            format!(
                "buffer size mismatch: expected {}, got {}",
                expected_len,
                buf.len()
            ),
        ));
    }

    let rgb = buf[..expected_len]
        .chunks_exact(channels)
        .map(|px| match channels {
            1 | 2 => {
                let grey = px[0].to_u8();
                [grey, grey, grey]
            }
            _ => [px[0].to_u8(), px[1].to_u8(), px[2].to_u8()],
        })
        .collect();
    Ok(rgb)
}

/// Geometry shared by the binary decoders; zero-sized rasters are rejected.
fn checked_dimensions(
    width: u32,
    height: u32,
    format: &'static str,
) -> Result<(usize, usize), CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::backend(
            format,
            format!("image has no pixels ({}x{})", width, height),
        ));
    }
    Ok((width as usize, height as usize))
}

fn binary_raster(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> DecodedRaster {
    DecodedRaster {
        width,
        height,
        max_channel: DEFAULT_MAX_CHANNEL,
        pixels,
    }
}
