//! Image exporters
//!
//! Export images to plain-text PPM or to 8-bit PNG, TIFF, JPEG and BMP.
//! Channel values are written as stored; an image whose maximum channel value
//! is below 255 is not rescaled.

pub mod ppm;

use std::io::Cursor;
use std::path::Path;

use ::image::{DynamicImage, ImageFormat, RgbImage};

use crate::decoders::RasterFormat;
use crate::error::CodecError;
use crate::image::Image;

/// Encode `image` into the byte representation of `format`.
pub fn encode_bytes(format: RasterFormat, image: &Image) -> Result<Vec<u8>, CodecError> {
    match format {
        RasterFormat::Ppm => Ok(ppm::serialize_ppm(image).into_bytes()),
        RasterFormat::Png => encode_png(image),
        RasterFormat::Tiff => encode_tiff(image),
        RasterFormat::Jpeg => encode_with_image_crate(image, ImageFormat::Jpeg, "jpeg"),
        RasterFormat::Bmp => encode_with_image_crate(image, ImageFormat::Bmp, "bmp"),
    }
}

/// Write `image` to `path`, choosing the format from the extension.
///
/// Missing parent directories are created when `create_parent_dirs` is set.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    image: &Image,
    create_parent_dirs: bool,
) -> Result<(), CodecError> {
    let path = path.as_ref();
    let format = RasterFormat::from_path(path)?;
    let bytes = encode_bytes(format, image)?;

    if create_parent_dirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CodecError::from_io(parent, e))?;
        }
    }

    std::fs::write(path, bytes).map_err(|e| CodecError::from_io(path, e))?;
    log::debug!(
        "wrote {} {}x{} to {}",
        format,
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/// Interleaved 8-bit RGB samples.
fn rgb_bytes(image: &Image) -> Vec<u8> {
    image.pixels().iter().flat_map(|p| p.to_rgb()).collect()
}

fn dimensions(image: &Image, format: &'static str) -> Result<(u32, u32), CodecError> {
    let width = u32::try_from(image.width())
        .map_err(|_| CodecError::backend(format, "image width exceeds u32"))?;
    let height = u32::try_from(image.height())
        .map_err(|_| CodecError::backend(format, "image height exceeds u32"))?;
    Ok((width, height))
}

fn encode_png(image: &Image) -> Result<Vec<u8>, CodecError> {
    let (width, height) = dimensions(image, "png")?;
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::backend("png", format!("failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(&rgb_bytes(image))
            .map_err(|e| CodecError::backend("png", format!("failed to write PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| CodecError::backend("png", format!("failed to finish PNG: {}", e)))?;
    }
    Ok(out)
}

fn encode_tiff(image: &Image) -> Result<Vec<u8>, CodecError> {
    let (width, height) = dimensions(image, "tiff")?;
    let mut out = Vec::new();
    {
        let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(&mut out)).map_err(|e| {
            CodecError::backend("tiff", format!("failed to create TIFF encoder: {}", e))
        })?;
        encoder
            .write_image::<tiff::encoder::colortype::RGB8>(width, height, &rgb_bytes(image))
            .map_err(|e| CodecError::backend("tiff", format!("failed to write TIFF image: {}", e)))?;
    }
    Ok(out)
}

fn encode_with_image_crate(
    image: &Image,
    image_format: ImageFormat,
    format: &'static str,
) -> Result<Vec<u8>, CodecError> {
    let (width, height) = dimensions(image, format)?;
    let buffer = RgbImage::from_raw(width, height, rgb_bytes(image))
        .ok_or_else(|| CodecError::backend(format, "pixel buffer does not match dimensions"))?;

    let mut out = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut out), image_format)
        .map_err(|e| CodecError::backend(format, e))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::{decode_bytes, decode_file};
    use crate::pixel::Pixel;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_image() -> Image {
        let grid = vec![
            vec![Pixel::from_rgb([255, 0, 0]), Pixel::from_rgb([0, 255, 0])],
            vec![Pixel::from_rgb([0, 0, 255]), Pixel::from_rgb([17, 34, 51])],
        ];
        Image::with_default_max(&grid, "test").unwrap()
    }

    // ========================================================================
    // Lossless formats
    // ========================================================================

    #[test]
    fn test_lossless_formats_preserve_pixels() {
        let image = create_test_image();
        for format in [RasterFormat::Ppm, RasterFormat::Png, RasterFormat::Tiff, RasterFormat::Bmp] {
            let bytes = encode_bytes(format, &image).unwrap();
            let raster = decode_bytes(format, &bytes).unwrap();
            let decoded = raster.into_image("test").unwrap();
            assert_eq!(decoded, image, "{} should be lossless", format);
        }
    }

    #[test]
    fn test_png_writes_reduced_maximum_as_is() {
        let image = Image::blank(1, 1, 100, Pixel::from_rgb([100, 50, 0]), "dim").unwrap();
        let bytes = encode_bytes(RasterFormat::Png, &image).unwrap();
        let raster = decode_bytes(RasterFormat::Png, &bytes).unwrap();
        assert_eq!(raster.max_channel, 255);
        assert_eq!(raster.pixels, vec![[100, 50, 0]]);
    }

    // ========================================================================
    // JPEG
    // ========================================================================

    #[test]
    fn test_jpeg_round_trip_is_close() {
        let image = Image::blank(8, 8, 255, Pixel::from_rgb([120, 120, 120]), "grey").unwrap();
        let bytes = encode_bytes(RasterFormat::Jpeg, &image).unwrap();
        let raster = decode_bytes(RasterFormat::Jpeg, &bytes).unwrap();
        assert_eq!((raster.width, raster.height), (8, 8));
        for px in raster.pixels {
            for c in px {
                assert!((i16::from(c) - 120).abs() <= 3, "channel {} drifted", c);
            }
        }
    }

    // ========================================================================
    // write_file
    // ========================================================================

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let image = create_test_image();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.png");

        write_file(&path, &image, true).unwrap();

        assert!(path.exists(), "PNG file should exist");
        let loaded = decode_file(&path, "test").unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_write_file_without_parent_creation_fails() {
        let image = create_test_image();
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");

        let result = write_file(&path, &image, false);

        assert!(matches!(result, Err(CodecError::FileNotFound(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_file_rejects_unknown_extension() {
        let image = create_test_image();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.webp");

        assert!(matches!(
            write_file(&path, &image, true),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
