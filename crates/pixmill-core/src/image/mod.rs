//! Immutable images and their transformations
//!
//! An [`Image`] owns a rectangular pixel buffer together with a name and a
//! declared maximum channel value. Images are never mutated after
//! construction: every transformation allocates a new buffer and returns a new
//! image under a destination name.

mod convolution;
mod kernels;


pub use kernels::Kernel;

use crate::channel::ChannelValue;
use crate::error::ImageError;
use crate::histogram::Histogram;
use crate::pixel::{ChannelSelector, ColorMatrix, Pixel};

/// Default maximum channel value for images built without an explicit one.
pub const DEFAULT_MAX_CHANNEL: u8 = 255;

/// A named, immutable, row-major grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    name: String,
    width: usize,
    height: usize,
    max_channel: u8,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Build an image from a grid of rows.
    ///
    /// Every row must have the same length as the first one; every channel
    /// must be within `0..=max_channel`.
    pub fn new<R: AsRef<[Pixel]>>(
        grid: &[R],
        name: impl Into<String>,
        max_channel: i64,
    ) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        let max_channel = validate_max_channel(max_channel)?;

        let width = grid.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(ImageError::EmptyGrid);
        }

        let mut pixels = Vec::with_capacity(width * grid.len());
        for (row_idx, row) in grid.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ImageError::IrregularGrid {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_idx, pixel) in row.iter().enumerate() {
                if !pixel.fits(max_channel) {
                    return Err(ImageError::InvalidPixel {
                        row: row_idx,
                        col: col_idx,
                        max: max_channel,
                    });
                }
                pixels.push(*pixel);
            }
        }

        Ok(Self {
            name,
            width,
            height: grid.len(),
            max_channel,
            pixels,
        })
    }

    /// Build an image with the default maximum channel value of 255.
    pub fn with_default_max<R: AsRef<[Pixel]>>(
        grid: &[R],
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        Self::new(grid, name, i64::from(DEFAULT_MAX_CHANNEL))
    }

    /// Build an image from a flat row-major buffer.
    pub fn from_raw(
        width: usize,
        height: usize,
        max_channel: i64,
        pixels: Vec<Pixel>,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        let max_channel = validate_max_channel(max_channel)?;

        let len = pixel_count(width, height)?;
        if pixels.len() != len {
            return Err(ImageError::IrregularGrid {
                row: pixels.len() / width,
                expected: width,
                found: pixels.len() % width,
            });
        }
        if let Some(idx) = pixels.iter().position(|p| !p.fits(max_channel)) {
            return Err(ImageError::InvalidPixel {
                row: idx / width,
                col: idx % width,
                max: max_channel,
            });
        }

        Ok(Self {
            name,
            width,
            height,
            max_channel,
            pixels,
        })
    }

    /// A uniformly filled image.
    pub fn blank(
        width: usize,
        height: usize,
        max_channel: u8,
        fill: Pixel,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let len = pixel_count(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| ImageError::TooLarge { width, height })?;
        pixels.resize(len, fill);
        Self::from_raw(width, height, i64::from(max_channel), pixels, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_channel(&self) -> u8 {
        self.max_channel
    }

    /// Row-major pixel buffer.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the image.
    pub fn pixel(&self, row: usize, col: usize) -> Pixel {
        assert!(
            row < self.height && col < self.width,
            "pixel ({row}, {col}) outside {}x{} image",
            self.width,
            self.height
        );
        self.pixels[row * self.width + col]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[Pixel] {
        let start = row * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> + '_ {
        self.pixels.chunks_exact(self.width)
    }

    /// Copy out as a grid of rows.
    pub fn to_grid(&self) -> Vec<Vec<Pixel>> {
        self.rows().map(<[Pixel]>::to_vec).collect()
    }

    /// The same pixels under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        Ok(Self {
            name: validate_name(name.into())?,
            ..self.clone()
        })
    }

    /// Replace every pixel with a grey pixel of the selected measure.
    pub fn component(
        &self,
        selector: ChannelSelector,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        self.map_pixels(name, |pixel| {
            Pixel::with_all_channels_set_to(i64::from(selector.select(pixel)))
        })
    }

    pub fn all_red(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Red, name)
    }

    pub fn all_green(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Green, name)
    }

    pub fn all_blue(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Blue, name)
    }

    pub fn all_value(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Value, name)
    }

    pub fn all_intensity(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Intensity, name)
    }

    pub fn all_luma(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        self.component(ChannelSelector::Luma, name)
    }

    /// Shift every channel by `delta`, clamped to `0..=max_channel`.
    pub fn adjust_brightness(&self, delta: i64, name: impl Into<String>) -> Result<Self, ImageError> {
        let max_channel = self.max_channel;
        self.map_pixels(name, |pixel| pixel.with_brightness_adjusted(delta, max_channel))
    }

    /// Apply a color transform given as raw rows; the matrix must be 3x3.
    pub fn color_transform<R: AsRef<[f64]>>(
        &self,
        rows: &[R],
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        let matrix = ColorMatrix::from_rows(rows)?;
        self.apply_color_matrix(&matrix, name)
    }

    /// Apply a validated color matrix to every pixel.
    ///
    /// Pixel results are pinned to `0..=255` and then to this image's maximum.
    pub fn apply_color_matrix(
        &self,
        matrix: &ColorMatrix,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let max_channel = self.max_channel;
        self.map_pixels(name, |pixel| {
            pixel.transformed(matrix).clamped_to(max_channel)
        })
    }

    /// Mirror left to right.
    pub fn flip_horizontal(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.rows() {
            pixels.extend(row.iter().rev().copied());
        }
        Ok(self.derive(name, pixels))
    }

    /// Mirror top to bottom.
    pub fn flip_vertical(&self, name: impl Into<String>) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(self.width).rev() {
            pixels.extend_from_slice(row);
        }
        Ok(self.derive(name, pixels))
    }

    /// Frequency table of the selected measure over all pixels.
    pub fn histogram(&self, selector: ChannelSelector) -> Histogram {
        Histogram::from_image(self, selector)
    }

    fn map_pixels<F>(&self, name: impl Into<String>, f: F) -> Result<Self, ImageError>
    where
        F: Fn(&Pixel) -> Pixel,
    {
        let name = validate_name(name.into())?;
        let pixels = self.pixels.iter().map(f).collect();
        Ok(self.derive(name, pixels))
    }

    /// New image with this image's geometry and maximum.
    fn derive(&self, name: String, pixels: Vec<Pixel>) -> Self {
        debug_assert_eq!(pixels.len(), self.width * self.height);
        Self {
            name,
            width: self.width,
            height: self.height,
            max_channel: self.max_channel,
            pixels,
        }
    }
}

fn pixel_count(width: usize, height: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::EmptyGrid);
    }
    width
        .checked_mul(height)
        .ok_or(ImageError::TooLarge { width, height })
}

fn validate_name(name: String) -> Result<String, ImageError> {
    if name.trim().is_empty() {
        Err(ImageError::EmptyName)
    } else {
        Ok(name)
    }
}

fn validate_max_channel(max_channel: i64) -> Result<u8, ImageError> {
    u8::try_from(max_channel).map_err(|_| ImageError::InvalidMaxChannel(max_channel))
}

pub(crate) fn clamp_channel(value: f64, max_channel: u8) -> ChannelValue {
    ChannelValue::from_f64_clamped(value, max_channel)
}
