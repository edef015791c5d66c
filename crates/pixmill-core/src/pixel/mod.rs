//! RGB pixels
//!
//! Pixels are small immutable value types. Every adjustment returns a new
//! pixel; brightness measures are derived on demand rather than stored.

mod matrix;
mod selector;


pub use matrix::ColorMatrix;
pub use selector::ChannelSelector;

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelValue, CHANNEL_MAX};
use crate::error::PixelError;

/// Luma weights for red, green and blue (Rec. 709).
pub const LUMA_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    r: ChannelValue,
    g: ChannelValue,
    b: ChannelValue,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel {
        r: ChannelValue::ZERO,
        g: ChannelValue::ZERO,
        b: ChannelValue::ZERO,
    };

    /// Build a pixel from raw numbers, failing if any is outside `0..=255`.
    pub fn new(r: i64, g: i64, b: i64) -> Result<Self, PixelError> {
        Ok(Self {
            r: ChannelValue::strict(r)?,
            g: ChannelValue::strict(g)?,
            b: ChannelValue::strict(b)?,
        })
    }

    /// Build a pixel from already-valid 8-bit components.
    pub const fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            r: ChannelValue::new(rgb[0]),
            g: ChannelValue::new(rgb[1]),
            b: ChannelValue::new(rgb[2]),
        }
    }

    pub(crate) fn from_channels(r: ChannelValue, g: ChannelValue, b: ChannelValue) -> Self {
        Self { r, g, b }
    }

    pub fn red(&self) -> u8 {
        self.r.get()
    }

    pub fn green(&self) -> u8 {
        self.g.get()
    }

    pub fn blue(&self) -> u8 {
        self.b.get()
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Largest of the three components.
    pub fn value(&self) -> u8 {
        self.red().max(self.green()).max(self.blue())
    }

    /// Integer mean of the three components.
    pub fn intensity(&self) -> u8 {
        let sum = u16::from(self.red()) + u16::from(self.green()) + u16::from(self.blue());
        (sum / 3) as u8
    }

    /// Perceptual brightness, floored.
    pub fn luma(&self) -> u8 {
        let weighted = LUMA_WEIGHTS[0] * f64::from(self.red())
            + LUMA_WEIGHTS[1] * f64::from(self.green())
            + LUMA_WEIGHTS[2] * f64::from(self.blue());
        ChannelValue::from_f64_clamped(weighted, CHANNEL_MAX).get()
    }

    /// A grey pixel with every channel set to `value`.
    pub fn with_all_channels_set_to(value: i64) -> Self {
        let channel = ChannelValue::clamped(value, CHANNEL_MAX);
        Self::from_channels(channel, channel, channel)
    }

    /// Shift every channel by `delta`, pinned to `0..=max_channel`.
    pub fn with_brightness_adjusted(&self, delta: i64, max_channel: u8) -> Self {
        let shift = |c: ChannelValue| {
            ChannelValue::clamped(i64::from(c.get()).saturating_add(delta), max_channel)
        };
        Self::from_channels(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Apply a linear color transform given as raw matrix rows.
    ///
    /// Fails with [`PixelError::InvalidKernel`] unless the matrix is exactly 3x3.
    pub fn with_color_transform<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Self, PixelError> {
        let matrix = ColorMatrix::from_rows(rows)?;
        Ok(self.transformed(&matrix))
    }

    /// Apply a validated color matrix; each output channel is floored and pinned to `0..=255`.
    pub fn transformed(&self, matrix: &ColorMatrix) -> Self {
        let rgb = [
            f64::from(self.red()),
            f64::from(self.green()),
            f64::from(self.blue()),
        ];
        let [r, g, b] = matrix.apply(rgb);
        Self::from_channels(
            ChannelValue::from_f64_clamped(r, CHANNEL_MAX),
            ChannelValue::from_f64_clamped(g, CHANNEL_MAX),
            ChannelValue::from_f64_clamped(b, CHANNEL_MAX),
        )
    }

    /// Pin every channel to `0..=max_channel`.
    pub fn clamped_to(&self, max_channel: u8) -> Self {
        self.with_brightness_adjusted(0, max_channel)
    }

    /// Whether every channel fits an image with the given maximum.
    pub fn fits(&self, max_channel: u8) -> bool {
        self.r.within(max_channel) && self.g.within(max_channel) && self.b.within(max_channel)
    }

    /// Pack as `0x00RRGGBB`.
    pub fn to_packed_rgb(&self) -> u32 {
        (u32::from(self.red()) << 16) | (u32::from(self.green()) << 8) | u32::from(self.blue())
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Self {
        Pixel::from_rgb(rgb)
    }
}
