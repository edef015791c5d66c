//! Bounds-checked channel values
//!
//! A channel value is an 8-bit-range integer. Parsing and explicit construction
//! go through [`ChannelValue::strict`], arithmetic inside transforms goes
//! through [`ChannelValue::clamped`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PixelError;

/// Largest value any channel can hold, regardless of the owning image.
pub const CHANNEL_MAX: u8 = u8::MAX;

/// A single red, green or blue component.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChannelValue(u8);

impl ChannelValue {
    pub const ZERO: ChannelValue = ChannelValue(0);

    /// Wrap an 8-bit value; every `u8` is in range.
    pub const fn new(value: u8) -> Self {
        ChannelValue(value)
    }

    /// Build a channel value, rejecting anything outside `0..=255`.
    pub fn strict(value: i64) -> Result<Self, PixelError> {
        u8::try_from(value)
            .map(ChannelValue)
            .map_err(|_| PixelError::OutOfRange {
                value,
                max: CHANNEL_MAX,
            })
    }

    /// Build a channel value, pinning out-of-range input to `0..=max`.
    pub fn clamped(value: i64, max: u8) -> Self {
        ChannelValue(value.clamp(0, i64::from(max)) as u8)
    }

    /// Clamp a floating point accumulator: floor first, then pin to `0..=max`.
    pub fn from_f64_clamped(value: f64, max: u8) -> Self {
        let floored = value.floor();
        if floored.is_nan() || floored <= 0.0 {
            ChannelValue(0)
        } else if floored >= f64::from(max) {
            ChannelValue(max)
        } else {
            ChannelValue(floored as u8)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether this value is valid for an image with the given maximum.
    pub fn within(self, max: u8) -> bool {
        self.0 <= max
    }
}

impl From<u8> for ChannelValue {
    fn from(value: u8) -> Self {
        ChannelValue(value)
    }
}

impl From<ChannelValue> for u8 {
    fn from(value: ChannelValue) -> Self {
        value.0
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
