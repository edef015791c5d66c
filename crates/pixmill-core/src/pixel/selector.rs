//! Channel selection for component images and histograms

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Pixel;

/// Picks one integer measure out of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSelector {
    Red,
    Green,
    Blue,
    Value,
    Intensity,
    Luma,
}

impl ChannelSelector {
    pub const ALL: [ChannelSelector; 6] = [
        ChannelSelector::Red,
        ChannelSelector::Green,
        ChannelSelector::Blue,
        ChannelSelector::Value,
        ChannelSelector::Intensity,
        ChannelSelector::Luma,
    ];

    pub fn select(self, pixel: &Pixel) -> u8 {
        match self {
            ChannelSelector::Red => pixel.red(),
            ChannelSelector::Green => pixel.green(),
            ChannelSelector::Blue => pixel.blue(),
            ChannelSelector::Value => pixel.value(),
            ChannelSelector::Intensity => pixel.intensity(),
            ChannelSelector::Luma => pixel.luma(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelSelector::Red => "red",
            ChannelSelector::Green => "green",
            ChannelSelector::Blue => "blue",
            ChannelSelector::Value => "value",
            ChannelSelector::Intensity => "intensity",
            ChannelSelector::Luma => "luma",
        }
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ChannelSelector::ALL
            .into_iter()
            .find(|selector| selector.name() == lowered)
            .ok_or_else(|| format!("Unknown channel: {}", s))
    }
}
