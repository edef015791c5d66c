//! Per-channel frequency tables
//!
//! Only values that occur are stored; lookups of absent values read as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::image::Image;
use crate::pixel::ChannelSelector;

/// Occurrence counts keyed by channel value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<u8, usize>,
}

impl Histogram {
    /// Count the selected measure over every pixel of `image`.
    pub fn from_image(image: &Image, selector: ChannelSelector) -> Self {
        let mut counts = BTreeMap::new();
        for pixel in image.pixels() {
            *counts.entry(selector.select(pixel)).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for `value`, zero if it never occurs.
    pub fn get(&self, value: u8) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct values present.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Present values in ascending order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&value, &count)| (value, count))
    }

    /// Largest single count, zero for an empty histogram.
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Dense 256-bin form, convenient for charting.
    pub fn bins(&self) -> [usize; 256] {
        let mut bins = [0usize; 256];
        for (value, count) in self.iter() {
            bins[usize::from(value)] = count;
        }
        bins
    }

    /// Serialize as a JSON object mapping value to count.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The four histograms a histogram chart displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHistograms {
    pub red: Histogram,
    pub green: Histogram,
    pub blue: Histogram,
    pub intensity: Histogram,
}

impl ChannelHistograms {
    pub fn from_image(image: &Image) -> Self {
        Self {
            red: image.histogram(ChannelSelector::Red),
            green: image.histogram(ChannelSelector::Green),
            blue: image.histogram(ChannelSelector::Blue),
            intensity: image.histogram(ChannelSelector::Intensity),
        }
    }

    /// Largest count across all four channels, used to scale a chart.
    pub fn max_count(&self) -> usize {
        [&self.red, &self.green, &self.blue, &self.intensity]
            .iter()
            .map(|h| h.max_count())
            .max()
            .unwrap_or(0)
    }

    /// Pretty JSON report of all four channels.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
