//! Named image store
//!
//! The store maps unique names to images, remembers insertion order and tracks
//! the last touched image: the most recent one loaded or produced by an
//! operation. Every named operation looks up its source, derives a new image
//! under the destination name and registers it, replacing any image already
//! stored under that name.

mod operation;
mod render;

#[cfg(test)]
mod tests;

pub use operation::Operation;
pub use render::RenderBuffer;

use std::collections::HashMap;
use std::path::Path;

use crate::config::{self, EngineConfig};
use crate::decoders;
use crate::error::{ImageError, SaveError, StoreError};
use crate::exporters;
use crate::histogram::{ChannelHistograms, Histogram};
use crate::image::{Image, Kernel};
use crate::pixel::{ChannelSelector, ColorMatrix, Pixel};
use crate::presets::PresetLibrary;

/// Images keyed by name, plus the last touched name.
#[derive(Debug, Clone)]
pub struct ImageStore {
    images: HashMap<String, Image>,
    order: Vec<String>,
    last_touched: Option<String>,
    presets: PresetLibrary,
    create_parent_dirs: bool,
    default_max_channel: u8,
}

impl Default for ImageStore {
    fn default() -> Self {
        config::log_config_usage();
        Self::with_config(&config::engine_config_handle().config)
    }
}

impl ImageStore {
    /// An empty store configured from the process-wide engine config.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store using the defaults and presets of `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            images: HashMap::new(),
            order: Vec::new(),
            last_touched: None,
            presets: PresetLibrary::from_config(config),
            create_parent_dirs: config.defaults.create_parent_dirs,
            default_max_channel: config.defaults.default_max_channel,
        }
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetLibrary {
        &mut self.presets
    }

    /// Insert `image`, replacing any image of the same name, and mark it last touched.
    pub fn add_or_replace(&mut self, image: Image) {
        let name = image.name().to_string();
        if self.images.contains_key(&name) {
            self.order.retain(|n| *n != name);
            log::debug!("replacing image '{}'", name);
        }
        self.order.push(name.clone());
        self.images.insert(name.clone(), image);
        self.last_touched = Some(name);
    }

    pub fn get(&self, name: &str) -> Result<&Image, StoreError> {
        self.images
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Names in insertion order; a replaced image counts as newly inserted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Remove and return an image. If it was last touched, the newest
    /// remaining image takes its place.
    pub fn remove(&mut self, name: &str) -> Result<Image, StoreError> {
        let image = self
            .images
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        if self.last_touched.as_deref() == Some(name) {
            self.last_touched = self.order.last().cloned();
        }
        Ok(image)
    }

    /// Name of the last touched image, empty when nothing has been stored.
    pub fn last_touched_name(&self) -> &str {
        self.last_touched.as_deref().unwrap_or("")
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.last_touched
            .as_deref()
            .and_then(|name| self.images.get(name))
    }

    /// Pack the last touched image for a framebuffer display.
    pub fn render_current(&self) -> Option<RenderBuffer> {
        self.current_image().map(RenderBuffer::from_image)
    }

    /// Register a black image at the configured default maximum.
    pub fn add_blank(&mut self, width: usize, height: usize, name: &str) -> Result<(), StoreError> {
        let image = Image::blank(width, height, self.default_max_channel, Pixel::BLACK, name)?;
        self.add_or_replace(image);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Decode `path` and register it as `name`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, name: &str) -> Result<(), StoreError> {
        let path = path.as_ref();
        let image = decoders::decode_file(path, name)?;
        log::info!(
            "loaded '{}' ({}x{}) from {}",
            name,
            image.width(),
            image.height(),
            path.display()
        );
        self.add_or_replace(image);
        Ok(())
    }

    /// Write the image called `name` to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<(), SaveError> {
        let path = path.as_ref();
        let image = self.get(name)?;
        exporters::write_file(path, image, self.create_parent_dirs)?;
        log::info!("saved '{}' to {}", name, path.display());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Named operations
    // ------------------------------------------------------------------

    pub fn red_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_red(dest))
    }

    pub fn green_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_green(dest))
    }

    pub fn blue_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_blue(dest))
    }

    pub fn value_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_value(dest))
    }

    pub fn intensity_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_intensity(dest))
    }

    pub fn luma_component(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.all_luma(dest))
    }

    pub fn vertical_flip(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.flip_vertical(dest))
    }

    pub fn horizontal_flip(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.flip_horizontal(dest))
    }

    /// Add `increment` to every channel; negative values darken.
    pub fn brighten(&mut self, increment: i64, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.adjust_brightness(increment, dest))
    }

    pub fn blur(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.apply_kernel(&Kernel::blur(), dest))
    }

    pub fn sharpen(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.apply_kernel(&Kernel::sharpen(), dest))
    }

    pub fn greyscale(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.apply_color_matrix(&ColorMatrix::GREYSCALE, dest))
    }

    pub fn sepia(&mut self, src: &str, dest: &str) -> Result<(), StoreError> {
        self.derive(src, |image| image.apply_color_matrix(&ColorMatrix::SEPIA, dest))
    }

    /// Run an operation resolved from its textual name.
    pub fn apply(&mut self, op: &Operation, src: &str, dest: &str) -> Result<(), StoreError> {
        log::debug!("{} '{}' -> '{}'", op, src, dest);
        match *op {
            Operation::RedComponent => self.red_component(src, dest),
            Operation::GreenComponent => self.green_component(src, dest),
            Operation::BlueComponent => self.blue_component(src, dest),
            Operation::ValueComponent => self.value_component(src, dest),
            Operation::IntensityComponent => self.intensity_component(src, dest),
            Operation::LumaComponent => self.luma_component(src, dest),
            Operation::VerticalFlip => self.vertical_flip(src, dest),
            Operation::HorizontalFlip => self.horizontal_flip(src, dest),
            Operation::Brighten(increment) => self.brighten(increment, src, dest),
            Operation::Blur => self.blur(src, dest),
            Operation::Sharpen => self.sharpen(src, dest),
            Operation::Greyscale => self.greyscale(src, dest),
            Operation::Sepia => self.sepia(src, dest),
        }
    }

    /// Apply a named kernel or color-matrix preset.
    pub fn apply_filter(&mut self, preset: &str, src: &str, dest: &str) -> Result<(), StoreError> {
        let filter = self
            .presets
            .get(preset)
            .cloned()
            .ok_or_else(|| StoreError::UnknownPreset(preset.to_string()))?;
        self.derive(src, |image| filter.apply(image, dest))
    }

    // ------------------------------------------------------------------
    // Histograms
    // ------------------------------------------------------------------

    pub fn histogram(&self, name: &str, selector: ChannelSelector) -> Result<Histogram, StoreError> {
        Ok(self.get(name)?.histogram(selector))
    }

    pub fn red_histogram(&self, name: &str) -> Result<Histogram, StoreError> {
        self.histogram(name, ChannelSelector::Red)
    }

    pub fn green_histogram(&self, name: &str) -> Result<Histogram, StoreError> {
        self.histogram(name, ChannelSelector::Green)
    }

    pub fn blue_histogram(&self, name: &str) -> Result<Histogram, StoreError> {
        self.histogram(name, ChannelSelector::Blue)
    }

    pub fn intensity_histogram(&self, name: &str) -> Result<Histogram, StoreError> {
        self.histogram(name, ChannelSelector::Intensity)
    }

    /// The four chart histograms of one image.
    pub fn channel_histograms(&self, name: &str) -> Result<ChannelHistograms, StoreError> {
        Ok(ChannelHistograms::from_image(self.get(name)?))
    }

    /// Look up `src`, build the derived image and register it.
    fn derive<F>(&mut self, src: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Image) -> Result<Image, ImageError>,
    {
        let image = f(self.get(src)?)?;
        self.add_or_replace(image);
        Ok(())
    }
}
