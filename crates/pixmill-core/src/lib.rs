//! Pixmill Core Library
//!
//! Immutable RGB images, per-pixel and convolution transforms, a named image
//! store and raster codecs for the pixmill editor.

pub mod channel;
pub mod config;
pub mod decoders;
pub mod error;
pub mod exporters;
pub mod histogram;
pub mod image;
pub mod pixel;
pub mod presets;
pub mod store;

// Re-export commonly used types
pub use channel::ChannelValue;
pub use config::{EngineConfig, EngineDefaults};
pub use decoders::{DecodedRaster, RasterFormat};
pub use error::{CodecError, ConfigError, ImageError, PixelError, SaveError, StoreError};
pub use histogram::{ChannelHistograms, Histogram};
pub use image::{Image, Kernel};
pub use pixel::{ChannelSelector, ColorMatrix, Pixel};
pub use presets::{FilterPreset, PresetLibrary};
pub use store::{ImageStore, Operation, RenderBuffer};
