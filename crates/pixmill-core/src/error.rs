//! Error types for the pixmill core
//!
//! Each component reports failures through its own enum so callers can match on
//! a stable kind and still show a readable message.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while building channel values and pixels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("channel value {value} is outside 0..={max}")]
    OutOfRange { value: i64, max: u8 },

    #[error("color transform matrix must be 3x3, got {rows}x{cols}")]
    InvalidKernel { rows: usize, cols: usize },
}

/// Failures while constructing or transforming an [`Image`](crate::image::Image).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image name must not be empty")]
    EmptyName,

    #[error("maximum channel value {0} is outside 0..=255")]
    InvalidMaxChannel(i64),

    #[error("pixel grid has no pixels")]
    EmptyGrid,

    #[error("pixel grid row {row} has {found} pixels, expected {expected}")]
    IrregularGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("a {width}x{height} image does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("pixel at row {row}, column {col} exceeds the maximum channel value {max}")]
    InvalidPixel { row: usize, col: usize, max: u8 },

    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<PixelError> for ImageError {
    fn from(err: PixelError) -> Self {
        match err {
            PixelError::InvalidKernel { .. } => ImageError::InvalidKernel(err.to_string()),
            PixelError::OutOfRange { .. } => ImageError::InvalidArgument(err.to_string()),
        }
    }
}

/// Failures while reading or writing raster files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid raster data: {0}")]
    InvalidFormat(String),

    #[error("pixel {index} is invalid: {source}")]
    InvalidPixel {
        index: usize,
        #[source]
        source: PixelError,
    },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{format} codec error: {message}")]
    Backend {
        format: &'static str,
        message: String,
    },

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl CodecError {
    /// Map an I/O error on `path`, singling out a missing file.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CodecError::FileNotFound(path)
        } else {
            CodecError::Io { path, source }
        }
    }

    pub(crate) fn backend(format: &'static str, err: impl std::fmt::Display) -> Self {
        CodecError::Backend {
            format,
            message: err.to_string(),
        }
    }
}

/// Failures reported by the [`ImageStore`](crate::store::ImageStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("image with name '{0}' not found")]
    NotFound(String),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("unknown filter preset '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Save failures share the store error type.
pub type SaveError = StoreError;

/// Failures while loading configuration or preset files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid preset '{name}': {reason}")]
    InvalidPreset { name: String, reason: String },
}
