//! Textual operation vocabulary

use std::fmt;

use crate::error::{ImageError, StoreError};

/// An image operation a front end can request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RedComponent,
    GreenComponent,
    BlueComponent,
    ValueComponent,
    IntensityComponent,
    LumaComponent,
    VerticalFlip,
    HorizontalFlip,
    Brighten(i64),
    Blur,
    Sharpen,
    Greyscale,
    Sepia,
}

impl Operation {
    /// Every accepted operation name.
    pub const NAMES: [&'static str; 13] = [
        "red-component",
        "green-component",
        "blue-component",
        "value-component",
        "intensity-component",
        "luma-component",
        "vertical-flip",
        "horizontal-flip",
        "brighten",
        "blur",
        "sharpen",
        "greyscale",
        "sepia",
    ];

    /// Resolve an operation name. `brighten` needs `increment`; other
    /// operations ignore it.
    pub fn from_name(name: &str, increment: Option<i64>) -> Result<Self, StoreError> {
        let op = match name {
            "red-component" => Operation::RedComponent,
            "green-component" => Operation::GreenComponent,
            "blue-component" => Operation::BlueComponent,
            "value-component" => Operation::ValueComponent,
            "intensity-component" => Operation::IntensityComponent,
            "luma-component" => Operation::LumaComponent,
            "vertical-flip" => Operation::VerticalFlip,
            "horizontal-flip" => Operation::HorizontalFlip,
            "brighten" => {
                let increment = increment.ok_or_else(|| {
                    ImageError::InvalidArgument("brighten requires an increment".to_string())
                })?;
                Operation::Brighten(increment)
            }
            "blur" => Operation::Blur,
            "sharpen" => Operation::Sharpen,
            "greyscale" => Operation::Greyscale,
            "sepia" => Operation::Sepia,
            _ => return Err(StoreError::UnknownOperation(name.to_string())),
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::RedComponent => "red-component",
            Operation::GreenComponent => "green-component",
            Operation::BlueComponent => "blue-component",
            Operation::ValueComponent => "value-component",
            Operation::IntensityComponent => "intensity-component",
            Operation::LumaComponent => "luma-component",
            Operation::VerticalFlip => "vertical-flip",
            Operation::HorizontalFlip => "horizontal-flip",
            Operation::Brighten(_) => "brighten",
            Operation::Blur => "blur",
            Operation::Sharpen => "sharpen",
            Operation::Greyscale => "greyscale",
            Operation::Sepia => "sepia",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Brighten(increment) => write!(f, "brighten {}", increment),
            other => f.write_str(other.name()),
        }
    }
}
