//! Convolution kernels
//!
//! A kernel needs an odd number of rows and a non-empty first row. Column
//! count and row lengths are not checked further; each row is walked with its
//! own length and column offsets are measured from the row center.

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// A convolution matrix of weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Kernel {
    rows: Vec<Vec<f64>>,
}

impl Kernel {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ImageError> {
        if rows.len() % 2 == 0 {
            return Err(ImageError::InvalidKernel(format!(
                "kernel must have an odd number of rows, got {}",
                rows.len()
            )));
        }
        if rows[0].is_empty() {
            return Err(ImageError::InvalidKernel(
                "kernel rows must not be empty".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// 3x3 Gaussian-like blur.
    pub fn blur() -> Self {
        Self {
            rows: vec![
                vec![0.0625, 0.125, 0.0625],
                vec![0.125, 0.25, 0.125],
                vec![0.0625, 0.125, 0.0625],
            ],
        }
    }

    /// 5x5 sharpen: center 1.0, inner ring 0.25, outer ring -0.0625.
    pub fn sharpen() -> Self {
        let o = -0.0625;
        let i = 0.25;
        Self {
            rows: vec![
                vec![o, o, o, o, o],
                vec![o, i, i, i, o],
                vec![o, i, 1.0, i, o],
                vec![o, i, i, i, o],
                vec![o, o, o, o, o],
            ],
        }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Offset of the center row (also used as the column offset).
    pub fn center(&self) -> usize {
        self.rows.len() / 2
    }
}

impl TryFrom<Vec<Vec<f64>>> for Kernel {
    type Error = ImageError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Kernel::new(rows)
    }
}

impl From<Kernel> for Vec<Vec<f64>> {
    fn from(kernel: Kernel) -> Self {
        kernel.rows
    }
}
