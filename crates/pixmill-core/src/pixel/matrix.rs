//! 3x3 linear color transforms

use serde::{Deserialize, Serialize};

use crate::error::PixelError;

/// A validated 3x3 matrix mapping `(r, g, b)` to a new `(r, g, b)`.
///
/// Row `i` produces output channel `i` as the dot product of the row with the
/// input triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ColorMatrix([[f64; 3]; 3]);

impl ColorMatrix {
    /// Every output channel becomes the pixel's luma.
    pub const GREYSCALE: ColorMatrix = ColorMatrix([
        [0.2126, 0.7152, 0.0722],
        [0.2126, 0.7152, 0.0722],
        [0.2126, 0.7152, 0.0722],
    ]);

    pub const SEPIA: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.349, 0.686, 0.168],
        [0.272, 0.534, 0.131],
    ]);

    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        ColorMatrix(rows)
    }

    /// Validate arbitrary rows; anything other than exactly 3x3 is rejected.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PixelError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.len() != 3 || rows.iter().any(|row| row.as_ref().len() != 3) {
            return Err(PixelError::InvalidKernel {
                rows: rows.len(),
                cols,
            });
        }

        let mut out = [[0.0; 3]; 3];
        for (dst, src) in out.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(ColorMatrix(out))
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    pub(crate) fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let dot = |row: &[f64; 3]| row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
        [dot(&self.0[0]), dot(&self.0[1]), dot(&self.0[2])]
    }
}

impl TryFrom<Vec<Vec<f64>>> for ColorMatrix {
    type Error = PixelError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        ColorMatrix::from_rows(&rows)
    }
}

impl From<ColorMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ColorMatrix) -> Self {
        matrix.0.iter().map(|row| row.to_vec()).collect()
    }
}
