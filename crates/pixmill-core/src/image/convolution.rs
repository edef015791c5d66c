//! Neighborhood filtering
//!
//! Kernel cells that land outside the image contribute nothing; the remaining
//! weights are not renormalised, so borders darken for blur-like kernels.

use super::{clamp_channel, validate_name, Image, Kernel};
use crate::error::ImageError;
use crate::pixel::Pixel;

impl Image {
    /// Convolve every pixel with `kernel`.
    pub fn apply_kernel(&self, kernel: &Kernel, name: impl Into<String>) -> Result<Self, ImageError> {
        let name = validate_name(name.into())?;
        log::debug!(
            "convolving {} ({}x{}) with {}-row kernel",
            self.name,
            self.width,
            self.height,
            kernel.height()
        );

        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in 0..self.height {
            for col in 0..self.width {
                pixels.push(self.convolve_at(kernel, row, col));
            }
        }
        Ok(self.derive(name, pixels))
    }

    fn convolve_at(&self, kernel: &Kernel, row: usize, col: usize) -> Pixel {
        let center = kernel.center() as isize;
        let mut sum = [0.0f64; 3];

        for (kr, weights) in kernel.rows().iter().enumerate() {
            let src_row = row as isize + kr as isize - center;
            if src_row < 0 || src_row >= self.height as isize {
                continue;
            }
            for (kc, &weight) in weights.iter().enumerate() {
                let src_col = col as isize + kc as isize - center;
                if src_col < 0 || src_col >= self.width as isize {
                    continue;
                }
                let neighbor = self.pixels[src_row as usize * self.width + src_col as usize];
                sum[0] += weight * f64::from(neighbor.red());
                sum[1] += weight * f64::from(neighbor.green());
                sum[2] += weight * f64::from(neighbor.blue());
            }
        }

        Pixel::from_channels(
            clamp_channel(sum[0], self.max_channel),
            clamp_channel(sum[1], self.max_channel),
            clamp_channel(sum[2], self.max_channel),
        )
    }
}
