//! Framebuffer view of an image for display surfaces

use crate::image::Image;

/// Row-major `0x00RRGGBB` pixels, the layout windowing framebuffers expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl RenderBuffer {
    pub fn from_image(image: &Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.pixels().iter().map(|p| p.to_packed_rgb()).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Unpack into interleaved RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|&px| [(px >> 16) as u8, (px >> 8) as u8, px as u8])
            .collect()
    }
}

impl From<&Image> for RenderBuffer {
    fn from(image: &Image) -> Self {
        Self::from_image(image)
    }
}
