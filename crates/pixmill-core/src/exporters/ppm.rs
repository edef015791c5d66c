//! Plain-text PPM (P3) writer

use crate::image::Image;

/// Serialize as P3 text with one channel value per line.
pub fn serialize_ppm(image: &Image) -> String {
    let mut out = format!(
        "P3 {} {}\n{}\n",
        image.width(),
        image.height(),
        image.max_channel()
    );
    out.reserve(image.pixels().len() * 3 * 4);
    for pixel in image.pixels() {
        for channel in pixel.to_rgb() {
            out.push_str(&channel.to_string());
            out.push('\n');
        }
    }
    out
}
