//! Image Splitter: slices a tall capture into parts that fit the page.

use std::sync::Arc;

use super::RasterImage;

/// Number of parts produced whenever an image is too tall.
pub const SPLIT_PARTS: u32 = 3;

/// Split `image` so it can be placed in `max_height`.
///
/// An image that already fits is returned as-is (same allocation). Anything
/// taller is cut into exactly [`SPLIT_PARTS`] parts of `floor(height / 3)`
/// rows each, top to bottom, regardless of how far it overshoots. The last
/// `height % 3` rows are not part of any slice.
pub fn split(image: &Arc<RasterImage>, max_height: f32) -> Vec<Arc<RasterImage>> {
    if image.height() as f32 <= max_height {
        return vec![Arc::clone(image)];
    }

    let part_height = image.height() / SPLIT_PARTS;
    log::debug!(
        "splitting {}x{} capture into {} parts of {} rows (limit {:.1})",
        image.width(),
        image.height(),
        SPLIT_PARTS,
        part_height,
        max_height
    );

    (0..SPLIT_PARTS)
        .map(|i| Arc::new(image.crop_rows(i * part_height, part_height)))
        .collect()
}
