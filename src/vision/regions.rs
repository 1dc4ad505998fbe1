//! Card detection: find the individual assignment cards within the board.
//!
//! Each card is a lighter rectangle on the dark board background. Cards are
//! wide and short, so width and height are gated independently against the
//! board's own dimensions rather than by area.

use image::RgbImage;

use super::BoundingBox;
use super::segment::find_color_regions;
use crate::config::CardDetectConfig;
use crate::log;

/// Finds card rectangles in a cropped board image, in reading order.
///
/// Returns an empty list when nothing clears the size filters.
pub fn locate_cards(board: &RgbImage, config: &CardDetectConfig) -> Vec<BoundingBox> {
    let (w, h) = board.dimensions();
    let min_width = (w as f32 * config.min_width_fraction) as u32;
    let min_height = (h as f32 * config.min_height_fraction) as u32;

    let mut cards: Vec<BoundingBox> = find_color_regions(board, &config.hsv, config.kernel_size)
        .into_iter()
        .filter(|b| b.width >= min_width && b.height >= min_height)
        .collect();

    sort_reading_order(&mut cards);

    log(&format!(
        "Found {} assignment card regions (min size {}x{})",
        cards.len(),
        min_width,
        min_height
    ));
    cards
}

/// Sorts regions top-to-bottom, then left-to-right.
///
/// Card indices reported elsewhere refer to positions in this order.
pub fn sort_reading_order(boxes: &mut [BoundingBox]) {
    boxes.sort_by_key(|b| (b.y, b.x));
}
