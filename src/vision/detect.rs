//! Board detection: locate the admiralty board within a screenshot.
//!
//! The board is a rectangular UI panel with a very dark background holding
//! the assignment cards. Absence of a board is an ordinary outcome (the
//! screenshot shows something else), so it is reported as `None`.

use image::RgbImage;

use super::segment::find_color_regions;
use super::{BoundingBox, crop_region};
use crate::config::BoardDetectConfig;
use crate::log;

/// Locates the board panel within a full screenshot.
///
/// Segments the dark background color, drops candidates smaller than
/// `min_area_fraction` of the frame (menus, shadows), and returns the largest
/// remaining rectangle. Ties keep the first candidate found.
pub fn locate_board(img: &RgbImage, config: &BoardDetectConfig) -> Option<BoundingBox> {
    let candidates = find_color_regions(img, &config.hsv, config.kernel_size);
    if candidates.is_empty() {
        log("Board detection: no dark regions found");
        return None;
    }

    let image_area = img.width() as u64 * img.height() as u64;
    let min_area = (image_area as f64 * config.min_area_fraction as f64) as u64;

    let mut best: Option<BoundingBox> = None;
    for candidate in candidates {
        let area = candidate.area();
        if area < min_area {
            continue;
        }
        if best.is_none_or(|b| area > b.area()) {
            best = Some(candidate);
        }
    }

    match &best {
        Some(b) => log(&format!(
            "Board detected at ({}, {}) size {}x{} (area={})",
            b.x,
            b.y,
            b.width,
            b.height,
            b.area()
        )),
        None => log(&format!(
            "Board detection: no region met minimum area ({} px)",
            min_area
        )),
    }

    best
}

/// Crops the screenshot to the detected board.
pub fn crop_board(img: &RgbImage, board: &BoundingBox) -> RgbImage {
    crop_region(img, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::fixtures;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    const BOARD_BG: Rgb<u8> = Rgb([20, 25, 30]);
    const BRIGHT: Rgb<u8> = Rgb([200, 200, 200]);

    #[test]
    fn test_bright_image_has_no_board() {
        let img = RgbImage::from_pixel(600, 400, BRIGHT);
        assert_eq!(locate_board(&img, &BoardDetectConfig::default()), None);
    }

    #[test]
    fn test_dark_rectangle_detected_exactly() {
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(100, 80).of_size(500, 400), BOARD_BG);

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();

        assert_eq!(board, BoundingBox::new(100, 80, 500, 400));
    }

    #[test]
    fn test_full_frame_board_with_cards() {
        let img = fixtures::synthetic_board();

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();

        assert_eq!(board, BoundingBox::new(0, 0, 800, 600));
    }

    #[test]
    fn test_board_flush_with_frame_edge() {
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(0, 100).of_size(500, 400), BOARD_BG);

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();

        assert_eq!(board, BoundingBox::new(0, 100, 500, 400));
    }

    #[test]
    fn test_board_in_top_left_corner() {
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(0, 0).of_size(500, 400), BOARD_BG);

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();

        assert_eq!(board, BoundingBox::new(0, 0, 500, 400));
    }

    #[test]
    fn test_small_dark_region_rejected() {
        // 50x50 is well under 5% of 800x600
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(100, 100).of_size(50, 50), BOARD_BG);

        assert_eq!(locate_board(&img, &BoardDetectConfig::default()), None);
    }

    #[test]
    fn test_largest_candidate_wins() {
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(20, 20).of_size(200, 150), BOARD_BG);
        draw_filled_rect_mut(&mut img, Rect::at(300, 200).of_size(450, 350), BOARD_BG);

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();

        assert_eq!(board, BoundingBox::new(300, 200, 450, 350));
    }

    #[test]
    fn test_crop_board_matches_detection() {
        let mut img = RgbImage::from_pixel(800, 600, BRIGHT);
        draw_filled_rect_mut(&mut img, Rect::at(100, 80).of_size(500, 400), BOARD_BG);

        let board = locate_board(&img, &BoardDetectConfig::default()).unwrap();
        let cropped = crop_board(&img, &board);

        assert_eq!(cropped.dimensions(), (500, 400));
        assert_eq!(*cropped.get_pixel(0, 0), BOARD_BG);
    }
}
