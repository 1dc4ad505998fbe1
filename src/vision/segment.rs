//! Color segmentation shared by board and card detection.
//!
//! The technique is the same at both levels: threshold the frame in HSV,
//! close then open the mask with a square kernel, and take the bounding
//! rectangles of the external contours.

use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use super::BoundingBox;
use crate::config::HsvRange;

/// Converts one RGB pixel to HSV using OpenCV's 8-bit convention:
/// hue is halved to fit 0-180, saturation and value span 0-255.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let v = r.max(g).max(b);
    let delta = v - r.min(g).min(b);

    let s = if v > 0.0 { delta / v * 255.0 } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [(h / 2.0).round() as u8, s.round() as u8, v as u8]
}

/// Builds a binary mask: 255 where the pixel's HSV value lies in `range`, 0 elsewhere.
pub fn hsv_mask(img: &RgbImage, range: &HsvRange) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let pixel = img.get_pixel(x, y);
        if range.contains(rgb_to_hsv(pixel.0)) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Morphological close followed by open with a `kernel_size` square.
///
/// Closing merges fragmented regions, opening strips speckle noise.
pub fn clean_mask(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    // An LInf ball of radius k is a (2k+1) square.
    let k = (kernel_size / 2).min(u8::MAX as u32) as u8;
    let closed = close(mask, Norm::LInf, k);
    open(&closed, Norm::LInf, k)
}

/// Bounding rectangles of the external contours of a binary mask,
/// in the order the contour tracer encounters them.
///
/// The mask is traced inside a 1px background frame. Without it a region
/// touching the left image edge is reported as a hole border, and a region
/// filling the frame would yield only the holes inside it.
pub fn external_bounding_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut padded = GrayImage::new(w + 2, h + 2);
    imageops::replace(&mut padded, mask, 1, 1);
    let contours = find_contours::<u32>(&padded);

    let mut boxes = Vec::new();
    for contour in &contours {
        if contour.parent.is_some() || contour.border_type != BorderType::Outer {
            continue;
        }
        let Some(first) = contour.points.first() else {
            continue;
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &contour.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        // Back to unpadded coordinates
        let x0 = min_x.saturating_sub(1).min(w - 1);
        let y0 = min_y.saturating_sub(1).min(h - 1);
        let x1 = max_x.saturating_sub(1).min(w - 1);
        let y1 = max_y.saturating_sub(1).min(h - 1);

        boxes.push(BoundingBox::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1));
    }

    boxes
}

/// Full segmentation pass: threshold, clean, and collect external regions.
pub fn find_color_regions(img: &RgbImage, range: &HsvRange, kernel_size: u32) -> Vec<BoundingBox> {
    let mask = hsv_mask(img, range);
    let cleaned = clean_mask(&mask, kernel_size);
    external_bounding_boxes(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn test_rgb_to_hsv_matches_opencv_convention() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        // Board background color used by the synthetic fixtures
        assert_eq!(rgb_to_hsv([20, 25, 30]), [105, 85, 30]);
    }

    #[test]
    fn test_hsv_mask_selects_range() {
        let mut img = RgbImage::from_pixel(4, 1, Rgb([200, 200, 200]));
        img.put_pixel(1, 0, Rgb([20, 25, 30]));

        let mask = hsv_mask(&img, &HsvRange::new([0, 0, 10], [180, 120, 60]));

        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_clean_mask_removes_speckle() {
        let mut mask = GrayImage::new(60, 60);
        mask.put_pixel(5, 5, Luma([255]));
        draw_filled_rect_mut(&mut mask, Rect::at(20, 20).of_size(30, 30), Luma([255u8]));

        let cleaned = clean_mask(&mask, 5);

        assert_eq!(cleaned.get_pixel(5, 5)[0], 0);
        assert_eq!(cleaned.get_pixel(35, 35)[0], 255);
    }

    #[test]
    fn test_external_bounding_boxes_exact_for_rectangles() {
        let mut mask = GrayImage::new(100, 80);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 5).of_size(30, 20), Luma([255u8]));
        draw_filled_rect_mut(&mut mask, Rect::at(50, 40).of_size(40, 30), Luma([255u8]));
        // A hole inside the second rectangle must not produce its own box
        draw_filled_rect_mut(&mut mask, Rect::at(60, 50).of_size(5, 5), Luma([0u8]));

        let mut boxes = external_bounding_boxes(&mask);
        boxes.sort_by_key(|b| (b.y, b.x));

        assert_eq!(
            boxes,
            vec![
                BoundingBox::new(10, 5, 30, 20),
                BoundingBox::new(50, 40, 40, 30),
            ]
        );
    }

    #[test]
    fn test_external_bounding_boxes_region_touching_edges() {
        let mut mask = GrayImage::new(100, 80);
        draw_filled_rect_mut(&mut mask, Rect::at(0, 0).of_size(40, 30), Luma([255u8]));
        draw_filled_rect_mut(&mut mask, Rect::at(70, 50).of_size(30, 30), Luma([255u8]));

        let mut boxes = external_bounding_boxes(&mask);
        boxes.sort_by_key(|b| (b.y, b.x));

        assert_eq!(
            boxes,
            vec![
                BoundingBox::new(0, 0, 40, 30),
                BoundingBox::new(70, 50, 30, 30),
            ]
        );
    }

    #[test]
    fn test_external_bounding_boxes_full_frame_ignores_holes() {
        let mut mask = GrayImage::from_pixel(120, 90, Luma([255u8]));
        draw_filled_rect_mut(&mut mask, Rect::at(20, 20).of_size(30, 20), Luma([0u8]));
        draw_filled_rect_mut(&mut mask, Rect::at(70, 40).of_size(30, 20), Luma([0u8]));

        assert_eq!(external_bounding_boxes(&mask), vec![BoundingBox::new(0, 0, 120, 90)]);
    }

    #[test]
    fn test_external_bounding_boxes_empty_mask() {
        let mask = GrayImage::new(50, 50);
        assert!(external_bounding_boxes(&mask).is_empty());
    }
}
