//! Region detection on screenshots.
//!
//! Detection finds regions, extraction (in `ocr`) reads them:
//! - `detect` locates the admiralty board within a full screenshot
//! - `regions` finds the individual assignment cards within the board
//! - `segment` holds the color segmentation both of them share

pub mod detect;
pub mod regions;
pub mod segment;

#[cfg(test)]
pub(crate) mod fixtures;

pub use detect::locate_board;
pub use regions::locate_cards;

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in source-image pixels, origin at top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive).
    pub fn x2(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn y2(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Crops `region` out of `img`, clamping the rectangle to the image bounds.
pub fn crop_region(img: &RgbImage, region: &BoundingBox) -> RgbImage {
    let (w, h) = img.dimensions();

    let x0 = region.x.min(w);
    let y0 = region.y.min(h);
    let rw = region.width.min(w - x0);
    let rh = region.height.min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}
