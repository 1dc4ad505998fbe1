//! Synthetic admiralty board images for tests.
//!
//! Deliberately simplified: a dark panel with lighter bordered cards and a
//! few white bars standing in for text.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::BoundingBox;

pub const BOARD_BG: Rgb<u8> = Rgb([20, 25, 30]);
pub const CARD_BG: Rgb<u8> = Rgb([100, 110, 120]);
pub const CARD_BORDER: Rgb<u8> = Rgb([160, 170, 180]);
pub const TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// Card rectangles of the reference three-card layout, listed out of reading order.
pub const THREE_CARD_LAYOUT: [BoundingBox; 3] = [
    BoundingBox::new(50, 30, 300, 200),
    BoundingBox::new(50, 250, 300, 200),
    BoundingBox::new(400, 30, 300, 200),
];

/// Draws one card: lighter fill, a 2px border, and text-like bars.
pub fn draw_card(img: &mut RgbImage, card: &BoundingBox) {
    let rect = Rect::at(card.x as i32, card.y as i32).of_size(card.width, card.height);
    draw_filled_rect_mut(img, rect, CARD_BG);
    draw_hollow_rect_mut(img, rect, CARD_BORDER);
    let inner = Rect::at(card.x as i32 + 1, card.y as i32 + 1).of_size(card.width - 2, card.height - 2);
    draw_hollow_rect_mut(img, inner, CARD_BORDER);

    for line in 0..6 {
        let y = card.y as i32 + 20 + line * 25;
        let width = if line == 0 { card.width / 2 } else { card.width / 3 };
        draw_filled_rect_mut(img, Rect::at(card.x as i32 + 10, y).of_size(width, 2), TEXT);
    }
}

/// A dark board filling the whole frame with the given cards drawn on it.
pub fn board_with_cards(width: u32, height: u32, cards: &[BoundingBox]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BOARD_BG);
    for card in cards {
        draw_card(&mut img, card);
    }
    img
}

/// The reference 800x600 board with three cards.
pub fn synthetic_board() -> RgbImage {
    board_with_cards(800, 600, &THREE_CARD_LAYOUT)
}
