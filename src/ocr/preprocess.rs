use anyhow::{anyhow, Result};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::separable_filter_equal;

use crate::config::OcrConfig;

/// Converts an RGB image to grayscale with the ITU-R BT.601 luma weights:
/// Y = 0.299*R + 0.587*G + 0.114*B
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let luma = 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32;
        Luma([luma.round().min(255.0) as u8])
    })
}

/// Scale factor for crops below the minimum OCR size, or `None` if the crop
/// is already large enough.
///
/// The factor brings both dimensions up to the minimum and is never below
/// `min_scale`.
pub fn upscale_factor(width: u32, height: u32, config: &OcrConfig) -> Option<f32> {
    if height >= config.min_height && width >= config.min_width {
        return None;
    }
    let scale = (config.min_width as f32 / width as f32)
        .max(config.min_height as f32 / height as f32)
        .max(config.min_scale);
    Some(scale)
}

/// Gaussian sigma for a square kernel of `kernel_size`, as OpenCV derives it
/// when no sigma is given.
fn sigma_for_kernel(kernel_size: u32) -> f32 {
    let k = kernel_size.max(1) as f32;
    0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for a `kernel_size` tap filter.
///
/// Even sizes are widened to the next odd size so the kernel stays centered.
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    let size = kernel_size.max(1) | 1;
    let sigma = sigma_for_kernel(size);
    let radius = (size / 2) as f32;

    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - radius;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Binarizes with an automatically selected (Otsu) threshold.
///
/// Pixels above the level become white (255), the rest black (0).
pub fn otsu_binarize(img: &GrayImage) -> GrayImage {
    threshold(img, otsu_level(img), ThresholdType::Binary)
}

/// Prepares a card crop for OCR: grayscale, upscale small crops with cubic
/// interpolation, blur away antialiasing noise, then Otsu binarization.
///
/// A global automatic threshold is used because foreground/background contrast
/// differs between rarity color themes.
pub fn prepare_for_ocr(img: &RgbImage, config: &OcrConfig) -> Result<GrayImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(anyhow!("Cannot prepare an empty {}x{} image for OCR", w, h));
    }

    let mut gray = to_grayscale(img);

    if let Some(scale) = upscale_factor(w, h, config) {
        let new_w = (w as f32 * scale).round() as u32;
        let new_h = (h as f32 * scale).round() as u32;
        gray = imageops::resize(&gray, new_w, new_h, FilterType::CatmullRom);
    }

    let blurred = separable_filter_equal(&gray, &gaussian_kernel(config.blur_kernel_size));
    Ok(otsu_binarize(&blurred))
}
