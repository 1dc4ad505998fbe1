use anyhow::Result;
use image::RgbImage;

use super::engine::{OcrEngine, OcrMode};
use super::preprocess::prepare_for_ocr;
use crate::config::OcrConfig;

/// Preprocesses image regions and hands them to an OCR engine.
pub struct TextRecognizer<E> {
    engine: E,
    config: OcrConfig,
}

impl<E: OcrEngine> TextRecognizer<E> {
    pub fn new(engine: E, config: OcrConfig) -> Self {
        Self { engine, config }
    }

    /// Runs OCR on an image region and returns the trimmed text.
    ///
    /// Engine failures are returned as errors, never masked.
    pub fn recognize(&self, img: &RgbImage, mode: OcrMode) -> Result<String> {
        let prepared = prepare_for_ocr(img, &self.config)?;
        let text = self.engine.recognize(&prepared, mode)?;
        Ok(text.trim().to_string())
    }

    /// General text recognition on one block of text.
    pub fn recognize_text(&self, img: &RgbImage) -> Result<String> {
        self.recognize(img, OcrMode::Text)
    }

    /// Reads a single integer from an image region.
    ///
    /// Returns `Ok(None)` if the engine output contains no digits.
    pub fn recognize_number(&self, img: &RgbImage) -> Result<Option<u32>> {
        let text = self.recognize(img, OcrMode::Digits)?;
        Ok(parse_number(&text))
    }
}

/// Extracts an integer from digit-mode OCR output.
///
/// Purely numeric text is parsed directly; noisy text yields its first run of
/// digits.
pub fn parse_number(text: &str) -> Option<u32> {
    let text = text.trim();
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return text.parse().ok();
    }

    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    run.parse().ok()
}
