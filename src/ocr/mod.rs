//! Reading assignment cards: preprocessing, OCR and text parsing.

pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod recognize;
pub mod setup;

pub use engine::{OcrEngine, OcrMode, TesseractEngine};
pub use extract::{AssignmentParser, RawAssignmentFields};
pub use preprocess::prepare_for_ocr;
pub use recognize::TextRecognizer;
pub use setup::ensure_tessdata;
