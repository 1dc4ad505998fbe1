//! One board read: capture, locate the board, locate the cards, extract each card.
//!
//! Only a failed capture aborts a read. A missing board or an empty board is a
//! normal empty result, and a card that fails extraction is recorded in
//! `BoardState::errors` while the remaining cards are still read.

use anyhow::{Context, Result};
use image::RgbImage;

use crate::capture::CaptureSource;
use crate::config::VisionConfig;
use crate::log;
use crate::models::{Assignment, BoardState};
use crate::ocr::{AssignmentParser, OcrEngine, TextRecognizer};
use crate::vision::detect::crop_board;
use crate::vision::{crop_region, locate_board, locate_cards};

/// Reads admiralty boards with a fixed configuration and OCR engine.
pub struct BoardReader<E> {
    config: VisionConfig,
    recognizer: TextRecognizer<E>,
    parser: AssignmentParser,
}

impl<E: OcrEngine> BoardReader<E> {
    pub fn new(engine: E, config: VisionConfig) -> Result<Self> {
        let recognizer = TextRecognizer::new(engine, config.ocr.clone());
        let parser = AssignmentParser::new().context("Failed to compile assignment patterns")?;
        Ok(Self {
            config,
            recognizer,
            parser,
        })
    }

    /// Captures one frame from `source` and reads the board in it.
    ///
    /// Errors only when the source cannot produce a decodable image.
    pub fn read(&self, source: &mut dyn CaptureSource) -> Result<BoardState> {
        log(&format!("Capturing from {}", source.describe()));
        let frame = source
            .capture()
            .with_context(|| format!("Capture from {} failed", source.describe()))?;
        Ok(self.read_image(&frame))
    }

    /// Reads the board in an already captured frame.
    pub fn read_image(&self, frame: &RgbImage) -> BoardState {
        let Some(board_box) = locate_board(frame, &self.config.board) else {
            log("No board in frame, nothing to read");
            return BoardState::default();
        };

        let board = crop_board(frame, &board_box);
        let cards = locate_cards(&board, &self.config.card);
        if cards.is_empty() {
            log("No assignment cards on board");
            return BoardState::default();
        }

        let results = cards
            .iter()
            .map(|card| self.extract_card(&crop_region(&board, card)))
            .collect();

        assemble_board_state(results)
    }

    /// Recognizes and parses one card crop.
    pub fn extract_card(&self, card: &RgbImage) -> Result<Assignment> {
        let text = self.recognizer.recognize_text(card)?;
        log(&format!("Card text: {:?}", text));
        Ok(Assignment::from_fields(self.parser.parse(&text)))
    }
}

/// Collects per-card outcomes in reading order.
///
/// Failed cards become one error message each, naming the card's 0-based index.
pub fn assemble_board_state(results: Vec<Result<Assignment>>) -> BoardState {
    let mut state = BoardState::default();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(assignment) => state.assignments.push(assignment),
            Err(e) => {
                let message = format!("Failed to extract assignment from card {}: {:#}", index, e);
                log(&message);
                state.errors.push(message);
            }
        }
    }

    log(&format!(
        "Read {} assignments, {} failed cards",
        state.assignments.len(),
        state.errors.len()
    ));
    state
}
