//! Zora admiralty board reader
//!
//! Turns a screen capture of the Star Trek Online admiralty board into
//! structured assignment records:
//! - `vision` locates the board panel and the assignment cards inside it
//! - `ocr` preprocesses card crops, runs Tesseract and parses the text
//! - `pipeline` ties capture, detection and extraction together

pub mod capture;
pub mod config;
pub mod models;
pub mod ocr;
pub mod paths;
pub mod pipeline;
pub mod vision;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enables or disables echoing log lines to stderr.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Logs a message with timestamp to the log file, and to stderr in verbose mode.
///
/// stdout is left alone because the CLI writes its JSON there.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    if VERBOSE.load(Ordering::Relaxed) {
        eprint!("{}", line);
    }
    let log_path = paths::get_logs_dir().join("zora.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}
