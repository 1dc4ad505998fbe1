use anyhow::{anyhow, Context, Result};
use image::GrayImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::OcrConfig;
use crate::log;

/// How the engine should read an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OcrMode {
    /// One uniform block of text
    Text,
    /// A single line restricted to the digits 0-9
    Digits,
}

/// An OCR backend: takes a binarized image and returns the raw recognized text.
pub trait OcrEngine {
    fn recognize(&self, img: &GrayImage, mode: OcrMode) -> Result<String>;
}

/// Runs the Tesseract executable on a temporary PNG and reads stdout.
#[derive(Clone, Debug)]
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
    language: String,
}

impl TesseractEngine {
    pub fn new(executable: PathBuf, tessdata_dir: Option<PathBuf>, language: &str) -> Self {
        Self {
            executable,
            tessdata_dir,
            language: language.to_string(),
        }
    }

    /// Locates Tesseract and its data the way `setup` describes.
    pub fn from_config(config: &OcrConfig) -> Result<Self> {
        let executable = find_tesseract_executable(config)?;
        let tessdata_dir = find_tessdata_dir(config);
        match &tessdata_dir {
            Some(dir) => log(&format!("Using tessdata at: {}", dir.display())),
            None => log("No tessdata directory found, using Tesseract's built-in default"),
        }
        Ok(Self::new(executable, tessdata_dir, &config.language))
    }

    /// Command-line arguments for one run, writing the result to stdout.
    fn build_args(&self, input: &Path, mode: OcrMode) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![input.into(), "stdout".into()];
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".into());
            args.push(dir.into());
        }
        args.push("-l".into());
        args.push(self.language.as_str().into());
        args.push("--oem".into());
        args.push("3".into());
        match mode {
            OcrMode::Text => {
                args.push("--psm".into());
                args.push("6".into()); // Assume single uniform block of text
            }
            OcrMode::Digits => {
                args.push("--psm".into());
                args.push("7".into()); // Single text line
                args.push("-c".into());
                args.push("tessedit_char_whitelist=0123456789".into());
            }
        }
        args
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, img: &GrayImage, mode: OcrMode) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())
            .context("Failed to write OCR input image")?;

        let output = Command::new(&self.executable)
            .args(self.build_args(temp_input.path(), mode))
            .output()
            .with_context(|| format!("Failed to run {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
