//! Configuration types for board reading.
//!
//! All detection thresholds are tuned against one UI theme. They live here
//! instead of in the detection code so another theme or resolution only
//! needs a different config.json.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::log;
use crate::paths;

/// An inclusive HSV color range in OpenCV's 8-bit convention
/// (hue 0-180, saturation and value 0-255).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Returns true if every channel of `hsv` lies within the range.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

/// Thresholds for locating the dark board panel in a full screenshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardDetectConfig {
    /// Color range of the board background
    pub hsv: HsvRange,
    /// Side length of the square structuring element for close/open
    pub kernel_size: u32,
    /// Candidates covering less than this fraction of the frame are rejected
    pub min_area_fraction: f32,
}

impl Default for BoardDetectConfig {
    fn default() -> Self {
        Self {
            hsv: HsvRange::new([0, 0, 10], [180, 120, 60]),
            kernel_size: 15,
            min_area_fraction: 0.05,
        }
    }
}

/// Thresholds for locating the lighter assignment cards inside the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDetectConfig {
    /// Color range of the card background
    pub hsv: HsvRange,
    /// Side length of the square structuring element for close/open
    pub kernel_size: u32,
    /// Minimum card width as a fraction of board width
    pub min_width_fraction: f32,
    /// Minimum card height as a fraction of board height
    pub min_height_fraction: f32,
}

impl Default for CardDetectConfig {
    fn default() -> Self {
        Self {
            hsv: HsvRange::new([0, 0, 80], [180, 100, 200]),
            kernel_size: 5,
            min_width_fraction: 0.15,
            min_height_fraction: 0.05,
        }
    }
}

/// OCR preprocessing and Tesseract settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Crops narrower than this are upscaled
    pub min_width: u32,
    /// Crops shorter than this are upscaled
    pub min_height: u32,
    /// Upscaling never uses a factor below this
    pub min_scale: f32,
    /// Gaussian kernel size (odd) applied before binarization
    pub blur_kernel_size: u32,
    /// Tesseract language code
    pub language: String,
    /// Explicit path to the tesseract executable
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_width: 200,
            min_height: 100,
            min_scale: 2.0,
            blur_kernel_size: 5,
            language: "eng".to_string(),
            tesseract_path: None,
            tessdata_dir: None,
        }
    }
}

/// Live capture settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Executable name of the game process whose window is captured
    pub process_name: String,
    /// Maximum time to wait for a captured frame (milliseconds)
    pub frame_timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            process_name: "GameClient.exe".to_string(),
            frame_timeout_ms: 5000,
        }
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub board: BoardDetectConfig,
    pub card: CardDetectConfig,
    pub ocr: OcrConfig,
    pub capture: CaptureConfig,
}

/// Loads configuration from `path`, or from config.json next to the
/// executable when no path is given. Falls back to defaults on any failure.
pub fn load_config(path: Option<&Path>) -> VisionConfig {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(paths::get_default_config_path);

    log(&format!("Looking for config at: {}", config_path.display()));

    if !config_path.exists() {
        log("Config file not found. Using default config.");
        return VisionConfig::default();
    }

    match fs::read_to_string(&config_path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                log(&format!("Config loaded from {}", config_path.display()));
                config
            }
            Err(e) => {
                log(&format!(
                    "Failed to parse {}: {}. Using defaults.",
                    config_path.display(),
                    e
                ));
                VisionConfig::default()
            }
        },
        Err(e) => {
            log(&format!(
                "Failed to read {}: {}. Using defaults.",
                config_path.display(),
                e
            ));
            VisionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hsv_range_contains_is_inclusive() {
        let range = HsvRange::new([0, 0, 10], [180, 120, 60]);
        assert!(range.contains([0, 0, 10]));
        assert!(range.contains([180, 120, 60]));
        assert!(!range.contains([90, 121, 30]));
        assert!(!range.contains([90, 60, 9]));
    }

    #[test]
    fn test_load_config_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "card": { "kernel_size": 7 }, "ocr": { "language": "deu" } }"#)
            .unwrap();

        let config = load_config(Some(&path));

        assert_eq!(config.card.kernel_size, 7);
        assert_eq!(config.card.min_width_fraction, 0.15);
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.board.kernel_size, 15);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.json")));
        assert_eq!(config.board.min_area_fraction, 0.05);
        assert_eq!(config.capture.process_name, "GameClient.exe");
    }

    #[test]
    fn test_load_config_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.card.hsv, HsvRange::new([0, 0, 80], [180, 100, 200]));
    }
}
