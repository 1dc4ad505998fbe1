//! Capture sources producing one RGB frame on demand.
//!
//! The pipeline only sees the `CaptureSource` trait:
//! - `FileCapture` loads a screenshot from disk (tests, offline use)
//! - `WindowCapture` grabs the live game window (Windows only)

#[cfg(windows)]
pub mod screenshot;
#[cfg(windows)]
pub mod window;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::config::CaptureConfig;
use crate::log;

#[cfg(windows)]
pub use screenshot::WindowCapture;

/// Anything that can produce a color frame of the screen.
pub trait CaptureSource {
    /// Produces one frame now. Failures here abort the board read.
    fn capture(&mut self) -> Result<RgbImage>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Loads a screenshot from a file on disk.
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    /// Fails immediately if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(anyhow!("Capture file not found: {}", path.display()));
        }
        Ok(Self { path })
    }
}

impl CaptureSource for FileCapture {
    fn capture(&mut self) -> Result<RgbImage> {
        let img = image::open(&self.path)
            .with_context(|| format!("Failed to read image: {}", self.path.display()))?;
        Ok(img.to_rgb8())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Creates the live capture source for this platform.
#[cfg(windows)]
pub fn live_source(config: &CaptureConfig) -> Result<Box<dyn CaptureSource>> {
    Ok(Box::new(WindowCapture::new(config)?))
}

/// Creates the live capture source for this platform.
#[cfg(not(windows))]
pub fn live_source(config: &CaptureConfig) -> Result<Box<dyn CaptureSource>> {
    Err(anyhow!(
        "Live capture of {} is only supported on Windows; pass --image instead",
        config.process_name
    ))
}

/// Saves a captured frame as `zora_<timestamp>.png` in `dir`.
///
/// Returns the path to the saved file.
pub fn save_capture(img: &RgbImage, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("zora_{}.png", timestamp));

    img.save(&path)
        .with_context(|| format!("Failed to save capture to {}", path.display()))?;
    log(&format!("Saved capture to {}", path.display()));

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_file_capture_missing_file() {
        assert!(FileCapture::new("/nonexistent/board.png").is_err());
    }

    #[test]
    fn test_file_capture_reads_png_as_rgb() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.png");
        RgbImage::from_pixel(40, 30, Rgb([20, 25, 30])).save(&path).unwrap();

        let mut source = FileCapture::new(&path).unwrap();
        let img = source.capture().unwrap();

        assert_eq!(img.dimensions(), (40, 30));
        assert_eq!(*img.get_pixel(5, 5), Rgb([20, 25, 30]));
        assert!(source.describe().contains("board.png"));
    }

    #[test]
    fn test_file_capture_undecodable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.png");
        std::fs::write(&path, b"not an image").unwrap();

        let mut source = FileCapture::new(&path).unwrap();
        assert!(source.capture().is_err());
    }

    #[test]
    fn test_save_capture_writes_png() {
        let dir = tempdir().unwrap();
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));

        let path = save_capture(&img, dir.path()).unwrap();

        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("zora_"));
        assert_eq!(image::open(&path).unwrap().to_rgb8(), img);
    }
}
