use anyhow::{anyhow, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::OcrConfig;
use crate::log;
use crate::paths::get_tesseract_dir;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

const WINDOWS_INSTALL_DIRS: [&str; 2] = [
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];

fn executable_name() -> String {
    format!("tesseract{}", std::env::consts::EXE_SUFFIX)
}

fn traineddata_name(language: &str) -> String {
    format!("{}.traineddata", language)
}

fn has_traineddata(dir: &Path, language: &str) -> bool {
    dir.join(traineddata_name(language)).exists()
}

/// Finds the Tesseract executable: configured path, then our local dir,
/// then PATH, then the common Windows install locations.
pub fn find_tesseract_executable(config: &OcrConfig) -> Result<PathBuf> {
    if let Some(path) = &config.tesseract_path {
        if path.exists() {
            return Ok(path.clone());
        }
        log(&format!(
            "Configured tesseract_path {} does not exist, searching elsewhere",
            path.display()
        ));
    }

    let local_exe = get_tesseract_dir().join(executable_name());
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // Check PATH
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for dir in &WINDOWS_INSTALL_DIRS {
        let p = Path::new(dir).join("tesseract.exe");
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR and add it to PATH, \
         or set ocr.tesseract_path in config.json"
    ))
}

/// Finds a tessdata directory containing the configured language.
///
/// Returns `None` when nothing is found, in which case Tesseract falls back
/// to its compiled-in data path.
pub fn find_tessdata_dir(config: &OcrConfig) -> Option<PathBuf> {
    let language = config.language.as_str();

    if let Some(dir) = &config.tessdata_dir {
        if has_traineddata(dir, language) {
            return Some(dir.clone());
        }
        log(&format!(
            "Configured tessdata_dir {} has no {}",
            dir.display(),
            traineddata_name(language)
        ));
    }

    let local_tessdata = get_tesseract_dir().join("tessdata");
    if has_traineddata(&local_tessdata, language) {
        return Some(local_tessdata);
    }

    // Check TESSDATA_PREFIX environment variable
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if has_traineddata(&p, language) {
            return Some(p);
        }
        let p = p.join("tessdata");
        if has_traineddata(&p, language) {
            return Some(p);
        }
    }

    WINDOWS_INSTALL_DIRS
        .iter()
        .map(|dir| Path::new(dir).join("tessdata"))
        .find(|p| has_traineddata(p, language))
}

/// Ensures `<language>.traineddata` exists in our local tessdata dir,
/// downloading it from the tessdata repository if necessary.
pub fn ensure_tessdata(language: &str) -> Result<PathBuf> {
    let tessdata_dir = get_tesseract_dir().join("tessdata");
    let target = tessdata_dir.join(traineddata_name(language));

    if target.exists() {
        log(&format!("Tessdata found at: {}", target.display()));
        return Ok(tessdata_dir);
    }

    fs::create_dir_all(&tessdata_dir)?;

    let url = format!("{}/{}", TESSDATA_REPO, traineddata_name(language));
    log(&format!("Downloading {}...", url));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client.get(&url).header("User-Agent", "zora").send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}: HTTP {}",
            traineddata_name(language),
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(&target)?;
    file.write_all(&bytes)?;

    log(&format!(
        "Downloaded {} ({} bytes)",
        traineddata_name(language),
        bytes.len()
    ));

    Ok(tessdata_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configured_tessdata_dir_used_when_language_present() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("eng.traineddata"), b"stub").unwrap();
        let config = OcrConfig {
            tessdata_dir: Some(dir.path().to_path_buf()),
            ..OcrConfig::default()
        };

        assert_eq!(find_tessdata_dir(&config), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_configured_tesseract_path_used_when_present() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join(executable_name());
        fs::write(&exe, b"").unwrap();
        let config = OcrConfig {
            tesseract_path: Some(exe.clone()),
            ..OcrConfig::default()
        };

        assert_eq!(find_tesseract_executable(&config).unwrap(), exe);
    }

    #[test]
    fn test_traineddata_name() {
        assert_eq!(traineddata_name("eng"), "eng.traineddata");
    }
}
