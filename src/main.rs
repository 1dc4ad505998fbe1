//! Zora command-line board reader
//!
//! Captures the admiralty board (live window on Windows, or a screenshot
//! file) and prints the extracted assignments as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use zora_board::capture::{self, CaptureSource, FileCapture};
use zora_board::config::load_config;
use zora_board::models::Campaign;
use zora_board::ocr::{ensure_tessdata, TesseractEngine};
use zora_board::pipeline::BoardReader;
use zora_board::{log, paths, set_verbose};

#[derive(Parser, Debug)]
#[command(name = "zora", version, about = "Read Star Trek Online admiralty assignments from the screen")]
struct Args {
    /// Read from a screenshot file instead of the live game window
    #[arg(long)]
    image: Option<PathBuf>,

    /// Configuration file (defaults to config.json beside the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tag every assignment with this campaign
    #[arg(long)]
    campaign: Option<String>,

    /// Save the captured frame to the screenshots directory
    #[arg(long)]
    save_capture: bool,

    /// Download the configured language's traineddata before reading
    #[arg(long)]
    download_tessdata: bool,

    /// Echo log lines to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_verbose(args.verbose);

    if let Err(e) = paths::ensure_directories() {
        eprintln!("Warning: failed to create app directories: {}", e);
    }
    log(&format!("=== zora {} ===", env!("CARGO_PKG_VERSION")));

    let mut config = load_config(args.config.as_deref());

    if args.download_tessdata {
        let dir = ensure_tessdata(&config.ocr.language)?;
        if config.ocr.tessdata_dir.is_none() {
            config.ocr.tessdata_dir = Some(dir);
        }
    }

    let engine = TesseractEngine::from_config(&config.ocr)?;
    let capture_config = config.capture.clone();
    let reader = BoardReader::new(engine, config)?;

    let mut source: Box<dyn CaptureSource> = match &args.image {
        Some(path) => Box::new(FileCapture::new(path)?),
        None => capture::live_source(&capture_config)?,
    };

    let board = if args.save_capture {
        let frame = source.capture()?;
        capture::save_capture(&frame, &paths::get_screenshots_dir())?;
        reader.read_image(&frame)
    } else {
        reader.read(source.as_mut())?
    };

    let board = match &args.campaign {
        Some(name) => board.with_campaign(&Campaign::new(name)),
        None => board,
    };

    let json = serde_json::to_string_pretty(&board).context("Failed to serialize board")?;
    println!("{}", json);
    Ok(())
}
