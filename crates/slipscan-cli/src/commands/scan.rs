//! Scan command - OCR a receipt image, then extract and review a draft.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use slipscan_core::ReceiptExtractor;

use super::extract::{ReviewArgs, review};
use crate::vision::VisionClient;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image (png, jpg, jpeg, gif, bmp)
    #[arg(required = true)]
    input: PathBuf,

    /// Vision API key (overrides the configured key)
    #[arg(long, env = "SLIPSCAN_VISION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the recognized text to stderr
    #[arg(long)]
    show_text: bool,

    #[command(flatten)]
    review: ReviewArgs,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(extension.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp") {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    let api_key = args
        .api_key
        .clone()
        .or_else(|| config.ocr.api_key.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No Vision API key configured.\n\n\
                 Pass --api-key, set SLIPSCAN_VISION_API_KEY, or run \
                 'slipscan config set ocr.api_key <KEY>'."
            )
        })?;

    info!("Scanning receipt: {}", args.input.display());
    let image = fs::read(&args.input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Processing receipt...");

    let client = VisionClient::new(&config.ocr, api_key)?;
    let ocr = client.detect_text(&image).await;

    pb.finish_and_clear();

    match &ocr {
        Ok(text) => {
            debug!("OCR returned {} characters", text.len());
            if args.show_text {
                eprintln!("{}", text);
            }
        }
        Err(e) => {
            debug!("OCR failed: {}", e);
            eprintln!(
                "{} Could not process image. Please try again with a clearer image.",
                style("✗").red()
            );
        }
    }

    let extractor = ReceiptExtractor::from_config(&config.extraction);
    let draft = extractor.run_ocr_output(ocr);

    debug!("Scan finished in {:?}", start.elapsed());

    review(draft, &args.review, &config)
}
