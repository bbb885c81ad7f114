use anyhow::{bail, Context, Result};
use clap::Parser;
use imgtext::api::ResponseEnvelope;
use imgtext::image2text::{OcrConfig, TesseractEngine};
use imgtext::input::{normalize_base64, normalize_file};
use imgtext::logger::init_logger_exe;
use imgtext::process::{ProcessorConfig, Recognizer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "A CLI tool to OCR an image file or base64 payload", long_about = None)]
struct Cli {
    #[arg(
        long,
        help = "input file in image (png, jpeg, gif, webp, tiff, bmp, etc) format"
    )]
    image: Option<PathBuf>,
    #[arg(long, help = "file containing a base64 image, optionally as a data URI")]
    base64: Option<PathBuf>,
    #[arg(long, default_value = "eng", help = "language model to load")]
    language: String,
    #[arg(long)]
    dpi: Option<u32>,
    #[arg(long)]
    psm: Option<u32>,
    #[arg(long)]
    oem: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_exe();
    let cli = Cli::parse();

    let (source, original_file) = match (&cli.image, &cli.base64) {
        (Some(path), None) => (
            normalize_file(Some(path.as_path()))?,
            path.file_name().map(|name| name.to_string_lossy().into_owned()),
        ),
        (None, Some(path)) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (normalize_base64(Some(raw.trim()))?, None)
        }
        _ => bail!("pass exactly one of --image or --base64"),
    };

    let engine = Arc::new(TesseractEngine::new(OcrConfig::new(cli.dpi, cli.psm, cli.oem)));
    let recognizer = Recognizer::new(engine, ProcessorConfig::new(cli.language, 1));

    let envelope = match recognizer.recognize(source, original_file).await {
        Ok(result) => ResponseEnvelope::success(result),
        Err(err) => {
            log::error!("Failed to process OCR: {}", err);
            ResponseEnvelope::failure(err.to_string())
        }
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if envelope.success != Some(true) {
        std::process::exit(1);
    }
    Ok(())
}
