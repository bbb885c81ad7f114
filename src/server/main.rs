use anyhow::{Context, Result};
use clap::Parser;
use imgtext::api::{create_router, AppState};
use imgtext::config::ServerConfig;
use imgtext::image2text::TesseractEngine;
use imgtext::logger::init_logger_exe;
use imgtext::process::Recognizer;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: failed to load .env file: {}", err);
        }
    }
    init_logger_exe();

    let config = ServerConfig::parse();
    log::info!("Starting server...");

    let engine = Arc::new(TesseractEngine::new(config.ocr_config()));
    let recognizer = Recognizer::new(engine, config.processor_config());

    let upload_dir = config.upload_dir();
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", upload_dir.display()))?;

    let app = create_router(AppState::new(recognizer, upload_dir), config.max_body_bytes);

    let addr = config.socket_addr();
    log::info!("Attempting to bind to {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    log::info!("Server running on {}", config.public_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::warn!("Ctrl-C received, stopping..."),
        Err(err) => log::error!("Failed to listen for Ctrl-C: {}", err),
    }
}
