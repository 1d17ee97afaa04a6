use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use emoverse::config::Config;
use emoverse::engine::EmotionEngine;
use emoverse::models;
use emoverse::server::{self, AppState};

/// Local emotion analysis chat app
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind the chat server to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the chat server to
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the text model artifacts
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip the startup model download check
    #[arg(long)]
    no_download: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("Emo-verse starting...");

    let mut config = Config::load_or_default();
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    if let Some(model_dir) = args.model_dir {
        config.model_dir = Some(model_dir);
    }

    let model_dir = config.text_model_dir()?;
    info!("Text model directory: {:?}", model_dir);

    if !args.no_download {
        // Blocking download on first run; a missing model is fatal
        let dir = model_dir.clone();
        tokio::task::spawn_blocking(move || models::ensure_text_model(&dir))
            .await
            .context("model download task failed")?
            .context("text emotion model unavailable")?;
    } else if !models::is_text_model_available(&model_dir) {
        anyhow::bail!(
            "Text model not found in {:?} and --no-download was given.\n\
             Remove --no-download to fetch it, or point --model-dir at a \
             directory containing model.onnx, tokenizer.json, and config.json.",
            model_dir
        );
    }

    info!("Loading emotion models...");
    let engine = {
        let threads = config.intra_threads;
        let dir = model_dir.clone();
        tokio::task::spawn_blocking(move || EmotionEngine::new(&dir, threads))
            .await
            .context("model load task failed")??
    };
    info!("Models loaded");

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server_host, config.server_port
            )
        })?;

    let state = AppState::new(engine, config.to_settings());
    server::serve(addr, state).await
}
