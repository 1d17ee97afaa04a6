//! Console REPL for the text emotion classifier.
//!
//! Reads lines from stdin and prints the emotion distribution for each;
//! type "quit" to exit.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use emoverse::models;
use emoverse::text::TextEmotionProvider;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive text emotion analysis", long_about = None)]
struct Args {
    /// Directory holding the text model artifacts
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Number of threads for inference
    #[arg(long, default_value = "2")]
    threads: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let model_dir = match args.model_dir {
        Some(dir) => dir,
        None => models::text_model_dir()?,
    };

    models::ensure_text_model(&model_dir).context("text emotion model unavailable")?;
    let mut provider =
        TextEmotionProvider::new(&model_dir, args.threads).context("failed to load text model")?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("Enter your text (or 'quit' to exit): ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let text = line.trim();

        if text.eq_ignore_ascii_case("quit") {
            break;
        }
        if text.is_empty() {
            continue;
        }

        match provider.predict(text) {
            Ok(result) => {
                println!("\nDominant emotion : {}", result.dominant_emotion);
                println!("Confidence : {}", result.confidence);
                println!("All emotions :");
                for (label, prob) in &result.all_emotions {
                    println!("  {:10} {:.4}", label, prob);
                }
            }
            Err(e) => println!("\nAnalysis failed: {}", e),
        }
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
