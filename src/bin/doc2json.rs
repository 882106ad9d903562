//! CLI binary for doc2json.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs one conversion, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use doc2json::{
    ConversionConfig, Converter, FsBlobStore, MemoryRecordStore, OllamaBackend, UploadedDocument,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Convert a document (PDF, DOCX, PNG, JPEG) to structured JSON text.
#[derive(Parser, Debug)]
#[command(name = "doc2json", version, about)]
struct Cli {
    /// Path to the document to convert.
    input: PathBuf,

    /// Declared media type. Guessed from the file extension when omitted.
    #[arg(long)]
    media_type: Option<String>,

    /// Directory for stored upload blobs.
    #[arg(long, env = "DOC2JSON_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Tesseract language-data directory (--tessdata-dir).
    #[arg(long, env = "TESSDATA_PREFIX")]
    tessdata_dir: Option<PathBuf>,

    /// Tesseract language code.
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Backend base URL (Ollama-compatible).
    #[arg(long, env = "DOC2JSON_BACKEND_URL", default_value = "http://localhost:11434")]
    backend_url: String,

    /// Model identifier sent to the backend.
    #[arg(long, env = "DOC2JSON_MODEL", default_value = "llama3.1")]
    model: String,

    /// Per-backend-call timeout in seconds.
    #[arg(long, default_value_t = 120)]
    api_timeout: u64,

    /// Print only the normalized JSON text instead of the full record.
    #[arg(long)]
    json_only: bool,

    /// Re-run normalization once more on the produced record before
    /// printing (exercises the regenerate operation).
    #[arg(long)]
    regenerate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("reading '{}'", cli.input.display()))?;

    let file_name = cli
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let media_type = match cli.media_type {
        Some(mt) => mt,
        None => mime_guess::from_path(&cli.input)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    let mut builder = ConversionConfig::builder()
        .ocr_language(&cli.lang)
        .backend_base_url(&cli.backend_url)
        .model(&cli.model)
        .api_timeout_secs(cli.api_timeout);
    if let Some(dir) = cli.upload_dir {
        builder = builder.upload_dir(dir);
    }
    if let Some(dir) = cli.tessdata_dir {
        builder = builder.tessdata_dir(dir);
    }
    let config = builder.build()?;

    let backend = Arc::new(OllamaBackend::from_config(&config)?);
    let converter = Converter::new(
        config.clone(),
        Arc::new(FsBlobStore::new(&config.upload_dir)),
        Arc::new(MemoryRecordStore::new()),
        backend,
    )?;

    let mut record = converter
        .convert(UploadedDocument {
            bytes: &bytes,
            media_type: &media_type,
            file_name: &file_name,
        })
        .await?;

    if cli.regenerate {
        record = converter.regenerate(record.id).await?;
    }

    if cli.json_only {
        println!("{}", record.json_data.unwrap_or_default());
    } else {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    Ok(())
}
