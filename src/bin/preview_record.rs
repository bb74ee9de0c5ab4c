//! Preview binary - renders a product record stored on disk, no backend needed
//!
//! Usage:
//!   cargo run --bin preview -- record.json              # First language of the record
//!   cargo run --bin preview -- record.json --lang deu   # Specific language
//!
//! Optional environment variables:
//! - ASSET_BASE_URL (defaults to http://localhost:5000)
//! - DIGITAL_LINK_BASE (defaults to https://id.fluxy.one)
//! - VIEWER_LOCALE (defaults to en-US)

use anyhow::{Context, Result};
use gtin_traceability::config::Config;
use gtin_traceability::page::PageRenderer;
use gtin_traceability::record::ProductRecord;
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gtin_traceability=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let mut path: Option<String> = None;
    let mut language: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            language = args.next();
        } else {
            path = Some(arg);
        }
    }
    let path = path.context("Usage: preview <RECORD.json> [--lang CODE]")?;

    let config = Config::from_env()?;
    let record = ProductRecord::from_path(Path::new(&path))?;

    let renderer = PageRenderer::new(config.artifact_builder(), config.locale());
    let page = renderer.render_requested(&record, language.as_deref()).with_audit(&record);

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
