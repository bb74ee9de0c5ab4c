use anyhow::{bail, Context, Result};
use gtin_traceability::client::ProductClient;
use gtin_traceability::config::Config;
use gtin_traceability::page::PageRenderer;
use tracing::{info, warn};

const USAGE: &str = "Usage: gtin-traceability [GTIN] [--lang CODE] [--audit]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gtin_traceability=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut gtin: Option<String> = None;
    let mut language: Option<String> = None;
    let mut audit = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => language = Some(args.next().context("--lang needs a language code")?),
            "--audit" => audit = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other if other.starts_with("--") => bail!("Unknown option {}\n{}", other, USAGE),
            other => gtin = Some(other.to_string()),
        }
    }

    let config = Config::from_env()?;
    if config.api_token.is_none() {
        warn!("API_TOKEN not set, requests are sent without a bearer credential");
    }
    let client = ProductClient::from_config(&config)?;

    let session = client.who_am_i().await.context("Session check failed")?;
    info!("Signed in as {:?} ({:?})", session.email, session.role);

    // Without a GTIN, list what can be opened
    let Some(gtin) = gtin else {
        let products = client.list_products().await?;
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    };

    let record = client
        .get_product(&gtin)
        .await
        .with_context(|| format!("Failed to load product {}", gtin))?;

    let renderer = PageRenderer::new(config.artifact_builder(), config.locale());
    let mut page = renderer.render_requested(&record, language.as_deref());
    if audit {
        page = page.with_audit(&record);
    }

    info!(
        "Rendered {} attribute groups in language {}",
        page.attributes.ordered_groups.len(),
        page.language()
    );
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}
