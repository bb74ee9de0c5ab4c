use crate::i18n::{LocaleConfig, LocaleRegistry};
use crate::identity::{ArtifactBuilder, DEFAULT_ASSET_BASE, DEFAULT_DIGITAL_LINK_BASE};
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub api_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,

    // Identity artifacts
    pub asset_base_url: String,
    pub digital_link_base: String,

    // Display
    pub viewer_locale: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            bail!("API_URL must be an http(s) URL, got '{}'", api_url);
        }

        let http_timeout_secs = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: '{}'", v))?,
            Err(_) => 30,
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            // Bearer credential handed over by the session layer
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            http_timeout_secs,

            asset_base_url: std::env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ASSET_BASE.to_string()),
            digital_link_base: std::env::var("DIGITAL_LINK_BASE")
                .unwrap_or_else(|_| DEFAULT_DIGITAL_LINK_BASE.to_string()),

            viewer_locale: std::env::var("VIEWER_LOCALE").unwrap_or_else(|_| "en-US".to_string()),
        })
    }

    /// Display locale resolved against the registry.
    pub fn locale(&self) -> &'static LocaleConfig {
        LocaleRegistry::get().resolve(&self.viewer_locale)
    }

    pub fn artifact_builder(&self) -> ArtifactBuilder {
        ArtifactBuilder::new(&self.asset_base_url, &self.digital_link_base)
    }
}
