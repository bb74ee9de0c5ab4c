//! Identity artifacts derived from a GTIN.
//!
//! Everything here is string templating: QR asset URLs are the configured
//! asset host joined with record-supplied relative paths, and the GS1 links
//! are fixed URL patterns around the GTIN. Nothing is fetched and the GTIN is
//! not validated.

use crate::record::{number_to_plain_string, ProductRecord};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_ASSET_BASE: &str = "http://localhost:5000";
pub const DEFAULT_DIGITAL_LINK_BASE: &str = "https://id.fluxy.one";

const GEPIR_SEARCH_URL: &str = "https://gepir.gs1.org/index.php/search-by-gtin?gtin=";
const GS1_VERIFY_URL: &str = "https://www.gs1.org/services/verify/gtin/";

/// QR image encodings served by the asset host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrFormat {
    Png,
    Svg,
}

impl QrFormat {
    pub fn extension(self) -> &'static str {
        match self {
            QrFormat::Png => "png",
            QrFormat::Svg => "svg",
        }
    }

    /// Identity field holding the relative asset path.
    pub fn identity_key(self) -> &'static str {
        match self {
            QrFormat::Png => "qr_codes_png",
            QrFormat::Svg => "qr_codes_svg",
        }
    }
}

/// Relative QR asset paths supplied by a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrPaths {
    pub png: Option<String>,
    pub svg: Option<String>,
}

impl QrPaths {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            png: record.asset_path(QrFormat::Png.identity_key()).map(str::to_string),
            svg: record.asset_path(QrFormat::Svg.identity_key()).map(str::to_string),
        }
    }
}

/// One external reference for the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitalLink {
    pub title: &'static str,
    pub description: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityArtifacts {
    pub gtin: String,
    /// `None` when the record has no PNG asset; the UI hides the image.
    pub qr_png_url: Option<String>,
    pub qr_svg_url: Option<String>,
    /// Always five entries, in display order.
    pub digital_link_uris: Vec<DigitalLink>,
}

impl IdentityArtifacts {
    pub fn qr_url(&self, format: QrFormat) -> Option<&str> {
        match format {
            QrFormat::Png => self.qr_png_url.as_deref(),
            QrFormat::Svg => self.qr_svg_url.as_deref(),
        }
    }

    /// File name offered when downloading a QR image, e.g. `qr-0401….png`.
    pub fn download_name(&self, format: QrFormat) -> String {
        format!("qr-{}.{}", self.gtin, format.extension())
    }
}

/// Builds identity artifacts against configured hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBuilder {
    asset_base: String,
    link_base: String,
}

impl Default for ArtifactBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_BASE, DEFAULT_DIGITAL_LINK_BASE)
    }
}

impl ArtifactBuilder {
    pub fn new(asset_base: impl Into<String>, link_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            link_base: link_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn build(&self, gtin: &str, qr: &QrPaths) -> IdentityArtifacts {
        IdentityArtifacts {
            gtin: gtin.to_string(),
            qr_png_url: qr.png.as_deref().map(|path| self.asset_url(path)),
            qr_svg_url: qr.svg.as_deref().map(|path| self.asset_url(path)),
            digital_link_uris: self.digital_links(gtin),
        }
    }

    /// Artifacts for a record, or `None` when it carries no GTIN.
    pub fn build_for_record(&self, record: &ProductRecord) -> Option<IdentityArtifacts> {
        let gtin = record.gtin()?;
        Some(self.build(gtin, &QrPaths::from_record(record)))
    }

    fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match (self.asset_base.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{}{}", self.asset_base, &path[1..]),
            _ => format!("{}{}", self.asset_base, path),
        }
    }

    fn digital_links(&self, gtin: &str) -> Vec<DigitalLink> {
        let base = &self.link_base;
        vec![
            DigitalLink {
                title: "Digital Link URI",
                description: "Standard GS1 Digital Link URI format",
                url: format!("{}/01/{}", base, gtin),
            },
            DigitalLink {
                title: "Web URI",
                description: "Web URI format for GTIN",
                url: format!("{}/gtin/{}", base, gtin),
            },
            DigitalLink {
                title: "JSON-LD Context",
                description: "JSON-LD context for structured data",
                url: format!("{}/gtin/{}?format=jsonld", base, gtin),
            },
            DigitalLink {
                title: "GS1 Product Page",
                description: "Product page on GS1 Registry Platform",
                url: format!("{}{}", GEPIR_SEARCH_URL, gtin),
            },
            DigitalLink {
                title: "GS1 Verify Link",
                description: "Verify GTIN in GS1 database",
                url: format!("{}{}", GS1_VERIFY_URL, gtin),
            },
        ]
    }
}

/// Artifacts for a bare GTIN with default hosts and no QR assets.
pub fn build_identity_artifacts(gtin: &str) -> IdentityArtifacts {
    ArtifactBuilder::default().build(gtin, &QrPaths::default())
}

// ==================== Identity Table ====================

/// One row of the "General Information" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRow {
    pub key: String,
    pub display: String,
}

/// Render the record's identity fields as-is, in record order.
pub fn identity_rows(record: &ProductRecord) -> Vec<IdentityRow> {
    record
        .identity
        .iter()
        .map(|(key, value)| IdentityRow {
            key: key.clone(),
            display: display_identity_value(value),
        })
        .collect()
}

fn display_identity_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_identity_value(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string_pretty(value).unwrap_or_default(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_plain_string(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}
