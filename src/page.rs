//! Composition of everything the product details screen shows.
//!
//! The language selector runs once, the engine projects in the chosen
//! language, and identity artifacts are derived independently from the
//! record's GTIN. The result is an immutable snapshot; a language change means
//! building a new page from the same record.

use crate::i18n::{LanguageOption, LanguageSelector, LocaleConfig};
use crate::identity::{identity_rows, ArtifactBuilder, IdentityArtifacts, IdentityRow};
use crate::projection::{project_with_locale, ViewModel};
use crate::record::ProductRecord;
use crate::schema::{AuditReport, SchemaAudit};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// "General Information" rows, in record order
    pub identity: Vec<IdentityRow>,
    pub language_options: Vec<LanguageOption>,
    pub attributes: ViewModel,
    /// `None` when the record carries no GTIN
    pub artifacts: Option<IdentityArtifacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditReport>,
}

/// Renders pages for one viewer.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    artifacts: ArtifactBuilder,
    locale: &'static LocaleConfig,
}

impl PageRenderer {
    pub fn new(artifacts: ArtifactBuilder, locale: &'static LocaleConfig) -> Self {
        Self { artifacts, locale }
    }

    /// Render `record` in the selector's current language.
    pub fn render(&self, record: &ProductRecord, selector: &LanguageSelector) -> ProductPage {
        ProductPage {
            identity: identity_rows(record),
            language_options: selector.options(),
            attributes: project_with_locale(record, selector.selected(), self.locale),
            artifacts: self.artifacts.build_for_record(record),
            audit: None,
        }
    }

    /// Render a freshly loaded record, honouring `requested` when valid.
    pub fn render_requested(&self, record: &ProductRecord, requested: Option<&str>) -> ProductPage {
        let selector = LanguageSelector::with_request(record.languages.clone(), requested);
        self.render(record, &selector)
    }
}

impl ProductPage {
    /// Attach the schema audit for `record`.
    pub fn with_audit(mut self, record: &ProductRecord) -> Self {
        self.audit = Some(SchemaAudit::audit(record));
        self
    }

    pub fn language(&self) -> &str {
        &self.attributes.language
    }
}
