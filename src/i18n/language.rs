//! Content language selection.
//!
//! A record lists the languages it carries values for. The selection rule is
//! deliberately small: an explicit request wins only when the record actually
//! has that language, otherwise the record's first language is used, and a
//! record without languages falls back to [`DEFAULT_LANGUAGE`].

use serde::Serialize;
use tracing::debug;

/// Language projected when a record lists no languages at all.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Choose the language to project.
///
/// Never fails and never returns a code outside `languages` unless
/// `languages` is empty.
pub fn resolve_language(languages: &[String], requested: Option<&str>) -> String {
    if let Some(code) = requested {
        if languages.iter().any(|lang| lang == code) {
            return code.to_string();
        }
    }
    languages
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// One entry of the language dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    /// Upper-cased code, e.g. `"ENG"`.
    pub label: String,
}

impl LanguageOption {
    fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            label: code.to_uppercase(),
        }
    }
}

/// Selection state owned by the caller across re-renders of one record.
///
/// The engine itself is stateless; this type only remembers what the viewer
/// picked so the caller can re-project when it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelector {
    languages: Vec<String>,
    selected: String,
}

impl LanguageSelector {
    /// Start a selection for a freshly loaded record.
    pub fn new(languages: Vec<String>) -> Self {
        let selected = resolve_language(&languages, None);
        Self {
            languages,
            selected,
        }
    }

    /// Start a selection honouring an initial request when it is valid.
    pub fn with_request(languages: Vec<String>, requested: Option<&str>) -> Self {
        let selected = resolve_language(&languages, requested);
        Self {
            languages,
            selected,
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Switch to `code` if the record carries it.
    ///
    /// Returns `true` when the selection changed.
    pub fn request(&mut self, code: &str) -> bool {
        if !self.languages.iter().any(|lang| lang == code) {
            debug!("Ignoring request for unavailable language '{}'", code);
            return false;
        }
        if self.selected == code {
            return false;
        }
        self.selected = code.to_string();
        true
    }

    /// Replace the language list after a record reload.
    ///
    /// Any previous request is discarded in favour of the first language.
    pub fn reload(&mut self, languages: Vec<String>) {
        self.selected = resolve_language(&languages, None);
        self.languages = languages;
    }

    /// Dropdown options; a record without languages offers the default only.
    pub fn options(&self) -> Vec<LanguageOption> {
        if self.languages.is_empty() {
            return vec![LanguageOption::new(DEFAULT_LANGUAGE)];
        }
        self.languages
            .iter()
            .map(|code| LanguageOption::new(code))
            .collect()
    }
}
