//! Display locale registry: how dates and numbers look to the viewer.
//!
//! The registry is a lazily-initialised singleton (`OnceLock`) holding the
//! locales the admin client knows how to render. Lookups never fail: unknown
//! tags resolve by language prefix and finally to `en-US`.

use std::sync::OnceLock;

/// Tag used when nothing else matches.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Rendering conventions for one viewer locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// BCP 47 tag (e.g., "en-US", "de-DE")
    pub tag: &'static str,

    /// English name of the locale
    pub name: &'static str,

    /// `chrono` strftime pattern for a calendar date
    pub date_pattern: &'static str,

    /// Thousands separator
    pub group_separator: &'static str,

    /// Decimal separator
    pub decimal_separator: &'static str,
}

impl LocaleConfig {
    /// Primary language subtag, e.g. `"de"` for `"de-DE"`.
    pub fn language(&self) -> &'static str {
        self.tag.split('-').next().unwrap_or(self.tag)
    }
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    fallback: LocaleConfig,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
            fallback: en_us(),
        })
    }

    /// Exact (case-insensitive) lookup by tag.
    pub fn get_by_tag(&self, tag: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(tag))
    }

    /// Resolve a viewer tag to a known locale.
    ///
    /// Tries the exact tag, then the first locale sharing the language subtag
    /// (so `"de"` or `"de-AT"` render like `"de-DE"`), then `en-US`.
    pub fn resolve(&self, tag: &str) -> &LocaleConfig {
        let normalized = tag.trim().replace('_', "-");
        if let Some(locale) = self.get_by_tag(&normalized) {
            return locale;
        }
        let language = normalized.split('-').next().unwrap_or_default();
        self.locales
            .iter()
            .find(|locale| locale.language().eq_ignore_ascii_case(language))
            .unwrap_or(&self.fallback)
    }

    /// The locale used when the viewer's tag is unknown.
    pub fn fallback(&self) -> &LocaleConfig {
        &self.fallback
    }

    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }
}

fn en_us() -> LocaleConfig {
    LocaleConfig {
        tag: FALLBACK_LOCALE,
        name: "English (United States)",
        date_pattern: "%-m/%-d/%Y",
        group_separator: ",",
        decimal_separator: ".",
    }
}

/// Locales known to the client.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        en_us(),
        LocaleConfig {
            tag: "en-GB",
            name: "English (United Kingdom)",
            date_pattern: "%d/%m/%Y",
            group_separator: ",",
            decimal_separator: ".",
        },
        LocaleConfig {
            tag: "de-DE",
            name: "German (Germany)",
            date_pattern: "%-d.%-m.%Y",
            group_separator: ".",
            decimal_separator: ",",
        },
        LocaleConfig {
            tag: "fr-FR",
            name: "French (France)",
            date_pattern: "%d/%m/%Y",
            group_separator: "\u{202f}",
            decimal_separator: ",",
        },
        LocaleConfig {
            tag: "ru-RU",
            name: "Russian (Russia)",
            date_pattern: "%d.%m.%Y",
            group_separator: "\u{a0}",
            decimal_separator: ",",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_tag_case_insensitive() {
        let registry = LocaleRegistry::get();
        let locale = registry.get_by_tag("DE-de").expect("Should find de-DE");
        assert_eq!(locale.tag, "de-DE");
        assert_eq!(locale.group_separator, ".");
    }

    #[test]
    fn test_get_by_tag_missing() {
        assert!(LocaleRegistry::get().get_by_tag("pt-BR").is_none());
    }

    #[test]
    fn test_resolve_exact() {
        assert_eq!(LocaleRegistry::get().resolve("en-GB").tag, "en-GB");
    }

    #[test]
    fn test_resolve_underscore_form() {
        assert_eq!(LocaleRegistry::get().resolve("ru_RU").tag, "ru-RU");
    }

    #[test]
    fn test_resolve_by_language_prefix() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.resolve("de").tag, "de-DE");
        assert_eq!(registry.resolve("fr-CA").tag, "fr-FR");
        assert_eq!(registry.resolve("en-AU").tag, "en-US");
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.resolve("ja-JP").tag, FALLBACK_LOCALE);
        assert_eq!(registry.resolve("").tag, FALLBACK_LOCALE);
        assert_eq!(registry.fallback().tag, FALLBACK_LOCALE);
    }

    #[test]
    fn test_language_subtag() {
        assert_eq!(LocaleRegistry::get().resolve("de-DE").language(), "de");
    }

    #[test]
    fn test_list_all_starts_with_fallback() {
        let all = LocaleRegistry::get().list_all();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].tag, FALLBACK_LOCALE);
    }
}
