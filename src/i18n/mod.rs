//! Internationalization (i18n) module.
//!
//! Three independent concerns live here:
//!
//! - `language`: which of a record's *content* languages is projected
//!   (record languages are backend codes such as `"eng"` or `"deu"`)
//! - `registry`: the *viewer's* display locale used to render dates and
//!   numbers (BCP 47 tags such as `"en-US"`)
//! - `strings`: the fixed placeholder labels shown in place of values
//!
//! # Example
//!
//! ```rust,ignore
//! use gtin_traceability::i18n::{resolve_language, LocaleRegistry};
//!
//! let language = resolve_language(&record.languages, Some("deu"));
//! let locale = LocaleRegistry::get().resolve("de-DE");
//! ```

mod language;
mod registry;
mod strings;

pub use language::{resolve_language, LanguageOption, LanguageSelector, DEFAULT_LANGUAGE};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::{DisplayStrings, DISPLAY_STRINGS};
