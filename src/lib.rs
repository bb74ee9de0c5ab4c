//! Product attribute projection for GS1 traceability records.
//!
//! A backend returns one nested, multi-language, schema-driven record per
//! GTIN. This crate turns it into a language-scoped, priority-ordered view of
//! named attributes plus the identifier artifacts (QR asset URLs, GS1 links)
//! derived from the GTIN.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod i18n;
pub mod identity;
pub mod page;
pub mod projection;
pub mod record;
pub mod schema;

pub use error::{ClientError, ProjectionError};
pub use i18n::resolve_language;
pub use identity::build_identity_artifacts;
pub use projection::{project, project_value, ViewModel};
pub use record::ProductRecord;
