//! Attribute schema resolution and schema audit.
//!
//! Records embed their own schema (`categories`). Human-readable names follow
//! one precedence rule everywhere: description, then name, then the raw key.
//! Unknown keys never fail; a record may carry properties its schema has not
//! described yet.

use crate::record::{CategorySchema, DataFormat, ProductRecord};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Display metadata for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub display_name: String,
    /// Schema-declared format, `string` when the schema says nothing.
    pub data_format_hint: DataFormat,
}

/// Resolve display name and format hint for `(category_key, property_key)`.
pub fn resolve_property(
    categories: &IndexMap<String, CategorySchema>,
    category_key: &str,
    property_key: &str,
) -> ResolvedProperty {
    let schema = categories
        .get(category_key)
        .and_then(|category| category.properties.get(property_key));

    match schema {
        Some(schema) => ResolvedProperty {
            display_name: display_name(
                schema.description.as_deref(),
                schema.name.as_deref(),
                property_key,
            ),
            data_format_hint: schema.data_format.clone().unwrap_or(DataFormat::String),
        },
        None => ResolvedProperty {
            display_name: property_key.to_string(),
            data_format_hint: DataFormat::String,
        },
    }
}

/// Resolve the title shown above a category group.
pub fn resolve_category(categories: &IndexMap<String, CategorySchema>, category_key: &str) -> String {
    match categories.get(category_key) {
        Some(category) => display_name(
            category.description.as_deref(),
            category.name.as_deref(),
            category_key,
        ),
        None => category_key.to_string(),
    }
}

fn display_name(description: Option<&str>, name: Option<&str>, key: &str) -> String {
    description
        .filter(|s| !s.is_empty())
        .or(name.filter(|s| !s.is_empty()))
        .unwrap_or(key)
        .to_string()
}

// ==================== Schema Audit ====================

/// Findings about a record's internal consistency.
///
/// An audit never changes what the projection shows; it only explains why
/// something may be missing from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Problems that make the record unusable for some language
    pub errors: Vec<String>,

    /// Inconsistencies the projection silently tolerates
    pub warnings: Vec<String>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Cross-checks languages, values and schema of a record.
pub struct SchemaAudit;

impl SchemaAudit {
    pub fn audit(record: &ProductRecord) -> AuditReport {
        let mut report = AuditReport::new();

        if record.languages.is_empty() && !record.values.is_empty() {
            report
                .errors
                .push("Record has values but lists no languages".to_string());
        }

        for language in &record.languages {
            if !record.values.contains_key(language) {
                report
                    .warnings
                    .push(format!("Language '{}' is listed but has no values", language));
            }
        }

        for (language, categories) in &record.values {
            if !record.languages.is_empty() && !record.languages.contains(language) {
                report
                    .warnings
                    .push(format!("Values for unlisted language '{}'", language));
            }

            for (category_key, properties) in categories {
                let Some(category) = record.categories.get(category_key) else {
                    report.warnings.push(format!(
                        "[{}] Category '{}' has values but no schema entry",
                        language, category_key
                    ));
                    continue;
                };

                for (property_key, value) in properties {
                    let Some(schema) = category.properties.get(property_key) else {
                        report.warnings.push(format!(
                            "[{}] Property '{}.{}' has a value but no schema entry",
                            language, category_key, property_key
                        ));
                        continue;
                    };

                    if let (Some(declared), Some(actual)) = (&schema.data_format, &value.data_format) {
                        if declared != actual {
                            report.warnings.push(format!(
                                "[{}] Property '{}.{}' declares format '{}' but value uses '{}'",
                                language,
                                category_key,
                                property_key,
                                declared.as_str(),
                                actual.as_str()
                            ));
                        }
                    }
                }
            }
        }

        for message in report.errors.iter().chain(&report.warnings) {
            warn!("Schema audit: {}", message);
        }

        report
    }
}
