//! Grouping & ordering engine.
//!
//! Folds one language's raw values into category groups, attaches schema
//! metadata and orders groups and properties by ascending priority. Equal
//! priorities keep schema order (stable sort), so re-projecting the same
//! record always yields the same view.
//!
//! The engine is a pure function over an already-loaded record: no I/O, no
//! shared state. Callers re-invoke it whenever the selected language changes.

use crate::error::ProjectionError;
use crate::format::{format_value, FormattedValue};
use crate::i18n::{resolve_language, LocaleConfig, LocaleRegistry};
use crate::record::{CategoryValues, DataFormat, ProductRecord, RawValue};
use crate::schema::{resolve_category, resolve_property};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One displayable attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedProperty {
    pub property_key: String,
    pub display_name: String,
    pub formatted_value: FormattedValue,
    pub raw_value: RawValue,
    pub format: DataFormat,
    pub priority: i64,
}

/// A category with at least one displayable attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGroup {
    pub category_key: String,
    pub title: String,
    pub priority: i64,
    pub properties: Vec<ProjectedProperty>,
}

/// Language-scoped view of a record's attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// The language actually projected, after fallback.
    pub language: String,
    pub ordered_groups: Vec<PropertyGroup>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.ordered_groups.is_empty()
    }

    pub fn group(&self, category_key: &str) -> Option<&PropertyGroup> {
        self.ordered_groups
            .iter()
            .find(|group| group.category_key == category_key)
    }

    /// Number of properties across all groups.
    pub fn property_count(&self) -> usize {
        self.ordered_groups.iter().map(|g| g.properties.len()).sum()
    }
}

/// Project `record` in `language` using the fallback viewer locale.
pub fn project(record: &ProductRecord, language: &str) -> ViewModel {
    project_with_locale(record, language, LocaleRegistry::get().fallback())
}

/// Project decoded JSON directly; fails only when it is not an object.
pub fn project_value(value: &Value, language: &str) -> Result<ViewModel, ProjectionError> {
    let record = ProductRecord::from_value(value)?;
    Ok(project(&record, language))
}

/// Project `record`, rendering dates and numbers for `locale`.
///
/// `language` is validated against the record's languages first: a code the
/// record does not carry falls back to its first language.
pub fn project_with_locale(
    record: &ProductRecord,
    language: &str,
    locale: &LocaleConfig,
) -> ViewModel {
    let language = resolve_language(&record.languages, Some(language));
    let empty = CategoryValues::new();

    let language_values = record.language_values(&language);
    if language_values.is_none() {
        debug!("Missing values for language: {}", language);
    }

    let mut groups: Vec<PropertyGroup> = Vec::new();

    for (category_key, category) in &record.categories {
        let category_values = language_values
            .and_then(|values| values.get(category_key))
            .unwrap_or(&empty);

        let mut properties = Vec::new();
        for (property_key, schema) in &category.properties {
            let Some(pv) = category_values.get(property_key) else {
                continue;
            };
            // An omitted value is skipped; an explicit null is kept.
            let Some(raw_value) = &pv.value else {
                continue;
            };

            let resolved = resolve_property(&record.categories, category_key, property_key);
            let format = pv.data_format.clone().unwrap_or(resolved.data_format_hint);
            let formatted_value = format_value(Some(raw_value), Some(&format), locale);

            properties.push(ProjectedProperty {
                property_key: property_key.clone(),
                display_name: resolved.display_name,
                formatted_value,
                raw_value: raw_value.clone(),
                format,
                priority: schema.priority,
            });
        }

        if properties.is_empty() {
            continue;
        }
        properties.sort_by_key(|p| p.priority);

        groups.push(PropertyGroup {
            category_key: category_key.clone(),
            title: resolve_category(&record.categories, category_key),
            priority: category.priority,
            properties,
        });
    }

    groups.sort_by_key(|g| g.priority);

    debug!(
        "Projected {} groups for language {}",
        groups.len(),
        language
    );

    ViewModel {
        language,
        ordered_groups: groups,
    }
}
