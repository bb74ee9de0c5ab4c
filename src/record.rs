//! Product record model.
//!
//! A record arrives from the backend as loosely-shaped JSON produced by many
//! independent uploaders. Construction here is deliberately lenient: anything
//! below the top level that does not have the expected shape is dropped and
//! later treated as absent by the projection engine.

use crate::error::ProjectionError;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::info;

/// Keys of the root object that carry engine input rather than identity data.
const STRUCTURAL_KEYS: [&str; 3] = ["languages", "values", "categories"];

/// Values of one category in one language, keyed by property.
pub type CategoryValues = IndexMap<String, PropertyValue>;

/// Values of one language, keyed by category.
pub type LanguageValues = IndexMap<String, CategoryValues>;

/// Declared format of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataFormat {
    String,
    Number,
    Boolean,
    Date,
    /// A format name the engine does not know; rendered with the string rule.
    Other(String),
}

impl DataFormat {
    /// Parse a wire format name. Empty names count as "not declared".
    pub fn parse(name: &str) -> Option<DataFormat> {
        let format = match name {
            "" => return None,
            "string" => DataFormat::String,
            "number" => DataFormat::Number,
            "boolean" => DataFormat::Boolean,
            "date" => DataFormat::Date,
            other => DataFormat::Other(other.to_string()),
        };
        Some(format)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataFormat::String => "string",
            DataFormat::Number => "number",
            DataFormat::Boolean => "boolean",
            DataFormat::Date => "date",
            DataFormat::Other(name) => name,
        }
    }
}

impl Serialize for DataFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A scalar property value as uploaded.
///
/// `Null` is an explicit "not specified"; an absent value is modelled one
/// level up as `Option::None` and never reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl RawValue {
    /// Convert a JSON value, rejecting arrays and objects as malformed.
    pub fn from_json(value: &Value) -> Option<RawValue> {
        match value {
            Value::Null => Some(RawValue::Null),
            Value::Bool(b) => Some(RawValue::Bool(*b)),
            Value::Number(n) => Some(RawValue::Number(n.clone())),
            Value::String(s) => Some(RawValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Standard boolean coercion: `false`, `0`, `""` and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
            RawValue::Text(s) => !s.is_empty(),
        }
    }

    /// Plain string form, with integral floats printed without a fraction.
    pub fn to_plain_string(&self) -> String {
        match self {
            RawValue::Null => "null".to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => number_to_plain_string(n),
            RawValue::Text(s) => s.clone(),
        }
    }
}

pub(crate) fn number_to_plain_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// One uploaded value together with its per-value format.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    /// `None` when the uploader omitted the `value` key entirely.
    pub value: Option<RawValue>,
    pub data_format: Option<DataFormat>,
}

impl PropertyValue {
    pub fn new(value: Option<RawValue>, data_format: Option<DataFormat>) -> Self {
        Self { value, data_format }
    }

    fn from_json(value: &Value) -> Option<PropertyValue> {
        let object = value.as_object()?;
        Some(PropertyValue {
            value: object.get("value").and_then(RawValue::from_json),
            data_format: read_format(object),
        })
    }
}

/// Schema metadata for one property of a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: i64,
    pub data_format: Option<DataFormat>,
}

impl PropertySchema {
    fn from_json(value: &Value) -> PropertySchema {
        let Some(object) = value.as_object() else {
            return PropertySchema::default();
        };
        PropertySchema {
            name: read_text(object, "name"),
            description: read_text(object, "description"),
            priority: read_priority(object),
            data_format: read_format(object),
        }
    }
}

/// Schema metadata for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySchema {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: i64,
    pub properties: IndexMap<String, PropertySchema>,
}

impl CategorySchema {
    fn from_json(value: &Value) -> CategorySchema {
        let Some(object) = value.as_object() else {
            return CategorySchema::default();
        };
        let properties = object
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, schema)| (key.clone(), PropertySchema::from_json(schema)))
                    .collect()
            })
            .unwrap_or_default();

        CategorySchema {
            name: read_text(object, "name"),
            description: read_text(object, "description"),
            priority: read_priority(object),
            properties,
        }
    }
}

/// The root payload returned by `GET /products/{gtin}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    /// Flat identity fields (GTIN, name, status, QR asset paths, ...).
    pub identity: IndexMap<String, Value>,
    pub languages: Vec<String>,
    /// language → category → property → value
    pub values: IndexMap<String, LanguageValues>,
    pub categories: IndexMap<String, CategorySchema>,
}

impl ProductRecord {
    /// Build a record from decoded JSON.
    ///
    /// Fails only when the top level is not an object.
    pub fn from_value(value: &Value) -> Result<ProductRecord, ProjectionError> {
        let root = value
            .as_object()
            .ok_or(ProjectionError::InvalidRecordShape {
                found: json_kind(value),
            })?;

        Ok(ProductRecord {
            identity: read_identity(root),
            languages: read_languages(root),
            values: read_values(root),
            categories: root
                .get("categories")
                .and_then(Value::as_object)
                .map(|cats| {
                    cats.iter()
                        .map(|(key, schema)| (key.clone(), CategorySchema::from_json(schema)))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Load a record saved from `GET /products/{gtin}`.
    pub fn from_path(path: &Path) -> anyhow::Result<ProductRecord> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&contents).context("Failed to parse record JSON")?;
        let record = ProductRecord::from_value(&value)?;

        info!(
            "Loaded record from {} ({} languages, {} categories)",
            path.display(),
            record.languages.len(),
            record.categories.len()
        );
        Ok(record)
    }

    /// Values for one language, if the record carries any.
    pub fn language_values(&self, language: &str) -> Option<&LanguageValues> {
        self.values.get(language)
    }

    pub fn property_value(
        &self,
        language: &str,
        category_key: &str,
        property_key: &str,
    ) -> Option<&PropertyValue> {
        self.language_values(language)?
            .get(category_key)?
            .get(property_key)
    }

    /// GTIN from the identity fields (`gtin13`, falling back to `gtin`).
    pub fn gtin(&self) -> Option<&str> {
        ["gtin13", "gtin"]
            .iter()
            .filter_map(|key| self.identity.get(*key))
            .find_map(|value| value.as_str().filter(|s| !s.is_empty()))
    }

    /// Relative QR asset path for the given identity key, if non-empty.
    pub fn asset_path(&self, key: &str) -> Option<&str> {
        self.identity
            .get(key)
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
    }
}

/// JavaScript-style type name used in shape errors.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_identity(root: &Map<String, Value>) -> IndexMap<String, Value> {
    if let Some(product) = root.get("product").and_then(Value::as_object) {
        return product
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
    }
    root.iter()
        .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn read_languages(root: &Map<String, Value>) -> Vec<String> {
    root.get("languages")
        .and_then(Value::as_array)
        .map(|langs| {
            langs
                .iter()
                .filter_map(Value::as_str)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_values(root: &Map<String, Value>) -> IndexMap<String, LanguageValues> {
    let Some(by_language) = root.get("values").and_then(Value::as_object) else {
        return IndexMap::new();
    };

    by_language
        .iter()
        .filter_map(|(language, categories)| {
            let categories = categories.as_object()?;
            let parsed: LanguageValues = categories
                .iter()
                .filter_map(|(category, properties)| {
                    let properties = properties.as_object()?;
                    let parsed: CategoryValues = properties
                        .iter()
                        .filter_map(|(key, pv)| Some((key.clone(), PropertyValue::from_json(pv)?)))
                        .collect();
                    Some((category.clone(), parsed))
                })
                .collect();
            Some((language.clone(), parsed))
        })
        .collect()
}

fn read_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_priority(object: &Map<String, Value>) -> i64 {
    match object.get("priority") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn read_format(object: &Map<String, Value>) -> Option<DataFormat> {
    ["data_format", "dataFormat"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| value.as_str().and_then(DataFormat::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "product": {
                "gtin13": "04012345678901",
                "product_name": "Widget",
                "qr_codes_png": "/qr/04012345678901.png"
            },
            "languages": ["eng", "deu"],
            "values": {
                "eng": {
                    "general": {
                        "color": {"value": "Red", "data_format": "string"},
                        "weight": {"value": null, "dataFormat": "number"},
                        "note": {"data_format": "string"}
                    }
                }
            },
            "categories": {
                "general": {
                    "name": "General",
                    "priority": 1,
                    "properties": {
                        "color": {"name": "Colour", "priority": 2, "data_format": "string"}
                    }
                }
            }
        })
    }

    // ==================== DataFormat Tests ====================

    #[test]
    fn test_data_format_parse_known() {
        assert_eq!(DataFormat::parse("string"), Some(DataFormat::String));
        assert_eq!(DataFormat::parse("number"), Some(DataFormat::Number));
        assert_eq!(DataFormat::parse("boolean"), Some(DataFormat::Boolean));
        assert_eq!(DataFormat::parse("date"), Some(DataFormat::Date));
    }

    #[test]
    fn test_data_format_parse_empty_is_undeclared() {
        assert_eq!(DataFormat::parse(""), None);
    }

    #[test]
    fn test_data_format_unknown_is_preserved() {
        let format = DataFormat::parse("gtin").unwrap();
        assert_eq!(format, DataFormat::Other("gtin".to_string()));
        assert_eq!(format.as_str(), "gtin");
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"gtin\"");
    }

    // ==================== RawValue Tests ====================

    #[test]
    fn test_raw_value_rejects_containers() {
        assert!(RawValue::from_json(&json!([1, 2])).is_none());
        assert!(RawValue::from_json(&json!({"a": 1})).is_none());
        assert_eq!(RawValue::from_json(&json!(null)), Some(RawValue::Null));
    }

    #[test]
    fn test_raw_value_truthiness() {
        assert!(!RawValue::Null.is_truthy());
        assert!(!RawValue::Bool(false).is_truthy());
        assert!(!RawValue::Text(String::new()).is_truthy());
        assert!(!RawValue::from_json(&json!(0)).unwrap().is_truthy());
        assert!(!RawValue::from_json(&json!(0.0)).unwrap().is_truthy());
        assert!(RawValue::Text("false".to_string()).is_truthy());
        assert!(RawValue::from_json(&json!(-3)).unwrap().is_truthy());
    }

    #[test]
    fn test_raw_value_plain_string() {
        assert_eq!(RawValue::from_json(&json!(1.0)).unwrap().to_plain_string(), "1");
        assert_eq!(RawValue::from_json(&json!(1.5)).unwrap().to_plain_string(), "1.5");
        assert_eq!(RawValue::from_json(&json!(42)).unwrap().to_plain_string(), "42");
        assert_eq!(RawValue::Bool(true).to_plain_string(), "true");
        assert_eq!(RawValue::Null.to_plain_string(), "null");
    }

    #[test]
    fn test_raw_value_serializes_as_json_scalar() {
        assert_eq!(serde_json::to_value(RawValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(RawValue::Bool(true)).unwrap(), json!(true));
        assert_eq!(
            serde_json::to_value(RawValue::Text("x".to_string())).unwrap(),
            json!("x")
        );
    }

    // ==================== ProductRecord Tests ====================

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = ProductRecord::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidRecordShape { found: "array" });

        let err = ProductRecord::from_value(&json!(null)).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidRecordShape { found: "null" });
    }

    #[test]
    fn test_from_value_empty_object() {
        let record = ProductRecord::from_value(&json!({})).expect("Should parse");
        assert!(record.languages.is_empty());
        assert!(record.values.is_empty());
        assert!(record.categories.is_empty());
        assert!(record.identity.is_empty());
    }

    #[test]
    fn test_from_value_reads_nested_product_identity() {
        let record = ProductRecord::from_value(&sample_record()).unwrap();
        assert_eq!(record.gtin(), Some("04012345678901"));
        assert_eq!(record.asset_path("qr_codes_png"), Some("/qr/04012345678901.png"));
        assert_eq!(record.asset_path("qr_codes_svg"), None);
        assert_eq!(record.identity.len(), 3);
    }

    #[test]
    fn test_from_value_flat_identity_excludes_structural_keys() {
        let record = ProductRecord::from_value(&json!({
            "gtin": "123",
            "status": "active",
            "languages": ["eng"],
            "values": {},
            "categories": {}
        }))
        .unwrap();

        let keys: Vec<&str> = record.identity.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["gtin", "status"]);
        assert_eq!(record.gtin(), Some("123"));
    }

    #[test]
    fn test_value_tristate() {
        let record = ProductRecord::from_value(&sample_record()).unwrap();

        let color = record.property_value("eng", "general", "color").unwrap();
        assert_eq!(color.value, Some(RawValue::Text("Red".to_string())));
        assert_eq!(color.data_format, Some(DataFormat::String));

        let weight = record.property_value("eng", "general", "weight").unwrap();
        assert_eq!(weight.value, Some(RawValue::Null));
        assert_eq!(weight.data_format, Some(DataFormat::Number));

        let note = record.property_value("eng", "general", "note").unwrap();
        assert_eq!(note.value, None);
    }

    #[test]
    fn test_malformed_nested_entries_are_dropped() {
        let record = ProductRecord::from_value(&json!({
            "languages": ["eng", 5, ""],
            "values": {
                "eng": {
                    "general": {
                        "ok": {"value": 1},
                        "broken": "not an object",
                        "listy": {"value": [1, 2]}
                    },
                    "bad_category": 17
                },
                "deu": "nope"
            },
            "categories": {
                "general": {"priority": "high", "properties": {"ok": 3}},
                "weird": []
            }
        }))
        .unwrap();

        assert_eq!(record.languages, vec!["eng".to_string()]);
        assert!(record.values.get("deu").is_none());
        let eng = record.language_values("eng").unwrap();
        assert!(eng.get("bad_category").is_none());
        let general = eng.get("general").unwrap();
        assert!(general.get("broken").is_none());
        assert_eq!(general.get("listy").unwrap().value, None);

        let schema = record.categories.get("general").unwrap();
        assert_eq!(schema.priority, 0);
        assert_eq!(schema.properties.get("ok"), Some(&PropertySchema::default()));
        assert_eq!(record.categories.get("weird"), Some(&CategorySchema::default()));
    }

    #[test]
    fn test_priority_parsing() {
        let record = ProductRecord::from_value(&json!({
            "categories": {
                "a": {"priority": 3},
                "b": {"priority": 2.9},
                "c": {"priority": -1}
            }
        }))
        .unwrap();

        assert_eq!(record.categories["a"].priority, 3);
        assert_eq!(record.categories["b"].priority, 2);
        assert_eq!(record.categories["c"].priority, -1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let record = ProductRecord::from_value(&json!({
            "categories": {"zeta": {}, "alpha": {}, "mid": {}}
        }))
        .unwrap();

        let keys: Vec<&str> = record.categories.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(1)), "number");
        assert_eq!(json_kind(&json!("s")), "string");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
