//! Value formatting: raw scalar + declared format → display text.
//!
//! Formatting is a boundary operation. A value that cannot be rendered turns
//! into [`FormattedValue::FormatError`] for that single field and is logged;
//! it never aborts the projection it is part of.

use crate::i18n::{LocaleConfig, LocaleRegistry, DISPLAY_STRINGS};
use crate::record::{number_to_plain_string, DataFormat, RawValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use serde_json::Number;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Date-time layouts accepted in addition to RFC 3339 and plain dates.
const DATE_TIME_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Rendered text of one property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedValue {
    /// The value was explicitly null (or absent when formatted directly).
    NotSpecified,
    /// The value could not be rendered in its declared format.
    FormatError,
    Text(String),
}

impl FormattedValue {
    pub fn as_str(&self) -> &str {
        match self {
            FormattedValue::NotSpecified => DISPLAY_STRINGS.not_specified,
            FormattedValue::FormatError => DISPLAY_STRINGS.format_error,
            FormattedValue::Text(text) => text,
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, FormattedValue::NotSpecified)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormattedValue::FormatError)
    }
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FormattedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Error)]
enum FormatFailure {
    #[error("'{0}' is not a recognizable date")]
    UnparsableDate(String),

    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(String),
}

/// Format a value using the fallback (`en-US`) viewer locale.
pub fn format_default(value: Option<&RawValue>, format: Option<&DataFormat>) -> FormattedValue {
    format_value(value, format, LocaleRegistry::get().fallback())
}

/// Format a value for display.
///
/// - null or absent → `NotSpecified`
/// - `date` → the calendar date in the locale's pattern, `FormatError` if unparsable
/// - `number` → grouped digits when numeric, the plain string otherwise
/// - `boolean` → "Yes"/"No" by standard truthiness
/// - anything else → the plain string form
pub fn format_value(
    value: Option<&RawValue>,
    format: Option<&DataFormat>,
    locale: &LocaleConfig,
) -> FormattedValue {
    let value = match value {
        None | Some(RawValue::Null) => return FormattedValue::NotSpecified,
        Some(value) => value,
    };

    let rendered = match format {
        Some(DataFormat::Date) => format_date(value, locale),
        Some(DataFormat::Number) => Ok(match value {
            RawValue::Number(n) => format_number(n, locale),
            other => other.to_plain_string(),
        }),
        Some(DataFormat::Boolean) => Ok(DISPLAY_STRINGS.boolean(value.is_truthy()).to_string()),
        Some(DataFormat::String) | Some(DataFormat::Other(_)) | None => Ok(value.to_plain_string()),
    };

    match rendered {
        Ok(text) => FormattedValue::Text(text),
        Err(e) => {
            warn!("Error formatting property value: {}", e);
            FormattedValue::FormatError
        }
    }
}

fn format_date(value: &RawValue, locale: &LocaleConfig) -> Result<String, FormatFailure> {
    let date = parse_date(value)?;
    Ok(date.format(locale.date_pattern).to_string())
}

/// Numbers are epoch milliseconds; strings are ISO-like dates or date-times.
fn parse_date(value: &RawValue) -> Result<NaiveDate, FormatFailure> {
    match value {
        RawValue::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(|| FormatFailure::TimestampOutOfRange(n.to_string()))?;
            DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| FormatFailure::TimestampOutOfRange(n.to_string()))
        }
        RawValue::Text(text) => parse_date_text(text.trim())
            .ok_or_else(|| FormatFailure::UnparsableDate(text.clone())),
        other => Err(FormatFailure::UnparsableDate(other.to_plain_string())),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DATE_TIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .map(|dt| dt.date())
}

/// Group the integer part and keep at most three fraction digits.
fn format_number(n: &Number, locale: &LocaleConfig) -> String {
    if let Some(i) = n.as_i64() {
        let grouped = group_digits(&i.unsigned_abs().to_string(), locale.group_separator);
        return if i < 0 { format!("-{}", grouped) } else { grouped };
    }
    if let Some(u) = n.as_u64() {
        return group_digits(&u.to_string(), locale.group_separator);
    }
    let Some(f) = n.as_f64().filter(|f| f.is_finite()) else {
        return number_to_plain_string(n);
    };

    // Ties round away from zero.
    let rounded = (f.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let is_zero = integer.bytes().all(|b| b == b'0') && fraction.is_empty();

    let mut out = String::new();
    if f < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(integer, locale.group_separator));
    if !fraction.is_empty() {
        out.push_str(locale.decimal_separator);
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
