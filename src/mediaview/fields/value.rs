//! Field value types.
//!
//! This module defines the runtime representation of a field's value once it
//! has been extracted from a record, and the coercions that turn loosely typed
//! JSON (from records or from filter definitions) into comparable values.

use super::FieldType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Runtime representation of a field value.
///
/// Datetimes are kept naive: the media listing reports site-local times
/// without an offset, and offset-carrying inputs are normalized to UTC.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Convert a JSON value into a field value of the given type.
    ///
    /// Conversion is lenient: numeric strings become integers for integer
    /// fields, date strings become timestamps for datetime fields. Anything that
    /// cannot be represented falls back to the closest untyped value rather
    /// than failing.
    pub fn from_json(value: &Value, field_type: FieldType) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Array(items) => {
                FieldValue::List(items.iter().map(|v| Self::from_json(v, field_type)).collect())
            }
            _ => match field_type {
                FieldType::Integer => Self::integer_from_json(value),
                FieldType::Datetime => Self::datetime_from_json(value),
                FieldType::Text | FieldType::Media => Self::text_from_json(value),
            },
        }
    }

    fn integer_from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    FieldValue::Integer(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    FieldValue::Number(f)
                } else {
                    FieldValue::Text(s.clone())
                }
            }
            Value::Bool(b) => FieldValue::Bool(*b),
            _ => FieldValue::Null,
        }
    }

    fn datetime_from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => parse_datetime(s)
                .map(FieldValue::DateTime)
                .unwrap_or_else(|| FieldValue::Text(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| FieldValue::DateTime(dt.naive_utc()))
                .unwrap_or(FieldValue::Null),
            _ => FieldValue::Null,
        }
    }

    fn text_from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Bool(*b),
            // Nested objects are not text; descriptors must point at a leaf.
            _ => FieldValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(f) => Some(*f),
            _ => None,
        }
    }

    /// Plain-text form used by global search and `contains`.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Number(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::DateTime(dt) => Some(dt.format(ISO_FORMAT).to_string()),
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().filter_map(|v| v.search_text()).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
        }
    }

    /// Type-aware equality: numbers compare numerically across integer and
    /// float representations, everything else must match kind and value.
    pub fn loosely_equals(&self, other: &FieldValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Ordering between two values of compatible kinds, `None` otherwise.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Some(a.total_cmp(&b)),
                _ => None,
            },
        }
    }

    /// Total ordering used by sorting. Values of different kinds order by kind
    /// rank so that the sort never sees an inconsistent comparator; `Null`
    /// ranks lowest.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.kind_rank().cmp(&other.kind_rank()))
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Integer(_) | FieldValue::Number(_) => 2,
            FieldValue::DateTime(_) => 3,
            FieldValue::Text(_) => 4,
            FieldValue::List(_) => 5,
        }
    }
}

/// Parse the datetime shapes the media endpoint and users produce:
/// RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and bare dates.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in [ISO_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a bare calendar date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Remove markup from rendered HTML so only the visible text remains.
///
/// Tags (including their attributes) are deleted without leaving a gap, so a
/// tag inside a word keeps the word whole. The entities the editor emits are
/// decoded and runs of whitespace collapse to one space.
pub fn strip_markup(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, "");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&#8217;", "\u{2019}")
        .replace("&amp;", "&");
    SPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}
