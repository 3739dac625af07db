//! Field filtering.
//!
//! A [`Filter`] is the declarative `{ field, operator, value }` triple a view
//! carries. Before evaluation it is resolved against the field registry: the
//! descriptor is looked up, the operator is checked against the descriptor's
//! `filterBy` list and the filter value is coerced to the field's type once.
//! Filters that cannot be resolved are skipped, never treated as errors.

use super::{parse_date, FieldDescriptor, FieldRegistry, FieldType, FieldValue, Operator};
use crate::model::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A filter condition on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// The field id (e.g., "mime_type", "title.raw")
    pub field: String,
    pub operator: Operator,
    /// The value to compare against; an array for `isAny` / `isNone`
    #[serde(default)]
    pub value: Value,
}

/// Why a filter had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownField,
    UnsupportedOperator,
    /// No value set yet (null, or an empty set)
    Inactive,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Convenience: create an equality filter.
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Is, value)
    }

    /// Convenience: create a set-membership filter.
    pub fn is_any<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::IsAny, Value::Array(values))
    }

    /// Whether the filter carries a value to test against.
    pub fn is_active(&self) -> bool {
        match &self.value {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Bind this filter to its field descriptor.
    pub fn resolve<'a>(
        &self,
        fields: &'a FieldRegistry,
    ) -> Result<ResolvedFilter<'a>, SkipReason> {
        let field = fields.get(&self.field).ok_or(SkipReason::UnknownField)?;
        if !field.supports(self.operator) {
            return Err(SkipReason::UnsupportedOperator);
        }
        if !self.is_active() {
            return Err(SkipReason::Inactive);
        }

        let target = field.coerce(&self.value);
        let day = match (&self.value, field.field_type) {
            (Value::String(s), FieldType::Datetime) => parse_date(s),
            _ => None,
        };

        Ok(ResolvedFilter {
            field,
            operator: self.operator,
            target,
            day,
        })
    }

    /// Check whether `record` passes this filter. Filters that cannot be
    /// resolved pass every record.
    pub fn matches(&self, record: &Record, fields: &FieldRegistry) -> bool {
        match self.resolve(fields) {
            Ok(resolved) => resolved.matches(record),
            Err(_) => true,
        }
    }
}

/// A filter bound to its descriptor with the target value already coerced.
#[derive(Debug, Clone)]
pub struct ResolvedFilter<'a> {
    field: &'a FieldDescriptor,
    operator: Operator,
    target: FieldValue,
    /// Set when a datetime filter was given a bare date; `is` then matches
    /// the whole calendar day.
    day: Option<NaiveDate>,
}

impl ResolvedFilter<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        let actual = self.field.value(record);

        match self.operator {
            Operator::Is => self.equals(&actual),
            Operator::IsNot => !self.equals(&actual),
            Operator::Contains => self.contains(&actual),
            Operator::NotContains => !self.contains(&actual),
            Operator::IsAny => self.any_of(&actual),
            Operator::IsNone => !self.any_of(&actual),
            Operator::IsBefore | Operator::IsLessThan => self.ordering(&actual) == Some(Ordering::Less),
            Operator::IsAfter | Operator::IsGreaterThan => {
                self.ordering(&actual) == Some(Ordering::Greater)
            }
            Operator::Unsupported => true,
        }
    }

    fn equals(&self, actual: &FieldValue) -> bool {
        if let (Some(day), FieldValue::DateTime(dt)) = (self.day, actual) {
            return dt.date() == day;
        }
        actual.loosely_equals(&self.target)
    }

    /// Case-insensitive substring test; list values match if any element does.
    fn contains(&self, actual: &FieldValue) -> bool {
        let Some(needle) = self.target.search_text() else {
            return false;
        };
        let needle = needle.to_lowercase();
        let text_contains = |v: &FieldValue| {
            v.search_text()
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };

        match actual {
            FieldValue::List(items) => items.iter().any(text_contains),
            other => text_contains(other),
        }
    }

    /// Membership of a scalar in the filter set, or overlap for list values.
    fn any_of(&self, actual: &FieldValue) -> bool {
        let set: &[FieldValue] = match &self.target {
            FieldValue::List(items) => items,
            single => std::slice::from_ref(single),
        };

        match actual {
            FieldValue::List(items) => items
                .iter()
                .any(|item| set.iter().any(|v| item.loosely_equals(v))),
            scalar => set.iter().any(|v| scalar.loosely_equals(v)),
        }
    }

    fn ordering(&self, actual: &FieldValue) -> Option<Ordering> {
        if actual.is_null() {
            return None;
        }
        actual.compare(&self.target)
    }
}
