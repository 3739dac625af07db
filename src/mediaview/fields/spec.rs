//! Field descriptors and the registry that holds them.
//!
//! A [`FieldDescriptor`] says where a field lives in a record, what type it is,
//! which view operations it takes part in, and carries the capability functions
//! used to read, display and write it. Views refer to fields by id only; a view
//! naming a field the registry does not know simply has no effect.

use super::FieldValue;
use crate::model::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extracts the raw value for a field. Defaults to dotted path lookup.
pub type GetValueFn = fn(&Record) -> Option<Value>;

/// Formats an extracted value for display.
pub type RenderFn = fn(&FieldValue) -> String;

/// Writes a value back into a record. Defaults to dotted path write.
pub type SetValueFn = fn(&mut Record, Value);

/// Checks an edited value, returning a user-facing message when invalid.
pub type ValidateFn = fn(&FieldValue) -> Result<(), String>;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Datetime,
    /// A URL pointing at media; displayed, never sorted.
    Media,
}

/// Comparison operators a filter can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Is,
    IsNot,
    Contains,
    NotContains,
    IsAny,
    IsNone,
    IsBefore,
    IsAfter,
    IsGreaterThan,
    IsLessThan,
    /// Any operator name this build does not recognise. No field declares it,
    /// so filters using it are skipped.
    #[serde(other)]
    Unsupported,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::IsAny => "isAny",
            Operator::IsNone => "isNone",
            Operator::IsBefore => "isBefore",
            Operator::IsAfter => "isAfter",
            Operator::IsGreaterThan => "isGreaterThan",
            Operator::IsLessThan => "isLessThan",
            Operator::Unsupported => "unsupported",
        }
    }

    /// Operators whose filter value is a set rather than a scalar.
    pub fn takes_set(&self) -> bool {
        matches!(self, Operator::IsAny | Operator::IsNone)
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value::<Operator>(Value::String(s.to_string()))
            .ok()
            .filter(|op| *op != Operator::Unsupported)
            .ok_or_else(|| format!("unknown operator '{}'", s))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an enumerated value set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub value: Value,
    pub label: String,
}

impl Element {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Specification for a single addressable field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Dotted path into the record (e.g. "title.raw")
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    pub description: Option<String>,

    pub enable_sorting: bool,
    pub enable_global_search: bool,
    pub enable_hiding: bool,
    pub read_only: bool,

    /// The stored value is rendered HTML; markup is stripped before any
    /// search, filter or sort sees it.
    pub markup: bool,

    /// Compare text case-insensitively when sorting.
    pub sort_case_insensitive: bool,

    /// Operators accepted by `filterBy`. Empty means not filterable.
    pub operators: Vec<Operator>,

    pub elements: Vec<Element>,

    pub get_value: Option<GetValueFn>,
    pub render: Option<RenderFn>,
    pub set_value: Option<SetValueFn>,
    pub validate: Option<ValidateFn>,
}

impl FieldDescriptor {
    /// A new descriptor with the DataViews defaults: sortable and hidable,
    /// not searchable, not filterable.
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            description: None,
            enable_sorting: true,
            enable_global_search: false,
            enable_hiding: true,
            read_only: false,
            markup: false,
            sort_case_insensitive: false,
            operators: Vec::new(),
            elements: Vec::new(),
            get_value: None,
            render: None,
            set_value: None,
            validate: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn searchable(mut self) -> Self {
        self.enable_global_search = true;
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.enable_sorting = false;
        self
    }

    pub fn not_hidable(mut self) -> Self {
        self.enable_hiding = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn markup(mut self) -> Self {
        self.markup = true;
        self
    }

    pub fn sort_case_insensitive(mut self) -> Self {
        self.sort_case_insensitive = true;
        self
    }

    pub fn filter_by(mut self, operators: &[Operator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    pub fn elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    pub fn get_value(mut self, f: GetValueFn) -> Self {
        self.get_value = Some(f);
        self
    }

    pub fn render(mut self, f: RenderFn) -> Self {
        self.render = Some(f);
        self
    }

    pub fn set_value(mut self, f: SetValueFn) -> Self {
        self.set_value = Some(f);
        self
    }

    pub fn validate(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn supports(&self, op: Operator) -> bool {
        self.operators.contains(&op)
    }

    pub fn is_filterable(&self) -> bool {
        !self.operators.is_empty()
    }

    pub fn is_enumerated(&self) -> bool {
        !self.elements.is_empty()
    }

    /// The raw JSON value, via the custom extractor or path lookup.
    pub fn raw_value(&self, record: &Record) -> Option<Value> {
        match self.get_value {
            Some(f) => f(record),
            None => record.get_path(&self.id).cloned(),
        }
    }

    /// The typed value of this field for `record`.
    pub fn value(&self, record: &Record) -> FieldValue {
        let Some(raw) = self.raw_value(record) else {
            return FieldValue::Null;
        };
        let value = FieldValue::from_json(&raw, self.field_type);
        if self.markup {
            strip_value(value)
        } else {
            value
        }
    }

    /// Coerce a loosely typed value (e.g. from a filter) into this field's type.
    pub fn coerce(&self, raw: &Value) -> FieldValue {
        FieldValue::from_json(raw, self.field_type)
    }

    /// Display text for this field of `record`.
    pub fn display(&self, record: &Record) -> String {
        let value = self.value(record);
        if let Some(render) = self.render {
            return render(&value);
        }
        if let Some(label) = self.element_label(&value) {
            return label.to_string();
        }
        default_render(&value)
    }

    /// Label of the element matching `value`, if this field is enumerated.
    pub fn element_label(&self, value: &FieldValue) -> Option<&str> {
        self.elements
            .iter()
            .find(|el| self.coerce(&el.value).loosely_equals(value))
            .map(|el| el.label.as_str())
    }

    /// Write `value` back into `record`.
    pub fn write(&self, record: &mut Record, value: Value) {
        match self.set_value {
            Some(f) => f(record, value),
            None => record.set_path(&self.id, value),
        }
    }

    /// Run the field's validator, if any, on the value held by `record`.
    pub fn check(&self, record: &Record) -> Result<(), String> {
        match self.validate {
            Some(f) => f(&self.value(record)),
            None => Ok(()),
        }
    }
}

fn strip_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(s) => FieldValue::Text(super::strip_markup(&s)),
        FieldValue::List(items) => FieldValue::List(items.into_iter().map(strip_value).collect()),
        other => other,
    }
}

/// Rendering used when a field has no custom renderer.
pub fn default_render(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::DateTime(dt) => dt.format("%b %-d, %Y").to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(default_render)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.search_text().unwrap_or_default(),
    }
}

/// Ordered collection of field descriptors.
///
/// Order matters for display: it is the default column order.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FieldDescriptor> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields taking part in global search.
    pub fn searchable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.enable_global_search)
    }

    pub fn sortable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.enable_sorting)
    }

    /// Fields to display for a view: the ones it lists, in registry order,
    /// plus every field that cannot be hidden.
    pub fn visible(&self, shown: &[String]) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !f.enable_hiding || shown.iter().any(|id| *id == f.id))
            .collect()
    }

    /// Writable fields among `form`, in form order. Unknown ids are skipped.
    pub fn editable<'a>(&'a self, form: &[String]) -> Vec<&'a FieldDescriptor> {
        form.iter()
            .filter_map(|id| self.get(id))
            .filter(|f| !f.read_only)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec![
            FieldDescriptor::new("id", "ID", FieldType::Integer).not_hidable(),
            FieldDescriptor::new("title.raw", "Title", FieldType::Text)
                .searchable()
                .filter_by(&[Operator::Contains, Operator::Is]),
            FieldDescriptor::new("caption.raw", "Caption", FieldType::Text).markup(),
            FieldDescriptor::new("filesize", "Size", FieldType::Integer).read_only(),
        ])
    }

    #[test]
    fn defaults_follow_dataviews() {
        let field = FieldDescriptor::new("x", "X", FieldType::Text);
        assert!(field.enable_sorting);
        assert!(field.enable_hiding);
        assert!(!field.enable_global_search);
        assert!(!field.is_filterable());
    }

    #[test]
    fn operator_parses_camel_case() {
        assert_eq!("isAny".parse::<Operator>(), Ok(Operator::IsAny));
        assert_eq!("notContains".parse::<Operator>(), Ok(Operator::NotContains));
        assert!("between".parse::<Operator>().is_err());
    }

    #[test]
    fn unknown_operator_deserializes_as_unsupported() {
        let op: Operator = serde_json::from_value(json!("isBetween")).unwrap();
        assert_eq!(op, Operator::Unsupported);
    }

    #[test]
    fn value_uses_path_lookup_by_default() {
        let reg = registry();
        let title = reg.get("title.raw").unwrap();
        let r = record(json!({"title": {"raw": "Sunset Beach"}}));
        assert_eq!(title.value(&r), FieldValue::Text("Sunset Beach".into()));
    }

    #[test]
    fn markup_fields_are_stripped() {
        let reg = registry();
        let caption = reg.get("caption.raw").unwrap();
        let r = record(json!({"caption": {"raw": "<em>Dusk</em> at the pier"}}));
        assert_eq!(caption.value(&r), FieldValue::Text("Dusk at the pier".into()));
    }

    #[test]
    fn custom_extractor_wins() {
        fn always_seven(_: &Record) -> Option<Value> {
            Some(json!(7))
        }
        let field = FieldDescriptor::new("n", "N", FieldType::Integer).get_value(always_seven);
        assert_eq!(field.value(&Record::new()), FieldValue::Integer(7));
    }

    #[test]
    fn display_prefers_element_labels() {
        let field = FieldDescriptor::new("mime_type", "Type", FieldType::Text)
            .elements(vec![Element::new("image/png", "PNG")]);
        let r = record(json!({"mime_type": "image/png"}));
        assert_eq!(field.display(&r), "PNG");

        let other = record(json!({"mime_type": "image/tiff"}));
        assert_eq!(field.display(&other), "image/tiff");
    }

    #[test]
    fn write_uses_dotted_path() {
        let reg = registry();
        let mut r = Record::new();
        reg.get("title.raw").unwrap().write(&mut r, json!("New"));
        assert_eq!(r.get_path("title.raw"), Some(&json!("New")));
    }

    #[test]
    fn visible_includes_unhidable_fields() {
        let reg = registry();
        let shown = vec!["caption.raw".to_string()];
        let ids: Vec<_> = reg.visible(&shown).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "caption.raw"]);
    }

    #[test]
    fn editable_skips_read_only_and_unknown() {
        let reg = registry();
        let form = vec![
            "filesize".to_string(),
            "title.raw".to_string(),
            "nope".to_string(),
        ];
        let ids: Vec<_> = reg.editable(&form).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["title.raw"]);
    }

    #[test]
    fn searchable_lists_enabled_fields() {
        let reg = registry();
        let ids: Vec<_> = reg.searchable().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["title.raw"]);
    }
}
