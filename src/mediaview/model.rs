//! Media records as they come back from the media listing endpoint.
//!
//! A [`Record`] is deliberately opaque: it is the JSON object the REST listing
//! returned, with nested values such as `title.raw` or `media_details.filesize`.
//! Fields are addressed by dotted paths; the field registry decides what those
//! paths mean.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stable identifier used for keying and selection.
    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a dotted path (`title.raw`). Missing segments yield `None`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Write a value at a dotted path, creating intermediate objects.
    ///
    /// A non-object value sitting on an intermediate segment is replaced.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => return,
            };
        }
        current.insert(last.to_string(), value);
    }

    /// Deep-merge a partial record into this one. Objects merge key by key,
    /// any other value overwrites.
    pub fn merge(&mut self, changes: &Record) {
        merge_maps(&mut self.0, &changes.0);
    }

    /// Case-insensitive match of `term` against every string leaf.
    pub fn contains_text(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.0.values().any(|v| value_contains(v, &needle))
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

fn merge_maps(target: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (key, incoming) in changes {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge_maps(existing, nested),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

/// A site user, used to label the `author` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl User {
    /// Display label, falling back to the slug and then to `User <id>`.
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.slug.is_empty() {
            self.slug.clone()
        } else {
            format!("User {}", self.id)
        }
    }
}
