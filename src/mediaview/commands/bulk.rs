//! Bulk editing.
//!
//! Only [`BULK_EDIT_FIELDS`] can be changed across a selection. The form shown
//! for a selection carries, per field, either the value every selected item
//! shares or [`BulkValue::Mixed`] when they disagree.

use crate::commands::{field_label, CmdMessage, CmdResult};
use crate::error::{MediaError, Result};
use crate::fields::{FieldRegistry, BULK_EDIT_FIELDS};
use crate::model::{Record, RecordId};
use crate::source::MediaSource;
use serde_json::Value;
use tracing::{debug, warn};

/// A field's value across a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkValue {
    /// Every selected item holds this value (`Null` when all lack it).
    Common(Value),
    /// The selected items disagree.
    Mixed,
}

impl BulkValue {
    pub fn is_mixed(&self) -> bool {
        matches!(self, BulkValue::Mixed)
    }
}

/// Per-field values for the bulk form, in [`BULK_EDIT_FIELDS`] order.
/// Fields missing from the registry are left out.
pub fn form(records: &[Record], fields: &FieldRegistry) -> Vec<(String, BulkValue)> {
    BULK_EDIT_FIELDS
        .iter()
        .filter_map(|id| fields.get(id))
        .map(|field| {
            let mut values = records
                .iter()
                .map(|r| field.raw_value(r).unwrap_or(Value::Null));
            let value = match values.next() {
                None => BulkValue::Common(Value::Null),
                Some(first) => {
                    if values.all(|v| v == first) {
                        BulkValue::Common(first)
                    } else {
                        BulkValue::Mixed
                    }
                }
            };
            (field.id.clone(), value)
        })
        .collect()
}

/// Apply the same changes to every id in `ids`.
///
/// Each item is saved on its own: a failure is reported in the result's
/// messages and does not stop the remaining saves.
pub fn run<S: MediaSource>(
    source: &mut S,
    fields: &FieldRegistry,
    ids: &[RecordId],
    assignments: &[(String, Value)],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if ids.is_empty() {
        result.add_message(CmdMessage::info("No media items selected"));
        return Ok(result);
    }
    if assignments.is_empty() {
        result.add_message(CmdMessage::info("No changes to apply"));
        return Ok(result);
    }

    let mut changes = Record::new();
    for (id, value) in assignments {
        if !BULK_EDIT_FIELDS.contains(&id.as_str()) {
            return Err(MediaError::Api(format!(
                "{} cannot be edited in bulk (allowed: {})",
                field_label(fields, id),
                BULK_EDIT_FIELDS.join(", ")
            )));
        }
        match fields.get(id) {
            Some(field) => field.write(&mut changes, value.clone()),
            None => changes.set_path(id, value.clone()),
        }
    }

    let mut affected = Vec::new();
    for &id in ids {
        match source.save_record(id, &changes) {
            Ok(saved) => {
                debug!(id, "bulk update applied");
                affected.push(saved);
            }
            Err(e) => {
                warn!(id, error = %e, "bulk update failed");
                result.add_message(CmdMessage::error(format!(
                    "Failed to update media item {}: {}",
                    id, e
                )));
            }
        }
    }

    if !affected.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "Updated {} of {} media items",
            affected.len(),
            ids.len()
        )));
    }
    Ok(result.with_affected(affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::fields::media_fields;
    use crate::source::memory::fixtures::{media, SourceFixture};
    use crate::source::memory::InMemorySource;
    use serde_json::json;

    #[test]
    fn form_reports_common_and_mixed_values() {
        let a = media(1, "A", "image/png", "2024-01-01T00:00:00");
        let b = media(2, "B", "image/png", "2024-01-02T00:00:00");
        let form = form(&[a, b], &media_fields());

        assert_eq!(
            form,
            vec![
                ("author".to_string(), BulkValue::Common(json!(1))),
                ("date".to_string(), BulkValue::Mixed),
            ]
        );
        assert!(form[1].1.is_mixed());
    }

    #[test]
    fn form_for_empty_selection_is_null() {
        let form = form(&[], &media_fields());
        assert!(form.iter().all(|(_, v)| *v == BulkValue::Common(Value::Null)));
    }

    #[test]
    fn applies_changes_to_every_item() {
        let fields = media_fields();
        let mut source = SourceFixture::new().with_images(3).source;
        let result = run(
            &mut source,
            &fields,
            &[1, 3],
            &[("author".to_string(), json!(7))],
        )
        .unwrap();

        assert_eq!(result.affected.len(), 2);
        assert_eq!(source.get_record(1).unwrap().get_path("author"), Some(&json!(7)));
        assert_eq!(source.get_record(2).unwrap().get_path("author"), Some(&json!(1)));
        assert_eq!(source.get_record(3).unwrap().get_path("author"), Some(&json!(7)));
        assert_eq!(result.messages[0].content, "Updated 2 of 2 media items");
    }

    #[test]
    fn rejects_fields_outside_the_bulk_set() {
        let fields = media_fields();
        let mut source = SourceFixture::new().with_images(1).source;
        let err = run(
            &mut source,
            &fields,
            &[1],
            &[("alt_text".to_string(), json!("x"))],
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::Api(_)));
    }

    #[test]
    fn continues_past_missing_items() {
        let fields = media_fields();
        let mut source = InMemorySource::with_records(vec![media(1, "A", "image/png", "2024-01-01")]);
        let result = run(
            &mut source,
            &fields,
            &[9, 1],
            &[("date".to_string(), json!("2024-06-01T00:00:00"))],
        )
        .unwrap();

        assert_eq!(result.affected.len(), 1);
        assert!(result.has_errors());
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(result.messages[1].content, "Updated 1 of 2 media items");
    }

    #[test]
    fn empty_selection_does_nothing() {
        let fields = media_fields();
        let mut source = SourceFixture::new().with_images(1).failing_writes().source;
        let result = run(&mut source, &fields, &[], &[("author".to_string(), json!(2))]).unwrap();
        assert!(result.affected.is_empty());
        assert!(!result.has_errors());
    }
}
