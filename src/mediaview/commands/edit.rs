//! Single-item editing.
//!
//! An [`EditSession`] holds the record as loaded and the changes made to it
//! since. Only fields whose value differs from the loaded record are kept, so
//! saving sends a minimal partial record. Setting a field back to its
//! original value drops the change.

use crate::commands::{field_label, validate, CmdMessage, CmdResult, ValidationReport};
use crate::error::{MediaError, Result};
use crate::fields::{FieldRegistry, FORM_FIELDS};
use crate::model::{Record, RecordId};
use crate::source::MediaSource;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct EditSession {
    original: Record,
    /// Field id -> new raw value, in the order fields were first changed.
    changes: Vec<(String, Value)>,
    form: Vec<String>,
    last_error: Option<String>,
}

impl EditSession {
    pub fn new(original: Record) -> Self {
        Self {
            original,
            changes: Vec::new(),
            form: FORM_FIELDS.iter().map(|s| s.to_string()).collect(),
            last_error: None,
        }
    }

    pub fn open<S: MediaSource>(source: &S, id: RecordId) -> Result<Self> {
        Ok(Self::new(source.get_record(id)?))
    }

    pub fn with_form(mut self, form: Vec<String>) -> Self {
        self.form = form;
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.original.id()
    }

    pub fn original(&self) -> &Record {
        &self.original
    }

    pub fn form(&self) -> &[String] {
        &self.form
    }

    /// Change one field. Read-only and unknown fields are rejected.
    pub fn set(&mut self, fields: &FieldRegistry, field_id: &str, value: Value) -> Result<()> {
        let field = fields
            .get(field_id)
            .ok_or_else(|| MediaError::Api(format!("Unknown field: {}", field_id)))?;
        if field.read_only {
            return Err(MediaError::Api(format!(
                "{} is read-only",
                field_label(fields, field_id)
            )));
        }

        let unchanged = field.raw_value(&self.original).unwrap_or(Value::Null) == value;
        self.changes.retain(|(id, _)| id != field_id);
        if !unchanged {
            self.changes.push((field_id.to_string(), value));
        }
        Ok(())
    }

    pub fn has_local_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The changed fields as a partial record.
    pub fn changes(&self, fields: &FieldRegistry) -> Record {
        let mut partial = Record::new();
        for (id, value) in &self.changes {
            match fields.get(id) {
                Some(field) => field.write(&mut partial, value.clone()),
                None => partial.set_path(id, value.clone()),
            }
        }
        partial
    }

    pub fn changed_fields(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|(id, _)| id.as_str())
    }

    /// The record as it would look after saving.
    pub fn item(&self, fields: &FieldRegistry) -> Record {
        let mut item = self.original.clone();
        item.merge(&self.changes(fields));
        item
    }

    pub fn validate(&self, fields: &FieldRegistry) -> ValidationReport {
        validate::check(&self.item(fields), fields, &self.form)
    }

    pub fn reset(&mut self) {
        self.changes.clear();
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate and send the changed fields to the source.
    ///
    /// On failure the local changes stay in place and the error is kept in
    /// [`last_error`](Self::last_error). On success they are cleared and the
    /// saved record becomes the new original.
    pub fn save<S: MediaSource>(
        &mut self,
        source: &mut S,
        fields: &FieldRegistry,
    ) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if !self.has_local_changes() {
            result.add_message(CmdMessage::info("No changes to save"));
            return Ok(result);
        }

        let id = self
            .id()
            .ok_or_else(|| MediaError::Api("Media item has no id".to_string()))?;

        let report = self.validate(fields);
        if !report.is_empty() {
            self.last_error = Some("Please fix the validation errors".to_string());
            return Err(MediaError::Validation(report));
        }

        let changes = self.changes(fields);
        debug!(id, fields = ?self.changed_fields().collect::<Vec<_>>(), "saving media item");
        match source.save_record(id, &changes) {
            Ok(saved) => {
                self.original = saved.clone();
                self.reset();
                result.add_message(CmdMessage::success("Media item updated successfully"));
                Ok(result.with_affected(vec![saved]))
            }
            Err(e) => {
                warn!(id, error = %e, "save failed");
                self.last_error = Some(format!("Failed to update media item: {}", e));
                Err(e)
            }
        }
    }
}

/// Apply `assignments` to one record and save it.
pub fn run<S: MediaSource>(
    source: &mut S,
    fields: &FieldRegistry,
    id: RecordId,
    assignments: &[(String, Value)],
) -> Result<CmdResult> {
    let mut session = EditSession::open(&*source, id)?;
    for (field, value) in assignments {
        session.set(fields, field, value.clone())?;
    }
    session.save(source, fields)
}
