use crate::commands::{field_label, CmdMessage, CmdResult, ValidationReport};
use crate::error::Result;
use crate::fields::FieldRegistry;
use crate::model::{Record, RecordId};
use crate::source::MediaSource;

/// Run the validators of every editable field in `form` against `record`.
pub fn check(record: &Record, fields: &FieldRegistry, form: &[String]) -> ValidationReport {
    fields
        .editable(form)
        .into_iter()
        .filter_map(|field| {
            field
                .check(record)
                .err()
                .map(|message| (field.id.clone(), message))
        })
        .collect()
}

/// Validate a stored record as the edit form would.
pub fn run<S: MediaSource>(
    source: &S,
    fields: &FieldRegistry,
    id: RecordId,
    form: &[String],
) -> Result<CmdResult> {
    let record = source.get_record(id)?;
    let report = check(&record, fields, form);

    let mut result = CmdResult::default();
    if report.is_empty() {
        result.add_message(CmdMessage::success(format!("Media item {} is valid", id)));
    }
    for (field, message) in report {
        result.add_message(CmdMessage::error(format!(
            "{}: {}",
            field_label(fields, &field),
            message
        )));
    }
    Ok(result.with_listed(vec![record]))
}
