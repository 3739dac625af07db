//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., `field=value` assignments and `field:op:value`
//!   filters typed on a command line)
//! - **Owns** the source and the field registry, with author elements resolved
//!   from the source's users
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and no formatting; that is the client's job.
//!
//! ## Generic Over MediaSource
//!
//! - Production: `MediaApi<JsonFileSource>`
//! - Testing: `MediaApi<InMemorySource>`

use crate::commands::{self, bulk::BulkValue, edit::EditSession};
use crate::config::MediaViewConfig;
use crate::error::{MediaError, Result};
use crate::fields::{media_fields, with_authors, FieldRegistry, FieldType, Filter, Operator};
use crate::model::RecordId;
use crate::source::{ListQuery, MediaSource};
use crate::view::{Sort, SortDirection, ViewSpec};
use serde_json::Value;
use std::str::FromStr;

pub struct MediaApi<S: MediaSource> {
    source: S,
    fields: FieldRegistry,
    config: MediaViewConfig,
}

impl<S: MediaSource> MediaApi<S> {
    /// Build the API over `source`. Users are fetched once to label authors.
    pub fn new(source: S, config: MediaViewConfig) -> Result<Self> {
        let users = source.list_users()?;
        let fields = with_authors(media_fields(), &users);
        Ok(Self {
            source,
            fields,
            config,
        })
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn config(&self) -> &MediaViewConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The configured starting view.
    pub fn default_view(&self) -> ViewSpec {
        self.config.default_view()
    }

    pub fn list(&self, view: &ViewSpec) -> Result<commands::CmdResult> {
        let query = ListQuery::new().per_page(self.config.fetch_per_page);
        commands::list::run(&self.source, &self.fields, view, &query)
    }

    pub fn show(&self, id: RecordId) -> Result<commands::CmdResult> {
        commands::show::run(&self.source, id)
    }

    pub fn validate(&self, id: RecordId) -> Result<commands::CmdResult> {
        let form: Vec<String> = crate::fields::FORM_FIELDS
            .iter()
            .map(|s| s.to_string())
            .collect();
        commands::validate::run(&self.source, &self.fields, id, &form)
    }

    pub fn edit<I: AsRef<str>>(
        &mut self,
        id: RecordId,
        assignments: &[I],
    ) -> Result<commands::CmdResult> {
        let parsed = parse_assignments(&self.fields, assignments)?;
        commands::edit::run(&mut self.source, &self.fields, id, &parsed)
    }

    pub fn open_editor(&self, id: RecordId) -> Result<EditSession> {
        EditSession::open(&self.source, id)
    }

    pub fn save_editor(&mut self, session: &mut EditSession) -> Result<commands::CmdResult> {
        session.save(&mut self.source, &self.fields)
    }

    pub fn bulk_form(&self, ids: &[RecordId]) -> Result<Vec<(String, BulkValue)>> {
        let records = ids
            .iter()
            .map(|id| self.source.get_record(*id))
            .collect::<Result<Vec<_>>>()?;
        Ok(commands::bulk::form(&records, &self.fields))
    }

    pub fn bulk_edit<I: AsRef<str>>(
        &mut self,
        ids: &[RecordId],
        assignments: &[I],
    ) -> Result<commands::CmdResult> {
        let parsed = parse_assignments(&self.fields, assignments)?;
        commands::bulk::run(&mut self.source, &self.fields, ids, &parsed)
    }
}

/// Parse `field=value` assignments, typing each value by its field.
pub fn parse_assignments<I: AsRef<str>>(
    fields: &FieldRegistry,
    assignments: &[I],
) -> Result<Vec<(String, Value)>> {
    assignments
        .iter()
        .map(|a| parse_assignment(fields, a.as_ref()))
        .collect()
}

fn parse_assignment(fields: &FieldRegistry, input: &str) -> Result<(String, Value)> {
    let (field_id, raw) = input
        .split_once('=')
        .ok_or_else(|| MediaError::Api(format!("Expected field=value, got '{}'", input)))?;
    let field_id = field_id.trim();
    let field = fields
        .get(field_id)
        .ok_or_else(|| MediaError::Api(format!("Unknown field: {}", field_id)))?;

    let value = match field.field_type {
        FieldType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| MediaError::Api(format!("{} expects a whole number", field.label)))?,
        FieldType::Text | FieldType::Datetime | FieldType::Media => Value::String(raw.to_string()),
    };
    Ok((field_id.to_string(), value))
}

/// Parse a `field:operator:value` filter. Set operators take a
/// comma-separated list.
pub fn parse_filter(input: &str) -> Result<Filter> {
    let mut parts = input.splitn(3, ':');
    let (Some(field), Some(op), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MediaError::InvalidView(format!(
            "Expected field:operator:value, got '{}'",
            input
        )));
    };
    let operator = Operator::from_str(op).map_err(MediaError::InvalidView)?;
    let value = if operator.takes_set() {
        Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )
    } else {
        Value::String(raw.to_string())
    };
    Ok(Filter::new(field.trim(), operator, value))
}

/// Parse `field` or `field:direction`. Direction defaults to ascending.
pub fn parse_sort(input: &str) -> Result<Sort> {
    let (field, direction) = match input.rsplit_once(':') {
        Some((field, dir)) => (
            field,
            SortDirection::from_str(dir).map_err(MediaError::InvalidView)?,
        ),
        None => (input, SortDirection::Asc),
    };
    Ok(Sort::new(field.trim(), direction))
}
