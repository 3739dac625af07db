//! Terminal rendering. Every function returns a `String` so output can be
//! tested without a terminal; `commands.rs` does the printing.

use super::styles::{paint, DIM, ERROR, HEADER, ID, INFO, LABEL, SUCCESS, WARNING};
use mediaview::commands::bulk::BulkValue;
use mediaview::commands::{CmdMessage, MessageLevel};
use mediaview::config::MediaViewConfig;
use mediaview::fields::{FieldDescriptor, FieldRegistry, FieldValue};
use mediaview::model::Record;
use mediaview::view::{PaginationInfo, PerPage};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_COLUMN_WIDTH: usize = 36;
const COLUMN_GAP: &str = "  ";

pub(super) fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &*INFO,
            MessageLevel::Success => &*SUCCESS,
            MessageLevel::Warning => &*WARNING,
            MessageLevel::Error => &*ERROR,
        };
        out.push_str(&paint(style, &message.content, color));
        out.push('\n');
    }
    out
}

/// One row per record, one column per field.
pub(super) fn render_table(
    records: &[Record],
    columns: &[&FieldDescriptor],
    color: bool,
) -> String {
    if records.is_empty() {
        return "No media items found.\n".to_string();
    }

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|f| truncate_to_width(&single_line(&f.display(r)), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, f)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(f.label.width().min(MAX_COLUMN_WIDTH)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(f, w)| {
            let label = truncate_to_width(&f.label, MAX_COLUMN_WIDTH);
            pad(&paint(&HEADER, &label, color), label.width(), *w)
        })
        .collect();
    out.push_str(header.join(COLUMN_GAP).trim_end());
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, f), w)| {
                let styled = if f.id == "id" {
                    paint(&ID, cell, color)
                } else {
                    cell.clone()
                };
                pad(&styled, cell.width(), *w)
            })
            .collect();
        out.push_str(line.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }
    out
}

pub(super) fn render_pagination(
    info: &PaginationInfo,
    page: usize,
    per_page: PerPage,
    color: bool,
) -> String {
    let items = if info.total_items == 1 { "item" } else { "items" };
    let text = format!(
        "Page {} of {} · {} {} · {} per page",
        page, info.total_pages, info.total_items, items, per_page
    );
    format!("{}\n", paint(&DIM, &text, color))
}

/// Every field of one record as `Label  value` lines.
pub(super) fn render_record(record: &Record, fields: &FieldRegistry, color: bool) -> String {
    let width = fields.iter().map(|f| f.label.width()).max().unwrap_or(0);
    let mut out = String::new();
    for field in fields.iter() {
        let value = field.display(record);
        let shown = if value.is_empty() { "-".to_string() } else { value };
        out.push_str(&pad(&paint(&LABEL, &field.label, color), field.label.width(), width));
        out.push_str(COLUMN_GAP);
        out.push_str(&shown);
        out.push('\n');
    }
    out
}

/// The field registry: what can be sorted, searched, hidden, filtered.
pub(super) fn render_fields(fields: &FieldRegistry, color: bool) -> String {
    let id_width = fields.iter().map(|f| f.id.width()).max().unwrap_or(0);
    let label_width = fields.iter().map(|f| f.label.width()).max().unwrap_or(0);
    let mut out = String::new();
    for field in fields.iter() {
        let mut flags = Vec::new();
        if field.enable_sorting {
            flags.push("sort");
        }
        if field.enable_global_search {
            flags.push("search");
        }
        if !field.enable_hiding {
            flags.push("always shown");
        }
        if field.read_only {
            flags.push("read-only");
        }
        let operators: Vec<&str> = field.operators.iter().map(|op| op.as_str()).collect();

        out.push_str(&pad(&paint(&ID, &field.id, color), field.id.width(), id_width));
        out.push_str(COLUMN_GAP);
        out.push_str(&pad(&field.label, field.label.width(), label_width));
        out.push_str(COLUMN_GAP);
        out.push_str(&format!("{:<8}", format!("{:?}", field.field_type).to_lowercase()));
        out.push_str(&paint(&DIM, &flags.join(", "), color));
        if !operators.is_empty() {
            out.push_str(&format!("  [{}]", operators.join(" ")));
        }
        out.push('\n');
    }
    out
}

/// The bulk form: each bulk-editable field with its shared value.
pub(super) fn render_bulk_form(
    form: &[(String, BulkValue)],
    fields: &FieldRegistry,
    color: bool,
) -> String {
    let mut out = String::new();
    for (id, value) in form {
        let Some(field) = fields.get(id) else {
            continue;
        };
        let shown = match value {
            BulkValue::Mixed => paint(&DIM, "(mixed)", color),
            BulkValue::Common(raw) => {
                let typed = field.coerce(raw);
                match field.element_label(&typed) {
                    Some(label) => label.to_string(),
                    None if typed == FieldValue::Null => "-".to_string(),
                    None => mediaview::fields::default_render(&typed),
                }
            }
        };
        out.push_str(&format!("{}: {}\n", paint(&LABEL, &field.label, color), shown));
    }
    out
}

pub(super) fn render_config(config: &MediaViewConfig) -> String {
    let media_file = config
        .media_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    format!(
        "media_file = {}\nper_page = {}\nsort_field = {}\nsort_direction = {}\nfetch_per_page = {}\nvisible_fields = {}\n",
        media_file,
        config.per_page,
        config.sort_field,
        config.sort_direction,
        config.fetch_per_page,
        config.visible_fields.join(", ")
    )
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Right-pad `styled` (whose visible width is `visible`) to `width` columns.
fn pad(styled: &str, visible: usize, width: usize) -> String {
    format!("{}{}", styled, " ".repeat(width.saturating_sub(visible)))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}
