//! The media-library field registry.
//!
//! These are the fields the dashboard shows for attachments: where each one
//! lives in a `/wp/v2/media` record, how it displays, which filters it takes
//! and what counts as a valid edit.

use super::{Element, FieldDescriptor, FieldRegistry, FieldType, FieldValue, Operator};
use crate::model::{Record, User};
use serde_json::{json, Value};

/// Fields that can be edited on several items at once.
pub const BULK_EDIT_FIELDS: &[&str] = &["author", "date"];

/// Fields shown in the edit form, in order.
pub const FORM_FIELDS: &[&str] = &[
    "title.raw",
    "alt_text",
    "caption.raw",
    "description.raw",
    "date",
    "filesize",
    "mime_type",
    "width",
    "height",
];

const TEXT_OPS: &[Operator] = &[
    Operator::Contains,
    Operator::NotContains,
    Operator::Is,
    Operator::IsNot,
];
const NUMERIC_OPS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::IsGreaterThan,
    Operator::IsLessThan,
];
const ENUM_OPS: &[Operator] = &[
    Operator::Is,
    Operator::IsNot,
    Operator::IsAny,
    Operator::IsNone,
];

/// The default media registry. `author` has no elements until users are
/// attached with [`with_authors`].
pub fn media_fields() -> FieldRegistry {
    FieldRegistry::new(vec![
        FieldDescriptor::new("id", "ID", FieldType::Integer)
            .searchable()
            .not_hidable()
            .read_only()
            .filter_by(&[Operator::Is, Operator::IsNot]),
        FieldDescriptor::new("thumbnail", "Thumbnail", FieldType::Media)
            .description(
                "The URL of the image. This is the image that will be displayed in the media library.",
            )
            .not_sortable()
            .read_only()
            .get_value(thumbnail_url),
        FieldDescriptor::new("title.raw", "Title", FieldType::Text)
            .searchable()
            .filter_by(TEXT_OPS)
            .validate(validate_title),
        FieldDescriptor::new("alt_text", "Alternative Text", FieldType::Text)
            .description(
                "Describe the purpose of the image. Leave empty if the image is purely decorative.",
            )
            .searchable()
            .filter_by(TEXT_OPS)
            .validate(validate_alt_text),
        FieldDescriptor::new("caption.raw", "Caption", FieldType::Text)
            .markup()
            .searchable()
            .filter_by(&[Operator::Contains, Operator::NotContains])
            .validate(validate_caption),
        FieldDescriptor::new("description.raw", "Description", FieldType::Text)
            .markup()
            .filter_by(&[Operator::Contains, Operator::NotContains]),
        FieldDescriptor::new("date", "Date", FieldType::Datetime).filter_by(&[
            Operator::Is,
            Operator::IsNot,
            Operator::IsBefore,
            Operator::IsAfter,
        ]),
        FieldDescriptor::new("author", "Author", FieldType::Integer).filter_by(ENUM_OPS),
        FieldDescriptor::new("filesize", "File Size", FieldType::Integer)
            .read_only()
            .get_value(filesize)
            .render(render_file_size)
            .filter_by(NUMERIC_OPS),
        FieldDescriptor::new("mime_type", "Type", FieldType::Text)
            .read_only()
            .elements(mime_elements())
            .filter_by(ENUM_OPS),
        FieldDescriptor::new("width", "Width", FieldType::Integer)
            .read_only()
            .get_value(width)
            .render(render_pixels)
            .filter_by(NUMERIC_OPS),
        FieldDescriptor::new("height", "Height", FieldType::Integer)
            .read_only()
            .get_value(height)
            .render(render_pixels)
            .filter_by(NUMERIC_OPS),
    ])
}

/// Attach the site's users as `author` elements.
pub fn with_authors(mut registry: FieldRegistry, users: &[User]) -> FieldRegistry {
    if let Some(author) = registry.get_mut("author") {
        author.elements = users
            .iter()
            .map(|u| Element::new(u.id, u.label()))
            .collect();
    }
    registry
}

fn mime_elements() -> Vec<Element> {
    vec![
        Element::new("image/jpeg", "JPEG"),
        Element::new("image/png", "PNG"),
        Element::new("image/gif", "GIF"),
        Element::new("image/webp", "WebP"),
        Element::new("image/svg+xml", "SVG"),
        Element::new("video/mp4", "MP4 Video"),
        Element::new("application/pdf", "PDF"),
        Element::new("application/zip", "ZIP"),
    ]
}

fn thumbnail_url(record: &Record) -> Option<Value> {
    record
        .get_path("media_details.sizes.thumbnail.source_url")
        .or_else(|| record.get_path("source_url"))
        .cloned()
}

fn detail_or_zero(record: &Record, path: &str) -> Option<Value> {
    Some(
        record
            .get_path(path)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| json!(0)),
    )
}

fn filesize(record: &Record) -> Option<Value> {
    detail_or_zero(record, "media_details.filesize")
}

fn width(record: &Record) -> Option<Value> {
    detail_or_zero(record, "media_details.width")
}

fn height(record: &Record) -> Option<Value> {
    detail_or_zero(record, "media_details.height")
}

fn render_file_size(value: &FieldValue) -> String {
    let bytes = value.as_f64().unwrap_or(0.0).max(0.0) as u64;
    format_file_size(bytes)
}

fn render_pixels(value: &FieldValue) -> String {
    match value.as_f64() {
        Some(px) if px > 0.0 => format!("{}px", px),
        _ => "-".to_string(),
    }
}

/// Human-readable byte size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
///
/// Values are rounded to two decimals and trailing zeros dropped. Sizes past
/// the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut size = bytes as f64;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

fn text_of(value: &FieldValue) -> String {
    value.search_text().unwrap_or_default()
}

/// Title: required, 3 to 100 characters, no angle brackets.
pub fn validate_title(value: &FieldValue) -> Result<(), String> {
    let text = text_of(value);
    let len = text.chars().count();
    if text.trim().is_empty() {
        return Err("Title is required".into());
    }
    if len < 3 {
        return Err("Title must be at least 3 characters long".into());
    }
    if len > 100 {
        return Err("Title must be less than 100 characters".into());
    }
    if text.contains('<') || text.contains('>') {
        return Err("Title cannot contain < or > characters".into());
    }
    Ok(())
}

/// Alt text: required, at most 125 characters.
pub fn validate_alt_text(value: &FieldValue) -> Result<(), String> {
    let text = text_of(value);
    if text.trim().is_empty() {
        return Err("Alt text is required for accessibility".into());
    }
    if text.chars().count() > 125 {
        return Err(
            "Alt text should be less than 125 characters for optimal accessibility".into(),
        );
    }
    Ok(())
}

/// Caption: optional, at most 200 characters.
pub fn validate_caption(value: &FieldValue) -> Result<(), String> {
    if text_of(value).chars().count() > 200 {
        return Err("Caption should be less than 200 characters".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn registry_has_expected_fields() {
        let reg = media_fields();
        for id in [
            "id",
            "thumbnail",
            "title.raw",
            "alt_text",
            "caption.raw",
            "description.raw",
            "date",
            "author",
            "filesize",
            "mime_type",
            "width",
            "height",
        ] {
            assert!(reg.get(id).is_some(), "missing field {id}");
        }
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn title_can_be_hidden_but_id_cannot() {
        let reg = media_fields();
        let shown = vec!["alt_text".to_string()];
        let ids: Vec<&str> = reg.visible(&shown).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "alt_text"]);
    }

    #[test]
    fn thumbnail_falls_back_to_source_url() {
        let reg = media_fields();
        let thumb = reg.get("thumbnail").unwrap();
        let sized = record(json!({
            "source_url": "https://example.test/full.png",
            "media_details": {"sizes": {"thumbnail": {"source_url": "https://example.test/thumb.png"}}}
        }));
        let bare = record(json!({"source_url": "https://example.test/full.png"}));

        assert_eq!(
            thumb.value(&sized),
            FieldValue::Text("https://example.test/thumb.png".into())
        );
        assert_eq!(
            thumb.value(&bare),
            FieldValue::Text("https://example.test/full.png".into())
        );
        assert!(!thumb.enable_sorting);
    }

    #[test]
    fn dimensions_default_to_zero() {
        let reg = media_fields();
        let r = record(json!({"media_details": {"width": 640}}));
        assert_eq!(reg.get("width").unwrap().value(&r), FieldValue::Integer(640));
        assert_eq!(reg.get("height").unwrap().value(&r), FieldValue::Integer(0));
        assert_eq!(reg.get("filesize").unwrap().value(&r), FieldValue::Integer(0));
    }

    #[test]
    fn dimensions_render_pixels_or_dash() {
        let reg = media_fields();
        let r = record(json!({"media_details": {"width": 640}}));
        assert_eq!(reg.get("width").unwrap().display(&r), "640px");
        assert_eq!(reg.get("height").unwrap().display(&r), "-");
    }

    #[test]
    fn file_size_formatting() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn mime_type_renders_element_label() {
        let reg = media_fields();
        let r = record(json!({"mime_type": "image/jpeg"}));
        assert_eq!(reg.get("mime_type").unwrap().display(&r), "JPEG");
    }

    #[test]
    fn date_renders_short_month() {
        let reg = media_fields();
        let r = record(json!({"date": "2024-03-05T10:00:00"}));
        assert_eq!(reg.get("date").unwrap().display(&r), "Mar 5, 2024");
    }

    #[test]
    fn authors_become_elements() {
        let users = vec![
            User { id: 1, name: "Ada".into(), slug: "ada".into() },
            User { id: 2, name: "".into(), slug: "grace".into() },
        ];
        let reg = with_authors(media_fields(), &users);
        let author = reg.get("author").unwrap();
        assert_eq!(author.elements.len(), 2);
        assert_eq!(author.display(&record(json!({"author": 2}))), "grace");
    }

    #[test]
    fn title_validation() {
        assert!(validate_title(&FieldValue::Text("Sunset".into())).is_ok());
        assert_eq!(
            validate_title(&FieldValue::Text("  ".into())).unwrap_err(),
            "Title is required"
        );
        assert!(validate_title(&FieldValue::Text("ab".into())).is_err());
        assert!(validate_title(&FieldValue::Text("a".repeat(101))).is_err());
        assert!(validate_title(&FieldValue::Text("<script>".into())).is_err());
        assert!(validate_title(&FieldValue::Null).is_err());
    }

    #[test]
    fn alt_text_validation() {
        assert!(validate_alt_text(&FieldValue::Text("A red boat".into())).is_ok());
        assert!(validate_alt_text(&FieldValue::Text("".into())).is_err());
        assert!(validate_alt_text(&FieldValue::Text("x".repeat(126))).is_err());
    }

    #[test]
    fn caption_validation() {
        assert!(validate_caption(&FieldValue::Null).is_ok());
        assert!(validate_caption(&FieldValue::Text("x".repeat(200))).is_ok());
        assert!(validate_caption(&FieldValue::Text("x".repeat(201))).is_err());
    }
}
