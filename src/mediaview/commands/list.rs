use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fields::FieldRegistry;
use crate::source::{ListQuery, MediaSource};
use crate::view::{self, ViewSpec};
use tracing::debug;

/// Fetch a batch from the source and run the view over it.
///
/// Search, filters, sort and pagination all happen client-side on the fetched
/// batch, so `query.per_page` bounds what the view can ever see.
pub fn run<S: MediaSource>(
    source: &S,
    fields: &FieldRegistry,
    view: &ViewSpec,
    query: &ListQuery,
) -> Result<CmdResult> {
    let records = source.list_records(query)?;
    debug!(fetched = records.len(), "listing media");

    let processed = view::process(&records, view, fields);
    let info = processed.pagination_info;

    let mut result = CmdResult::default()
        .with_listed(processed.data)
        .with_pagination(info);

    if matches!(query.per_page, Some(limit) if records.len() >= limit) {
        result.add_message(CmdMessage::warning(format!(
            "Only the first {} media items were fetched; results may be incomplete",
            records.len()
        )));
    }
    if result.listed.is_empty() && info.total_items > 0 {
        result.add_message(CmdMessage::info(format!(
            "Page {} is out of range ({} page(s) available)",
            view.page, info.total_pages
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::fields::{media_fields, Filter};
    use crate::model::Record;
    use crate::source::memory::fixtures::SourceFixture;
    use crate::view::{PerPage, SortDirection};

    fn ids(result: &CmdResult) -> Vec<u64> {
        result.listed.iter().filter_map(Record::id).collect()
    }

    #[test]
    fn lists_sorted_page() {
        let source = SourceFixture::new().with_images(5).source;
        let view = ViewSpec::default()
            .sorted_by("date", SortDirection::Asc)
            .paged(1, PerPage::count(2).unwrap());
        let result = run(&source, &media_fields(), &view, &ListQuery::new()).unwrap();

        assert_eq!(ids(&result), vec![1, 2]);
        let info = result.pagination.unwrap();
        assert_eq!(info.total_items, 5);
        assert_eq!(info.total_pages, 3);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn filters_by_mime_type() {
        let source = SourceFixture::new()
            .with_media(1, "Photo", "image/png", "2024-01-01T00:00:00")
            .with_media(2, "Manual", "application/pdf", "2024-01-02T00:00:00")
            .source;
        let view = ViewSpec::default().with_filter(Filter::is_any("mime_type", vec!["image/png"]));
        let result = run(&source, &media_fields(), &view, &ListQuery::new()).unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn warns_when_fetch_limit_is_hit() {
        let source = SourceFixture::new().with_images(5).source;
        let result = run(
            &source,
            &media_fields(),
            &ViewSpec::default(),
            &ListQuery::new().per_page(3),
        )
        .unwrap();
        assert_eq!(result.listed.len(), 3);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn reports_out_of_range_page() {
        let source = SourceFixture::new().with_images(3).source;
        let view = ViewSpec::default().paged(4, PerPage::count(2).unwrap());
        let result = run(&source, &media_fields(), &view, &ListQuery::new()).unwrap();
        assert!(result.listed.is_empty());
        assert_eq!(result.pagination.unwrap().total_items, 3);
        assert_eq!(result.messages[0].level, MessageLevel::Info);
    }
}
