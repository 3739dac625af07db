use mediaview::fields::{media_fields, FieldRegistry, Filter, Operator};
use mediaview::model::Record;
use mediaview::view::{process, PaginationInfo, PerPage, SortDirection, ViewSpec};
use serde_json::json;

const MIMES: [&str; 4] = ["image/png", "image/jpeg", "application/pdf", "video/mp4"];

fn item(id: u64, title: &str, mime: &str, date: &str, size: u64) -> Record {
    Record::try_from(json!({
        "id": id,
        "date": date,
        "title": {"raw": title, "rendered": title},
        "alt_text": "",
        "caption": {"raw": "", "rendered": ""},
        "mime_type": mime,
        "media_details": {"filesize": size}
    }))
    .unwrap()
}

/// A deterministic, unordered library with plenty of equal sort keys.
fn library(n: u64) -> Vec<Record> {
    let mut seed: u64 = 0x2545_f491;
    (1..=n)
        .map(|id| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let day = (seed >> 33) % 6 + 1;
            let mime = MIMES[((seed >> 40) % 4) as usize];
            let size = ((seed >> 20) % 5) * 1000;
            item(
                id,
                &format!("Item {}", id % 7),
                mime,
                &format!("2024-02-0{}T12:00:00", day),
                size,
            )
        })
        .collect()
}

fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().filter_map(Record::id).collect()
}

fn everything(view: ViewSpec) -> ViewSpec {
    ViewSpec {
        page: 1,
        per_page: PerPage::All,
        ..view
    }
}

fn fields() -> FieldRegistry {
    media_fields()
}

#[test]
fn second_page_of_newest_first() {
    // 25 items over 5 days, handed over in no particular order
    let mut records = Vec::new();
    for i in 0..25u64 {
        let day = i % 5 + 1;
        let hour = i / 5;
        records.push(item(
            i + 1,
            &format!("Photo {}", i + 1),
            "image/jpeg",
            &format!("2024-03-0{}T{:02}:00:00", day, hour),
            1000,
        ));
    }

    let view = ViewSpec::default()
        .sorted_by("date", SortDirection::Desc)
        .paged(2, PerPage::count(10).unwrap());
    let result = process(&records, &view, &fields());

    let mut by_date: Vec<(String, u64)> = records
        .iter()
        .map(|r| (r.get_path("date").unwrap().as_str().unwrap().to_string(), r.id().unwrap()))
        .collect();
    by_date.sort_by(|a, b| b.0.cmp(&a.0));
    let expected: Vec<u64> = by_date[10..20].iter().map(|(_, id)| *id).collect();

    assert_eq!(result.data.len(), 10);
    assert_eq!(ids(&result.data), expected);
    assert_eq!(
        result.pagination_info,
        PaginationInfo {
            total_items: 25,
            total_pages: 3
        }
    );
}

#[test]
fn is_any_keeps_only_listed_types() {
    let records = library(40);
    let view = everything(
        ViewSpec::default().with_filter(Filter::is_any("mime_type", vec!["image/png", "image/jpeg"])),
    );
    let result = process(&records, &view, &fields());

    let expected = records
        .iter()
        .filter(|r| {
            let mime = r.get_path("mime_type").unwrap();
            mime == "image/png" || mime == "image/jpeg"
        })
        .count();
    assert!(expected > 0 && expected < records.len());
    assert_eq!(result.pagination_info.total_items, expected);
    assert!(result.data.iter().all(|r| {
        let mime = r.get_path("mime_type").unwrap();
        mime == "image/png" || mime == "image/jpeg"
    }));
}

#[test]
fn search_ignores_text_that_only_exists_in_markup() {
    let mut beach = item(1, "Sunset Beach", "image/jpeg", "2024-01-01T00:00:00", 1);
    beach.set_path("caption.raw", json!(""));
    let mut harbor = item(2, "Harbor", "image/jpeg", "2024-01-02T00:00:00", 1);
    harbor.set_path(
        "caption.raw",
        json!("<span class=\"sunset\"><b>Harbor at dusk</b></span>"),
    );
    let mut bay = item(3, "Bay", "image/jpeg", "2024-01-03T00:00:00", 1);
    bay.set_path("caption.raw", json!("<b>Sunset</b> over the bay"));

    let view = everything(ViewSpec::default().with_search("sunset"));
    let result = process(&[beach, harbor, bay], &view, &fields());
    assert_eq!(ids(&result.data), vec![1, 3]);
}

#[test]
fn search_sees_words_split_by_inline_tags() {
    let mut bay = item(1, "Bay", "image/jpeg", "2024-01-01T00:00:00", 1);
    bay.set_path("caption.raw", json!("<b>Sun</b>set over the bay"));
    let harbor = item(2, "Harbor", "image/jpeg", "2024-01-02T00:00:00", 1);

    let view = everything(ViewSpec::default().with_search("sunset"));
    let result = process(&[bay, harbor], &view, &fields());
    assert_eq!(ids(&result.data), vec![1]);
}

#[test]
fn search_term_is_trimmed() {
    let records = vec![
        item(1, "Sunset Beach", "image/jpeg", "2024-01-01T00:00:00", 1),
        item(2, "Harbor", "image/jpeg", "2024-01-02T00:00:00", 1),
    ];
    let view = everything(ViewSpec::default().with_search("  sunset "));
    assert_eq!(ids(&process(&records, &view, &fields()).data), vec![1]);

    let blank = everything(ViewSpec::default().with_search("   "));
    assert_eq!(ids(&process(&records, &blank, &fields()).data), vec![1, 2]);
}

#[test]
fn processing_is_idempotent() {
    let records = library(60);
    let view = ViewSpec::default()
        .with_search("item")
        .with_filter(Filter::new("filesize", Operator::IsGreaterThan, 0))
        .sorted_by("date", SortDirection::Desc)
        .paged(2, PerPage::count(7).unwrap());

    let first = process(&records, &view, &fields());
    let second = process(&records, &view, &fields());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn sorting_is_stable() {
    let records = library(80);
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let view = everything(ViewSpec::default().sorted_by("date", direction));
        let sorted = process(&records, &view, &fields()).data;

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.get_path("date") == b.get_path("date") {
                assert!(
                    a.id() < b.id(),
                    "equal dates reordered: {:?} before {:?}",
                    a.id(),
                    b.id()
                );
            }
        }
    }
}

#[test]
fn resorting_sorted_output_changes_nothing() {
    let records = library(50);
    let view = everything(ViewSpec::default().sorted_by("title.raw", SortDirection::Asc));
    let once = process(&records, &view, &fields()).data;
    let twice = process(&once, &view, &fields()).data;
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn pages_concatenate_to_the_full_result() {
    let records = library(53);
    let base = ViewSpec::default()
        .with_filter(Filter::new("mime_type", Operator::IsNot, "video/mp4"))
        .sorted_by("filesize", SortDirection::Desc);
    let full = process(&records, &everything(base.clone()), &fields()).data;

    for size in [1, 4, 10, 53, 100] {
        let per_page = PerPage::count(size).unwrap();
        let first = process(&records, &base.clone().paged(1, per_page), &fields());
        let total_pages = first.pagination_info.total_pages;
        assert_eq!(total_pages, full.len().div_ceil(size));

        let mut collected = Vec::new();
        for page in 1..=total_pages {
            collected.extend(process(&records, &base.clone().paged(page, per_page), &fields()).data);
        }
        assert_eq!(ids(&collected), ids(&full), "per_page {size}");

        let past_end = process(&records, &base.clone().paged(total_pages + 1, per_page), &fields());
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.pagination_info.total_items, full.len());
    }
}

#[test]
fn filters_combine_as_intersection() {
    let records = library(70);
    let f1 = Filter::is_any("mime_type", vec!["image/png", "application/pdf"]);
    let f2 = Filter::new("date", Operator::IsAfter, "2024-02-03");

    let only = |filters: Vec<Filter>| {
        let view = everything(ViewSpec {
            filters,
            ..ViewSpec::default()
        });
        ids(&process(&records, &view, &fields()).data)
    };

    let a = only(vec![f1.clone()]);
    let b = only(vec![f2.clone()]);
    let both = only(vec![f1, f2]);
    let intersection: Vec<u64> = a.iter().copied().filter(|id| b.contains(id)).collect();
    assert_eq!(both, intersection);
}

#[test]
fn empty_input_gives_empty_page_and_zero_pages() {
    let views = [
        ViewSpec::default(),
        everything(ViewSpec::default()),
        ViewSpec::default()
            .with_search("anything")
            .sorted_by("date", SortDirection::Desc)
            .paged(3, PerPage::count(5).unwrap()),
    ];
    for view in views {
        let result = process(&[], &view, &fields());
        assert!(result.data.is_empty());
        assert_eq!(
            result.pagination_info,
            PaginationInfo {
                total_items: 0,
                total_pages: 0
            }
        );
    }
}

#[test]
fn malformed_view_parts_degrade() {
    let records = library(12);
    let view: ViewSpec = serde_json::from_value(json!({
        "search": "",
        "filters": [
            {"field": "nonexistent", "operator": "is", "value": "x"},
            {"field": "mime_type", "operator": "isBetween", "value": ["a", "b"]},
            {"field": "title.raw", "operator": "isAny", "value": ["Item 1"]}
        ],
        "sort": {"field": "thumbnail", "direction": "asc"},
        "page": 1,
        "perPage": -1
    }))
    .unwrap();

    let result = process(&records, &view, &fields());
    assert_eq!(ids(&result.data), ids(&records));
    assert_eq!(result.pagination_info.total_pages, 1);
}
