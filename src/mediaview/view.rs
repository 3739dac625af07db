//! # Views
//!
//! A [`ViewSpec`] is the declarative state of a media listing: search term,
//! filters, sort, page and page size. [`process`] applies it to a snapshot of
//! records and returns the visible page plus pagination totals.
//!
//! Processing runs in a fixed order:
//!
//! 1. global search over the searchable fields
//! 2. filters, all of which must pass
//! 3. stable sort on one field
//! 4. slicing out the requested page
//!
//! The function holds no state and never fails. Parts of a view that make no
//! sense for the given registry (an unknown field, an operator a field does not
//! declare, a page past the end) are ignored or produce an empty page.

use crate::fields::{FieldDescriptor, FieldRegistry, FieldValue, Filter, ResolvedFilter};
use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use tracing::{debug, trace};

pub const DEFAULT_PER_PAGE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    /// Empty means "keep input order".
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Page size: a positive count, or every survivor on a single page.
///
/// JSON accepts a positive integer, `-1` or `"all"`. Zero is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PerPageRepr", into = "PerPageRepr")]
pub enum PerPage {
    Count(NonZeroUsize),
    All,
}

impl PerPage {
    pub fn count(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(PerPage::Count)
    }
}

impl Default for PerPage {
    fn default() -> Self {
        PerPage::count(DEFAULT_PER_PAGE).unwrap_or(PerPage::All)
    }
}

impl FromStr for PerPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PerPage::All);
        }
        let n: i64 = s
            .parse()
            .map_err(|_| format!("invalid page size '{}' (expected a number or 'all')", s))?;
        PerPage::try_from(PerPageRepr::Number(n))
    }
}

impl fmt::Display for PerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerPage::Count(n) => write!(f, "{}", n),
            PerPage::All => f.write_str("all"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PerPageRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<PerPageRepr> for PerPage {
    type Error = String;

    fn try_from(repr: PerPageRepr) -> Result<Self, Self::Error> {
        match repr {
            PerPageRepr::Number(-1) => Ok(PerPage::All),
            PerPageRepr::Number(n) if n > 0 => usize::try_from(n)
                .ok()
                .and_then(PerPage::count)
                .ok_or_else(|| format!("page size {} is too large", n)),
            PerPageRepr::Number(n) => Err(format!("page size must be positive, got {}", n)),
            PerPageRepr::Text(s) if s.eq_ignore_ascii_case("all") => Ok(PerPage::All),
            PerPageRepr::Text(s) => Err(format!("invalid page size '{}'", s)),
        }
    }
}

impl From<PerPage> for PerPageRepr {
    fn from(per_page: PerPage) -> Self {
        match per_page {
            PerPage::Count(n) => PerPageRepr::Number(n.get() as i64),
            PerPage::All => PerPageRepr::Text("all".to_string()),
        }
    }
}

fn default_page() -> usize {
    1
}

/// Declarative listing state, in the JSON shape DataViews stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    /// 1-based
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub per_page: PerPage,
    /// Visible field ids; only used for display.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Default for ViewSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            sort: None,
            page: default_page(),
            per_page: PerPage::default(),
            fields: Vec::new(),
        }
    }
}

impl ViewSpec {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(Sort::new(field, direction));
        self
    }

    pub fn paged(mut self, page: usize, per_page: PerPage) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    pub data: Vec<Record>,
    pub pagination_info: PaginationInfo,
}

/// Apply `view` to `records`.
pub fn process(records: &[Record], view: &ViewSpec, fields: &FieldRegistry) -> ViewResult {
    let needle = view.search.trim().to_lowercase();
    let searchable: Vec<&FieldDescriptor> = fields.searchable().collect();
    let filters = resolve_filters(&view.filters, fields);

    let mut survivors: Vec<&Record> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(r, &needle, &searchable))
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .collect();

    if let Some(sort) = &view.sort {
        sort_records(&mut survivors, sort, fields);
    }

    let total_items = survivors.len();
    let total_pages = match view.per_page {
        PerPage::Count(n) => total_items.div_ceil(n.get()),
        PerPage::All if total_items == 0 => 0,
        PerPage::All => 1,
    };
    let data: Vec<Record> = page_slice(&survivors, view.page, view.per_page)
        .iter()
        .map(|r| (*r).clone())
        .collect();

    trace!(
        input = records.len(),
        survivors = total_items,
        page = view.page,
        returned = data.len(),
        "processed view"
    );

    ViewResult {
        data,
        pagination_info: PaginationInfo {
            total_items,
            total_pages,
        },
    }
}

fn resolve_filters<'a>(filters: &[Filter], fields: &'a FieldRegistry) -> Vec<ResolvedFilter<'a>> {
    filters
        .iter()
        .filter_map(|filter| match filter.resolve(fields) {
            Ok(resolved) => Some(resolved),
            Err(reason) => {
                debug!(
                    field = %filter.field,
                    operator = %filter.operator,
                    ?reason,
                    "skipping filter"
                );
                None
            }
        })
        .collect()
}

fn matches_search(record: &Record, needle: &str, searchable: &[&FieldDescriptor]) -> bool {
    searchable.iter().any(|field| {
        field
            .value(record)
            .search_text()
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

fn sort_records(records: &mut Vec<&Record>, sort: &Sort, fields: &FieldRegistry) {
    if sort.field.is_empty() {
        return;
    }
    let Some(field) = fields.get(&sort.field).filter(|f| f.enable_sorting) else {
        debug!(field = %sort.field, "skipping sort on unknown or unsortable field");
        return;
    };

    let mut keyed: Vec<(FieldValue, &Record)> = records
        .iter()
        .map(|r| (sort_key(field, r), *r))
        .collect();

    // `sort_by` is stable; reversing the comparator keeps ties in input order.
    match sort.direction {
        SortDirection::Asc => keyed.sort_by(|a, b| a.0.sort_cmp(&b.0)),
        SortDirection::Desc => keyed.sort_by(|a, b| b.0.sort_cmp(&a.0)),
    }

    *records = keyed.into_iter().map(|(_, r)| r).collect();
}

fn sort_key(field: &FieldDescriptor, record: &Record) -> FieldValue {
    match field.value(record) {
        FieldValue::Text(s) if field.sort_case_insensitive => FieldValue::Text(s.to_lowercase()),
        other => other,
    }
}

fn page_slice<'r, 'a>(items: &'r [&'a Record], page: usize, per_page: PerPage) -> &'r [&'a Record] {
    if page == 0 {
        return &[];
    }
    match per_page {
        PerPage::All if page == 1 => items,
        PerPage::All => &[],
        PerPage::Count(n) => {
            let n = n.get();
            let start = (page - 1).saturating_mul(n);
            if start >= items.len() {
                return &[];
            }
            let end = start.saturating_add(n).min(items.len());
            &items[start..end]
        }
    }
}
