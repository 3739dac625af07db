//! # Media Sources
//!
//! The media library itself lives elsewhere: on a WordPress site behind its
//! REST API, or in an exported JSON file. [`MediaSource`] is the narrow
//! interface the rest of the crate consumes: list, fetch one, save partial
//! changes, list users.
//!
//! ## Implementations
//!
//! - [`fs::JsonFileSource`]: a JSON export on disk
//!   - either a bare array of `/wp/v2/media` records, or
//!     `{ "media": [...], "users": [...] }`
//!   - saves are deep-merged into the stored record and the file is rewritten
//!     through a temporary file and a rename
//!
//! - [`memory::InMemorySource`]: in-memory records for testing
//!   - can be told to fail writes, to exercise save-error paths
//!
//! Listing returns records in stored order; this is the "as returned by the
//! upstream listing" order views start from.

use crate::error::Result;
use crate::model::{Record, RecordId, User};

pub mod fs;
pub mod memory;

/// Listing parameters, mirroring `?per_page=100&search=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// `None` lists everything.
    pub per_page: Option<usize>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_page(mut self, n: usize) -> Self {
        self.per_page = Some(n);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    /// Narrow `records` the way the listing endpoint would.
    pub fn apply<'a, I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let limit = self.per_page.unwrap_or(usize::MAX);
        records
            .into_iter()
            .filter(|r| match &self.search {
                Some(term) => r.contains_text(term),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Abstract interface to a media library.
pub trait MediaSource {
    /// List media records, in the source's own order.
    fn list_records(&self, query: &ListQuery) -> Result<Vec<Record>>;

    /// Fetch one record by id.
    fn get_record(&self, id: RecordId) -> Result<Record>;

    /// Apply partial changes to a record and return the stored result.
    fn save_record(&mut self, id: RecordId, changes: &Record) -> Result<Record>;

    /// Users that can appear as authors.
    fn list_users(&self) -> Result<Vec<User>>;
}

/// Merge `changes` into `record`, keeping its id.
pub(crate) fn apply_changes(record: &mut Record, changes: &Record) {
    let id = record.get_path("id").cloned();
    record.merge(changes);
    if let Some(id) = id {
        record.set_path("id", id);
    }
}
