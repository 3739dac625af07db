use super::{apply_changes, ListQuery, MediaSource};
use crate::error::{MediaError, Result};
use crate::model::{Record, RecordId, User};

/// In-memory media library for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: Vec<Record>,
    users: Vec<User>,
    fail_writes: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Make every subsequent save fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl MediaSource for InMemorySource {
    fn list_records(&self, query: &ListQuery) -> Result<Vec<Record>> {
        Ok(query.apply(&self.records))
    }

    fn get_record(&self, id: RecordId) -> Result<Record> {
        self.records
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or(MediaError::RecordNotFound(id))
    }

    fn save_record(&mut self, id: RecordId, changes: &Record) -> Result<Record> {
        if self.fail_writes {
            return Err(MediaError::Source(format!(
                "could not save media item {}: write rejected",
                id
            )));
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or(MediaError::RecordNotFound(id))?;
        apply_changes(record, changes);
        Ok(record.clone())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::json;

    /// A record shaped like a `/wp/v2/media` item.
    pub fn media(id: RecordId, title: &str, mime: &str, date: &str) -> Record {
        Record::try_from(json!({
            "id": id,
            "date": date,
            "author": 1,
            "title": {"raw": title, "rendered": title},
            "alt_text": format!("{} alt", title),
            "caption": {"raw": "", "rendered": ""},
            "description": {"raw": "", "rendered": ""},
            "mime_type": mime,
            "source_url": format!("https://example.test/uploads/{}.jpg", id),
            "media_details": {
                "filesize": 1024 * id,
                "width": 800,
                "height": 600,
                "sizes": {
                    "thumbnail": {"source_url": format!("https://example.test/uploads/{}-150x150.jpg", id)}
                }
            }
        }))
        .unwrap_or_default()
    }

    pub struct SourceFixture {
        pub source: InMemorySource,
    }

    impl Default for SourceFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SourceFixture {
        pub fn new() -> Self {
            Self {
                source: InMemorySource::new(),
            }
        }

        /// `count` JPEGs, one per day starting 2024-01-01, newest first.
        pub fn with_images(mut self, count: u64) -> Self {
            for i in (1..=count).rev() {
                let date = format!("2024-01-{:02}T10:00:00", i.min(28));
                self.source
                    .insert(media(i, &format!("Image {}", i), "image/jpeg", &date));
            }
            self
        }

        pub fn with_media(mut self, id: RecordId, title: &str, mime: &str, date: &str) -> Self {
            self.source.insert(media(id, title, mime, date));
            self
        }

        pub fn with_user(mut self, id: u64, name: &str) -> Self {
            self.source.add_user(User {
                id,
                name: name.to_string(),
                slug: name.to_lowercase(),
            });
            self
        }

        pub fn failing_writes(mut self) -> Self {
            self.source.set_fail_writes(true);
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{media, SourceFixture};
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_in_insertion_order() {
        let source = SourceFixture::new().with_images(3).source;
        let ids: Vec<_> = source
            .list_records(&ListQuery::new())
            .unwrap()
            .iter()
            .filter_map(Record::id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn get_missing_record_fails() {
        let source = InMemorySource::new();
        assert!(matches!(
            source.get_record(7),
            Err(MediaError::RecordNotFound(7))
        ));
    }

    #[test]
    fn save_merges_changes() {
        let mut source = InMemorySource::with_records(vec![media(1, "Old", "image/png", "2024-01-01")]);
        let changes = Record::try_from(json!({"title": {"raw": "New"}})).unwrap();
        let saved = source.save_record(1, &changes).unwrap();

        assert_eq!(saved.get_path("title.raw"), Some(&json!("New")));
        assert_eq!(saved.get_path("title.rendered"), Some(&json!("Old")));
        assert_eq!(source.get_record(1).unwrap(), saved);
    }

    #[test]
    fn failing_writes_leave_records_untouched() {
        let mut source = SourceFixture::new().with_images(1).failing_writes().source;
        let changes = Record::try_from(json!({"alt_text": "changed"})).unwrap();
        assert!(matches!(
            source.save_record(1, &changes),
            Err(MediaError::Source(_))
        ));
        assert_eq!(
            source.get_record(1).unwrap().get_path("alt_text"),
            Some(&json!("Image 1 alt"))
        );
    }

    #[test]
    fn users_are_listed() {
        let source = SourceFixture::new().with_user(1, "Ada").source;
        assert_eq!(source.list_users().unwrap()[0].slug, "ada");
    }
}
