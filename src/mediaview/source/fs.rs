use super::{apply_changes, ListQuery, MediaSource};
use crate::error::{MediaError, Result};
use crate::model::{Record, RecordId, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A media library exported to a JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

/// On-disk shape. A bare array is written back as a bare array, and top-level
/// keys other than `media` and `users` are written back untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Export {
    #[serde(default)]
    media: Vec<Record>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(flatten)]
    rest: Map<String, Value>,
    #[serde(skip)]
    bare: bool,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Export> {
        if !self.path.exists() {
            return Err(MediaError::Source(format!(
                "media file not found: {}",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path).map_err(MediaError::Io)?;
        let value: Value = serde_json::from_str(&content).map_err(MediaError::Serialization)?;

        let export = match value {
            Value::Array(_) => Export {
                media: serde_json::from_value(value).map_err(MediaError::Serialization)?,
                bare: true,
                ..Export::default()
            },
            Value::Object(_) => serde_json::from_value(value).map_err(MediaError::Serialization)?,
            _ => {
                return Err(MediaError::Source(format!(
                    "{} is neither a list of media items nor a media export",
                    self.path.display()
                )))
            }
        };
        debug!(
            path = %self.path.display(),
            media = export.media.len(),
            users = export.users.len(),
            "loaded media file"
        );
        Ok(export)
    }

    fn store(&self, export: &Export) -> Result<()> {
        let content = if export.bare {
            serde_json::to_string_pretty(&export.media)
        } else {
            serde_json::to_string_pretty(export)
        }
        .map_err(MediaError::Serialization)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content).map_err(MediaError::Io)?;
        fs::rename(&tmp, &self.path).map_err(MediaError::Io)?;
        Ok(())
    }
}

impl MediaSource for JsonFileSource {
    fn list_records(&self, query: &ListQuery) -> Result<Vec<Record>> {
        Ok(query.apply(&self.load()?.media))
    }

    fn get_record(&self, id: RecordId) -> Result<Record> {
        self.load()?
            .media
            .into_iter()
            .find(|r| r.id() == Some(id))
            .ok_or(MediaError::RecordNotFound(id))
    }

    fn save_record(&mut self, id: RecordId, changes: &Record) -> Result<Record> {
        let mut export = self.load()?;
        let record = export
            .media
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or(MediaError::RecordNotFound(id))?;
        apply_changes(record, changes);
        let saved = record.clone();
        self.store(&export)?;
        Ok(saved)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.load()?.users)
    }
}
