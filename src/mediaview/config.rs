//! # Configuration
//!
//! Settings are loaded with [`confique`] from TOML files and environment
//! variables.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Environment variables**: `MEDIAVIEW_MEDIA_FILE`, `MEDIAVIEW_PER_PAGE`, ...
//! 2. **Explicit file**: `--config path/to/file.toml`
//! 3. **Project file**: `./mediaview.toml`
//! 4. **Global file**: `mediaview.toml` in the OS config directory (via `directories`)
//! 5. **Compiled defaults**
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `media_file` | none | JSON export to read media from |
//! | `per_page` | `20` | Items per page in listings |
//! | `sort_field` | `date` | Default sort field |
//! | `sort_direction` | `desc` | Default sort direction |
//! | `fetch_per_page` | `100` | Items fetched from the source per listing |
//! | `visible_fields` | title, caption, size, date, type, alt text | Columns shown by default |

use crate::error::Result;
use crate::view::{PerPage, SortDirection, ViewSpec};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "mediaview.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MediaViewConfig {
    /// JSON export of the media library (a list of media items, or an object
    /// with `media` and `users`).
    #[config(env = "MEDIAVIEW_MEDIA_FILE")]
    pub media_file: Option<PathBuf>,

    /// Items per page in listings; -1 shows everything on one page.
    #[config(env = "MEDIAVIEW_PER_PAGE", default = 20)]
    pub per_page: i64,

    /// Field to sort listings by when no sort is given.
    #[config(env = "MEDIAVIEW_SORT_FIELD", default = "date")]
    pub sort_field: String,

    /// "asc" or "desc".
    #[config(env = "MEDIAVIEW_SORT_DIRECTION", default = "desc")]
    pub sort_direction: SortDirection,

    /// How many items to fetch from the source for each listing.
    #[config(env = "MEDIAVIEW_FETCH_PER_PAGE", default = 100)]
    pub fetch_per_page: usize,

    /// Field ids shown as columns by default.
    #[config(
        env = "MEDIAVIEW_VISIBLE_FIELDS",
        parse_env = confique::env::parse::list_by_comma,
        default = ["title.raw", "caption.raw", "filesize", "date", "mime_type", "alt_text"]
    )]
    pub visible_fields: Vec<String>,
}

impl Default for MediaViewConfig {
    fn default() -> Self {
        Self {
            media_file: None,
            per_page: 20,
            sort_field: "date".to_string(),
            sort_direction: SortDirection::Desc,
            fetch_per_page: 100,
            visible_fields: [
                "title.raw",
                "caption.raw",
                "filesize",
                "date",
                "mime_type",
                "alt_text",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl MediaViewConfig {
    /// Load the layered configuration. `explicit` is the `--config` file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = explicit {
            builder = builder.file(path);
        }
        builder = builder.file(CONFIG_FILE_NAME);
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        Ok(builder.load()?)
    }

    /// A commented TOML template listing every setting.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }

    /// `per_page` as a page size; zero or other negatives fall back to the default.
    pub fn page_size(&self) -> PerPage {
        match self.per_page {
            -1 => PerPage::All,
            n => usize::try_from(n)
                .ok()
                .and_then(PerPage::count)
                .unwrap_or_default(),
        }
    }

    /// The view a listing starts from before command-line options apply.
    pub fn default_view(&self) -> ViewSpec {
        ViewSpec {
            per_page: self.page_size(),
            fields: self.visible_fields.clone(),
            ..ViewSpec::default()
        }
        .sorted_by(self.sort_field.clone(), self.sort_direction)
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mediaview").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
