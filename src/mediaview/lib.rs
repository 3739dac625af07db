//! # mediaview Architecture
//!
//! mediaview is a **UI-agnostic media-library library**: it answers "which
//! media items does this view show, and on how many pages?" and handles the
//! edits a media dashboard makes. The CLI is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (field=value, field:op:value)          │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌───────────────────────────────────┐   ┌─────────────────────┐
//! │  Command Layer (commands/*.rs)    │──▶│  view.rs            │
//! │  - list, show, edit, bulk edit,   │   │  - pure search,     │
//! │    validate                       │   │    filter, sort,    │
//! │  - No I/O assumptions             │   │    paginate         │
//! └───────────────────────────────────┘   └─────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Source Layer (source/)                                     │
//! │  - Abstract MediaSource trait                               │
//! │  - JsonFileSource (exports), InMemorySource (testing)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fields Are the Schema
//!
//! Records are opaque JSON objects as the media endpoint returns them. The
//! field registry ([`fields`]) is what gives them meaning: which paths exist,
//! how they display, which can be searched, sorted, filtered or edited. Views
//! refer to fields by id, and anything a view names that the registry does not
//! support is skipped rather than reported.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust values and returns regular
//! Rust types. It never writes to stdout/stderr and never exits the process.
//! Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **View processing and fields**: unit tests next to the code, plus
//!    property-style tests in `tests/`.
//! 2. **Commands**: unit tests against `InMemorySource` fixtures.
//! 3. **API**: dispatch and input normalization.
//! 4. **CLI**: argument parsing and rendering in `cli/`, end-to-end runs of
//!    the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`view`]: `ViewSpec` and the view processor
//! - [`fields`]: Field descriptors, values, filters, the media registry
//! - [`source`]: Media source abstraction and implementations
//! - [`model`]: `Record` and `User`
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod model;
pub mod source;
pub mod view;
