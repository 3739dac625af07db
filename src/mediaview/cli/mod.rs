//! # CLI Behavior
//!
//! This is **one possible UI client** for mediaview, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Naked Execution
//!
//! Running `mediaview` with no subcommand lists the first page of the default
//! view, as the dashboard does when the media screen opens.
//!
//! ## Views From the Command Line
//!
//! `list` starts from the configured view (page size, sort, columns) or from a
//! saved DataViews JSON file given with `--view`; flags then override single
//! parts of it. Unknown fields in filters or sorts are ignored, exactly as the
//! library does.
//!
//! ## Output
//!
//! Tables go to stdout. With `--output json` stdout carries only the
//! `{ data, paginationInfo }` document and messages move to stderr. Logs always
//! go to stderr.
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on an error or when any item in a command failed (for
//! example one save in a bulk edit).

mod commands;
mod render;
mod setup;
mod styles;

pub use commands::run;
