//! # Fields
//!
//! Everything a view knows about a record goes through a field descriptor.
//! Records are opaque JSON objects; descriptors give their parts an id, a
//! type, display rules and the set of operations they take part in.
//!
//! ## Structure
//!
//! - [`FieldDescriptor`] / [`FieldRegistry`]: declaration and lookup
//! - [`FieldValue`]: the typed value extracted from a record
//! - [`Filter`]: `{ field, operator, value }` conditions, resolved against the
//!   registry before evaluation
//! - [`media_fields`]: the media library's own registry, validators and
//!   formatting helpers
//!
//! ## Skipping
//!
//! The registry is the only source of truth. A view that names an unknown
//! field, or uses an operator the field does not declare, is not an error:
//! that part of the view is ignored.

mod filter;
mod media;
mod spec;
mod value;

pub use filter::{Filter, ResolvedFilter, SkipReason};
pub use media::{
    format_file_size, media_fields, validate_alt_text, validate_caption, validate_title,
    with_authors, BULK_EDIT_FIELDS, FORM_FIELDS,
};
pub use spec::{
    default_render, Element, FieldDescriptor, FieldRegistry, FieldType, GetValueFn, Operator,
    RenderFn, SetValueFn, ValidateFn,
};
pub use value::{parse_date, parse_datetime, strip_markup, FieldValue};
