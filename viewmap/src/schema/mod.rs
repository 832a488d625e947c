//! Cross-referencing views with an OpenAPI document.
//!
//! [`get_schema`] picks the record schema for a dataset and view type,
//! [`schemas_for_path`] walks it along a field path and [`enhance`] merges
//! the deprecation, required and reference metadata found into a view.

mod document;
mod enhance;
mod reference;
mod walk;

pub use document::{SchemaDocument, get_schema};
pub use enhance::{DerivedMetadata, derive_deprecation_and_required, effective_mapping, enhance};
pub use reference::{derive_reference_info, extract_origin};
pub use walk::{ARRAY_SEGMENT, SchemaStep, SchemaWalk, schemas_for_path};
