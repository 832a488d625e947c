//! # viewmap
//!
//! A declarative view-mapping engine for JSON records.
//!
//! Views describe how fields of a raw record become the props of UI
//! components. The engine resolves dot-paths into records, builds render
//! props from object and array mappings, substitutes the language of
//! localized views and cross-references views with an OpenAPI document to
//! surface deprecated and required fields.
//!
//! ## Features
//!
//! - Dot-path extraction and injection over `serde_json::Value`
//! - Object, flat array, nested array and legacy array mappings
//! - Structural validation of authored views with located diagnostics
//! - Language substitution for the localized domain
//! - Schema walking with `allOf`, `items` and inherited deprecations
//! - Race-guarded enhancement for views that change while schemas load
//! - TOML and JSON engine configuration with a generated JSON Schema
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use viewmap::mapping::{PropertyConfig, build_from_mapping, object_mapping};
//!
//! let property = PropertyConfig::new("Name", "text")
//!     .with_object_mapping(object_mapping([("value", "person.name")]));
//! let props = build_from_mapping(&json!({ "person": { "name": "Ada" } }), &property);
//! assert_eq!(props["value"], "Ada");
//! ```
//!
//! ## Modules
//!
//! - [`path`] - Dot-path resolution
//! - [`mapping`] - Property configs, prop building and validation
//! - [`view`] - Table and record view trees
//! - [`substitute`] - Language substitution
//! - [`schema`] - OpenAPI lookup, schema walking and view enhancement
//! - [`session`] - Enhancement that discards results for stale views
//! - [`config`] - Engine configuration

#[macro_use]
extern crate log;

pub mod components;
pub mod config;
pub mod error;
pub mod mapping;
pub mod path;
pub mod schema;
pub mod session;
pub mod substitute;
pub mod view;

pub use components::{ComponentCapabilities, ComponentRegistry};
pub use config::EngineConfig;
pub use error::{ConfigError, PathError};
pub use mapping::{ArrayMapping, Mapping, PropertyConfig};
pub use schema::{SchemaDocument, enhance, get_schema};
pub use session::{EnhanceSession, ViewKey};
pub use substitute::{LanguageReplacer, LocaleSubstitution};
pub use view::{RawViewConfig, ViewConfig, ViewType};

pub use serde_json::Value;
