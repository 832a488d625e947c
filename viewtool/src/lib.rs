//! # viewtool
//!
//! Development tool for [`viewmap`] view configurations.
//!
//! `viewtool` loads views, records and schema documents from JSON or TOML
//! files and runs the engine over them, so authors can check their
//! configuration before it ships.
//!
//! ## Features
//!
//! - **Lint**: structural validation with the configured component table
//! - **Substitute**: language substitution for the localized domain
//! - **Enhance**: deprecation, required and reference metadata from an OpenAPI document
//! - **Build**: render props of a single field for a sample record
//! - **Config schema**: JSON schema of the engine configuration
//!
//! ## Modules
//!
//! - [`commands`] - Subcommand implementations
//! - [`ctx`] - Application context and file loading
//! - [`utils`] - Common utilities and helper functions

/// Subcommand implementations.
pub mod commands;

/// Application context and file loading.
pub mod ctx;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
