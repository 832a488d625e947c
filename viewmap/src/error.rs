//! Error types for the fallible corners of the engine.
//!
//! The mapping, substitution and schema passes never fail; they degrade to
//! empty values instead. Errors only arise when writing into JSON by path or
//! when authored configuration cannot be turned into the typed model.

use thiserror::Error;

/// Failure while writing a value into JSON by dot-path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A scalar value sits where an object or array is needed.
    #[error("value at `{path}` is neither an object nor an array")]
    NotAContainer { path: String },

    /// A numeric segment points past the end of an array.
    #[error("index {index} at `{path}` is out of bounds (len {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// A non-numeric segment addresses an array.
    #[error("segment at `{path}` is not an array index")]
    NotAnIndex { path: String },

    /// The path has no segments.
    #[error("empty path")]
    Empty,
}

/// Failure while loading or converting authored configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Both flat and nested array item descriptions were given.
    #[error("{path}: `objectMapping` and `properties` are mutually exclusive")]
    ConflictingArrayItems { path: String },

    /// Both an object mapping and an array mapping were given.
    #[error("{path}: `objectMapping` and `arrayMapping` are mutually exclusive")]
    ConflictingMappings { path: String },

    /// A property misses a mandatory field.
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: &'static str },

    /// The configuration file has an extension we cannot parse.
    #[error("unsupported config file extension: {0:?}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
