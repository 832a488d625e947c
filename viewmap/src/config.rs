//! Engine configuration.
//!
//! Configuration is stored in TOML or JSON; the format is picked from the
//! file extension.
//!
//! ```toml
//! localized_domain = "edm"
//! language_placeholder = "${lang}"
//! default_language = "en"
//!
//! [components.geometry]
//! supportsTableView = false
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    components::{ComponentCapabilities, ComponentRegistry},
    error::ConfigError,
};

pub const DEFAULT_LOCALIZED_DOMAIN: &str = "edm";
pub const DEFAULT_LANGUAGE_PLACEHOLDER: &str = "${lang}";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_CONFIG_PATH: &str = "viewmap.toml";

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// The only domain whose field paths embed the language placeholder.
    pub localized_domain: String,
    /// Token replaced by the active language code.
    pub language_placeholder: String,
    /// Language used when none is requested.
    pub default_language: String,
    /// Component capability overrides. Empty means the built-in table.
    pub components: BTreeMap<String, ComponentCapabilities>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            localized_domain: DEFAULT_LOCALIZED_DOMAIN.to_string(),
            language_placeholder: DEFAULT_LANGUAGE_PLACEHOLDER.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            components: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content, extension(path))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration content in the format named by `ext`.
    pub fn parse(content: &str, ext: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = match ext {
            "json" => serde_json::from_str(content)?,
            "toml" => toml::from_str(content)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };
        Ok(config)
    }

    /// Component table: the configured overrides, or the built-in set.
    pub fn component_registry(&self) -> ComponentRegistry {
        if self.components.is_empty() {
            return ComponentRegistry::default();
        }
        self.components
            .iter()
            .map(|(id, caps)| (id.clone(), *caps))
            .collect()
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|s| s.to_str()).unwrap_or("")
}

/// Derive the schema file path from a config path.
///
/// `viewmap.toml` becomes `viewmap-schema.json` in the same directory.
pub fn default_schema_by_config(config: &Path) -> PathBuf {
    let binding = config
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let mut name_split = binding.split('.').collect::<Vec<_>>();
    if name_split.len() > 1 {
        name_split.pop();
    }

    let name = format!("{}-schema.json", name_split.join("."));

    match config.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
