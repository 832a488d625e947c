//! Application context and file loading.
//!
//! [`AppContext`] holds the workspace directory and the engine
//! configuration, and loads views, records and schema documents from JSON
//! or TOML files.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::de::DeserializeOwned;
use tokio::fs;
use viewmap::{
    ComponentRegistry, EngineConfig, RawViewConfig, SchemaDocument, Value, ViewConfig,
    config::DEFAULT_CONFIG_PATH,
};

use crate::utils::replace_env_placeholders;

/// State shared by every `viewtool` command.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Directory relative paths are resolved against.
    pub workspace: PathBuf,
    /// Path of the engine configuration file, which may not exist.
    pub config_path: PathBuf,
    pub config: EngineConfig,
}

impl AppContext {
    /// Load the engine configuration for `workspace`.
    ///
    /// `config_path` defaults to `viewmap.toml` in the workspace. A missing
    /// file yields the default configuration.
    pub fn new(workspace: PathBuf, config_path: Option<&str>) -> anyhow::Result<Self> {
        let mut ctx = Self {
            workspace,
            config_path: PathBuf::new(),
            config: EngineConfig::default(),
        };
        ctx.config_path = match config_path {
            Some(path) => ctx.resolve_path(path),
            None => ctx.workspace.join(DEFAULT_CONFIG_PATH),
        };
        ctx.config = EngineConfig::load_or_default(&ctx.config_path)
            .with_context(|| format!("failed to load config {}", ctx.config_path.display()))?;
        Ok(ctx)
    }

    /// Replaces variable placeholders in a string.
    ///
    /// Supports `${workspaceFolder}` and `${env:NAME}`.
    pub fn value_replace_with_var<S>(&self, value: S) -> String
    where
        S: AsRef<OsStr>,
    {
        let raw = value.as_ref().to_string_lossy();
        let replaced = raw.replace(
            "${workspaceFolder}",
            format!("{}", self.workspace.display()).as_ref(),
        );
        replace_env_placeholders(&replaced)
    }

    /// Expand placeholders in `raw` and anchor relative paths at the workspace.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = PathBuf::from(self.value_replace_with_var(raw));
        if path.is_absolute() {
            path
        } else {
            self.workspace.join(path)
        }
    }

    pub fn component_registry(&self) -> ComponentRegistry {
        self.config.component_registry()
    }

    /// Load a view exactly as authored.
    pub async fn load_raw_view(&self, path: &Path) -> anyhow::Result<RawViewConfig> {
        load_file(path).await
    }

    /// Load a view and check it against the typed model.
    pub async fn load_view(&self, path: &Path) -> anyhow::Result<ViewConfig> {
        let raw = self.load_raw_view(path).await?;
        <ViewConfig>::try_from(raw).with_context(|| format!("invalid view {}", path.display()))
    }

    /// Load a JSON or TOML record.
    pub async fn load_record(&self, path: &Path) -> anyhow::Result<Value> {
        load_file(path).await
    }

    /// Load a resolved OpenAPI document.
    pub async fn load_schema(&self, path: &Path) -> anyhow::Result<SchemaDocument> {
        let root: Value = load_file(path).await?;
        if root.get("paths").is_none() {
            warn!("schema document {} has no `paths`", path.display());
        }
        Ok(SchemaDocument::new(root))
    }
}

async fn load_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let value = match ext {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON {}", path.display()))?,
        "toml" => toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML {}", path.display()))?,
        _ => bail!("unsupported file extension: {}", path.display()),
    };
    Ok(value)
}
