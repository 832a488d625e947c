//! The `viewtool` subcommands.
//!
//! Every command returns its result instead of printing it, so the binary
//! decides on formatting and exit codes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde_json::{Map, Value};
use viewmap::{
    EnhanceSession, LanguageReplacer, LocaleSubstitution, PropertyConfig, ViewConfig, ViewKey,
    config::default_schema_by_config,
    mapping::{Severity, ValidationError, Validator, build_from_mapping, has_errors},
    view::TableView,
};

use crate::ctx::AppContext;

/// Diagnostics of one linted view.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub path: PathBuf,
    pub diagnostics: Vec<ValidationError>,
}

impl LintReport {
    pub fn errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics.len() - self.errors()
    }

    /// Whether the report should fail the process.
    pub fn is_failure(&self, deny_warnings: bool) -> bool {
        has_errors(&self.diagnostics) || (deny_warnings && !self.diagnostics.is_empty())
    }

    pub fn print(&self) {
        for diagnostic in &self.diagnostics {
            let severity = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            println!("{severity}: {}", diagnostic.message);
        }

        let summary = format!(
            "{}: {} error(s), {} warning(s)",
            self.path.display(),
            self.errors(),
            self.warnings()
        );
        if self.diagnostics.is_empty() {
            println!("{}", summary.green());
        } else {
            println!("{}", summary.bold());
        }
    }
}

/// Validate a view as authored.
///
/// Structural diagnostics come from the validator with the configured
/// component table. A view that passes them but still cannot be read into
/// the typed model gets one more error.
pub async fn lint(ctx: &AppContext, view_path: &Path) -> anyhow::Result<LintReport> {
    let raw = ctx.load_raw_view(view_path).await?;
    let registry = ctx.component_registry();
    let mut diagnostics = Validator::with_components(&registry).view(&raw);

    if !has_errors(&diagnostics)
        && let Err(e) = <ViewConfig>::try_from(raw)
    {
        diagnostics.push(ValidationError::error("", e.to_string()));
    }

    info!(
        "linted {}: {} diagnostic(s)",
        view_path.display(),
        diagnostics.len()
    );
    Ok(LintReport {
        path: view_path.to_path_buf(),
        diagnostics,
    })
}

/// Substitute the language placeholder of a view for `domain`.
pub async fn substitute(
    ctx: &AppContext,
    view_path: &Path,
    domain: &str,
    language: Option<&str>,
) -> anyhow::Result<ViewConfig> {
    let view = ctx.load_view(view_path).await?;
    let replacer = LanguageReplacer::from_config(&ctx.config, language);
    debug!(
        "substitute `{}` with `{}` for domain `{domain}`",
        ctx.config.language_placeholder,
        replacer.language()
    );

    LocaleSubstitution::from_config(&ctx.config)
        .apply_language(Some(domain), Some(&view), &replacer)
        .ok_or_else(|| anyhow!("substitution produced no view"))
}

/// Merge schema-derived metadata into a view.
pub async fn enhance(
    ctx: &AppContext,
    view_path: &Path,
    schema_path: &Path,
    domain: &str,
    dataset_path: &str,
) -> anyhow::Result<ViewConfig> {
    let view = ctx.load_view(view_path).await?;
    let key = ViewKey::new(domain, dataset_path, &view.view_type().to_string());

    let session = EnhanceSession::new();
    session.select(key.clone());
    session
        .enhance_with(&key, &view, |_| ctx.load_schema(schema_path))
        .await?
        .ok_or_else(|| anyhow!("view {key} was deselected during enhancement"))
}

/// Build the render props of the property titled `field`.
pub async fn build(
    ctx: &AppContext,
    view_path: &Path,
    record_path: &Path,
    field: &str,
) -> anyhow::Result<Map<String, Value>> {
    let view = ctx.load_view(view_path).await?;
    let record = ctx.load_record(record_path).await?;

    let property = find_property(&view, field)
        .with_context(|| format!("no property titled `{field}` in {}", view_path.display()))?;
    Ok(build_from_mapping(&record, property))
}

/// First property of `view` with the given title, in document order.
pub fn find_property<'a>(view: &'a ViewConfig, title: &str) -> Option<&'a PropertyConfig> {
    match view {
        ViewConfig::Table(TableView { elements }) => elements.iter().find(|p| p.title == title),
        _ => view
            .record()?
            .properties()
            .into_iter()
            .find(|p| p.title == title),
    }
}

/// Write the JSON schema of the engine configuration next to the config file.
pub async fn config_schema(ctx: &AppContext) -> anyhow::Result<PathBuf> {
    let schema = schemars::schema_for!(viewmap::EngineConfig);
    let schema_path = default_schema_by_config(&ctx.config_path);
    let content = serde_json::to_string_pretty(&schema)?;

    tokio::fs::write(&schema_path, content)
        .await
        .with_context(|| format!("failed to write {}", schema_path.display()))?;
    info!("wrote config schema to {}", schema_path.display());
    Ok(schema_path)
}
