//! Static validation of authored mapping configuration.
//!
//! The validator only reports; it never mutates configuration and never
//! stops a pipeline. `Error` marks a hard authoring defect, `Warning` is
//! advisory. Callers decide whether to log or fail a build.

use std::fmt;

use serde::Serialize;

use super::raw::{RawArrayMapping, RawPropertyConfig, child_path};
use crate::{components::ComponentRegistry, view::RawViewConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One diagnostic produced by the [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: String,
    /// Construction path of the offending node, e.g.
    /// `elements[0].arrayMapping.properties[1]`.
    pub path: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(path: &str, message: String) -> Self {
        Self {
            message,
            path: path.to_string(),
            severity: Severity::Error,
        }
    }

    pub fn warning(path: &str, message: String) -> Self {
        Self {
            message,
            path: path.to_string(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Whether any diagnostic in `errors` has `Error` severity.
pub fn has_errors(errors: &[ValidationError]) -> bool {
    errors.iter().any(ValidationError::is_error)
}

/// Configuration checker.
///
/// Without a component table only structural rules are checked. With one,
/// components used in a table context must be known and table-capable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator<'a> {
    components: Option<&'a ComponentRegistry>,
}

impl<'a> Validator<'a> {
    pub fn new() -> Self {
        Self { components: None }
    }

    pub fn with_components(components: &'a ComponentRegistry) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Check one array mapping and, recursively, its nested properties.
    pub fn array_mapping(&self, mapping: &RawArrayMapping, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.check_array_mapping(mapping, path, &mut errors);
        errors
    }

    /// Check every property that declares an array mapping.
    pub fn property_configs(
        &self,
        properties: &[RawPropertyConfig],
        path: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.check_properties(properties, path, &mut errors);
        errors
    }

    /// Check a whole view. Table columns are a table context.
    pub fn view(&self, view: &RawViewConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        match view {
            RawViewConfig::Table(table) => {
                for (i, column) in table.elements.iter().enumerate() {
                    let at = child_path("elements", &format!("[{i}]"));
                    self.check_table_component(column.component.as_deref(), &at, &mut errors);
                }
                self.check_properties(&table.elements, "elements", &mut errors);
            }
            RawViewConfig::Raw(_) => {}
            _ => {
                if let Some(record) = view.record() {
                    for (i, category) in record.elements.iter().enumerate() {
                        category.visit_properties(&format!("elements[{i}]"), &mut |at, props| {
                            self.check_properties(props, at, &mut errors)
                        });
                    }
                }
            }
        }
        errors
    }

    fn check_properties(
        &self,
        properties: &[RawPropertyConfig],
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        for (i, property) in properties.iter().enumerate() {
            let at = child_path(path, &format!("[{i}]"));
            if property.object_mapping.is_some() && property.array_mapping.is_some() {
                errors.push(ValidationError::error(
                    &at,
                    format!("{at}: objectMapping and arrayMapping are mutually exclusive"),
                ));
            }
            if let Some(mapping) = &property.array_mapping {
                self.check_array_mapping(mapping, &child_path(&at, "arrayMapping"), errors);
            }
        }
    }

    fn check_array_mapping(
        &self,
        mapping: &RawArrayMapping,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if mapping.object_mapping.is_some() && mapping.properties.is_some() {
            errors.push(ValidationError::error(
                path,
                format!(
                    "{}: objectMapping and properties are mutually exclusive",
                    display(path)
                ),
            ));
        }

        let Some(properties) = &mapping.properties else {
            return;
        };

        if properties.is_empty() {
            errors.push(ValidationError::warning(
                path,
                format!("{}: properties is empty", display(path)),
            ));
        }

        for (i, property) in properties.iter().enumerate() {
            let at = child_path(path, &format!("properties[{i}]"));
            if property.title.is_none() {
                errors.push(ValidationError::error(
                    &at,
                    format!("{at}: nested property is missing `title`"),
                ));
            }
            match &property.component {
                None => errors.push(ValidationError::error(
                    &at,
                    format!("{at}: nested property is missing `component`"),
                )),
                Some(component) => self.check_table_component(Some(component), &at, errors),
            }
            if property.object_mapping.is_some() && property.array_mapping.is_some() {
                errors.push(ValidationError::error(
                    &at,
                    format!("{at}: objectMapping and arrayMapping are mutually exclusive"),
                ));
            }
            if let Some(nested) = &property.array_mapping {
                self.check_array_mapping(nested, &child_path(&at, "arrayMapping"), errors);
            }
        }
    }

    fn check_table_component(
        &self,
        component: Option<&str>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let (Some(registry), Some(component)) = (self.components, component) else {
            return;
        };
        match registry.get(component) {
            None => errors.push(ValidationError::error(
                path,
                format!("{path}: unknown component `{component}`"),
            )),
            Some(capabilities) if !capabilities.supports_table_view => {
                errors.push(ValidationError::error(
                    path,
                    format!("{path}: component `{component}` cannot be rendered in a table"),
                ))
            }
            Some(_) => {}
        }
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Check one array mapping without a component table.
pub fn validate_array_mapping(mapping: &RawArrayMapping, path: &str) -> Vec<ValidationError> {
    Validator::new().array_mapping(mapping, path)
}

/// Check a list of properties without a component table.
pub fn validate_property_configs(
    properties: &[RawPropertyConfig],
    path: &str,
) -> Vec<ValidationError> {
    Validator::new().property_configs(properties, path)
}
