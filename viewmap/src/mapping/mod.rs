//! Declarative mappings and the property configurations that carry them.
//!
//! The typed model makes the exclusive choices of the authored format
//! explicit: a property maps either a flat object or an array, and an
//! array is projected either flat, nested or passed through. Authored
//! configuration is read through the mirrors in [`raw`] and converted with
//! [`TryFrom`], which rejects conflicting fields.
//!
//! - [`build`] - turning a mapping plus a record into render props
//! - [`raw`] - the authored (unchecked) configuration shape
//! - [`validate`] - static diagnostics over authored configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Render-prop building from mappings.
pub mod build;

/// Authored configuration mirrors.
pub mod raw;

/// Static validation of authored configuration.
pub mod validate;

pub use build::{
    build_from_array_mapping, build_from_mapping, build_from_object_mapping, build_nested_item,
};
pub use raw::{RawArrayMapping, RawPropertyConfig};
pub use validate::{
    Severity, ValidationError, Validator, has_errors, validate_array_mapping,
    validate_property_configs,
};

/// Target property name to source path.
pub type ObjectMapping = BTreeMap<String, String>;

/// Free-form per-field configuration merged into render props.
pub type Params = Map<String, Value>;

/// How a property obtains its value from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    /// Flat target key to source path mapping.
    Object(ObjectMapping),
    /// Projection of an array found in the record.
    Array(ArrayMapping),
}

/// Projection of an array located at `path_to_parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArrayMapping", into = "RawArrayMapping")]
pub struct ArrayMapping {
    /// Path of the array inside the record.
    pub path_to_parent: String,
    /// Key under which flat and legacy projections are returned.
    pub target_property_name: String,
    /// What happens to the individual array items.
    pub items: ArrayItems,
}

/// Item handling of an [`ArrayMapping`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    /// Every item is mapped through the same object mapping.
    Flat(ObjectMapping),
    /// Items are passed on with per-item property configs.
    Nested(Vec<PropertyConfig>),
    /// The raw array is passed through.
    Legacy,
}

impl ArrayMapping {
    /// Array mapping with flat item projection.
    pub fn flat(path_to_parent: &str, target: &str, mapping: ObjectMapping) -> Self {
        Self {
            path_to_parent: path_to_parent.to_string(),
            target_property_name: target.to_string(),
            items: ArrayItems::Flat(mapping),
        }
    }

    /// Array mapping with nested per-item properties.
    pub fn nested(path_to_parent: &str, properties: Vec<PropertyConfig>) -> Self {
        Self {
            path_to_parent: path_to_parent.to_string(),
            target_property_name: default_target_name(path_to_parent),
            items: ArrayItems::Nested(properties),
        }
    }

    /// Array mapping passing the raw array through.
    pub fn legacy(path_to_parent: &str, target: &str) -> Self {
        Self {
            path_to_parent: path_to_parent.to_string(),
            target_property_name: target.to_string(),
            items: ArrayItems::Legacy,
        }
    }

    /// Flat item mapping, if this is the flat form.
    pub fn object_mapping(&self) -> Option<&ObjectMapping> {
        match &self.items {
            ArrayItems::Flat(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Nested item properties, if this is the nested form.
    pub fn properties(&self) -> Option<&[PropertyConfig]> {
        match &self.items {
            ArrayItems::Nested(properties) => Some(properties),
            _ => None,
        }
    }
}

/// Target name used when an array mapping does not name one: the last
/// segment of the parent path.
pub(crate) fn default_target_name(path_to_parent: &str) -> String {
    crate::path::split_path(path_to_parent)
        .pop()
        .unwrap_or_default()
}

/// A single renderable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPropertyConfig", into = "RawPropertyConfig")]
pub struct PropertyConfig {
    pub title: String,
    /// Identifier of the UI component rendering this field.
    pub component: String,
    pub mapping: Option<Mapping>,
    pub params: Option<Params>,
    /// Explicitly authored, or derived from the schema after enhancement.
    pub required: Option<bool>,
    /// Derived by schema cross-referencing, never authored.
    pub deprecation_info: Vec<DeprecationInfo>,
    /// Derived from `params.url`, never authored.
    pub reference_info: Option<ReferenceInfo>,
}

impl PropertyConfig {
    /// Property without any mapping.
    pub fn new(title: &str, component: &str) -> Self {
        Self {
            title: title.to_string(),
            component: component.to_string(),
            mapping: None,
            params: None,
            required: None,
            deprecation_info: Vec::new(),
            reference_info: None,
        }
    }

    pub fn with_object_mapping(mut self, mapping: ObjectMapping) -> Self {
        self.mapping = Some(Mapping::Object(mapping));
        self
    }

    pub fn with_array_mapping(mut self, mapping: ArrayMapping) -> Self {
        self.mapping = Some(Mapping::Array(mapping));
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn object_mapping(&self) -> Option<&ObjectMapping> {
        match &self.mapping {
            Some(Mapping::Object(mapping)) => Some(mapping),
            _ => None,
        }
    }

    pub fn array_mapping(&self) -> Option<&ArrayMapping> {
        match &self.mapping {
            Some(Mapping::Array(mapping)) => Some(mapping),
            _ => None,
        }
    }

    /// A string-valued entry of `params`, if set.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.as_ref()?.get(key)?.as_str()
    }
}

/// Build an [`ObjectMapping`] from `(target, source)` pairs.
pub fn object_mapping<I, K, V>(pairs: I) -> ObjectMapping
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Deprecation markers collected for one mapped path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationInfo {
    pub property_path: String,
    pub deprecations: Vec<Deprecation>,
}

/// One deprecated schema node on a field's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deprecation {
    pub description: String,
    pub path_to_deprecation: String,
}

/// Cross-reference metadata derived from `params.url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceInfo {
    /// Mapped source path the reference originates from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Collection name following the version prefix of `url`.
    pub origin: String,
    pub url: String,
    #[serde(default)]
    pub reference_detail_view_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_flat_property() {
        let p: PropertyConfig = serde_json::from_value(json!({
            "title": "Name",
            "component": "text",
            "objectMapping": { "value": "name" },
            "params": { "readonly": true }
        }))
        .unwrap();
        assert_eq!(p.object_mapping(), Some(&object_mapping([("value", "name")])));
        assert_eq!(p.param_str("readonly"), None);
        assert_eq!(p.params.unwrap()["readonly"], json!(true));
    }

    #[test]
    fn test_deserialize_nested_array_property() {
        let p: PropertyConfig = serde_json::from_value(json!({
            "title": "Authors",
            "component": "table",
            "arrayMapping": {
                "pathToParent": "authors",
                "properties": [
                    { "title": "Name", "component": "text", "objectMapping": { "value": "name" } }
                ]
            }
        }))
        .unwrap();
        let array = p.array_mapping().unwrap();
        assert_eq!(array.target_property_name, "authors");
        assert_eq!(array.properties().unwrap()[0].title, "Name");
    }

    #[test]
    fn test_conflicting_fields_are_rejected() {
        let both = json!({
            "title": "X",
            "component": "text",
            "arrayMapping": {
                "pathToParent": "a",
                "objectMapping": { "v": "b" },
                "properties": [{ "title": "Y", "component": "text" }]
            }
        });
        let err = serde_json::from_value::<PropertyConfig>(both).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));

        let missing = json!({ "component": "text" });
        let err = serde_json::from_value::<PropertyConfig>(missing).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_serialize_keeps_authored_shape() {
        let p = PropertyConfig::new("Tags", "chips").with_array_mapping(ArrayMapping::flat(
            "tags",
            "values",
            object_mapping([("label", "name")]),
        ));
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Tags",
                "component": "chips",
                "arrayMapping": {
                    "pathToParent": "tags",
                    "targetPropertyName": "values",
                    "objectMapping": { "label": "name" }
                }
            })
        );
        let back: PropertyConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, p);
    }
}
