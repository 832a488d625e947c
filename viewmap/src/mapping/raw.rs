use serde::{Deserialize, Serialize};

use super::{
    ArrayItems, ArrayMapping, DeprecationInfo, Mapping, ObjectMapping, Params, PropertyConfig,
    ReferenceInfo, default_target_name,
};
use crate::error::ConfigError;

/// Property configuration exactly as authored.
///
/// Every field is optional and nothing is cross-checked, so conflicting or
/// incomplete input survives deserialization and can be reported by the
/// [`Validator`](super::Validator).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_mapping: Option<ObjectMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_mapping: Option<RawArrayMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecation_info: Vec<DeprecationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_info: Option<ReferenceInfo>,
}

/// Array mapping exactly as authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArrayMapping {
    #[serde(default)]
    pub path_to_parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_mapping: Option<ObjectMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<RawPropertyConfig>>,
}

impl RawPropertyConfig {
    /// Convert into the typed model; `path` prefixes error messages.
    pub fn into_typed(self, path: &str) -> Result<PropertyConfig, ConfigError> {
        let title = self.title.ok_or_else(|| ConfigError::MissingField {
            path: display_path(path),
            field: "title",
        })?;
        let component = self.component.ok_or_else(|| ConfigError::MissingField {
            path: display_path(path),
            field: "component",
        })?;

        let mapping = match (self.object_mapping, self.array_mapping) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingMappings {
                    path: display_path(path),
                });
            }
            (Some(object), None) => Some(Mapping::Object(object)),
            (None, Some(array)) => Some(Mapping::Array(
                array.into_typed(&child_path(path, "arrayMapping"))?,
            )),
            (None, None) => None,
        };

        Ok(PropertyConfig {
            title,
            component,
            mapping,
            params: self.params,
            required: self.required,
            deprecation_info: self.deprecation_info,
            reference_info: self.reference_info,
        })
    }
}

impl RawArrayMapping {
    /// Convert into the typed model; `path` prefixes error messages.
    pub fn into_typed(self, path: &str) -> Result<ArrayMapping, ConfigError> {
        let items = match (self.object_mapping, self.properties) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingArrayItems {
                    path: display_path(path),
                });
            }
            (Some(object), None) => ArrayItems::Flat(object),
            (None, Some(properties)) => ArrayItems::Nested(
                properties
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| p.into_typed(&child_path(path, &format!("properties[{i}]"))))
                    .collect::<Result<_, _>>()?,
            ),
            (None, None) => ArrayItems::Legacy,
        };

        let target_property_name = self
            .target_property_name
            .unwrap_or_else(|| default_target_name(&self.path_to_parent));

        Ok(ArrayMapping {
            path_to_parent: self.path_to_parent,
            target_property_name,
            items,
        })
    }
}

impl TryFrom<RawPropertyConfig> for PropertyConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPropertyConfig) -> Result<Self, Self::Error> {
        raw.into_typed("")
    }
}

impl TryFrom<RawArrayMapping> for ArrayMapping {
    type Error = ConfigError;

    fn try_from(raw: RawArrayMapping) -> Result<Self, Self::Error> {
        raw.into_typed("")
    }
}

impl From<PropertyConfig> for RawPropertyConfig {
    fn from(p: PropertyConfig) -> Self {
        let (object_mapping, array_mapping) = match p.mapping {
            Some(Mapping::Object(object)) => (Some(object), None),
            Some(Mapping::Array(array)) => (None, Some(array.into())),
            None => (None, None),
        };
        RawPropertyConfig {
            title: Some(p.title),
            component: Some(p.component),
            object_mapping,
            array_mapping,
            params: p.params,
            required: p.required,
            deprecation_info: p.deprecation_info,
            reference_info: p.reference_info,
        }
    }
}

impl From<ArrayMapping> for RawArrayMapping {
    fn from(a: ArrayMapping) -> Self {
        let (object_mapping, properties) = match a.items {
            ArrayItems::Flat(object) => (Some(object), None),
            ArrayItems::Nested(properties) => {
                (None, Some(properties.into_iter().map(Into::into).collect()))
            }
            ArrayItems::Legacy => (None, None),
        };
        RawArrayMapping {
            path_to_parent: a.path_to_parent,
            target_property_name: Some(a.target_property_name),
            object_mapping,
            properties,
        }
    }
}

/// Append `child` to a diagnostic path, leaving out the dot at the root.
pub(crate) fn child_path(path: &str, child: &str) -> String {
    if path.is_empty() {
        child.to_string()
    } else if child.starts_with('[') {
        format!("{path}{child}")
    } else {
        format!("{path}.{child}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("", "arrayMapping"), "arrayMapping");
        assert_eq!(child_path("a", "arrayMapping"), "a.arrayMapping");
        assert_eq!(child_path("elements", "[2]"), "elements[2]");
    }

    #[test]
    fn test_nested_conflict_reports_path() {
        let raw: RawPropertyConfig = serde_json::from_value(json!({
            "title": "Outer",
            "component": "table",
            "arrayMapping": {
                "pathToParent": "a",
                "properties": [{
                    "title": "Inner",
                    "component": "table",
                    "arrayMapping": {
                        "pathToParent": "b",
                        "objectMapping": { "v": "c" },
                        "properties": []
                    }
                }]
            }
        }))
        .unwrap();

        let err = raw.into_typed("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "arrayMapping.properties[0].arrayMapping: `objectMapping` and `properties` are mutually exclusive"
        );
    }

    #[test]
    fn test_legacy_target_defaults_to_parent_name() {
        let raw: RawArrayMapping =
            serde_json::from_value(json!({ "pathToParent": "data.items" })).unwrap();
        let typed = raw.into_typed("").unwrap();
        assert_eq!(typed.target_property_name, "items");
        assert_eq!(typed.items, ArrayItems::Legacy);
    }
}
