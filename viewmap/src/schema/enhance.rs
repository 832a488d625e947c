use serde_json::Value;

use super::{
    document::{SchemaDocument, get_schema},
    reference::derive_reference_info,
    walk::{ARRAY_SEGMENT, schemas_for_path},
};
use crate::{
    mapping::{ArrayItems, Deprecation, DeprecationInfo, Mapping, ObjectMapping, PropertyConfig},
    path::split_path,
    view::{TableView, ViewConfig},
};

/// Deprecation and required flags derived for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedMetadata {
    pub deprecation_info: Vec<DeprecationInfo>,
    pub required: bool,
}

/// Merge schema-derived metadata into every property of `view`.
///
/// When the document holds no schema for the dataset and view type, the
/// view is returned unchanged.
pub fn enhance(
    document: &SchemaDocument,
    domain: &str,
    dataset_path: &str,
    view: &ViewConfig,
) -> ViewConfig {
    let Some(schema) = get_schema(document, domain, dataset_path, view.view_type()) else {
        warn!(
            "no schema for {} view of `{dataset_path}` in domain `{domain}`",
            view.view_type()
        );
        return view.clone();
    };

    match view {
        ViewConfig::Table(table) => ViewConfig::Table(TableView {
            elements: table
                .elements
                .iter()
                .map(|element| with_metadata(element, schema, false))
                .collect(),
        }),
        ViewConfig::Raw(_) => view.clone(),
        _ => view
            .map_record(|record| record.map_properties(|p| with_metadata(p, schema, true)))
            .unwrap_or_else(|| view.clone()),
    }
}

fn with_metadata(property: &PropertyConfig, schema: &Value, references: bool) -> PropertyConfig {
    let derived = derive_deprecation_and_required(schema, property);
    PropertyConfig {
        deprecation_info: derived.deprecation_info,
        required: Some(derived.required),
        reference_info: if references {
            derive_reference_info(property)
        } else {
            property.reference_info.clone()
        },
        ..property.clone()
    }
}

/// The mapping checked against the schema and the prefix its paths get.
///
/// Flat object mappings are checked as-is. Array mappings are checked
/// through their flat item mapping below `<pathToParent>.[].`; nested
/// `properties` and legacy arrays contribute no paths at this level.
pub fn effective_mapping(property: &PropertyConfig) -> (Option<&ObjectMapping>, String) {
    match &property.mapping {
        Some(Mapping::Object(object)) => (Some(object), String::new()),
        Some(Mapping::Array(array)) => {
            let prefix = format!("{}.{ARRAY_SEGMENT}.", array.path_to_parent);
            match &array.items {
                ArrayItems::Flat(object) => (Some(object), prefix),
                ArrayItems::Nested(_) | ArrayItems::Legacy => (None, prefix),
            }
        }
        None => (None, String::new()),
    }
}

/// Walk every mapped path of `property` through `root_schema`.
///
/// Each deprecated node on a path, ancestors included, adds one
/// [`Deprecation`]. `required` holds when the property declares it or any
/// node on any mapped path is required.
pub fn derive_deprecation_and_required(
    root_schema: &Value,
    property: &PropertyConfig,
) -> DerivedMetadata {
    let mut derived = DerivedMetadata {
        deprecation_info: Vec::new(),
        required: property.required == Some(true),
    };

    let (mapping, prefix) = effective_mapping(property);
    for source_path in mapping.into_iter().flat_map(|m| m.values()) {
        let full_path = format!("{prefix}{source_path}");
        let segments = split_path(&full_path);
        let walk = schemas_for_path(root_schema, &segments);

        let mut deprecations = Vec::new();
        for step in walk.steps() {
            if step.schema.get("deprecated") == Some(&Value::Bool(true)) {
                deprecations.push(Deprecation {
                    description: step
                        .schema
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    path_to_deprecation: step.path_from_root.to_string(),
                });
            }
            derived.required |= step.required;
        }

        if !deprecations.is_empty() {
            derived.deprecation_info.push(DeprecationInfo {
                property_path: full_path,
                deprecations,
            });
        }
    }

    derived
}
