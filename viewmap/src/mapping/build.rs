//! Render-prop building.
//!
//! Every function here is a pure function of its inputs and never fails:
//! missing data degrades to `null` values or empty arrays so the render
//! layer can show an empty cell.

use serde_json::{Map, Value};

use super::{ArrayItems, ArrayMapping, Mapping, ObjectMapping, Params, PropertyConfig};
use crate::path::{extract, extract_or_null};

/// Resolve every source path of `mapping` against `data`.
///
/// Unresolvable paths yield `null` under their target key. `params` are
/// merged last and win on key collisions.
pub fn build_from_object_mapping(
    data: &Value,
    mapping: &ObjectMapping,
    params: Option<&Params>,
) -> Map<String, Value> {
    let mut target: Map<String, Value> = mapping
        .iter()
        .map(|(key, source)| (key.clone(), extract_or_null(data, source)))
        .collect();
    merge_params(&mut target, params);
    target
}

/// Project the array at `mapping.path_to_parent`.
///
/// Anything other than an array at that path yields
/// `{ <targetPropertyName>: [] }`.
pub fn build_from_array_mapping(
    data: &Value,
    mapping: &ArrayMapping,
    params: Option<&Params>,
) -> Map<String, Value> {
    let mut target = Map::new();

    let Some(Value::Array(items)) = extract(data, &mapping.path_to_parent) else {
        target.insert(
            mapping.target_property_name.clone(),
            Value::Array(Vec::new()),
        );
        return target;
    };

    match &mapping.items {
        ArrayItems::Nested(properties) => {
            target.insert("items".into(), Value::Array(items.clone()));
            target.insert(
                "properties".into(),
                serde_json::to_value(properties).unwrap_or_default(),
            );
            target.insert(
                "pathToParent".into(),
                Value::String(mapping.path_to_parent.clone()),
            );
        }
        ArrayItems::Flat(object_mapping) => {
            let mapped = items
                .iter()
                .map(|item| Value::Object(build_from_object_mapping(item, object_mapping, None)))
                .collect();
            target.insert(mapping.target_property_name.clone(), Value::Array(mapped));
        }
        ArrayItems::Legacy => {
            target.insert(
                mapping.target_property_name.clone(),
                Value::Array(items.clone()),
            );
        }
    }

    merge_params(&mut target, params);
    target
}

/// Build the render props of one property against `data`.
///
/// A property without any mapping produces an empty object.
pub fn build_from_mapping(data: &Value, property: &PropertyConfig) -> Map<String, Value> {
    let params = property.params.as_ref();
    match &property.mapping {
        Some(Mapping::Object(mapping)) => build_from_object_mapping(data, mapping, params),
        Some(Mapping::Array(mapping)) => build_from_array_mapping(data, mapping, params),
        None => Map::new(),
    }
}

/// Render props for one item of a nested array, one entry per property.
///
/// This is the per-item re-entry a render layer performs for every element
/// it received from a nested [`ArrayMapping`].
pub fn build_nested_item(item: &Value, properties: &[PropertyConfig]) -> Vec<Map<String, Value>> {
    properties
        .iter()
        .map(|property| build_from_mapping(item, property))
        .collect()
}

fn merge_params(target: &mut Map<String, Value>, params: Option<&Params>) {
    if let Some(params) = params {
        for (key, value) in params {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::object_mapping;
    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_object_mapping_resolves_paths() {
        let data = json!({ "x": { "y": 5 } });
        let mapping = object_mapping([("a", "x.y")]);
        assert_eq!(
            Value::Object(build_from_object_mapping(&data, &mapping, None)),
            json!({ "a": 5 })
        );
    }

    #[test]
    fn test_object_mapping_unknown_path_is_null() {
        let data = json!({ "x": 1 });
        let mapping = object_mapping([("a", "nope.deeper")]);
        let target = build_from_object_mapping(&data, &mapping, None);
        assert!(target.contains_key("a"));
        assert_eq!(target["a"], Value::Null);
    }

    #[test]
    fn test_params_win_on_collision() {
        let data = json!({ "name": "Ada", "locked": false });
        let mapping = object_mapping([("value", "name"), ("readonly", "locked")]);
        let target = build_from_object_mapping(
            &data,
            &mapping,
            Some(&params(json!({ "readonly": true, "variant": "bold" }))),
        );
        assert_eq!(
            Value::Object(target),
            json!({ "value": "Ada", "readonly": true, "variant": "bold" })
        );
    }

    #[test]
    fn test_non_array_parent_yields_empty_target() {
        let cases = [
            ArrayMapping::legacy("list", "rows"),
            ArrayMapping::flat("list", "rows", object_mapping([("v", "name")])),
            ArrayMapping {
                target_property_name: "rows".into(),
                ..ArrayMapping::nested("list", vec![PropertyConfig::new("Name", "text")])
            },
        ];
        for data in [json!({ "list": { "a": 1 } }), json!({}), json!({ "list": null })] {
            for mapping in &cases {
                assert_eq!(
                    Value::Object(build_from_array_mapping(&data, mapping, None)),
                    json!({ "rows": [] })
                );
            }
        }
    }

    #[test]
    fn test_nested_properties_pass_items_through() {
        let raw_items = json!([{ "name": "a", "tags": ["x"] }, { "name": "b" }]);
        let data = json!({ "people": raw_items });
        let properties = vec![
            PropertyConfig::new("Name", "text").with_object_mapping(object_mapping([(
                "value", "name",
            )])),
        ];
        let mapping = ArrayMapping::nested("people", properties.clone());
        let target = build_from_array_mapping(
            &data,
            &mapping,
            Some(&params(json!({ "dense": true }))),
        );

        assert_eq!(target["items"], raw_items);
        assert_eq!(target["pathToParent"], json!("people"));
        assert_eq!(target["properties"], serde_json::to_value(&properties).unwrap());
        assert_eq!(target["dense"], json!(true));
    }

    #[test]
    fn test_flat_items_are_mapped() {
        let data = json!({ "tags": [{ "name": "red" }, { "name": "blue" }, {}] });
        let mapping = ArrayMapping::flat("tags", "chips", object_mapping([("label", "name")]));
        assert_eq!(
            Value::Object(build_from_array_mapping(&data, &mapping, None)),
            json!({ "chips": [{ "label": "red" }, { "label": "blue" }, { "label": null }] })
        );
    }

    #[test]
    fn test_legacy_passthrough() {
        let data = json!({ "items": ["a", "b"] });
        let property: PropertyConfig = serde_json::from_value(json!({
            "title": "Items",
            "component": "list",
            "arrayMapping": { "pathToParent": "items" }
        }))
        .unwrap();
        assert_eq!(
            Value::Object(build_from_mapping(&data, &property)),
            json!({ "items": ["a", "b"] })
        );
    }

    #[test]
    fn test_build_from_mapping_dispatch() {
        let data = json!({ "title.en": "Hello" });
        let flat = PropertyConfig::new("Title", "text")
            .with_object_mapping(object_mapping([("value", r"title\.en")]));
        assert_eq!(
            Value::Object(build_from_mapping(&data, &flat)),
            json!({ "value": "Hello" })
        );
        assert!(build_from_mapping(&data, &PropertyConfig::new("Empty", "text")).is_empty());
    }

    #[test]
    fn test_nested_item_reentry() {
        let data = json!({
            "groups": [
                { "name": "g1", "members": [{ "id": 1 }, { "id": 2 }] }
            ]
        });
        let members = PropertyConfig::new("Members", "table").with_array_mapping(
            ArrayMapping::nested(
                "members",
                vec![PropertyConfig::new("Id", "number")
                    .with_object_mapping(object_mapping([("value", "id")]))],
            ),
        );
        let name = PropertyConfig::new("Name", "text")
            .with_object_mapping(object_mapping([("value", "name")]));
        let outer = ArrayMapping::nested("groups", vec![name, members]);

        let props = build_from_array_mapping(&data, &outer, None);
        let item = &props["items"][0];
        let row = build_nested_item(item, outer.properties().unwrap());
        assert_eq!(row[0]["value"], json!("g1"));
        assert_eq!(row[1]["items"], json!([{ "id": 1 }, { "id": 2 }]));

        let inner = outer.properties().unwrap()[1]
            .array_mapping()
            .and_then(ArrayMapping::properties)
            .unwrap();
        let cells = build_nested_item(&row[1]["items"][1], inner);
        assert_eq!(cells[0]["value"], json!(2));
    }
}
