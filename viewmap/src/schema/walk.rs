use serde_json::Value;

use crate::path::{join_path, parse_index};

/// Segment denoting one level of array indirection.
pub const ARRAY_SEGMENT: &str = "[]";

/// A schema node met while walking a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaStep<'a> {
    pub schema: &'a Value,
    /// Dot-joined segments from the root up to and including this node.
    pub path_from_root: &'a str,
    /// The parent lists this node in its `required` array, or the node
    /// itself carries `required: true`.
    pub required: bool,
}

/// Owned storage behind [`SchemaStep`] paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaWalk<'a> {
    steps: Vec<(&'a Value, String, bool)>,
}

impl<'a> SchemaWalk<'a> {
    pub fn steps(&self) -> impl Iterator<Item = SchemaStep<'_>> {
        self.steps.iter().map(|(schema, path, required)| SchemaStep {
            schema: *schema,
            path_from_root: path.as_str(),
            required: *required,
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The deepest schema reached.
    pub fn leaf(&self) -> Option<&'a Value> {
        self.steps.last().map(|(schema, _, _)| *schema)
    }
}

/// Walk `root` one segment at a time.
///
/// `[]` and bare indices descend into `items`; every other segment into
/// `properties[segment]` (or the `properties` of an `allOf` member). The
/// walk stops at the first segment that cannot be resolved and returns the
/// nodes found so far. The root itself is not part of the result.
pub fn schemas_for_path<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> SchemaWalk<'a> {
    let mut steps = Vec::with_capacity(segments.len());
    let mut current = root;

    for (depth, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        let next = if segment == ARRAY_SEGMENT || parse_index(segment).is_some() {
            current.get("items").filter(|v| v.is_object()).map(|s| (s, false))
        } else {
            property_of(current, segment)
        };

        let Some((schema, listed_required)) = next else {
            trace!(
                "schema walk stopped at `{}`",
                join_path(&segments[..=depth])
            );
            break;
        };

        let required = listed_required || schema.get("required") == Some(&Value::Bool(true));
        steps.push((schema, join_path(&segments[..=depth]), required));
        current = schema;
    }

    SchemaWalk { steps }
}

/// Look up a property schema, including through `allOf` members.
///
/// Also reports whether the owning schema lists the property as required.
fn property_of<'a>(schema: &'a Value, name: &str) -> Option<(&'a Value, bool)> {
    if let Some(found) = schema.get("properties").and_then(|p| p.get(name)) {
        return Some((found, lists_required(schema, name)));
    }
    schema
        .get("allOf")?
        .as_array()?
        .iter()
        .find_map(|member| property_of(member, name))
        .map(|(found, required)| (found, required || lists_required(schema, name)))
}

fn lists_required(schema: &Value, name: &str) -> bool {
    schema
        .get("required")
        .and_then(Value::as_array)
        .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["Foo"],
            "properties": {
                "Foo": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "Bar": { "type": "string", "required": true }
                        }
                    }
                },
                "Meta": {
                    "allOf": [
                        { "properties": { "created": { "type": "string" } } }
                    ],
                    "required": ["created"]
                }
            }
        })
    }

    fn paths(walk: &SchemaWalk<'_>) -> Vec<String> {
        walk.steps().map(|s| s.path_from_root.to_string()).collect()
    }

    #[test]
    fn test_array_segment_descends_into_items() {
        let root = schema();
        let walk = schemas_for_path(&root, &["Foo", "[]", "Bar"]);
        assert_eq!(paths(&walk), vec!["Foo", "Foo.[]", "Foo.[].Bar"]);
        assert_eq!(walk.leaf(), Some(&json!({ "type": "string", "required": true })));
        let required: Vec<_> = walk.steps().map(|s| s.required).collect();
        assert_eq!(required, vec![true, false, true]);
    }

    #[test]
    fn test_index_segment_descends_into_items() {
        let root = schema();
        let walk = schemas_for_path(&root, &["Foo", "3", "Bar"]);
        assert_eq!(walk.len(), 3);
    }

    #[test]
    fn test_single_segment_array_name_does_not_resolve() {
        let root = schema();
        let walk = schemas_for_path(&root, &["Foo[]", "Bar"]);
        assert!(walk.is_empty());
    }

    #[test]
    fn test_partial_path_stops_early() {
        let root = schema();
        let walk = schemas_for_path(&root, &["Foo", "Bar"]);
        assert_eq!(paths(&walk), vec!["Foo"]);
        assert!(schemas_for_path(&root, &["Missing", "x"]).is_empty());
    }

    #[test]
    fn test_all_of_members() {
        let root = schema();
        let walk = schemas_for_path(&root, &["Meta", "created"]);
        assert_eq!(walk.len(), 2);
        assert!(walk.steps().last().unwrap().required);
    }
}
