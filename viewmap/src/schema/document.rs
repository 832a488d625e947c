use std::sync::Arc;

use serde_json::{Map, Value};

use crate::view::ViewType;

/// An OpenAPI-shaped document whose `$ref`s are already resolved.
///
/// The document is immutable once built and cheap to share.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Arc<Value>,
}

impl SchemaDocument {
    pub fn new(root: Value) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths")?.as_object()
    }
}

impl From<Value> for SchemaDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Resolve the record schema behind a dataset path and view type.
///
/// The collection path is looked up as given, then prefixed with the
/// domain. Tables use the `get` response of the collection (unwrapping
/// arrays and paginated `items`), detail and edit views the single-record
/// path below it, and `new` the `post` request body. Without a
/// single-record path, detail views read one item of the collection
/// listing and edit views the collection's own `put`/`patch` body.
/// Returns `None` when the document has no matching operation; this is
/// never an error.
pub fn get_schema<'a>(
    document: &'a SchemaDocument,
    domain: &str,
    dataset_path: &str,
    view_type: ViewType,
) -> Option<&'a Value> {
    let paths = document.paths()?;
    let (collection_path, collection) = lookup_path(paths, domain, dataset_path)?;

    match view_type {
        ViewType::Table => list_items(response_schema(collection.get("get")?)?),
        ViewType::New => request_schema(collection.get("post")?),
        ViewType::Detail => match single_record(paths, collection_path) {
            Some(record) => response_schema(record.get("get")?),
            None => list_items(response_schema(collection.get("get")?)?),
        },
        ViewType::Edit => {
            let record = single_record(paths, collection_path).unwrap_or(collection);
            request_schema(record.get("put").or_else(|| record.get("patch"))?)
        }
        ViewType::Raw => None,
    }
}

fn lookup_path<'a>(
    paths: &'a Map<String, Value>,
    domain: &str,
    dataset_path: &str,
) -> Option<(&'a str, &'a Value)> {
    let trimmed = normalize(dataset_path);
    let prefixed = format!("/{}{}", domain.trim_matches('/'), trimmed);
    [trimmed.as_str(), prefixed.as_str()]
        .into_iter()
        .find_map(|wanted| {
            paths
                .iter()
                .find(|(key, _)| normalize(key) == wanted)
                .map(|(key, item)| (key.as_str(), item))
        })
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// The path item one `/{param}` segment below `collection_path`.
fn single_record<'a>(paths: &'a Map<String, Value>, collection_path: &str) -> Option<&'a Value> {
    let base = normalize(collection_path);
    paths.iter().find_map(|(key, item)| {
        let rest = normalize(key).strip_prefix(&base)?.strip_prefix('/')?.to_string();
        let is_param = rest.starts_with('{') && rest.ends_with('}') && !rest.contains('/');
        is_param.then_some(item)
    })
}

fn response_schema(operation: &Value) -> Option<&Value> {
    let responses = operation.get("responses")?;
    let response = responses.get("200").or_else(|| responses.get("201"))?;
    json_content_schema(response)
}

fn request_schema(operation: &Value) -> Option<&Value> {
    json_content_schema(operation.get("requestBody")?)
}

fn json_content_schema(holder: &Value) -> Option<&Value> {
    let content = holder.get("content")?.as_object()?;
    content
        .get("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(media, _)| media.contains("json"))
                .map(|(_, v)| v)
        })?
        .get("schema")
}

/// Row schema of a list response.
fn list_items(schema: &Value) -> Option<&Value> {
    if schema.get("type").and_then(Value::as_str) == Some("array") {
        return schema.get("items");
    }
    match schema.get("properties").and_then(|p| p.get("items")) {
        Some(page) if page.get("type").and_then(Value::as_str) == Some("array") => {
            page.get("items")
        }
        _ => Some(schema),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_schema(marker: &str) -> Value {
        json!({ "type": "object", "title": marker })
    }

    fn document() -> SchemaDocument {
        let ok = |schema: Value| json!({ "responses": { "200": { "content": { "application/json": { "schema": schema } } } } });
        let body = |schema: Value| json!({ "requestBody": { "content": { "application/json": { "schema": schema } } } });

        let mut collection_item = Map::new();
        collection_item.insert(
            "get".into(),
            ok(json!({ "type": "array", "items": record_schema("row") })),
        );
        collection_item.insert("post".into(), body(record_schema("create")));

        let mut record_item = Map::new();
        record_item.insert("get".into(), ok(record_schema("detail")));
        record_item.insert("patch".into(), body(record_schema("update")));

        let paged = ok(json!({
            "type": "object",
            "properties": {
                "items": { "type": "array", "items": record_schema("paged-row") },
                "total": { "type": "integer" }
            }
        }));

        SchemaDocument::new(json!({
            "openapi": "3.0.0",
            "paths": {
                "/datasets": Value::Object(collection_item),
                "/datasets/{datasetId}": Value::Object(record_item),
                "/datasets/{datasetId}/files": { "get": ok(record_schema("files")) },
                "/edm/persons/": { "get": paged }
            }
        }))
    }

    fn title(schema: Option<&Value>) -> Option<&str> {
        schema?.get("title")?.as_str()
    }

    #[test]
    fn test_view_types_pick_operations() {
        let doc = document();
        assert_eq!(title(get_schema(&doc, "catalog", "/datasets", ViewType::Table)), Some("row"));
        assert_eq!(title(get_schema(&doc, "catalog", "/datasets", ViewType::New)), Some("create"));
        assert_eq!(title(get_schema(&doc, "catalog", "datasets/", ViewType::Detail)), Some("detail"));
        assert_eq!(title(get_schema(&doc, "catalog", "/datasets", ViewType::Edit)), Some("update"));
        assert_eq!(get_schema(&doc, "catalog", "/datasets", ViewType::Raw), None);
    }

    #[test]
    fn test_domain_prefix_and_pagination() {
        let doc = document();
        assert_eq!(title(get_schema(&doc, "edm", "/persons", ViewType::Table)), Some("paged-row"));
    }

    #[test]
    fn test_detail_without_record_path_reads_list_items() {
        let doc = document();
        assert_eq!(title(get_schema(&doc, "edm", "/persons", ViewType::Detail)), Some("paged-row"));

        let collection_only = SchemaDocument::new(json!({
            "paths": {
                "/items": { "get": { "responses": { "200": { "content": { "application/json": {
                    "schema": { "type": "array", "items": record_schema("row") }
                } } } } } }
            }
        }));
        let schema = get_schema(&collection_only, "catalog", "/items", ViewType::Detail);
        assert_eq!(title(schema), Some("row"));
        assert_eq!(schema.unwrap()["type"], "object");
    }

    #[test]
    fn test_missing_is_none() {
        let doc = document();
        assert_eq!(get_schema(&doc, "catalog", "/unknown", ViewType::Table), None);
        assert_eq!(get_schema(&doc, "edm", "/persons", ViewType::Edit), None);
        assert_eq!(get_schema(&SchemaDocument::new(json!({})), "x", "/a", ViewType::Table), None);
    }
}
