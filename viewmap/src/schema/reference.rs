use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::mapping::{Mapping, PropertyConfig, ReferenceInfo};

static ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+/([^/?]+)").expect("origin pattern is valid"));

/// Collection name following the version prefix of an API URL.
///
/// `https://host/api/v2/persons/{id}?x=1` yields `persons`. Anything that
/// does not match yields the empty string.
pub fn extract_origin(url: &str) -> String {
    ORIGIN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Reference metadata for a property whose `params.url` is set.
pub fn derive_reference_info(property: &PropertyConfig) -> Option<ReferenceInfo> {
    let url = property.param_str("url")?;

    let from = match &property.mapping {
        Some(Mapping::Object(object)) => object.get("value").or_else(|| object.get("items")),
        Some(Mapping::Array(array)) => Some(&array.path_to_parent),
        None => None,
    };

    let reference_detail_view_urls = property
        .params
        .as_ref()
        .and_then(|p| p.get("referenceDetailViewUrls"))
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ReferenceInfo {
        from: from.cloned(),
        origin: extract_origin(url),
        url: url.to_string(),
        reference_detail_view_urls,
    })
}
