//! Locale-placeholder substitution over whole view trees.
//!
//! Field paths of the localized domain embed a language placeholder
//! (`title.${lang}`). Before building render props the tree is rewritten
//! for the active language: every path inside every mapping, at every
//! nesting depth, goes through the supplied replacers. Other domains pass
//! through untouched.

use crate::{
    config::{DEFAULT_LANGUAGE_PLACEHOLDER, DEFAULT_LOCALIZED_DOMAIN, EngineConfig},
    mapping::{ArrayItems, ArrayMapping, Mapping, ObjectMapping, PropertyConfig},
    view::{TableView, ViewConfig},
};

/// Substitution pass bound to the one domain whose paths are localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSubstitution {
    localized_domain: String,
}

impl Default for LocaleSubstitution {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALIZED_DOMAIN)
    }
}

impl LocaleSubstitution {
    pub fn new(localized_domain: &str) -> Self {
        Self {
            localized_domain: localized_domain.to_string(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.localized_domain)
    }

    pub fn localized_domain(&self) -> &str {
        &self.localized_domain
    }

    /// Rewrite `view` for `domain`.
    ///
    /// Returns `None` when either input is absent and the view unchanged
    /// for any domain but the localized one, and for `raw` views.
    pub fn apply<S, O>(
        &self,
        domain: Option<&str>,
        view: Option<&ViewConfig>,
        string_replacer: S,
        object_value_replacer: O,
    ) -> Option<ViewConfig>
    where
        S: Fn(&str) -> String,
        O: Fn(&ObjectMapping) -> ObjectMapping,
    {
        let (domain, view) = (domain?, view?);
        if domain != self.localized_domain {
            return Some(view.clone());
        }

        let replace = |p: &PropertyConfig| {
            replace_mappings(p, &string_replacer, &object_value_replacer)
        };

        Some(match view {
            ViewConfig::Table(table) => ViewConfig::Table(TableView {
                elements: table.elements.iter().map(replace).collect(),
            }),
            ViewConfig::Raw(_) => view.clone(),
            _ => view
                .map_record(|record| record.map_properties(replace))
                .unwrap_or_else(|| view.clone()),
        })
    }

    /// Rewrite `view` for `language` with a [`LanguageReplacer`].
    pub fn apply_language(
        &self,
        domain: Option<&str>,
        view: Option<&ViewConfig>,
        replacer: &LanguageReplacer,
    ) -> Option<ViewConfig> {
        self.apply(
            domain,
            view,
            |s| replacer.replace_str(s),
            |o| replacer.replace_object(o),
        )
    }
}

/// [`LocaleSubstitution::apply`] for the default localized domain.
pub fn substitute<S, O>(
    domain: Option<&str>,
    view: Option<&ViewConfig>,
    string_replacer: S,
    object_value_replacer: O,
) -> Option<ViewConfig>
where
    S: Fn(&str) -> String,
    O: Fn(&ObjectMapping) -> ObjectMapping,
{
    LocaleSubstitution::default().apply(domain, view, string_replacer, object_value_replacer)
}

/// Rewrite the mapping of one property, recursing into nested properties.
///
/// The result never carries both an object and an array mapping, and
/// nested property lists are rebuilt rather than edited in place.
pub fn replace_mappings<S, O>(
    property: &PropertyConfig,
    string_replacer: &S,
    object_value_replacer: &O,
) -> PropertyConfig
where
    S: Fn(&str) -> String,
    O: Fn(&ObjectMapping) -> ObjectMapping,
{
    let mapping = match &property.mapping {
        Some(Mapping::Object(object)) => Mapping::Object(object_value_replacer(object)),
        Some(Mapping::Array(array)) => Mapping::Array(ArrayMapping {
            path_to_parent: string_replacer(&array.path_to_parent),
            target_property_name: array.target_property_name.clone(),
            items: match &array.items {
                ArrayItems::Flat(object) => ArrayItems::Flat(object_value_replacer(object)),
                ArrayItems::Nested(properties) => ArrayItems::Nested(
                    properties
                        .iter()
                        .map(|p| replace_mappings(p, string_replacer, object_value_replacer))
                        .collect(),
                ),
                ArrayItems::Legacy => ArrayItems::Legacy,
            },
        }),
        None => return property.clone(),
    };

    PropertyConfig {
        mapping: Some(mapping),
        ..property.clone()
    }
}

/// Stock replacer pair swapping a placeholder for a language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReplacer {
    placeholder: String,
    language: String,
}

impl LanguageReplacer {
    pub fn new(placeholder: &str, language: &str) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            language: language.to_string(),
        }
    }

    /// Replacer for the default `${lang}` placeholder.
    pub fn for_language(language: &str) -> Self {
        Self::new(DEFAULT_LANGUAGE_PLACEHOLDER, language)
    }

    pub fn from_config(config: &EngineConfig, language: Option<&str>) -> Self {
        Self::new(
            &config.language_placeholder,
            language.unwrap_or(&config.default_language),
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn replace_str(&self, value: &str) -> String {
        if self.placeholder.is_empty() {
            return value.to_string();
        }
        value.replace(&self.placeholder, &self.language)
    }

    /// Replace the placeholder in every value of `mapping`; keys are kept.
    pub fn replace_object(&self, mapping: &ObjectMapping) -> ObjectMapping {
        mapping
            .iter()
            .map(|(k, v)| (k.clone(), self.replace_str(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::object_mapping;
    use serde_json::json;

    fn replacer() -> LanguageReplacer {
        LanguageReplacer::for_language("de")
    }

    fn sub(view: &ViewConfig, domain: &str) -> Option<ViewConfig> {
        let r = replacer();
        substitute(
            Some(domain),
            Some(view),
            |s| r.replace_str(s),
            |o| r.replace_object(o),
        )
    }

    fn detail_view() -> ViewConfig {
        serde_json::from_value(json!({
            "type": "detail",
            "elements": [{
                "subcategories": [{
                    "properties": [
                        { "title": "Title", "component": "text", "objectMapping": { "value": "title.${lang}" } },
                        {
                            "title": "Keywords",
                            "component": "chips",
                            "arrayMapping": {
                                "pathToParent": "keywords.${lang}",
                                "targetPropertyName": "chips",
                                "objectMapping": { "label": "label.${lang}" }
                            }
                        },
                        { "title": "Id", "component": "text" }
                    ]
                }],
                "subElements": [{
                    "subcategories": [{
                        "properties": [
                            { "title": "Note", "component": "text", "objectMapping": { "value": "note.${lang}" } }
                        ]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    /// Nested array mappings `depth` levels deep, each with a placeholder.
    fn nested_property(depth: usize) -> PropertyConfig {
        let leaf = PropertyConfig::new("Leaf", "text")
            .with_object_mapping(object_mapping([("value", "name.${lang}")]));
        (0..depth).fold(leaf, |inner, level| {
            PropertyConfig::new(&format!("Level{level}"), "table").with_array_mapping(
                ArrayMapping::nested(&format!("level{level}.${{lang}}"), vec![inner]),
            )
        })
    }

    #[test]
    fn test_absent_inputs() {
        let view = detail_view();
        assert!(substitute(None, Some(&view), |s| s.to_string(), |o| o.clone()).is_none());
        assert!(substitute(Some("edm"), None, |s| s.to_string(), |o| o.clone()).is_none());
    }

    #[test]
    fn test_other_domains_pass_through() {
        let view = detail_view();
        assert_eq!(sub(&view, "catalog"), Some(view));
    }

    #[test]
    fn test_record_view_is_rewritten() {
        let view = sub(&detail_view(), "edm").unwrap();
        let record = view.record().unwrap();
        let props = record.properties();

        assert_eq!(
            props[0].object_mapping(),
            Some(&object_mapping([("value", "title.de")]))
        );
        let keywords = props[1].array_mapping().unwrap();
        assert_eq!(keywords.path_to_parent, "keywords.de");
        assert_eq!(keywords.target_property_name, "chips");
        assert_eq!(
            keywords.object_mapping(),
            Some(&object_mapping([("label", "label.de")]))
        );
        assert_eq!(props[2], &PropertyConfig::new("Id", "text"));
        assert_eq!(
            props[3].object_mapping(),
            Some(&object_mapping([("value", "note.de")]))
        );
    }

    #[test]
    fn test_table_view_is_rewritten() {
        let view: ViewConfig = serde_json::from_value(json!({
            "type": "table",
            "elements": [
                { "title": "Title", "component": "text", "objectMapping": { "value": "title.${lang}" } },
                { "title": "Tags", "component": "list", "arrayMapping": { "pathToParent": "tags.${lang}" } }
            ]
        }))
        .unwrap();
        let ViewConfig::Table(table) = sub(&view, "edm").unwrap() else {
            panic!("expected table view");
        };
        assert_eq!(table.elements[0].object_mapping().unwrap()["value"], "title.de");
        let tags = table.elements[1].array_mapping().unwrap();
        assert_eq!(tags.path_to_parent, "tags.de");
        assert_eq!(tags.items, ArrayItems::Legacy);
    }

    #[test]
    fn test_raw_view_opts_out() {
        let view: ViewConfig =
            serde_json::from_value(json!({ "type": "raw", "path": "title.${lang}" })).unwrap();
        assert_eq!(sub(&view, "edm"), Some(view));
    }

    #[test]
    fn test_deep_nesting_is_fully_walked() {
        let r = replacer();
        let out = replace_mappings(&nested_property(4), &|s: &str| r.replace_str(s), &|o: &ObjectMapping| {
            r.replace_object(o)
        });

        let mut current = &out;
        let mut depth = 0;
        while let Some(array) = current.array_mapping() {
            assert!(!array.path_to_parent.contains("${lang}"));
            assert!(array.path_to_parent.ends_with(".de"));
            assert!(current.object_mapping().is_none());
            current = &array.properties().unwrap()[0];
            depth += 1;
        }
        assert_eq!(depth, 4);
        assert_eq!(current.object_mapping().unwrap()["value"], "name.de");
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let once = sub(&detail_view(), "edm").unwrap();
        let twice = sub(&once, "edm").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_language_replacer_from_config() {
        let config = EngineConfig::default();
        let r = LanguageReplacer::from_config(&config, None);
        assert_eq!(r.language(), "en");
        assert_eq!(r.replace_str("a.${lang}.b"), "a.en.b");
        assert_eq!(
            LanguageReplacer::new("", "fr").replace_str("x.${lang}"),
            "x.${lang}"
        );
    }
}
