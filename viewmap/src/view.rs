//! View configuration trees.
//!
//! A view is either a table (one property per column) or a single-record
//! view (`detail`, `edit`, `new`) made of categories, subcategories and
//! properties. `raw` views are opaque and skip every transformation.
//!
//! The tree is generic over its property type so the same shape can hold
//! authored [`RawPropertyConfig`]s for validation and checked
//! [`PropertyConfig`]s for everything else.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::ConfigError,
    mapping::{PropertyConfig, RawPropertyConfig},
    mapping::raw::child_path,
};

/// View configuration tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewConfig<P = PropertyConfig> {
    Table(TableView<P>),
    Detail(RecordView<P>),
    Edit(RecordView<P>),
    New(RecordView<P>),
    /// Opaque view, never transformed.
    Raw(Map<String, Value>),
}

/// View configuration as authored.
pub type RawViewConfig = ViewConfig<RawPropertyConfig>;

/// Kind of a view, used to pick the matching schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    Table,
    Detail,
    Edit,
    New,
    Raw,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViewType::Table => "table",
            ViewType::Detail => "detail",
            ViewType::Edit => "edit",
            ViewType::New => "new",
            ViewType::Raw => "raw",
        };
        f.write_str(s)
    }
}

/// Table view: one property per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView<P = PropertyConfig> {
    pub elements: Vec<P>,
}

/// Single-record view made of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView<P = PropertyConfig> {
    pub elements: Vec<Category<P>>,
}

/// Top-level group of a record view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "P: Deserialize<'de>"))]
pub struct Category<P = PropertyConfig> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "Vec::new")]
    pub subcategories: Vec<Subcategory<P>>,
    /// Independently addressable nested groups, e.g. plug-in blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_elements: Option<Vec<Category<P>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory<P = PropertyConfig> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "Vec::new")]
    pub properties: Vec<P>,
}

impl<P> ViewConfig<P> {
    pub fn view_type(&self) -> ViewType {
        match self {
            ViewConfig::Table(_) => ViewType::Table,
            ViewConfig::Detail(_) => ViewType::Detail,
            ViewConfig::Edit(_) => ViewType::Edit,
            ViewConfig::New(_) => ViewType::New,
            ViewConfig::Raw(_) => ViewType::Raw,
        }
    }

    /// Record view body, if this is a single-record view.
    pub fn record(&self) -> Option<&RecordView<P>> {
        match self {
            ViewConfig::Detail(r) | ViewConfig::Edit(r) | ViewConfig::New(r) => Some(r),
            _ => None,
        }
    }

    /// Rebuild the record body of a single-record view, keeping its type.
    pub fn map_record<Q, F>(&self, f: F) -> Option<ViewConfig<Q>>
    where
        F: FnOnce(&RecordView<P>) -> RecordView<Q>,
    {
        match self {
            ViewConfig::Detail(r) => Some(ViewConfig::Detail(f(r))),
            ViewConfig::Edit(r) => Some(ViewConfig::Edit(f(r))),
            ViewConfig::New(r) => Some(ViewConfig::New(f(r))),
            _ => None,
        }
    }
}

impl<P> Category<P> {
    /// Rebuild every property of this category and its sub-elements.
    pub fn map_properties<Q, F>(&self, f: &mut F) -> Category<Q>
    where
        F: FnMut(&P) -> Q,
    {
        Category {
            title: self.title.clone(),
            subcategories: self
                .subcategories
                .iter()
                .map(|sub| Subcategory {
                    title: sub.title.clone(),
                    properties: sub.properties.iter().map(&mut *f).collect(),
                })
                .collect(),
            sub_elements: self
                .sub_elements
                .as_ref()
                .map(|subs| subs.iter().map(|c| c.map_properties(f)).collect()),
        }
    }

    /// Visit every property together with its diagnostic path.
    pub fn visit_properties<F>(&self, path: &str, f: &mut F)
    where
        F: FnMut(&str, &[P]),
    {
        for (j, sub) in self.subcategories.iter().enumerate() {
            let sub_path = child_path(path, &format!("subcategories[{j}]"));
            f(&child_path(&sub_path, "properties"), &sub.properties);
        }
        for (k, nested) in self.sub_elements.iter().flatten().enumerate() {
            nested.visit_properties(&child_path(path, &format!("subElements[{k}]")), f);
        }
    }
}

impl<P> RecordView<P> {
    pub fn map_properties<Q, F>(&self, mut f: F) -> RecordView<Q>
    where
        F: FnMut(&P) -> Q,
    {
        RecordView {
            elements: self
                .elements
                .iter()
                .map(|c| c.map_properties(&mut f))
                .collect(),
        }
    }

    /// All properties of the view in document order.
    pub fn properties(&self) -> Vec<&P> {
        fn collect<'a, P>(category: &'a Category<P>, out: &mut Vec<&'a P>) {
            for sub in &category.subcategories {
                out.extend(sub.properties.iter());
            }
            for nested in category.sub_elements.iter().flatten() {
                collect(nested, out);
            }
        }

        let mut out = Vec::new();
        for category in &self.elements {
            collect(category, &mut out);
        }
        out
    }
}

impl TryFrom<RawViewConfig> for ViewConfig {
    type Error = ConfigError;

    fn try_from(raw: RawViewConfig) -> Result<Self, Self::Error> {
        fn convert_all(
            properties: Vec<RawPropertyConfig>,
            path: &str,
        ) -> Result<Vec<PropertyConfig>, ConfigError> {
            properties
                .into_iter()
                .enumerate()
                .map(|(i, p)| p.into_typed(&child_path(path, &format!("[{i}]"))))
                .collect()
        }

        fn convert_category(
            category: Category<RawPropertyConfig>,
            path: &str,
        ) -> Result<Category, ConfigError> {
            let mut subcategories = Vec::with_capacity(category.subcategories.len());
            for (j, sub) in category.subcategories.into_iter().enumerate() {
                let sub_path = child_path(path, &format!("subcategories[{j}]"));
                subcategories.push(Subcategory {
                    title: sub.title,
                    properties: convert_all(sub.properties, &child_path(&sub_path, "properties"))?,
                });
            }
            let sub_elements = match category.sub_elements {
                Some(subs) => Some(
                    subs.into_iter()
                        .enumerate()
                        .map(|(k, c)| {
                            convert_category(c, &child_path(path, &format!("subElements[{k}]")))
                        })
                        .collect::<Result<_, _>>()?,
                ),
                None => None,
            };
            Ok(Category {
                title: category.title,
                subcategories,
                sub_elements,
            })
        }

        fn convert_record(record: RecordView<RawPropertyConfig>) -> Result<RecordView, ConfigError> {
            Ok(RecordView {
                elements: record
                    .elements
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| convert_category(c, &format!("elements[{i}]")))
                    .collect::<Result<_, _>>()?,
            })
        }

        Ok(match raw {
            ViewConfig::Table(table) => ViewConfig::Table(TableView {
                elements: convert_all(table.elements, "elements")?,
            }),
            ViewConfig::Detail(r) => ViewConfig::Detail(convert_record(r)?),
            ViewConfig::Edit(r) => ViewConfig::Edit(convert_record(r)?),
            ViewConfig::New(r) => ViewConfig::New(convert_record(r)?),
            ViewConfig::Raw(map) => ViewConfig::Raw(map),
        })
    }
}
