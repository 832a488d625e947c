//! Capability table of the UI components a property can name.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a UI component is able to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCapabilities {
    /// Whether the component can render inside a table cell.
    #[serde(default)]
    pub supports_table_view: bool,
}

impl ComponentCapabilities {
    pub const TABLE: Self = Self {
        supports_table_view: true,
    };
    pub const DETAIL_ONLY: Self = Self {
        supports_table_view: false,
    };
}

/// Registry mapping component identifiers to their capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentCapabilities>,
}

impl ComponentRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) a component.
    pub fn register(&mut self, id: &str, capabilities: ComponentCapabilities) {
        self.components.insert(id.to_string(), capabilities);
    }

    pub fn get(&self, id: &str) -> Option<ComponentCapabilities> {
        self.components.get(id).copied()
    }

    /// Whether `id` is known and renders inside a table.
    pub fn supports_table_view(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.supports_table_view)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }
}

impl Default for ComponentRegistry {
    /// Creates a registry populated with the built-in components.
    fn default() -> Self {
        let mut registry = Self::new();
        for id in [
            "text", "number", "date", "boolean", "link", "chips", "list", "table", "image",
        ] {
            registry.register(id, ComponentCapabilities::TABLE);
        }
        for id in ["geometry", "keyValue", "json", "richText", "additionalProperties"] {
            registry.register(id, ComponentCapabilities::DETAIL_ONLY);
        }
        registry
    }
}

impl FromIterator<(String, ComponentCapabilities)> for ComponentRegistry {
    fn from_iter<T: IntoIterator<Item = (String, ComponentCapabilities)>>(iter: T) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
