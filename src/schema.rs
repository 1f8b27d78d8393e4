//! In-memory schema tree produced by the compiler.
//!
//! A [`SchemaNode`] serializes to the OpenAPI 3 schema object shape. Property
//! maps and required sets are ordered so output is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::types::COMPONENT_REF_PREFIX;

/// JSON Schema primitive types used by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

/// A schema object.
///
/// Invariant: an enum node (with `enum_values`) carries no properties and no
/// required list. Use [`SchemaNode::set_enum_values`] and
/// [`SchemaNode::insert_property`] to keep it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Component name. Not serialized: it is the key in the components map.
    #[serde(skip)]
    pub name: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
}

impl SchemaNode {
    /// An empty schema of the given type.
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// A typed schema with a format (e.g. `string` + `date-time`).
    pub fn formatted(schema_type: SchemaType, format: &str) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    /// A `$ref` to another component schema.
    pub fn reference(schema_name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", COMPONENT_REF_PREFIX, schema_name)),
            ..Default::default()
        }
    }

    /// An array schema wrapping `items`.
    pub fn array_of(items: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// The component name this node references, if it is a `$ref`.
    pub fn referenced_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(COMPONENT_REF_PREFIX))
    }

    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array)
    }

    /// Turn this node into an enum node, dropping properties and required.
    pub fn set_enum_values(&mut self, values: Vec<Value>) {
        self.properties.clear();
        self.required.clear();
        self.enum_values = Some(values);
    }

    /// Insert a property unless this is an enum node.
    ///
    /// Returns false when the property was rejected.
    pub fn insert_property(&mut self, name: impl Into<String>, property: SchemaNode) -> bool {
        if self.is_enum() {
            return false;
        }
        self.properties.insert(name.into(), property);
        true
    }

    /// The schema describing a single value: `items` for arrays, else self.
    pub fn value_schema(&self) -> &SchemaNode {
        match &self.items {
            Some(items) if self.is_array() => items,
            _ => self,
        }
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
