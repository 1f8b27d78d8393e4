//! Per-class compile state.

use std::collections::BTreeSet;

use crate::markdown::MarkdownTables;
use crate::schema::SchemaNode;

/// State owned by the compile of one base class.
///
/// Created fresh for every class and passed by `&mut` through one call chain.
/// Property sets are keyed by schema property name.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    /// IRI of the class being compiled.
    pub base_class: String,
    /// The schema under construction.
    pub schema: SchemaNode,
    /// Base class plus every ancestor visited so far.
    pub processed_classes: BTreeSet<String>,
    /// Classes pointed to by object properties, restrictions or inheritance.
    pub referenced_classes: BTreeSet<String>,
    /// Properties with an exactly-one cardinality or declared functional.
    pub functional_properties: BTreeSet<String>,
    /// Properties whose range collapses to a fixed value set.
    pub enum_properties: BTreeSet<String>,
    /// Mirror of `schema.required`.
    pub required_properties: BTreeSet<String>,
    /// Properties that lost a positive `minItems` when made singular.
    pub mandatory_properties: BTreeSet<String>,
    /// Markdown annotation tables.
    pub markdown: MarkdownTables,
}

impl VisitorContext {
    pub fn new(base_class: &str, schema: SchemaNode) -> Self {
        Self {
            base_class: base_class.to_string(),
            schema,
            processed_classes: BTreeSet::from([base_class.to_string()]),
            ..Default::default()
        }
    }

    /// Re-derive the required accumulator from the schema.
    pub fn sync_required(&mut self) {
        self.required_properties = self.schema.required.clone();
    }

    /// Ancestors visited, excluding the base class.
    pub fn ancestors(&self) -> impl Iterator<Item = &String> {
        self.processed_classes
            .iter()
            .filter(move |c| **c != self.base_class)
    }

    /// Apply a property rename to every name-keyed set.
    pub(crate) fn rename_property(&mut self, from: &str, to: &str) {
        for set in [
            &mut self.functional_properties,
            &mut self.enum_properties,
            &mut self.mandatory_properties,
        ] {
            if set.remove(from) {
                set.insert(to.to_string());
            }
        }
        if self.schema.required.remove(from) {
            self.schema.required.insert(to.to_string());
        }
    }
}
