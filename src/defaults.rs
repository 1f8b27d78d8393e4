//! Baseline properties added to every class schema.

use std::collections::BTreeMap;

use crate::schema::{SchemaNode, SchemaType};

/// The fixed default-property catalog, keyed by property name.
///
/// `id` is a non-nullable integer; `label`, `type` and `description` are
/// nullable string arrays; `eventDateTime`, `isBool` and `quantity` are
/// nullable typed examples.
pub fn default_properties() -> BTreeMap<String, SchemaNode> {
    let mut props = BTreeMap::new();

    let mut id = SchemaNode::typed(SchemaType::Integer);
    id.nullable = Some(false);
    id.description = Some("identifier".to_string());
    props.insert("id".to_string(), id);

    props.insert(
        "label".to_string(),
        nullable_strings("short description of the resource"),
    );
    props.insert("type".to_string(), nullable_strings("type of the resource"));
    props.insert(
        "description".to_string(),
        nullable_strings("small description"),
    );

    props.insert(
        "eventDateTime".to_string(),
        nullable_array(
            SchemaNode::formatted(SchemaType::String, "date-time"),
            "a date-time",
        ),
    );
    props.insert(
        "isBool".to_string(),
        nullable_array(SchemaNode::typed(SchemaType::Boolean), "a boolean"),
    );
    props.insert(
        "quantity".to_string(),
        nullable_array(
            SchemaNode::formatted(SchemaType::Number, "float"),
            "a number",
        ),
    );

    props
}

fn nullable_strings(description: &str) -> SchemaNode {
    nullable_array(SchemaNode::typed(SchemaType::String), description)
}

fn nullable_array(items: SchemaNode, description: &str) -> SchemaNode {
    let mut node = SchemaNode::array_of(items);
    node.nullable = Some(true);
    node.description = Some(description.to_string());
    node
}

/// Merge the default catalog into `schema` without overwriting properties
/// the ontology already supplied. Enum schemas are left untouched.
pub fn merge_default_properties(schema: &mut SchemaNode) {
    if schema.is_enum() {
        return;
    }
    for (name, property) in default_properties() {
        schema.properties.entry(name).or_insert(property);
    }
}

/// Whether `node` is still the untouched default catalog entry for `name`.
pub fn is_default_property(name: &str, node: &SchemaNode) -> bool {
    default_properties().get(name) == Some(node)
}
