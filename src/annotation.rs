//! Annotation-derived property flags and descriptions.
//!
//! Three configured annotation names map to schema keywords:
//!
//! | Role | Keyword | Applies to |
//! |------|---------|------------|
//! | `read_only` | `readOnly: true` | object and data properties |
//! | `write_only` | `writeOnly: true` | object and data properties |
//! | `example` | `example: <literal>` | data properties only |

use serde_json::Value;

use crate::config::{AnnotationConfig, SchemaOptions};
use crate::ontology::{Annotation, ClassExpression, Ontology, PropertyKind, SubClassAxiom};
use crate::restriction::classify;
use crate::schema::{SchemaNode, SchemaType};
use crate::types::{annotation_name_matches, DEFAULT_DESCRIPTION};

/// Look up the description of an entity.
///
/// Tries each configured description property in order. Falls back to
/// [`DEFAULT_DESCRIPTION`] when `default_descriptions` is set, else `None`.
pub fn lookup_description(
    entity: &str,
    ontology: &dyn Ontology,
    options: &SchemaOptions,
) -> Option<String> {
    let annotations = ontology.annotations(entity);
    let found = options.description_properties.iter().find_map(|wanted| {
        annotations
            .iter()
            .find(|a| annotation_name_matches(&a.property, wanted))
            .map(|a| a.value.clone())
    });

    match found {
        Some(description) => Some(description),
        None if options.default_descriptions => {
            log::debug!("no description for {}, using default", entity);
            Some(DEFAULT_DESCRIPTION.to_string())
        }
        None => None,
    }
}

/// Apply annotations declared on a property entity to its schema.
///
/// No-op when `schema` or `config` is absent, or when `property` is not a
/// declared object or data property.
pub fn apply_entity_annotations(
    schema: Option<&mut SchemaNode>,
    property: &str,
    ontology: &dyn Ontology,
    options: &SchemaOptions,
    config: Option<&AnnotationConfig>,
) {
    let (Some(schema), Some(config)) = (schema, config) else {
        return;
    };
    let Some((kind, _)) = ontology.find_property(property) else {
        return;
    };

    if schema.description.is_none() {
        schema.description = lookup_description(property, ontology, options);
    }

    apply_flags(
        schema,
        ontology.annotations(property),
        config,
        kind == PropertyKind::Data,
    );
}

/// Apply annotations declared on a subclass axiom to the property that
/// `restriction` restricts.
///
/// `restriction` is the axiom's superclass or a restriction nested in it;
/// its kind decides whether examples apply. No-op when `config` is absent
/// or `schema` has no property named `property_name`.
pub fn apply_axiom_annotations(
    schema: &mut SchemaNode,
    axiom: &SubClassAxiom,
    restriction: &ClassExpression,
    property_name: &str,
    config: Option<&AnnotationConfig>,
) {
    let Some(config) = config else {
        return;
    };
    let Some(property) = schema.properties.get_mut(property_name) else {
        return;
    };

    let is_data = classify(restriction).is_data();
    apply_flags(property, &axiom.annotations, config, is_data);
}

fn apply_flags(
    schema: &mut SchemaNode,
    annotations: &[Annotation],
    config: &AnnotationConfig,
    allow_example: bool,
) {
    for annotation in annotations {
        if annotation_name_matches(&annotation.property, &config.read_only) {
            schema.read_only = Some(true);
        }
        if annotation_name_matches(&annotation.property, &config.write_only) {
            schema.write_only = Some(true);
        }
        if allow_example && annotation_name_matches(&annotation.property, &config.example) {
            schema.example = Some(typed_example(schema, &annotation.value));
        }
    }
}

/// Convert a literal into a JSON value matching the schema's value type.
fn typed_example(schema: &SchemaNode, literal: &str) -> Value {
    let literal = literal.trim();
    let typed = match schema.value_schema().schema_type {
        Some(SchemaType::Integer) => literal.parse::<i64>().ok().map(Value::from),
        Some(SchemaType::Number) => literal
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Some(SchemaType::Boolean) => literal.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    typed.unwrap_or_else(|| Value::String(literal.to_string()))
}
