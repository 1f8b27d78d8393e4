//! Base class schemas and cardinality-derived requiredness.

use std::collections::BTreeSet;

use crate::annotation::lookup_description;
use crate::config::SchemaOptions;
use crate::defaults::merge_default_properties;
use crate::error::CompileError;
use crate::ontology::Ontology;
use crate::schema::{SchemaNode, SchemaType};
use crate::types::local_name;

/// Schema name of a class: its local name qualified by the ontology prefix
/// whose namespace it belongs to.
///
/// The default prefix (`""` or `":"`) yields the bare local name; any other
/// prefix yields `prefix-LocalName`. A class outside every registered
/// namespace falls back to its local name.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when the ontology has no
/// prefix map, or an empty one.
pub fn prefixed_name(class: &str, ontology: &dyn Ontology) -> Result<String, CompileError> {
    let prefixes = ontology
        .prefixes()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CompileError::MissingPrefixFormat {
            ontology: ontology.iri().to_string(),
            class: class.to_string(),
        })?;

    // Longest namespace wins so nested namespaces resolve deterministically.
    let best = prefixes
        .iter()
        .filter(|(_, namespace)| !namespace.is_empty() && class.starts_with(namespace.as_str()))
        .max_by_key(|(_, namespace)| namespace.len());

    let Some((prefix, namespace)) = best else {
        log::debug!("{} matches no registered prefix, using local name", class);
        return Ok(local_name(class).to_string());
    };

    let local = match &class[namespace.len()..] {
        "" => local_name(class),
        rest => rest,
    };
    let prefix = prefix.trim_end_matches(':');
    if prefix.is_empty() {
        Ok(local.to_string())
    } else {
        Ok(format!("{}-{}", prefix, local))
    }
}

/// Create the base object schema of a class: name, type, description and,
/// when enabled, the default properties.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when the class cannot be named.
pub fn base_class_schema(
    class: &str,
    ontology: &dyn Ontology,
    options: &SchemaOptions,
) -> Result<SchemaNode, CompileError> {
    let mut schema = SchemaNode::typed(SchemaType::Object);
    schema.name = Some(prefixed_name(class, ontology)?);
    schema.description = lookup_description(class, ontology, options);

    if options.default_properties {
        merge_default_properties(&mut schema);
    }

    Ok(schema)
}

/// Recompute `required` and `nullable` for every property of `schema`.
///
/// A property with a positive `minItems`, or listed in `mandatory`, is
/// non-nullable and required. Every other property is nullable, and
/// required when it is in `functional`.
pub fn generate_required_properties(
    schema: &mut SchemaNode,
    functional: &BTreeSet<String>,
    mandatory: &BTreeSet<String>,
) {
    let mut required = BTreeSet::new();

    for (name, property) in schema.properties.iter_mut() {
        let has_minimum = property.min_items.unwrap_or(0) > 0 || mandatory.contains(name);
        if has_minimum {
            property.nullable = Some(false);
            required.insert(name.clone());
        } else {
            property.nullable = Some(true);
            if functional.contains(name) {
                required.insert(name.clone());
            }
        }
    }

    schema.required = required;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Annotation, ClassDecl, OntologyDocument};
    use crate::types::DEFAULT_DESCRIPTION;
    use std::collections::BTreeMap;

    const EX: &str = "https://w3id.org/example#";

    fn ontology(prefixes: Option<BTreeMap<String, String>>) -> OntologyDocument {
        OntologyDocument {
            iri: "https://w3id.org/example".into(),
            prefixes,
            classes: vec![ClassDecl {
                iri: format!("{}Person", EX),
                annotations: vec![Annotation::new(
                    "http://www.w3.org/2004/02/skos/core#definition",
                    "A human being",
                )],
            }],
            ..Default::default()
        }
    }

    fn prefixes(entries: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn prefixed_name_uses_registered_prefix() {
        let onto = ontology(prefixes(&[("ex", EX), ("", "https://other.org/#")]));
        assert_eq!(
            prefixed_name(&format!("{}Person", EX), &onto).unwrap(),
            "ex-Person"
        );
        assert_eq!(
            prefixed_name("https://other.org/#Dog", &onto).unwrap(),
            "Dog"
        );
        assert_eq!(
            prefixed_name("https://unknown.org/Cat", &onto).unwrap(),
            "Cat"
        );
    }

    #[test]
    fn prefixed_name_without_prefix_format_fails() {
        let class = format!("{}Person", EX);
        for onto in [ontology(None), ontology(Some(BTreeMap::new()))] {
            assert!(matches!(
                prefixed_name(&class, &onto),
                Err(CompileError::MissingPrefixFormat { .. })
            ));
        }
    }

    #[test]
    fn base_schema_has_name_description_and_defaults() {
        let onto = ontology(prefixes(&[(":", EX)]));
        let schema =
            base_class_schema(&format!("{}Person", EX), &onto, &SchemaOptions::default()).unwrap();
        assert_eq!(schema.name.as_deref(), Some("Person"));
        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(schema.description.as_deref(), Some("A human being"));
        assert!(schema.properties.contains_key("id"));
    }

    #[test]
    fn base_schema_description_fallback() {
        let onto = ontology(prefixes(&[("", EX)]));
        let class = format!("{}Robot", EX);

        let schema = base_class_schema(&class, &onto, &SchemaOptions::default()).unwrap();
        assert_eq!(schema.description.as_deref(), Some(DEFAULT_DESCRIPTION));

        let options = SchemaOptions {
            default_descriptions: false,
            default_properties: false,
            ..Default::default()
        };
        let schema = base_class_schema(&class, &onto, &options).unwrap();
        assert_eq!(schema.description, None);
        assert!(schema.properties.is_empty());
    }

    #[test]
    fn required_from_min_items_and_functional() {
        let mut schema = SchemaNode::typed(SchemaType::Object);
        let mut names = SchemaNode::array_of(SchemaNode::typed(SchemaType::String));
        names.min_items = Some(1);
        schema.insert_property("names", names);
        schema.insert_property(
            "birthDate",
            SchemaNode::array_of(SchemaNode::typed(SchemaType::String)),
        );
        schema.insert_property(
            "nickname",
            SchemaNode::array_of(SchemaNode::typed(SchemaType::String)),
        );

        let functional = BTreeSet::from(["birthDate".to_string()]);
        generate_required_properties(&mut schema, &functional, &BTreeSet::new());

        assert_eq!(schema.properties["names"].nullable, Some(false));
        assert_eq!(schema.properties["birthDate"].nullable, Some(true));
        assert_eq!(schema.properties["nickname"].nullable, Some(true));
        assert_eq!(
            schema.required,
            BTreeSet::from(["birthDate".to_string(), "names".to_string()])
        );
    }

    #[test]
    fn required_is_recomputed_not_appended() {
        let mut schema = SchemaNode::typed(SchemaType::Object);
        schema.insert_property("a", SchemaNode::typed(SchemaType::String));
        schema.required.insert("stale".into());

        let functional = BTreeSet::from(["a".to_string()]);
        generate_required_properties(&mut schema, &functional, &BTreeSet::new());
        let first = schema.clone();
        generate_required_properties(&mut schema, &functional, &BTreeSet::new());

        assert_eq!(schema, first);
        assert_eq!(schema.required, BTreeSet::from(["a".to_string()]));
    }
}
