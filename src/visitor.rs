//! Walks a class, its ancestors and its restrictions to populate a
//! [`VisitorContext`] before the compiler stages run.
//!
//! Every property starts array-shaped (`{"type": "array", "items": ...}`).
//! Restrictions refine the `items`, `minItems` and `maxItems` of the property
//! they constrain. Collapsing arrays to singular values is left to the
//! compiler.

use serde_json::Value;

use crate::annotation::{apply_axiom_annotations, apply_entity_annotations};
use crate::builder::prefixed_name;
use crate::config::Config;
use crate::context::VisitorContext;
use crate::defaults::is_default_property;
use crate::error::CompileError;
use crate::ontology::{ClassExpression, Ontology, PropertyDecl, PropertyKind, SubClassAxiom};
use crate::restriction::{classify, RestrictionKind};
use crate::schema::{SchemaNode, SchemaType};
use crate::types::{local_name, OWL_THING};

/// Populate `ctx` from the ontology.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when a referenced class cannot
/// be named.
pub fn visit_class(
    ctx: &mut VisitorContext,
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<(), CompileError> {
    let base = ctx.base_class.clone();

    if let Some(values) = enumerated_individuals(&base, ontology) {
        log::debug!("{} is an enumeration of {} value(s)", base, values.len());
        let value_type = values
            .first()
            .map(json_schema_type)
            .unwrap_or(SchemaType::String);
        ctx.schema.set_enum_values(values);
        ctx.schema.schema_type = Some(value_type);
        return Ok(());
    }

    visit_members(ctx, &base, ontology, config)?;

    if !config.schema.follow_references {
        return Ok(());
    }

    for ancestor in ontology.superclasses(&base, false) {
        if ancestor == OWL_THING {
            continue;
        }
        ctx.processed_classes.insert(ancestor.clone());
        ctx.referenced_classes.insert(ancestor.clone());
        if !config.schema.use_inheritance_references {
            visit_members(ctx, &ancestor, ontology, config)?;
        }
    }

    Ok(())
}

/// Enum values when `class` is equivalent to a one-of enumeration.
fn enumerated_individuals(class: &str, ontology: &dyn Ontology) -> Option<Vec<Value>> {
    ontology
        .equivalent_classes(class)
        .into_iter()
        .find_map(|axiom| match &axiom.expression {
            ClassExpression::ObjectOneOf { individuals } => Some(
                individuals
                    .iter()
                    .map(|i| Value::String(local_name(i).to_string()))
                    .collect(),
            ),
            ClassExpression::DataOneOf { values } => Some(values.clone()),
            _ => None,
        })
}

/// Add the properties whose domain is `class` and apply its restrictions.
fn visit_members(
    ctx: &mut VisitorContext,
    class: &str,
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<(), CompileError> {
    for property in ontology.data_properties() {
        if property.domains.iter().any(|d| d == class) {
            add_declared_property(ctx, property, PropertyKind::Data, ontology, config)?;
        }
    }
    for property in ontology.object_properties() {
        if property.domains.iter().any(|d| d == class) {
            add_declared_property(ctx, property, PropertyKind::Object, ontology, config)?;
        }
    }

    for axiom in ontology.subclass_axioms(class) {
        if axiom.sup.named_class().is_some() {
            continue;
        }
        apply_restriction(ctx, &axiom.sup, axiom, ontology, config)?;
    }

    Ok(())
}

fn add_declared_property(
    ctx: &mut VisitorContext,
    property: &PropertyDecl,
    kind: PropertyKind,
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<(), CompileError> {
    let name = local_name(&property.iri).to_string();
    if property.functional {
        ctx.functional_properties.insert(name.clone());
    }
    // Ontology properties replace untouched defaults of the same name.
    if let Some(existing) = ctx.schema.properties.get(&name) {
        if !is_default_property(&name, existing) {
            return Ok(());
        }
        ctx.schema.properties.remove(&name);
    }

    let schema = match kind {
        PropertyKind::Data => data_property_schema(property),
        PropertyKind::Object => object_property_schema(ctx, property, ontology)?,
    };
    if !ctx.schema.insert_property(name.clone(), schema) {
        return Ok(());
    }

    apply_entity_annotations(
        ctx.schema.properties.get_mut(&name),
        &property.iri,
        ontology,
        &config.schema,
        config.annotations.as_ref(),
    );
    Ok(())
}

fn data_property_schema(property: &PropertyDecl) -> SchemaNode {
    let mut variants: Vec<SchemaNode> = Vec::new();
    for range in &property.ranges {
        let schema = datatype_schema(range);
        if !variants.contains(&schema) {
            variants.push(schema);
        }
    }
    let items = match variants.len() {
        0 => SchemaNode::typed(SchemaType::String),
        1 => variants.remove(0),
        _ => SchemaNode {
            one_of: variants,
            ..Default::default()
        },
    };
    SchemaNode::array_of(items)
}

fn object_property_schema(
    ctx: &mut VisitorContext,
    property: &PropertyDecl,
    ontology: &dyn Ontology,
) -> Result<SchemaNode, CompileError> {
    let mut refs = Vec::new();
    for range in &property.ranges {
        if range == OWL_THING {
            continue;
        }
        ctx.referenced_classes.insert(range.clone());
        refs.push(SchemaNode::reference(&prefixed_name(range, ontology)?));
    }

    Ok(match refs.len() {
        0 => SchemaNode::typed(SchemaType::Array),
        1 => SchemaNode::array_of(refs.remove(0)),
        _ => SchemaNode::array_of(SchemaNode {
            one_of: refs,
            ..Default::default()
        }),
    })
}

/// Schema of an XSD or RDF datatype. Unknown datatypes map to `string`.
pub fn datatype_schema(iri: &str) -> SchemaNode {
    match local_name(iri) {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName"
        | "langString" | "Literal" | "PlainLiteral" => SchemaNode::typed(SchemaType::String),
        "anyURI" => SchemaNode::formatted(SchemaType::String, "uri"),
        "int" | "short" | "byte" | "unsignedInt" | "unsignedShort" | "unsignedByte" => {
            SchemaNode::formatted(SchemaType::Integer, "int32")
        }
        "integer" | "long" | "nonNegativeInteger" | "positiveInteger" | "negativeInteger"
        | "nonPositiveInteger" | "unsignedLong" => {
            SchemaNode::formatted(SchemaType::Integer, "int64")
        }
        "float" => SchemaNode::formatted(SchemaType::Number, "float"),
        "double" | "decimal" => SchemaNode::formatted(SchemaType::Number, "double"),
        "boolean" => SchemaNode::typed(SchemaType::Boolean),
        "dateTime" | "dateTimeStamp" => SchemaNode::formatted(SchemaType::String, "date-time"),
        "date" => SchemaNode::formatted(SchemaType::String, "date"),
        "time" => SchemaNode::formatted(SchemaType::String, "time"),
        other => {
            log::debug!("unmapped datatype {} ({}), using string", iri, other);
            SchemaNode::typed(SchemaType::String)
        }
    }
}

fn apply_restriction(
    ctx: &mut VisitorContext,
    expression: &ClassExpression,
    axiom: &SubClassAxiom,
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<(), CompileError> {
    let kind = classify(expression);

    if kind == RestrictionKind::ObjectIntersectionOf {
        for operand in expression.operands() {
            if operand.named_class().is_none() {
                apply_restriction(ctx, operand, axiom, ontology, config)?;
            }
        }
        return Ok(());
    }

    let Some(property_iri) = expression.property().filter(|_| kind.is_property_restriction())
    else {
        log::debug!(
            "{}: skipping {:?} superclass expression",
            ctx.base_class,
            kind
        );
        return Ok(());
    };
    let name = local_name(property_iri).to_string();

    if !ctx.schema.properties.contains_key(&name) {
        let schema = match ontology.find_property(property_iri) {
            Some((PropertyKind::Data, decl)) => data_property_schema(decl),
            Some((PropertyKind::Object, decl)) => object_property_schema(ctx, decl, ontology)?,
            None => SchemaNode::typed(SchemaType::Array),
        };
        if !ctx.schema.insert_property(name.clone(), schema) {
            return Ok(());
        }
        apply_entity_annotations(
            ctx.schema.properties.get_mut(&name),
            property_iri,
            ontology,
            &config.schema,
            config.annotations.as_ref(),
        );
    }

    let items = match expression.filler() {
        Some(filler) => filler_schema(ctx, &name, filler, ontology)?,
        None => None,
    };

    let mut enum_property = false;
    let mut functional = false;
    if let Some(property) = ctx.schema.properties.get_mut(&name) {
        if let Some(items) = items {
            property.schema_type = Some(SchemaType::Array);
            property.items = Some(Box::new(items));
        }

        match expression {
            ClassExpression::ObjectMinCardinality { cardinality, .. }
            | ClassExpression::DataMinCardinality { cardinality, .. } => {
                property.min_items = Some(*cardinality);
            }
            ClassExpression::ObjectMaxCardinality { cardinality, .. }
            | ClassExpression::DataMaxCardinality { cardinality, .. } => {
                property.max_items = Some(*cardinality);
            }
            ClassExpression::ObjectExactCardinality { cardinality, .. }
            | ClassExpression::DataExactCardinality { cardinality, .. } => {
                property.min_items = Some(*cardinality);
                property.max_items = Some(*cardinality);
                functional = *cardinality == 1;
            }
            ClassExpression::ObjectHasValue { value, .. } => {
                let fixed = Value::String(local_name(value).to_string());
                set_fixed_value(property, fixed, SchemaType::String);
                enum_property = true;
            }
            ClassExpression::DataHasValue { value, .. } => {
                set_fixed_value(property, value.clone(), json_schema_type(value));
                enum_property = true;
            }
            _ => {}
        }
    }

    if functional {
        ctx.functional_properties.insert(name.clone());
    }
    if enum_property {
        ctx.enum_properties.insert(name.clone());
    }

    apply_axiom_annotations(
        &mut ctx.schema,
        axiom,
        expression,
        &name,
        config.annotations.as_ref(),
    );
    Ok(())
}

/// Pin a property's items to one value: a single-value enum with a default.
fn set_fixed_value(property: &mut SchemaNode, value: Value, fallback: SchemaType) {
    let items = property
        .items
        .get_or_insert_with(|| Box::new(SchemaNode::typed(fallback)));
    items.reference = None;
    items.one_of.clear();
    if items.schema_type.is_none() {
        items.schema_type = Some(fallback);
    }
    items.enum_values = Some(vec![value.clone()]);
    items.default = Some(value);
    property.schema_type = Some(SchemaType::Array);
}

fn json_schema_type(value: &Value) -> SchemaType {
    match value {
        Value::Bool(_) => SchemaType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => SchemaType::Integer,
        Value::Number(_) => SchemaType::Number,
        _ => SchemaType::String,
    }
}

/// Items schema for a restriction filler. `None` when the filler has no
/// schema rendering (complements, `owl:Thing`).
fn filler_schema(
    ctx: &mut VisitorContext,
    property_name: &str,
    filler: &ClassExpression,
    ontology: &dyn Ontology,
) -> Result<Option<SchemaNode>, CompileError> {
    let schema = match filler {
        ClassExpression::Class { iri } if iri == OWL_THING => None,
        ClassExpression::Class { iri } => {
            ctx.referenced_classes.insert(iri.clone());
            Some(SchemaNode::reference(&prefixed_name(iri, ontology)?))
        }
        ClassExpression::Datatype { iri } => Some(datatype_schema(iri)),
        ClassExpression::ObjectOneOf { individuals } => {
            ctx.enum_properties.insert(property_name.to_string());
            let mut node = SchemaNode::typed(SchemaType::String);
            node.enum_values = Some(
                individuals
                    .iter()
                    .map(|i| Value::String(local_name(i).to_string()))
                    .collect(),
            );
            Some(node)
        }
        ClassExpression::DataOneOf { values } => {
            ctx.enum_properties.insert(property_name.to_string());
            let schema_type = values
                .first()
                .map(json_schema_type)
                .unwrap_or(SchemaType::String);
            let mut node = SchemaNode::typed(schema_type);
            node.enum_values = Some(values.clone());
            Some(node)
        }
        ClassExpression::ObjectUnionOf { operands } | ClassExpression::DataUnionOf { operands } => {
            let mut variants = Vec::new();
            for operand in operands {
                if let Some(variant) = filler_schema(ctx, property_name, operand, ontology)? {
                    variants.push(variant);
                }
            }
            (!variants.is_empty()).then(|| SchemaNode {
                one_of: variants,
                ..Default::default()
            })
        }
        ClassExpression::ObjectIntersectionOf { operands }
        | ClassExpression::DataIntersectionOf { operands } => {
            let mut parts = Vec::new();
            for operand in operands {
                if let Some(part) = filler_schema(ctx, property_name, operand, ontology)? {
                    parts.push(part);
                }
            }
            (!parts.is_empty()).then(|| SchemaNode {
                all_of: parts,
                ..Default::default()
            })
        }
        other => {
            log::debug!(
                "{}: no schema for {:?} filler of {}",
                ctx.base_class,
                classify(other),
                property_name
            );
            None
        }
    };
    Ok(schema)
}
