//! Compile pipeline: visit a class, then run the post-processing stages.
//!
//! | Stage | Effect |
//! |-------|--------|
//! | cleanup | default unresolved property shapes to objects, drop fixed-value enums |
//! | requiredness | derive `required` and `nullable` from cardinalities |
//! | array conversion | collapse single-valued arrays, fix plural/singular names |
//! | inheritance | rebuild `allOf` from the direct ancestors |
//! | pruning | drop referenced classes that add nothing |
//!
//! Markdown tables are collected last, over the surviving referenced
//! classes. Every stage recomputes its output from the context, so running
//! the stages twice leaves the schema unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::builder::{base_class_schema, generate_required_properties, prefixed_name};
use crate::config::{Config, SchemaOptions};
use crate::context::VisitorContext;
use crate::defaults::default_properties;
use crate::error::CompileError;
use crate::inflect::{EnglishInflector, Inflector};
use crate::markdown::{collect_markdown_annotations, merge_markdown, MarkdownTables};
use crate::ontology::{ClassExpression, Ontology};
use crate::paths::{resolve_class_operations, ClassOperations};
use crate::restriction::classify;
use crate::schema::{SchemaNode, SchemaType};
use crate::types::local_name;
use crate::visitor::visit_class;

/// Result of compiling one class.
#[derive(Debug, Clone)]
pub struct CompiledClass {
    /// Class IRI.
    pub iri: String,
    /// Schema name (prefixed local name).
    pub name: String,
    pub schema: SchemaNode,
    /// Referenced classes that survived pruning.
    pub referenced_classes: BTreeSet<String>,
    pub markdown: MarkdownTables,
}

/// Result of compiling an ontology.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileOutput {
    /// Schema name -> schema.
    pub schemas: BTreeMap<String, SchemaNode>,
    /// Schema name -> resolved operations and paths.
    pub operations: BTreeMap<String, ClassOperations>,
    pub markdown: MarkdownTables,
}

/// Compile every selected class of `ontology`.
///
/// Per-class path policies are validated before any class is compiled, so a
/// conflicting policy produces no schemas at all.
///
/// # Errors
///
/// Returns `CompileError::ConflictingOperations` for an allow/deny overlap
/// and `CompileError::MissingPrefixFormat` when a class cannot be named.
pub fn compile_ontology(
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<CompileOutput, CompileError> {
    compile_ontology_with(ontology, config, &EnglishInflector)
}

/// [`compile_ontology`] with a caller-supplied inflector.
///
/// # Errors
///
/// See [`compile_ontology`].
pub fn compile_ontology_with(
    ontology: &dyn Ontology,
    config: &Config,
    inflector: &dyn Inflector,
) -> Result<CompileOutput, CompileError> {
    config.validate()?;

    let classes = selected_classes(ontology, config);
    log::info!("compiling {} class(es) from {}", classes.len(), ontology.iri());

    let mut output = CompileOutput::default();
    for class in classes {
        let compiled = compile_class_with(&class, ontology, config, inflector)?;
        let operations = resolve_class_operations(&class, config, inflector)?;

        if output.schemas.contains_key(&compiled.name) {
            log::warn!("schema name {} is produced by more than one class", compiled.name);
        }
        merge_markdown(&mut output.markdown, compiled.markdown);
        output.operations.insert(compiled.name.clone(), operations);
        output.schemas.insert(compiled.name, compiled.schema);
    }

    Ok(output)
}

/// Classes to compile: the configured list (by IRI or local name) or every
/// declared class. Configured classes the ontology lacks are skipped.
fn selected_classes(ontology: &dyn Ontology, config: &Config) -> Vec<String> {
    let declared = ontology.class_iris();
    let Some(wanted) = &config.classes else {
        return declared.into_iter().map(str::to_string).collect();
    };

    let mut selected = Vec::new();
    for name in wanted {
        let found = declared
            .iter()
            .find(|iri| **iri == name.as_str())
            .or_else(|| declared.iter().find(|iri| local_name(iri) == name.as_str()));
        match found {
            Some(iri) if !selected.iter().any(|s: &String| s == iri) => {
                selected.push(iri.to_string())
            }
            Some(_) => {}
            None => log::warn!("class {} is not declared in {}, skipping", name, ontology.iri()),
        }
    }
    selected
}

/// Compile a single class with the English inflector.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when the class or a class it
/// references cannot be named.
pub fn compile_class(
    class: &str,
    ontology: &dyn Ontology,
    config: &Config,
) -> Result<CompiledClass, CompileError> {
    compile_class_with(class, ontology, config, &EnglishInflector)
}

/// [`compile_class`] with a caller-supplied inflector.
///
/// # Errors
///
/// See [`compile_class`].
pub fn compile_class_with(
    class: &str,
    ontology: &dyn Ontology,
    config: &Config,
    inflector: &dyn Inflector,
) -> Result<CompiledClass, CompileError> {
    log::debug!("compiling class {}", class);

    let schema = base_class_schema(class, ontology, &config.schema)?;
    let mut ctx = VisitorContext::new(class, schema);
    visit_class(&mut ctx, ontology, config)?;
    run_stages(&mut ctx, ontology, config, inflector)?;

    let name = ctx
        .schema
        .name
        .clone()
        .unwrap_or_else(|| local_name(class).to_string());
    Ok(CompiledClass {
        iri: class.to_string(),
        name,
        schema: ctx.schema,
        referenced_classes: ctx.referenced_classes,
        markdown: ctx.markdown,
    })
}

/// Run every post-processing stage and the markdown collection.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when an ancestor or a
/// referenced class cannot be named.
pub fn run_stages(
    ctx: &mut VisitorContext,
    ontology: &dyn Ontology,
    config: &Config,
    inflector: &dyn Inflector,
) -> Result<(), CompileError> {
    cleanup(ctx);
    apply_requiredness(ctx, &config.schema);
    convert_array_properties(ctx, &config.schema, inflector);
    apply_inheritance_references(ctx, ontology, &config.schema)?;
    prune_referenced_classes(ctx, ontology, inflector)?;
    collect_markdown_annotations(ctx, ontology, config.annotations.as_ref());
    Ok(())
}

/// Stage 1.
pub fn cleanup(ctx: &mut VisitorContext) {
    for (name, property) in ctx.schema.properties.iter_mut() {
        if let Some(items) = property.items.as_deref_mut() {
            let single = items.enum_values.as_ref().is_some_and(|v| v.len() == 1);
            if single && items.default.is_some() {
                items.enum_values = None;
            }
        } else if is_unresolved(property) {
            log::debug!("{}: {} has no item shape, typing as object", ctx.base_class, name);
            property.schema_type = Some(SchemaType::Object);
        }
    }
}

/// A property with no `items` and nothing else describing its value.
fn is_unresolved(property: &SchemaNode) -> bool {
    property.is_array()
        || (property.schema_type.is_none()
            && property.reference.is_none()
            && property.enum_values.is_none()
            && property.one_of.is_empty()
            && property.all_of.is_empty())
}

/// Stage 2.
pub fn apply_requiredness(ctx: &mut VisitorContext, options: &SchemaOptions) {
    if ctx.schema.is_enum() {
        ctx.schema.required.clear();
    } else if options.required_properties_from_cardinality {
        generate_required_properties(
            &mut ctx.schema,
            &ctx.functional_properties,
            &ctx.mandatory_properties,
        );
    }
    ctx.sync_required();
}

/// Stage 3. No-op while `always_generate_arrays` is set.
pub fn convert_array_properties(
    ctx: &mut VisitorContext,
    options: &SchemaOptions,
    inflector: &dyn Inflector,
) {
    if options.always_generate_arrays {
        return;
    }

    let fix_names = options.fix_singular_plural_property_names;
    let catalog = default_properties();
    let properties = std::mem::take(&mut ctx.schema.properties);
    let original: BTreeSet<String> = properties.keys().cloned().collect();
    let mut converted = BTreeMap::new();
    let mut renames = Vec::new();

    for (name, property) in properties {
        // Default catalog names are fixed.
        let inflect = fix_names && !catalog.contains_key(&name);
        let singular = property.is_array()
            && property.items.is_some()
            && (ctx.functional_properties.contains(&name)
                || ctx.enum_properties.contains(&name)
                || property.max_items == Some(1));

        let (new_name, property) = if singular {
            if property.min_items.unwrap_or(0) > 0 {
                ctx.mandatory_properties.insert(name.clone());
            }
            let new_name = if inflect {
                inflector.singularize(&name)
            } else {
                name.clone()
            };
            (new_name, to_singular(property))
        } else if inflect && property.is_array() {
            (inflector.pluralize(&name), property)
        } else {
            (name.clone(), property)
        };

        let taken = original.contains(&new_name) || converted.contains_key(&new_name);
        let new_name = if new_name != name && taken {
            log::warn!(
                "{}: cannot rename {} to {}, name already taken",
                ctx.base_class,
                name,
                new_name
            );
            name.clone()
        } else {
            new_name
        };

        if new_name != name {
            renames.push((name, new_name.clone()));
        }
        converted.insert(new_name, property);
    }

    ctx.schema.properties = converted;
    for (from, to) in renames {
        ctx.rename_property(&from, &to);
    }
    ctx.sync_required();
}

/// The item schema of an array property, keeping the property-level
/// metadata.
fn to_singular(property: SchemaNode) -> SchemaNode {
    let SchemaNode {
        items: Some(items),
        description,
        nullable,
        read_only,
        write_only,
        example,
        ..
    } = property
    else {
        return property;
    };

    let mut singular = *items;
    if singular.description.is_none() {
        singular.description = description;
    }
    singular.nullable = nullable.or(singular.nullable);
    singular.read_only = read_only.or(singular.read_only);
    singular.write_only = write_only.or(singular.write_only);
    singular.example = example.or(singular.example);
    singular
}

/// Stage 4.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when an ancestor cannot be
/// named.
pub fn apply_inheritance_references(
    ctx: &mut VisitorContext,
    ontology: &dyn Ontology,
    options: &SchemaOptions,
) -> Result<(), CompileError> {
    if ctx.schema.is_enum() {
        return Ok(());
    }

    if options.follow_references && options.use_inheritance_references {
        let ancestors: Vec<&String> = ctx.ancestors().collect();

        // Drop every ancestor that is itself a superclass of another ancestor.
        let mut refs = Vec::new();
        for ancestor in &ancestors {
            if !ctx.referenced_classes.contains(*ancestor) {
                continue;
            }
            let covered = ancestors.iter().any(|other| {
                other != ancestor && ontology.superclasses(other, false).contains(*ancestor)
            });
            if !covered {
                refs.push(SchemaNode::reference(&prefixed_name(ancestor, ontology)?));
            }
        }
        refs.sort_by(|a, b| a.reference.cmp(&b.reference));

        if !refs.is_empty() {
            refs.push(SchemaNode::typed(SchemaType::Object));
        }
        ctx.schema.all_of = refs;
    }

    if !ctx.schema.properties.is_empty()
        && ctx.schema.all_of.is_empty()
        && ctx.schema.schema_type.is_none()
    {
        ctx.schema.schema_type = Some(SchemaType::Object);
    }
    Ok(())
}

/// Stage 5.
///
/// # Errors
///
/// Returns `CompileError::MissingPrefixFormat` when a pruned class cannot be
/// named.
pub fn prune_referenced_classes(
    ctx: &mut VisitorContext,
    ontology: &dyn Ontology,
    inflector: &dyn Inflector,
) -> Result<(), CompileError> {
    let candidates: Vec<String> = ctx.referenced_classes.iter().cloned().collect();

    for class in candidates {
        if is_load_bearing(&class, &ctx.schema, ontology, inflector) {
            continue;
        }
        log::debug!("{}: pruning reference to {}", ctx.base_class, class);
        ctx.referenced_classes.remove(&class);

        let name = prefixed_name(&class, ontology)?;
        ctx.schema
            .all_of
            .retain(|entry| entry.referenced_name() != Some(name.as_str()));
    }

    if ctx.schema.all_of.iter().all(|e| e.reference.is_none()) {
        ctx.schema.all_of.clear();
    }
    Ok(())
}

/// Whether a referenced class contributes anything worth pointing at.
fn is_load_bearing(
    class: &str,
    schema: &SchemaNode,
    ontology: &dyn Ontology,
    inflector: &dyn Inflector,
) -> bool {
    if !ontology.equivalent_classes(class).is_empty() {
        return true;
    }

    if ontology
        .subclass_axioms(class)
        .into_iter()
        .any(|axiom| involves_restriction(&axiom.sup))
    {
        return true;
    }

    if ontology
        .data_properties()
        .iter()
        .any(|p| p.domains.iter().any(|d| d == class))
    {
        return true;
    }

    ontology
        .object_properties()
        .iter()
        .filter(|p| p.ranges.iter().any(|r| r == class))
        .any(|p| {
            let name = local_name(&p.iri);
            schema.properties.contains_key(name)
                || schema.properties.contains_key(&inflector.pluralize(name))
                || schema.properties.contains_key(&inflector.singularize(name))
        })
}

/// A property restriction, or a boolean expression with one among its
/// operands.
fn involves_restriction(expression: &ClassExpression) -> bool {
    let kind = classify(expression);
    kind.is_property_restriction()
        || (kind.is_boolean() && expression.operands().iter().any(involves_restriction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{
        ClassDecl, EquivalentClassesAxiom, OntologyDocument, PropertyDecl, SubClassAxiom,
    };
    use serde_json::json;

    const EX: &str = "https://w3id.org/example#";
    const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    fn iri(name: &str) -> String {
        format!("{}{}", EX, name)
    }

    fn subclass(sub: &str, sup: ClassExpression) -> SubClassAxiom {
        SubClassAxiom {
            sub: iri(sub),
            sup,
            annotations: vec![],
        }
    }

    fn data_property(name: &str, domain: &str, range: &str) -> PropertyDecl {
        PropertyDecl {
            iri: iri(name),
            domains: vec![iri(domain)],
            ranges: vec![format!("{}{}", XSD, range)],
            ..Default::default()
        }
    }

    fn ontology() -> OntologyDocument {
        OntologyDocument {
            iri: "https://w3id.org/example".into(),
            prefixes: Some(BTreeMap::from([(String::new(), EX.to_string())])),
            classes: ["Person", "Student", "ExchangeStudent", "Book", "Tag", "Agent"]
                .iter()
                .map(|n| ClassDecl {
                    iri: iri(n),
                    annotations: vec![],
                })
                .collect(),
            data_properties: vec![
                data_property("name", "Person", "string"),
                data_property("school", "Student", "string"),
                data_property("homeCountry", "ExchangeStudent", "string"),
                data_property("title", "Book", "string"),
            ],
            object_properties: vec![
                PropertyDecl {
                    iri: iri("authors"),
                    domains: vec![iri("Book")],
                    ranges: vec![iri("Person")],
                    ..Default::default()
                },
                PropertyDecl {
                    iri: iri("tags"),
                    domains: vec![iri("Book")],
                    ranges: vec![iri("Tag")],
                    ..Default::default()
                },
            ],
            subclass_axioms: vec![
                subclass("Person", ClassExpression::class(iri("Agent"))),
                subclass("Student", ClassExpression::class(iri("Person"))),
                subclass("ExchangeStudent", ClassExpression::class(iri("Student"))),
                subclass(
                    "Book",
                    ClassExpression::DataExactCardinality {
                        property: iri("title"),
                        cardinality: 1,
                        filler: None,
                    },
                ),
            ],
            equivalent_classes: vec![EquivalentClassesAxiom {
                class: iri("Student"),
                expression: ClassExpression::ObjectIntersectionOf {
                    operands: vec![
                        ClassExpression::class(iri("Person")),
                        ClassExpression::ObjectSomeValuesFrom {
                            property: iri("enrolledIn"),
                            filler: Box::new(ClassExpression::class(iri("School"))),
                        },
                    ],
                },
                annotations: vec![],
            }],
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.schema.default_properties = false;
        config
    }

    fn inheritance_config() -> Config {
        let mut config = config();
        config.schema.use_inheritance_references = true;
        config
    }

    fn context_for(class: &str, onto: &OntologyDocument, config: &Config) -> VisitorContext {
        let schema = base_class_schema(&iri(class), onto, &config.schema).unwrap();
        let mut ctx = VisitorContext::new(&iri(class), schema);
        visit_class(&mut ctx, onto, config).unwrap();
        ctx
    }

    fn all_of_refs(schema: &SchemaNode) -> Vec<&str> {
        schema
            .all_of
            .iter()
            .filter_map(SchemaNode::referenced_name)
            .collect()
    }

    #[test]
    fn inheritance_keeps_only_direct_ancestor() {
        let onto = ontology();
        let compiled = compile_class(&iri("ExchangeStudent"), &onto, &inheritance_config()).unwrap();

        // Student is load-bearing (equivalent-class axiom); Person and Agent
        // are covered by it.
        assert_eq!(all_of_refs(&compiled.schema), vec!["Student"]);
        assert_eq!(
            compiled.schema.all_of.last().unwrap().to_value(),
            json!({ "type": "object" })
        );
        assert!(compiled.schema.properties.contains_key("homeCountry"));
        assert!(!compiled.schema.properties.contains_key("school"));
    }

    #[test]
    fn pruned_ancestor_reference_is_stripped() {
        let onto = ontology();
        // Person's only parent is Agent, which has no axioms or properties.
        let compiled = compile_class(&iri("Person"), &onto, &inheritance_config()).unwrap();
        assert!(compiled.schema.all_of.is_empty());
        assert!(!compiled.referenced_classes.contains(&iri("Agent")));
        assert_eq!(compiled.schema.schema_type, Some(SchemaType::Object));
    }

    #[test]
    fn object_property_ranges_survive_pruning() {
        let onto = ontology();
        let compiled = compile_class(&iri("Book"), &onto, &config()).unwrap();
        // Person is the domain of a data property; Tag has nothing but is the
        // range of the present `tags` property.
        assert!(compiled.referenced_classes.contains(&iri("Person")));
        assert!(compiled.referenced_classes.contains(&iri("Tag")));
    }

    #[test]
    fn running_stages_twice_is_idempotent() {
        let onto = ontology();
        let mut config = inheritance_config();
        config.schema.default_properties = true;
        config.schema.always_generate_arrays = false;
        config.schema.required_properties_from_cardinality = true;
        config.schema.fix_singular_plural_property_names = true;

        for class in ["Book", "ExchangeStudent", "Person"] {
            let mut ctx = context_for(class, &onto, &config);
            run_stages(&mut ctx, &onto, &config, &EnglishInflector).unwrap();
            let first = serde_json::to_string(&ctx.schema).unwrap();
            run_stages(&mut ctx, &onto, &config, &EnglishInflector).unwrap();
            let second = serde_json::to_string(&ctx.schema).unwrap();
            assert_eq!(first, second, "{} changed on second run", class);
        }
    }

    #[test]
    fn exact_one_becomes_required_singular() {
        let onto = ontology();
        let mut config = config();
        config.schema.always_generate_arrays = false;
        config.schema.required_properties_from_cardinality = true;
        config.schema.fix_singular_plural_property_names = true;

        let compiled = compile_class(&iri("Book"), &onto, &config).unwrap();
        let props = &compiled.schema.properties;
        assert_eq!(
            props["title"].to_value(),
            json!({
                "type": "string",
                "description": "Description not available",
                "nullable": false
            })
        );
        assert!(compiled.schema.required.contains("title"));
        assert!(props["authors"].is_array());
        assert!(props.contains_key("tags"));
    }

    #[test]
    fn singular_rename_updates_required() {
        let mut ctx = VisitorContext::new(&iri("Book"), SchemaNode::typed(SchemaType::Object));
        let mut authors = SchemaNode::array_of(SchemaNode::reference("Person"));
        authors.min_items = Some(1);
        authors.max_items = Some(1);
        ctx.schema.insert_property("authors", authors);
        ctx.schema.required.insert("authors".into());
        ctx.functional_properties.insert("authors".into());

        let options = SchemaOptions {
            always_generate_arrays: false,
            fix_singular_plural_property_names: true,
            ..Default::default()
        };
        convert_array_properties(&mut ctx, &options, &EnglishInflector);

        assert_eq!(
            ctx.schema.properties["author"].referenced_name(),
            Some("Person")
        );
        assert!(ctx.required_properties.contains("author"));
        assert!(ctx.mandatory_properties.contains("author"));
        assert!(ctx.functional_properties.contains("author"));
    }

    #[test]
    fn name_fixing_leaves_default_properties_alone() {
        let onto = ontology();
        let mut config = config();
        config.schema.default_properties = true;
        config.schema.always_generate_arrays = false;
        config.schema.fix_singular_plural_property_names = true;

        let compiled = compile_class(&iri("Person"), &onto, &config).unwrap();
        let names: Vec<&str> = compiled
            .schema
            .properties
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            names,
            vec![
                "description",
                "eventDateTime",
                "id",
                "isBool",
                "label",
                "names",
                "quantity",
                "type"
            ]
        );
    }

    #[test]
    fn cleanup_types_unresolved_and_drops_fixed_enums() {
        let mut ctx = VisitorContext::new(&iri("A"), SchemaNode::typed(SchemaType::Object));
        ctx.schema
            .insert_property("related", SchemaNode::typed(SchemaType::Array));
        let mut fixed = SchemaNode::typed(SchemaType::String);
        fixed.enum_values = Some(vec![json!("x")]);
        fixed.default = Some(json!("x"));
        ctx.schema
            .insert_property("kind", SchemaNode::array_of(fixed));
        let mut id = SchemaNode::typed(SchemaType::Integer);
        id.nullable = Some(false);
        ctx.schema.insert_property("id", id.clone());

        cleanup(&mut ctx);

        let props = &ctx.schema.properties;
        assert_eq!(props["related"].schema_type, Some(SchemaType::Object));
        assert_eq!(props["kind"].items.as_ref().unwrap().enum_values, None);
        assert_eq!(props["id"], id);
    }

    #[test]
    fn enum_schemas_have_no_required() {
        let mut ctx = VisitorContext::new(&iri("Color"), SchemaNode::default());
        ctx.schema.set_enum_values(vec![json!("Red")]);
        ctx.schema.required.insert("stale".into());
        apply_requiredness(&mut ctx, &SchemaOptions::default());
        assert!(ctx.schema.required.is_empty());
        assert!(ctx.required_properties.is_empty());
    }

    #[test]
    fn selection_by_local_name_skips_unknown() {
        let onto = ontology();
        let mut config = config();
        config.classes = Some(vec!["Book".into(), iri("Person"), "Missing".into()]);

        let output = compile_ontology(&onto, &config).unwrap();
        assert_eq!(
            output.schemas.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Book", "Person"]
        );
        assert!(output.operations.contains_key("Book"));
    }
}
