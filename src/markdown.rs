//! Markdown documentation tables gathered from annotations.
//!
//! Every configured markdown annotation gets one table mapping a target to
//! its annotation text. Targets are a class local name (`Person`) or a class
//! and property local name pair (`Person#age`). When two annotations land on
//! the same target the later one replaces the earlier one.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::AnnotationConfig;
use crate::context::VisitorContext;
use crate::ontology::{Annotation, ClassExpression, Ontology};
use crate::restriction::classify;
use crate::types::local_name;

/// Annotation name -> (target -> text).
pub type MarkdownTables = BTreeMap<String, BTreeMap<String, String>>;

/// Collect markdown annotations for the base class and every referenced
/// class into `ctx.markdown`.
pub fn collect_markdown_annotations(
    ctx: &mut VisitorContext,
    ontology: &dyn Ontology,
    config: Option<&AnnotationConfig>,
) {
    let Some(config) = config.filter(|c| !c.markdown.is_empty()) else {
        return;
    };

    let mut classes = vec![ctx.base_class.clone()];
    classes.extend(
        ctx.referenced_classes
            .iter()
            .filter(|c| **c != ctx.base_class)
            .cloned(),
    );

    for class in classes {
        collect_for_class(&mut ctx.markdown, &class, ontology, config);
    }
}

fn collect_for_class(
    tables: &mut MarkdownTables,
    class: &str,
    ontology: &dyn Ontology,
    config: &AnnotationConfig,
) {
    let class_name = local_name(class);
    record(tables, config, ontology.annotations(class), class_name);

    let properties = ontology
        .data_properties()
        .iter()
        .chain(ontology.object_properties())
        .filter(|p| p.domains.iter().any(|d| d == class));
    for property in properties {
        let target = format!("{}#{}", class_name, local_name(&property.iri));
        record(tables, config, &property.annotations, &target);
    }

    for axiom in ontology.subclass_axioms(class) {
        if !axiom.annotations.is_empty() {
            attribute_axiom(tables, config, &axiom.sup, &axiom.annotations, class_name);
        }
    }
}

/// Attribute axiom annotations to the property of each restriction in
/// `expression`, descending into intersections and unions.
fn attribute_axiom(
    tables: &mut MarkdownTables,
    config: &AnnotationConfig,
    expression: &ClassExpression,
    annotations: &[Annotation],
    class_name: &str,
) {
    let kind = classify(expression);
    if let Some(property) = expression.property().filter(|_| kind.is_property_restriction()) {
        let target = format!("{}#{}", class_name, local_name(property));
        record(tables, config, annotations, &target);
        return;
    }

    match expression {
        ClassExpression::ObjectIntersectionOf { operands }
        | ClassExpression::ObjectUnionOf { operands } => {
            for operand in operands {
                attribute_axiom(tables, config, operand, annotations, class_name);
            }
        }
        _ => log::debug!(
            "{}: markdown annotation on {:?} has no property target",
            class_name,
            kind
        ),
    }
}

fn record(
    tables: &mut MarkdownTables,
    config: &AnnotationConfig,
    annotations: &[Annotation],
    target: &str,
) {
    for annotation in annotations {
        if let Some(entry) = config.markdown_for(&annotation.property) {
            tables
                .entry(entry.annotation.clone())
                .or_default()
                .insert(target.to_string(), annotation.value.clone());
        }
    }
}

/// Merge `from` into `into`; entries of `from` win.
pub fn merge_markdown(into: &mut MarkdownTables, from: MarkdownTables) {
    for (annotation, table) in from {
        into.entry(annotation).or_default().extend(table);
    }
}

/// Render tables as a markdown document.
///
/// One section per configured annotation with entries, in configuration
/// order: the heading, its description, then a table sorted by target.
pub fn render_markdown(tables: &MarkdownTables, config: &AnnotationConfig) -> String {
    let mut out = String::new();
    let mut seen = BTreeSet::new();

    for entry in &config.markdown {
        if !seen.insert(entry.annotation.as_str()) {
            continue;
        }
        let Some(table) = tables.get(&entry.annotation).filter(|t| !t.is_empty()) else {
            continue;
        };

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("## {}\n\n", entry.heading));
        if !entry.description.is_empty() {
            out.push_str(&format!("{}\n\n", entry.description));
        }
        out.push_str("| Name | Description |\n|------|-------------|\n");
        for (target, text) in table {
            out.push_str(&format!("| {} | {} |\n", target, escape_cell(text)));
        }
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
