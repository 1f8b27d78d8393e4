//! Ontology model consumed by the compiler.
//!
//! The compiler never parses RDF itself. It asks an [`Ontology`] for classes,
//! properties, axioms and subclass relations. [`OntologyDocument`] is the
//! in-memory implementation, deserialized from a JSON export of the ontology:
//!
//! ```json
//! {
//!   "iri": "https://w3id.org/example",
//!   "prefixes": { "": "https://w3id.org/example#" },
//!   "classes": [{ "iri": "https://w3id.org/example#Person" }],
//!   "data_properties": [{
//!     "iri": "https://w3id.org/example#name",
//!     "domains": ["https://w3id.org/example#Person"],
//!     "ranges": ["http://www.w3.org/2001/XMLSchema#string"]
//!   }]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::OWL_THING;

/// An annotation attached to an entity or axiom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// IRI of the annotation property (e.g. `rdfs:comment`).
    pub property: String,
    /// Literal text of the annotation.
    pub value: String,
}

impl Annotation {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// An OWL class expression or data range.
///
/// Data ranges share the enum so fillers of data restrictions can be
/// classified with the same function as class expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassExpression {
    Class {
        iri: String,
    },
    Datatype {
        iri: String,
    },
    ObjectSomeValuesFrom {
        property: String,
        filler: Box<ClassExpression>,
    },
    ObjectAllValuesFrom {
        property: String,
        filler: Box<ClassExpression>,
    },
    ObjectMinCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    ObjectMaxCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    ObjectExactCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    ObjectHasValue {
        property: String,
        /// IRI of the individual.
        value: String,
    },
    ObjectHasSelf {
        property: String,
    },
    ObjectOneOf {
        individuals: Vec<String>,
    },
    ObjectComplementOf {
        operand: Box<ClassExpression>,
    },
    ObjectIntersectionOf {
        operands: Vec<ClassExpression>,
    },
    ObjectUnionOf {
        operands: Vec<ClassExpression>,
    },
    DataSomeValuesFrom {
        property: String,
        filler: Box<ClassExpression>,
    },
    DataAllValuesFrom {
        property: String,
        filler: Box<ClassExpression>,
    },
    DataMinCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    DataMaxCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    DataExactCardinality {
        property: String,
        cardinality: u32,
        #[serde(default)]
        filler: Option<Box<ClassExpression>>,
    },
    DataHasValue {
        property: String,
        value: Value,
    },
    DataOneOf {
        values: Vec<Value>,
    },
    DataComplementOf {
        operand: Box<ClassExpression>,
    },
    DataIntersectionOf {
        operands: Vec<ClassExpression>,
    },
    DataUnionOf {
        operands: Vec<ClassExpression>,
    },
}

impl ClassExpression {
    /// Shorthand for a named class.
    pub fn class(iri: impl Into<String>) -> Self {
        ClassExpression::Class { iri: iri.into() }
    }

    /// Shorthand for a named datatype.
    pub fn datatype(iri: impl Into<String>) -> Self {
        ClassExpression::Datatype { iri: iri.into() }
    }

    /// The IRI when this is a named class.
    pub fn named_class(&self) -> Option<&str> {
        match self {
            ClassExpression::Class { iri } => Some(iri),
            _ => None,
        }
    }

    /// The restricted property for property restrictions.
    pub fn property(&self) -> Option<&str> {
        match self {
            ClassExpression::ObjectSomeValuesFrom { property, .. }
            | ClassExpression::ObjectAllValuesFrom { property, .. }
            | ClassExpression::ObjectMinCardinality { property, .. }
            | ClassExpression::ObjectMaxCardinality { property, .. }
            | ClassExpression::ObjectExactCardinality { property, .. }
            | ClassExpression::ObjectHasValue { property, .. }
            | ClassExpression::ObjectHasSelf { property }
            | ClassExpression::DataSomeValuesFrom { property, .. }
            | ClassExpression::DataAllValuesFrom { property, .. }
            | ClassExpression::DataMinCardinality { property, .. }
            | ClassExpression::DataMaxCardinality { property, .. }
            | ClassExpression::DataExactCardinality { property, .. }
            | ClassExpression::DataHasValue { property, .. } => Some(property),
            _ => None,
        }
    }

    /// The filler of a quantified or qualified cardinality restriction.
    pub fn filler(&self) -> Option<&ClassExpression> {
        match self {
            ClassExpression::ObjectSomeValuesFrom { filler, .. }
            | ClassExpression::ObjectAllValuesFrom { filler, .. }
            | ClassExpression::DataSomeValuesFrom { filler, .. }
            | ClassExpression::DataAllValuesFrom { filler, .. } => Some(filler),
            ClassExpression::ObjectMinCardinality { filler, .. }
            | ClassExpression::ObjectMaxCardinality { filler, .. }
            | ClassExpression::ObjectExactCardinality { filler, .. }
            | ClassExpression::DataMinCardinality { filler, .. }
            | ClassExpression::DataMaxCardinality { filler, .. }
            | ClassExpression::DataExactCardinality { filler, .. } => filler.as_deref(),
            _ => None,
        }
    }

    /// Operands of boolean constructors; empty for everything else.
    pub fn operands(&self) -> &[ClassExpression] {
        match self {
            ClassExpression::ObjectIntersectionOf { operands }
            | ClassExpression::ObjectUnionOf { operands }
            | ClassExpression::DataIntersectionOf { operands }
            | ClassExpression::DataUnionOf { operands } => operands,
            ClassExpression::ObjectComplementOf { operand }
            | ClassExpression::DataComplementOf { operand } => std::slice::from_ref(operand),
            _ => &[],
        }
    }
}

/// A declared class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub iri: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A declared object or data property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub iri: String,
    /// Domain classes (`rdfs:domain`).
    #[serde(default)]
    pub domains: Vec<String>,
    /// Range classes or datatypes (`rdfs:range`).
    #[serde(default)]
    pub ranges: Vec<String>,
    /// Declared `owl:FunctionalProperty`.
    #[serde(default)]
    pub functional: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Object vs data property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Object,
    Data,
}

/// `sub rdfs:subClassOf sup`, with its axiom annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubClassAxiom {
    pub sub: String,
    pub sup: ClassExpression,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// `class owl:equivalentClass expression`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalentClassesAxiom {
    pub class: String,
    pub expression: ClassExpression,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Read-only query interface over an ontology and its reasoner.
///
/// Implementations must not change while a compile run is in flight.
pub trait Ontology {
    /// Ontology IRI, used in error messages.
    fn iri(&self) -> &str;

    /// Prefix map of the ontology document format.
    ///
    /// `None` means the document format carries no prefixes at all.
    fn prefixes(&self) -> Option<&BTreeMap<String, String>>;

    /// IRIs of all declared classes, in declaration order.
    fn class_iris(&self) -> Vec<&str>;

    /// Annotations on a class or property. Empty when the entity is unknown.
    fn annotations(&self, entity: &str) -> &[Annotation];

    fn object_properties(&self) -> &[PropertyDecl];

    fn data_properties(&self) -> &[PropertyDecl];

    /// Subclass axioms whose subclass is `class`.
    fn subclass_axioms(&self, class: &str) -> Vec<&SubClassAxiom>;

    /// Equivalent-class axioms for `class`.
    fn equivalent_classes(&self, class: &str) -> Vec<&EquivalentClassesAxiom>;

    /// Named superclasses of `class` (direct only, or the full closure).
    /// Never contains `class` itself or `owl:Thing`.
    fn superclasses(&self, class: &str, direct: bool) -> BTreeSet<String>;

    /// Whether `class` is declared.
    fn declares_class(&self, class: &str) -> bool {
        self.class_iris().contains(&class)
    }

    /// Look up a property declaration of either kind.
    fn find_property(&self, iri: &str) -> Option<(PropertyKind, &PropertyDecl)> {
        if let Some(p) = self.object_properties().iter().find(|p| p.iri == iri) {
            return Some((PropertyKind::Object, p));
        }
        self.data_properties()
            .iter()
            .find(|p| p.iri == iri)
            .map(|p| (PropertyKind::Data, p))
    }
}

/// In-memory ontology loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyDocument {
    pub iri: String,
    /// Document-format prefixes. Absent when the source format has none.
    #[serde(default)]
    pub prefixes: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub object_properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub data_properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub subclass_axioms: Vec<SubClassAxiom>,
    #[serde(default)]
    pub equivalent_classes: Vec<EquivalentClassesAxiom>,
}

impl OntologyDocument {
    /// Named classes asserted as direct parents of `class`.
    fn direct_superclasses(&self, class: &str) -> BTreeSet<String> {
        let mut parents = BTreeSet::new();
        for axiom in self.subclass_axioms.iter().filter(|a| a.sub == class) {
            collect_conjunct_classes(&axiom.sup, &mut parents);
        }
        for axiom in self.equivalent_classes.iter().filter(|a| a.class == class) {
            if let ClassExpression::ObjectIntersectionOf { operands } = &axiom.expression {
                for operand in operands {
                    collect_conjunct_classes(operand, &mut parents);
                }
            }
        }
        parents.remove(class);
        parents.remove(OWL_THING);
        parents
    }
}

/// Named classes that are implied superclasses: the class itself or the
/// named operands of an intersection.
fn collect_conjunct_classes(expression: &ClassExpression, out: &mut BTreeSet<String>) {
    match expression {
        ClassExpression::Class { iri } => {
            out.insert(iri.clone());
        }
        ClassExpression::ObjectIntersectionOf { operands } => {
            for operand in operands {
                collect_conjunct_classes(operand, out);
            }
        }
        _ => {}
    }
}

impl Ontology for OntologyDocument {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn prefixes(&self) -> Option<&BTreeMap<String, String>> {
        self.prefixes.as_ref()
    }

    fn class_iris(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.iri.as_str()).collect()
    }

    fn annotations(&self, entity: &str) -> &[Annotation] {
        if let Some(class) = self.classes.iter().find(|c| c.iri == entity) {
            return &class.annotations;
        }
        match self.find_property(entity) {
            Some((_, property)) => &property.annotations,
            None => &[],
        }
    }

    fn object_properties(&self) -> &[PropertyDecl] {
        &self.object_properties
    }

    fn data_properties(&self) -> &[PropertyDecl] {
        &self.data_properties
    }

    fn subclass_axioms(&self, class: &str) -> Vec<&SubClassAxiom> {
        self.subclass_axioms
            .iter()
            .filter(|a| a.sub == class)
            .collect()
    }

    fn equivalent_classes(&self, class: &str) -> Vec<&EquivalentClassesAxiom> {
        self.equivalent_classes
            .iter()
            .filter(|a| a.class == class)
            .collect()
    }

    fn superclasses(&self, class: &str, direct: bool) -> BTreeSet<String> {
        let parents = self.direct_superclasses(class);
        if direct {
            return parents;
        }

        let mut closure = BTreeSet::new();
        let mut queue: Vec<String> = parents.into_iter().collect();
        while let Some(current) = queue.pop() {
            if current == class || !closure.insert(current.clone()) {
                continue;
            }
            queue.extend(self.direct_superclasses(&current));
        }
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EX: &str = "https://w3id.org/example#";

    fn iri(name: &str) -> String {
        format!("{}{}", EX, name)
    }

    fn hierarchy() -> OntologyDocument {
        OntologyDocument {
            iri: "https://w3id.org/example".into(),
            classes: ["Person", "Student", "ExchangeStudent"]
                .iter()
                .map(|n| ClassDecl {
                    iri: iri(n),
                    annotations: vec![],
                })
                .collect(),
            subclass_axioms: vec![
                SubClassAxiom {
                    sub: iri("Student"),
                    sup: ClassExpression::class(iri("Person")),
                    annotations: vec![],
                },
                SubClassAxiom {
                    sub: iri("ExchangeStudent"),
                    sup: ClassExpression::class(iri("Student")),
                    annotations: vec![],
                },
                SubClassAxiom {
                    sub: iri("Person"),
                    sup: ClassExpression::class(OWL_THING),
                    annotations: vec![],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn superclasses_direct_and_closure() {
        let onto = hierarchy();
        let direct = onto.superclasses(&iri("ExchangeStudent"), true);
        assert_eq!(direct, BTreeSet::from([iri("Student")]));

        let all = onto.superclasses(&iri("ExchangeStudent"), false);
        assert_eq!(all, BTreeSet::from([iri("Person"), iri("Student")]));
    }

    #[test]
    fn superclasses_tolerate_cycles() {
        let mut onto = hierarchy();
        onto.subclass_axioms.push(SubClassAxiom {
            sub: iri("Person"),
            sup: ClassExpression::class(iri("ExchangeStudent")),
            annotations: vec![],
        });
        let all = onto.superclasses(&iri("Person"), false);
        assert!(!all.contains(&iri("Person")));
        assert!(all.contains(&iri("Student")));
    }

    #[test]
    fn deserializes_tagged_expressions() {
        let axiom: SubClassAxiom = serde_json::from_value(json!({
            "sub": "https://w3id.org/example#Person",
            "sup": {
                "type": "object_exact_cardinality",
                "property": "https://w3id.org/example#hasName",
                "cardinality": 1
            }
        }))
        .unwrap();
        assert_eq!(axiom.sup.property(), Some("https://w3id.org/example#hasName"));
        assert!(axiom.sup.filler().is_none());
        assert!(axiom.annotations.is_empty());
    }

    #[test]
    fn annotations_for_unknown_entity_are_empty() {
        let onto = hierarchy();
        assert!(onto.annotations("urn:nothing").is_empty());
    }
}
