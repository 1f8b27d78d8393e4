//! OWL to OpenAPI schema compiler
//!
//! Compiles the classes of an OWL ontology into OpenAPI 3 component schemas,
//! and resolves which REST operations each class exposes.
//!
//! # Example
//!
//! ```
//! use owl_openapi::{compile_ontology, load_ontology_str, Config};
//!
//! let ontology = load_ontology_str(r#"{
//!     "iri": "https://w3id.org/example",
//!     "prefixes": { "": "https://w3id.org/example#" },
//!     "classes": [{ "iri": "https://w3id.org/example#Person" }],
//!     "data_properties": [{
//!         "iri": "https://w3id.org/example#name",
//!         "domains": ["https://w3id.org/example#Person"],
//!         "ranges": ["http://www.w3.org/2001/XMLSchema#string"]
//!     }]
//! }"#).unwrap();
//!
//! let output = compile_ontology(&ontology, &Config::default()).unwrap();
//! let person = output.schemas["Person"].to_value();
//!
//! assert_eq!(person["properties"]["name"]["type"], "array");
//! assert_eq!(person["properties"]["name"]["items"]["type"], "string");
//! let paths = &output.operations["Person"].paths;
//! assert!(paths.iter().any(|p| p.path == "/persons/{id}"));
//! ```
//!
//! # Pipeline
//!
//! | Step | Effect |
//! |------|--------|
//! | base schema | object named after the class, description, default properties |
//! | visit | properties from domains, restrictions, ancestors |
//! | cleanup | unresolved shapes become objects |
//! | requiredness | `required` / `nullable` from cardinalities |
//! | array conversion | single-valued arrays collapse to values |
//! | inheritance | `allOf` references to direct ancestors |
//! | pruning | referenced classes that add nothing are dropped |
//! | markdown | annotation tables for documentation |
//!
//! Each step is driven by [`SchemaOptions`]; operations and paths by
//! [`PathsConfig`] and [`PathsForClassConfig`].

mod annotation;
mod builder;
mod compiler;
mod config;
mod context;
mod defaults;
mod error;
mod inflect;
mod linter;
mod loader;
mod markdown;
mod ontology;
mod operations;
mod paths;
mod restriction;
mod schema;
mod types;
mod validator;
mod visitor;

pub use annotation::{apply_axiom_annotations, apply_entity_annotations, lookup_description};
pub use builder::{base_class_schema, generate_required_properties, prefixed_name};
pub use compiler::{
    apply_inheritance_references, apply_requiredness, cleanup, compile_class,
    compile_class_with, compile_ontology, compile_ontology_with, convert_array_properties,
    prune_referenced_classes, run_stages, CompileOutput, CompiledClass,
};
pub use config::{
    AnnotationConfig, Config, MarkdownAnnotation, OperationSettings, PathsConfig,
    PathsForClassConfig, SchemaOptions,
};
pub use context::VisitorContext;
pub use defaults::{default_properties, merge_default_properties};
pub use error::{CompileError, LoadError, SchemaError, ValidateError};
pub use inflect::{EnglishInflector, Inflector};
pub use linter::{lint_config, Diagnostic, LintResult, Severity};
pub use loader::{
    is_url, load_config, load_config_str, load_ontology, load_ontology_auto, load_ontology_str,
};
pub use markdown::{
    collect_markdown_annotations, merge_markdown, render_markdown, MarkdownTables,
};
pub use ontology::{
    Annotation, ClassDecl, ClassExpression, EquivalentClassesAxiom, Ontology, OntologyDocument,
    PropertyDecl, PropertyKind, SubClassAxiom,
};
pub use operations::{Cardinality, HttpVerb, OperationRegistry, OperationType};
pub use paths::{effective_operations, resolve_class_operations, ClassOperations, PathEntry};
pub use restriction::{classify, RestrictionKind};
pub use schema::{SchemaNode, SchemaType};
pub use types::{local_name, DEFAULT_DESCRIPTION};
pub use validator::{validate_examples, validate_schema_examples};
pub use visitor::{datatype_schema, visit_class};

#[cfg(feature = "remote")]
pub use loader::load_ontology_url;
