//! Configuration linting - static checks of a compiler configuration,
//! optionally against the ontology it will be used with.
//!
//! | Code | Severity | Check |
//! |------|----------|-------|
//! | `E001` | error | a class both allows and denies the same operation |
//! | `W001` | warning | unknown operation label |
//! | `W002` | warning | `paths_for_class` entry for a class the ontology lacks |
//! | `W003` | warning | `classes` entry the ontology lacks |
//! | `W004` | warning | markdown annotation with an empty heading |

use serde::Serialize;

use crate::config::Config;
use crate::ontology::Ontology;
use crate::operations::OperationRegistry;
use crate::types::local_name;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// JSON path to the issue (e.g., "/paths_for_class/Person/deny_operations")
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(code: &str, path: String, message: String) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            path,
            message,
        }
    }

    fn warning(code: &str, path: String, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            path,
            message,
        }
    }
}

/// Result of linting one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Returns true if there are no errors, and no warnings when `strict`.
    pub fn passes(&self, strict: bool) -> bool {
        self.is_ok() && !(strict && self.warnings > 0)
    }
}

/// Lint a configuration. Ontology-dependent checks run only when an
/// ontology is given.
pub fn lint_config(config: &Config, ontology: Option<&dyn Ontology>) -> LintResult {
    let mut diagnostics = Vec::new();

    check_operation_policies(config, &mut diagnostics);

    if let Some(ontology) = ontology {
        check_declared_classes(config, ontology, &mut diagnostics);
    }

    if let Some(annotations) = &config.annotations {
        for (index, entry) in annotations.markdown.iter().enumerate() {
            if entry.heading.trim().is_empty() {
                diagnostics.push(Diagnostic::warning(
                    "W004",
                    format!("/annotations/markdown/{}/heading", index),
                    format!("markdown annotation {} has an empty heading", entry.annotation),
                ));
            }
        }
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    LintResult {
        errors,
        warnings,
        diagnostics,
    }
}

fn check_operation_policies(config: &Config, diagnostics: &mut Vec<Diagnostic>) {
    let registry = OperationRegistry::global();

    for (class, policy) in &config.paths_for_class {
        for (list, labels) in [
            ("allow_operations", &policy.allow_operations),
            ("deny_operations", &policy.deny_operations),
        ] {
            for (index, label) in labels.iter().enumerate() {
                if registry.by_label(label).is_none() {
                    diagnostics.push(Diagnostic::warning(
                        "W001",
                        format!("/paths_for_class/{}/{}/{}", class, list, index),
                        format!(
                            "unknown operation \"{}\" (expected one of: {})",
                            label,
                            registry.labels().collect::<Vec<_>>().join(", ")
                        ),
                    ));
                }
            }
        }

        let overlap: Vec<String> = policy
            .allowed(class)
            .intersection(&policy.denied(class))
            .map(|op| op.label())
            .collect();
        if !overlap.is_empty() {
            diagnostics.push(Diagnostic::error(
                "E001",
                format!("/paths_for_class/{}", class),
                format!(
                    "operations both allowed and denied: {}",
                    overlap.join(", ")
                ),
            ));
        }
    }
}

fn check_declared_classes(
    config: &Config,
    ontology: &dyn Ontology,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let declared = ontology.class_iris();
    let is_declared = |name: &str| {
        declared
            .iter()
            .any(|iri| *iri == name || local_name(iri) == name)
    };

    for class in config.paths_for_class.keys() {
        if !is_declared(class.as_str()) {
            diagnostics.push(Diagnostic::warning(
                "W002",
                format!("/paths_for_class/{}", class),
                format!("class {} is not declared in {}", class, ontology.iri()),
            ));
        }
    }

    for (index, class) in config.classes.iter().flatten().enumerate() {
        if !is_declared(class.as_str()) {
            diagnostics.push(Diagnostic::warning(
                "W003",
                format!("/classes/{}", index),
                format!("class {} is not declared in {}", class, ontology.iri()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnnotationConfig, MarkdownAnnotation, PathsForClassConfig};
    use crate::ontology::{ClassDecl, OntologyDocument};

    fn ontology() -> OntologyDocument {
        OntologyDocument {
            iri: "https://w3id.org/example".into(),
            classes: vec![ClassDecl {
                iri: "https://w3id.org/example#Person".into(),
                annotations: vec![],
            }],
            ..Default::default()
        }
    }

    fn policy(allow: &[&str], deny: &[&str]) -> PathsForClassConfig {
        PathsForClassConfig {
            allow_operations: allow.iter().map(|s| s.to_string()).collect(),
            deny_operations: deny.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn codes(result: &LintResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn default_config_is_clean() {
        let result = lint_config(&Config::default(), Some(&ontology()));
        assert!(result.is_ok());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn overlap_is_an_error() {
        let mut config = Config::default();
        config.paths_for_class.insert(
            "Person".into(),
            policy(&["get_all", "get_by_key"], &["GET_BY_KEY"]),
        );

        let result = lint_config(&config, None);
        assert_eq!(codes(&result), vec!["E001"]);
        assert!(!result.is_ok());
        assert!(result.diagnostics[0].message.contains("get_by_key"));
    }

    #[test]
    fn unknown_label_is_a_warning() {
        let mut config = Config::default();
        config
            .paths_for_class
            .insert("Person".into(), policy(&["get_everything"], &[]));

        let result = lint_config(&config, None);
        assert_eq!(codes(&result), vec!["W001"]);
        assert_eq!(
            result.diagnostics[0].path,
            "/paths_for_class/Person/allow_operations/0"
        );
        assert!(result.passes(false));
        assert!(!result.passes(true));
    }

    #[test]
    fn undeclared_classes_need_an_ontology() {
        let mut config = Config::default();
        config
            .paths_for_class
            .insert("Robot".into(), policy(&[], &["delete_by_key"]));
        config.classes = Some(vec!["Person".into(), "Robot".into()]);

        assert!(lint_config(&config, None).diagnostics.is_empty());

        let result = lint_config(&config, Some(&ontology()));
        assert_eq!(codes(&result), vec!["W002", "W003"]);
        assert_eq!(result.diagnostics[1].path, "/classes/1");
    }

    #[test]
    fn empty_markdown_heading() {
        let config = Config {
            annotations: Some(AnnotationConfig {
                markdown: vec![MarkdownAnnotation {
                    annotation: "note".into(),
                    heading: " ".into(),
                    description: String::new(),
                }],
                ..Default::default()
            }),
            ..Default::default()
        };

        let result = lint_config(&config, None);
        assert_eq!(codes(&result), vec!["W004"]);
        assert_eq!(result.warnings, 1);
    }
}
