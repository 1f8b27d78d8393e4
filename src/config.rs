//! Compiler configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration
//! file only needs the keys it changes:
//!
//! ```json
//! {
//!   "schema": { "use_inheritance_references": true },
//!   "paths": { "post_bulk": { "enabled": true } },
//!   "paths_for_class": {
//!     "Person": { "deny_operations": ["delete_by_key"] }
//!   }
//! }
//! ```
//!
//! A [`Config`] is an immutable snapshot for a whole compile run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::operations::OperationType;
use crate::types::{local_name, DEFAULT_DESCRIPTION_PROPERTIES};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema: SchemaOptions,
    /// Annotation roles. `null` disables the annotation processor.
    pub annotations: Option<AnnotationConfig>,
    pub paths: PathsConfig,
    /// Per-class path overrides, keyed by class IRI or local name.
    pub paths_for_class: BTreeMap<String, PathsForClassConfig>,
    /// Classes to compile, by IRI or local name. All declared classes when
    /// absent.
    pub classes: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: SchemaOptions::default(),
            annotations: Some(AnnotationConfig::default()),
            paths: PathsConfig::default(),
            paths_for_class: BTreeMap::new(),
            classes: None,
        }
    }
}

impl Config {
    /// Check every per-class path policy.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::ConflictingOperations` for the first class whose
    /// allow and deny sets overlap.
    pub fn validate(&self) -> Result<(), CompileError> {
        for (class, paths) in &self.paths_for_class {
            paths.validate(class)?;
        }
        Ok(())
    }

    /// Per-class path configuration for a class IRI.
    ///
    /// Exact IRI keys take precedence over local-name keys.
    pub fn paths_for(&self, class: &str) -> Option<&PathsForClassConfig> {
        self.paths_for_class
            .get(class)
            .or_else(|| self.paths_for_class.get(local_name(class)))
    }
}

/// Global flags steering schema generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Visit ancestors and object-property ranges of each class. Default: true.
    pub follow_references: bool,
    /// Emit `allOf` references to direct ancestors instead of flattening
    /// their properties. Default: false.
    pub use_inheritance_references: bool,
    /// Use a fixed description when the ontology has none. Default: true.
    pub default_descriptions: bool,
    /// Add `id`, `label`, `type`, `description` and example properties.
    /// Default: true.
    pub default_properties: bool,
    /// Keep every property array-shaped. Default: true.
    pub always_generate_arrays: bool,
    /// Derive `required` and `nullable` from cardinalities. Default: false.
    pub required_properties_from_cardinality: bool,
    /// Singularize singular property names and pluralize array property
    /// names. Default: false.
    pub fix_singular_plural_property_names: bool,
    /// Annotation properties consulted for descriptions, in order.
    pub description_properties: Vec<String>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            follow_references: true,
            use_inheritance_references: false,
            default_descriptions: true,
            default_properties: true,
            always_generate_arrays: true,
            required_properties_from_cardinality: false,
            fix_singular_plural_property_names: false,
            description_properties: DEFAULT_DESCRIPTION_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Names of the annotation properties that carry schema flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Marks a property `readOnly`.
    pub read_only: String,
    /// Marks a property `writeOnly`.
    pub write_only: String,
    /// Supplies an `example` value (data properties only).
    pub example: String,
    /// Annotations collected for markdown documentation.
    pub markdown: Vec<MarkdownAnnotation>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            read_only: "readOnly".to_string(),
            write_only: "writeOnly".to_string(),
            example: "example".to_string(),
            markdown: Vec::new(),
        }
    }
}

impl AnnotationConfig {
    /// The markdown entry configured for an annotation property, if any.
    pub fn markdown_for(&self, property_iri: &str) -> Option<&MarkdownAnnotation> {
        self.markdown
            .iter()
            .find(|m| crate::types::annotation_name_matches(property_iri, &m.annotation))
    }
}

/// An annotation rendered into markdown documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownAnnotation {
    /// Annotation property IRI or local name.
    pub annotation: String,
    /// Section heading.
    pub heading: String,
    /// Text under the heading.
    #[serde(default)]
    pub description: String,
}

/// Settings for one operation type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationSettings {
    pub enabled: bool,
    /// Path parameter name for by-key operations.
    pub key_name: Option<String>,
    /// Path suffix for bulk and search operations.
    pub path_suffix: Option<String>,
}

impl OperationSettings {
    fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }
}

/// Global path generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub get_all: OperationSettings,
    pub get_by_key: OperationSettings,
    pub post_single: OperationSettings,
    pub post_bulk: OperationSettings,
    pub put_by_key: OperationSettings,
    pub put_bulk: OperationSettings,
    pub delete_by_key: OperationSettings,
    pub search_by_post: OperationSettings,
    /// Default path parameter for by-key operations.
    pub key_name: String,
    /// Default suffix for bulk operations.
    pub bulk_path_suffix: String,
    /// Default suffix for search operations.
    pub search_path_suffix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            get_all: OperationSettings::enabled(),
            get_by_key: OperationSettings::enabled(),
            post_single: OperationSettings::enabled(),
            post_bulk: OperationSettings::default(),
            put_by_key: OperationSettings::enabled(),
            put_bulk: OperationSettings::default(),
            delete_by_key: OperationSettings::enabled(),
            search_by_post: OperationSettings::default(),
            key_name: "id".to_string(),
            bulk_path_suffix: "_bulk".to_string(),
            search_path_suffix: "_search".to_string(),
        }
    }
}

impl PathsConfig {
    /// Settings for an operation type.
    pub fn settings(&self, operation: OperationType) -> &OperationSettings {
        match operation {
            OperationType::DeleteByKey => &self.delete_by_key,
            OperationType::GetAll => &self.get_all,
            OperationType::GetByKey => &self.get_by_key,
            OperationType::PostBulk => &self.post_bulk,
            OperationType::PostSingle => &self.post_single,
            OperationType::PutBulk => &self.put_bulk,
            OperationType::PutByKey => &self.put_by_key,
            OperationType::SearchByPost => &self.search_by_post,
        }
    }
}

/// Per-class override of the global path settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsForClassConfig {
    /// When non-empty, only these operation labels are enabled.
    pub allow_operations: Vec<String>,
    /// Operation labels removed even when enabled globally.
    pub deny_operations: Vec<String>,
    /// Path parameter name for this class's by-key operations.
    pub key_name: Option<String>,
    /// Path suffix for this class's bulk operations.
    pub path_suffix: Option<String>,
    /// Collection segment used instead of the pluralized class name.
    pub collection_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let config: Config = serde_json::from_value(json!({
            "schema": { "use_inheritance_references": true }
        }))
        .unwrap();
        assert!(config.schema.use_inheritance_references);
        assert!(config.schema.follow_references);
        assert!(config.schema.always_generate_arrays);
        assert_eq!(config.annotations, Some(AnnotationConfig::default()));
        assert!(config.paths.get_all.enabled);
        assert!(!config.paths.post_bulk.enabled);
        assert_eq!(config.paths.key_name, "id");
    }

    #[test]
    fn null_annotations_disable_processor() {
        let config: Config = serde_json::from_value(json!({ "annotations": null })).unwrap();
        assert!(config.annotations.is_none());
    }

    #[test]
    fn paths_for_prefers_exact_iri() {
        let config: Config = serde_json::from_value(json!({
            "paths_for_class": {
                "Person": { "key_name": "local" },
                "https://w3id.org/example#Person": { "key_name": "exact" }
            }
        }))
        .unwrap();
        let paths = config.paths_for("https://w3id.org/example#Person").unwrap();
        assert_eq!(paths.key_name.as_deref(), Some("exact"));

        let paths = config.paths_for("https://other.org/onto#Person").unwrap();
        assert_eq!(paths.key_name.as_deref(), Some("local"));
        assert!(config.paths_for("https://other.org/onto#Dog").is_none());
    }

    #[test]
    fn validate_rejects_overlapping_policies() {
        let config: Config = serde_json::from_value(json!({
            "paths_for_class": {
                "Person": {
                    "allow_operations": ["get_by_key"],
                    "deny_operations": ["get_by_key"]
                }
            }
        }))
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(CompileError::ConflictingOperations { class, .. }) if class == "Person"
        ));
    }

    #[test]
    fn markdown_for_matches_local_name() {
        let config = AnnotationConfig {
            markdown: vec![MarkdownAnnotation {
                annotation: "usageNote".into(),
                heading: "Usage notes".into(),
                description: String::new(),
            }],
            ..Default::default()
        };
        assert!(config
            .markdown_for("http://www.w3.org/2004/02/skos/core#usageNote")
            .is_some());
        assert!(config.markdown_for("urn:x:other").is_none());
    }
}
