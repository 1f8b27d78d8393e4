//! Per-class operation policy and path shapes.
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | `get_all` | GET | `/{collection}` |
//! | `post_single` | POST | `/{collection}` |
//! | `get_by_key`, `put_by_key`, `delete_by_key` | GET, PUT, DELETE | `/{collection}/{key}` |
//! | `post_bulk`, `put_bulk` | POST, PUT | `/{collection}/_bulk` |
//! | `post_search` | POST | `/{collection}/_search` |

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{Config, PathsConfig, PathsForClassConfig};
use crate::error::CompileError;
use crate::inflect::Inflector;
use crate::operations::{HttpVerb, OperationType};
use crate::types::local_name;

/// One generated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    pub operation: OperationType,
    pub method: HttpVerb,
    pub path: String,
    /// Path parameter for by-key operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// Resolved operations of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassOperations {
    pub class: String,
    pub operations: BTreeSet<OperationType>,
    pub paths: Vec<PathEntry>,
}

impl PathsForClassConfig {
    /// Check that no label is both allowed and denied.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::ConflictingOperations` listing the overlap.
    pub fn validate(&self, class: &str) -> Result<(), CompileError> {
        let allow = normalized_labels(&self.allow_operations);
        let deny = normalized_labels(&self.deny_operations);
        let overlap: Vec<String> = allow.intersection(&deny).cloned().collect();

        if overlap.is_empty() {
            Ok(())
        } else {
            Err(CompileError::ConflictingOperations {
                class: class.to_string(),
                operations: overlap,
            })
        }
    }

    /// Allowed operations. Unknown labels are skipped.
    pub fn allowed(&self, class: &str) -> BTreeSet<OperationType> {
        known_operations(&self.allow_operations, class)
    }

    /// Denied operations. Unknown labels are skipped.
    pub fn denied(&self, class: &str) -> BTreeSet<OperationType> {
        known_operations(&self.deny_operations, class)
    }
}

/// Known labels in canonical form, unknown ones trimmed and lowercased.
fn normalized_labels(labels: &[String]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|l| match OperationType::from_label(l) {
            Some(op) => op.label(),
            None => l.trim().to_lowercase(),
        })
        .collect()
}

fn known_operations(labels: &[String], class: &str) -> BTreeSet<OperationType> {
    labels
        .iter()
        .filter_map(|label| {
            let op = OperationType::from_label(label);
            if op.is_none() {
                log::warn!("ignoring unknown operation '{}' configured for {}", label, class);
            }
            op
        })
        .collect()
}

/// Compute the operations enabled for a class.
///
/// A non-empty allow list replaces the global flags; the deny list is then
/// removed from whatever is enabled.
///
/// # Errors
///
/// Returns `CompileError::ConflictingOperations` when the class's allow and
/// deny lists overlap.
pub fn effective_operations(
    class: &str,
    global: &PathsConfig,
    class_paths: Option<&PathsForClassConfig>,
) -> Result<BTreeSet<OperationType>, CompileError> {
    let mut operations: BTreeSet<OperationType> = OperationType::ALL
        .into_iter()
        .filter(|op| global.settings(*op).enabled)
        .collect();

    let Some(class_paths) = class_paths else {
        return Ok(operations);
    };
    class_paths.validate(class)?;

    if !class_paths.allow_operations.is_empty() {
        operations = class_paths.allowed(class);
    }
    if !class_paths.deny_operations.is_empty() {
        for op in class_paths.denied(class) {
            operations.remove(&op);
        }
    }

    Ok(operations)
}

/// Resolve the operations and paths of a class.
///
/// # Errors
///
/// Returns `CompileError::ConflictingOperations` for overlapping allow/deny
/// lists.
pub fn resolve_class_operations(
    class: &str,
    config: &Config,
    inflector: &dyn Inflector,
) -> Result<ClassOperations, CompileError> {
    let class_paths = config.paths_for(class);
    let operations = effective_operations(class, &config.paths, class_paths)?;

    let collection = class_paths
        .and_then(|p| p.collection_name.clone())
        .unwrap_or_else(|| inflector.pluralize(&local_name(class).to_lowercase()));
    let base = format!("/{}", collection.trim_matches('/'));

    let paths = operations
        .iter()
        .map(|op| path_entry(*op, &base, &config.paths, class_paths))
        .collect();

    log::debug!("{} exposes {} operation(s)", class, operations.len());

    Ok(ClassOperations {
        class: class.to_string(),
        operations,
        paths,
    })
}

fn path_entry(
    operation: OperationType,
    base: &str,
    global: &PathsConfig,
    class_paths: Option<&PathsForClassConfig>,
) -> PathEntry {
    let settings = global.settings(operation);

    let (path, key_name) = if operation.is_by_key() {
        let key = class_paths
            .and_then(|p| p.key_name.clone())
            .or_else(|| settings.key_name.clone())
            .unwrap_or_else(|| global.key_name.clone());
        (format!("{}/{{{}}}", base, key), Some(key))
    } else if operation.is_bulk() {
        let suffix = class_paths
            .and_then(|p| p.path_suffix.clone())
            .or_else(|| settings.path_suffix.clone())
            .unwrap_or_else(|| global.bulk_path_suffix.clone());
        (format!("{}/{}", base, suffix.trim_matches('/')), None)
    } else if operation == OperationType::SearchByPost {
        let suffix = settings
            .path_suffix
            .clone()
            .unwrap_or_else(|| global.search_path_suffix.clone());
        (format!("{}/{}", base, suffix.trim_matches('/')), None)
    } else {
        (base.to_string(), None)
    };

    PathEntry {
        operation,
        method: operation.verb(),
        path,
        key_name,
    }
}
