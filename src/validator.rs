//! Checks that annotation-supplied examples match the property schemas
//! they were attached to.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{SchemaError, ValidateError};
use crate::schema::SchemaNode;

/// Validate every property example of every schema.
///
/// Errors from all schemas are collected into one `ValidateError::Invalid`.
///
/// # Errors
///
/// Returns `ValidateError::Invalid` listing each example that does not
/// match, or `ValidateError::InvalidSchema` if a property schema cannot be
/// compiled for validation.
pub fn validate_examples(schemas: &BTreeMap<String, SchemaNode>) -> Result<(), ValidateError> {
    let mut errors = Vec::new();
    for (name, schema) in schemas {
        match validate_schema_examples(name, schema) {
            Ok(()) => {}
            Err(ValidateError::Invalid { errors: found }) => errors.extend(found),
            Err(e) => return Err(e),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

/// Validate the property examples of one schema.
///
/// An example describes a single value, so it is checked against the
/// property's `items` when the property is an array. Value schemas holding
/// component references are skipped.
///
/// # Errors
///
/// See [`validate_examples`].
pub fn validate_schema_examples(name: &str, schema: &SchemaNode) -> Result<(), ValidateError> {
    let mut errors = Vec::new();

    for (property_name, property) in &schema.properties {
        let Some(example) = &property.example else {
            continue;
        };
        let value_schema = property.value_schema();
        let json = value_schema.to_value();
        if contains_reference(&json) {
            log::debug!("{}.{}: example not checked, schema has references", name, property_name);
            continue;
        }

        let path = format!("/{}/properties/{}", name, property_name);
        errors.extend(
            validate_value(&json, example, &path)?
                .into_iter()
                .map(|message| SchemaError {
                    path: path.clone(),
                    message,
                }),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

fn validate_value(schema: &Value, value: &Value, path: &str) -> Result<Vec<String>, ValidateError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
            schema: path.to_string(),
            message: e.to_string(),
        })?;

    Ok(validator.iter_errors(value).map(|e| e.to_string()).collect())
}

fn contains_reference(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(contains_reference),
        Value::Array(items) => items.iter().any(contains_reference),
        _ => false,
    }
}
