use std::path::Path;

use jsonschema::JSONSchema;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CliError, CliResult};

/// Read a JSON document and check it against the JSON Schema of `T` before
/// deserializing, so every structural problem is reported at once.
pub fn read_json_document<T>(path: &Path) -> CliResult<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let content = std::fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    parse_document(&path.display().to_string(), document)
}

pub fn parse_document<T>(label: &str, document: Value) -> CliResult<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = serde_json::to_value(schemars::schema_for!(T))?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| CliError::InvalidInput {
        path: label.to_string(),
        issues: err.to_string(),
    })?;

    let issues: Vec<String> = match compiled.validate(&document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| format!("{}: {}", pointer_or_root(&error.instance_path.to_string()), error))
            .collect(),
    };
    if !issues.is_empty() {
        return Err(CliError::InvalidInput {
            path: label.to_string(),
            issues: issues.join("; "),
        });
    }

    Ok(serde_json::from_value(document)?)
}

fn pointer_or_root(pointer: &str) -> &str {
    if pointer.is_empty() { "/" } else { pointer }
}
