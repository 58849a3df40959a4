//! # kdict-cli: Command-Line Front End
//!
//! Provides the `kdict` binary. Every subcommand loads a schema document
//! (YAML or JSON, see [`kdict_schema::document`]), picks one schema from it
//! by name, and runs checks against it.
//!
//! ## Subcommands
//!
//! - `kdict check`: check one value against one field.
//! - `kdict validate`: check every key of a YAML/JSON mapping.
//! - `kdict fields`: list the fields of a schema and their rule kinds.
//!
//! ```bash
//! kdict check --schemas schemas/car.yaml --schema car doors 4
//! kdict validate --schemas schemas/car.yaml --schema car my_car.yaml
//! kdict fields --schemas schemas/car.yaml --schema car
//! ```
//!
//! ## Exit Codes
//!
//! `0` when every check passed, `1` when at least one failed, `2` on an
//! operational error (unreadable file, invalid document, unknown schema).

pub mod check;
pub mod fields;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use kdict_core::Value;
use kdict_schema::{Schema, SchemaDocument};

/// Load the schema document at `path`, build it, and return the schema `name`.
pub fn load_schema(path: &Path, name: &str) -> Result<Arc<Schema>> {
    let schemas = SchemaDocument::load(path)
        .and_then(|doc| doc.build())
        .with_context(|| format!("failed to load schemas from {}", path.display()))?;

    schemas.get(name).with_context(|| {
        format!(
            "schema '{name}' not found in {} (available: {})",
            path.display(),
            schemas.names().join(", ")
        )
    })
}

/// Parse a command-line value as JSON, falling back to a bare string.
///
/// `4` is an integer, `"4"` and `four` are text, `[1, 2]` is an array.
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    }
}

/// Load a YAML (`.yaml`/`.yml`) or JSON data file as a [`Value`].
pub fn load_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            Value::from_yaml(&yaml).with_context(|| format!("unsupported YAML in {}", path.display()))
        }
        _ => {
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
            Ok(Value::from(json))
        }
    }
}
