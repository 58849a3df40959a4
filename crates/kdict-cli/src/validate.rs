//! # Validate: every key of a document.
//!
//! Loads a YAML/JSON mapping and checks each of its keys against the field
//! of the same name. Keys are visited in sorted order.
//!
//! ```bash
//! kdict validate --schemas schemas/car.yaml --schema car my_car.yaml
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::{load_schema, load_value};

/// Arguments for `kdict validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schemas: PathBuf,

    /// Name of the schema within the document.
    #[arg(long)]
    pub schema: String,

    /// Data document to validate: a YAML or JSON mapping.
    pub document: PathBuf,
}

/// Execute `kdict validate`. Returns 0 if every field passed, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema(&args.schemas, &args.schema)?;
    let document = load_value(&args.document)?;

    let Some(entries) = document.as_map() else {
        bail!(
            "{} must contain a mapping, found {}",
            args.document.display(),
            document.type_name()
        );
    };

    let mut failed = 0usize;
    for (field, value) in entries {
        if schema.check(field, value) {
            println!("  PASS  {field}");
        } else {
            let reason = if schema.contains(field) {
                ""
            } else {
                " (not declared)"
            };
            println!("  FAIL  {field}{reason}");
            failed += 1;
        }
    }

    println!();
    println!(
        "{}: {} fields, {} passed, {} failed",
        args.document.display(),
        entries.len(),
        entries.len() - failed,
        failed
    );

    tracing::info!(
        document = %args.document.display(),
        fields = entries.len(),
        failed,
        "validation complete"
    );

    Ok(if failed == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMAS: &str = r#"
schemas:
  engine:
    hp: { kind: type_of, struct: integer, refine: { min: 95, max: 800 } }
  car:
    doors:  { kind: type_of, struct: integer }
    engine: { kind: kwargs_of, struct: engine }
"#;

    fn args(dir: &tempfile::TempDir, name: &str, document: &str) -> ValidateArgs {
        let schemas = dir.path().join("car.yaml");
        std::fs::write(&schemas, SCHEMAS).unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, document).unwrap();
        ValidateArgs {
            schemas,
            schema: "car".to_string(),
            document: path,
        }
    }

    #[test]
    fn test_all_fields_pass() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "ok.yaml", "doors: 4\nengine: { hp: 500 }\n");
        assert_eq!(run_validate(&a).unwrap(), 0);
    }

    #[test]
    fn test_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "ok.json", r#"{"doors": 2, "engine": {}}"#);
        assert_eq!(run_validate(&a).unwrap(), 0);
    }

    #[test]
    fn test_any_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "bad.yaml", "doors: 4\nengine: { hp: 20 }\n");
        assert_eq!(run_validate(&a).unwrap(), 1);
    }

    #[test]
    fn test_undeclared_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "extra.yaml", "doors: 4\nspoiler: true\n");
        assert_eq!(run_validate(&a).unwrap(), 1);
    }

    #[test]
    fn test_non_mapping_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "list.yaml", "- doors\n- engine\n");
        assert!(run_validate(&a).is_err());
    }
}
