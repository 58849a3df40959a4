//! # Fields: list a schema's fields.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::load_schema;

/// Arguments for `kdict fields`.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schemas: PathBuf,

    /// Name of the schema within the document.
    #[arg(long)]
    pub schema: String,
}

/// Execute `kdict fields`.
pub fn run_fields(args: &FieldsArgs) -> Result<u8> {
    let schema = load_schema(&args.schemas, &args.schema)?;

    println!("Schema '{}':", args.schema);
    for name in schema.field_names() {
        let Some(rule) = schema.get(name) else {
            continue;
        };
        let refined = if rule.refinement().is_some() {
            " (refined)"
        } else {
            ""
        };
        println!("  {name:<16} {}{refined}", rule.kind());
    }
    println!();
    println!("Total: {} fields", schema.len());
    Ok(0)
}
