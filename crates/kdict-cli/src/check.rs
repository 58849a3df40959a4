//! # Check: one value against one field.
//!
//! ```bash
//! kdict check --schemas schemas/car.yaml --schema car doors 4
//! kdict check --schemas schemas/car.yaml --schema car engine '{"hp": 500}'
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{load_schema, parse_value};

/// Arguments for `kdict check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schemas: PathBuf,

    /// Name of the schema within the document.
    #[arg(long)]
    pub schema: String,

    /// Field to check.
    pub field: String,

    /// Value to check, as JSON. Anything that is not valid JSON is taken
    /// as a bare string.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Execute `kdict check`. Returns 0 on PASS, 1 on FAIL.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema = load_schema(&args.schemas, &args.schema)?;
    let value = parse_value(&args.value);

    if !schema.contains(&args.field) {
        tracing::warn!(field = %args.field, schema = %args.schema, "field is not declared");
    }

    if schema.check(&args.field, &value) {
        println!("PASS {}", args.field);
        Ok(0)
    } else {
        println!("FAIL {}", args.field);
        Ok(1)
    }
}
