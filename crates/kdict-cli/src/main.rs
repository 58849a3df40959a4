//! # kdict CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kdict_cli::check::{run_check, CheckArgs};
use kdict_cli::fields::{run_fields, FieldsArgs};
use kdict_cli::validate::{run_validate, ValidateArgs};

/// Declarative schema validation for keyword-argument dictionaries.
///
/// Loads schemas from a YAML or JSON document and checks single values or
/// whole data documents against them.
#[derive(Parser, Debug)]
#[command(name = "kdict", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one value against one field of a schema.
    Check(CheckArgs),

    /// Check every key of a YAML/JSON mapping against a schema.
    Validate(ValidateArgs),

    /// List the fields of a schema and their rule kinds.
    Fields(FieldsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("kdict CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Fields(args) => run_fields(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "kdict", "check", "--schemas", "car.yaml", "--schema", "car", "doors", "4",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.schemas.to_str(), Some("car.yaml"));
                assert_eq!(args.schema, "car");
                assert_eq!(args.field, "doors");
                assert_eq!(args.value, "4");
            }
            other => panic!("Expected Check, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_validate_with_verbosity() {
        let cli = Cli::try_parse_from([
            "kdict", "-vv", "validate", "--schemas", "s.json", "--schema", "s", "doc.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.document.to_str(), Some("doc.yaml")),
            other => panic!("Expected Validate, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_fields() {
        let cli =
            Cli::try_parse_from(["kdict", "fields", "--schemas", "s.yaml", "--schema", "s"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Fields(_)));
    }

    #[test]
    fn cli_parse_check_requires_value() {
        assert!(Cli::try_parse_from([
            "kdict", "check", "--schemas", "s.yaml", "--schema", "s", "doors",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_requires_schema_name() {
        assert!(Cli::try_parse_from(["kdict", "fields", "--schemas", "s.yaml"]).is_err());
    }

    #[test]
    fn cli_verify_command_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
