//! # kdict-core: Foundational Types for kdict
//!
//! The leaf crate of the workspace. It defines the vocabulary every other
//! crate speaks: the dynamic [`Value`] that gets validated, the primitive
//! [`TypeTag`]s rules are written against, the closed [`RuleKind`] set, and
//! the error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **One dynamic value type.** Inputs arrive as [`Value`], whatever their
//!    origin (Rust literals, JSON, YAML). Equality is structural.
//!
//! 2. **Closed enums, exhaustive matches.** `TypeTag` has six variants and
//!    `RuleKind` has eight. Adding a variant forces every consumer to handle
//!    it at compile time.
//!
//! 3. **Configuration errors are typed.** Every way a rule definition can be
//!    malformed is a [`DefinitionError`] variant, raised when the rule is
//!    built and never at check time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kdict-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;
pub mod types;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{ConversionError, DefinitionError};
pub use kind::{RuleKind, RULE_KIND_COUNT};
pub use types::TypeTag;
pub use value::{Value, SYMBOL_KEY, SYMBOL_TAG};
