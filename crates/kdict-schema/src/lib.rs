//! # kdict-schema: Rule Engine and Schemas
//!
//! A [`Schema`] maps field names to [`Rule`]s. Each rule has one of eight
//! kinds (see [`kdict_core::RuleKind`]), a kind-specific structure and, for
//! some kinds, a [`Refinement`] predicate. [`Schema::check`] answers whether
//! a [`kdict_core::Value`] satisfies the rule registered for a field.
//!
//! ## Modules
//!
//! - [`rule`]: the checked `Rule` type and its struct shapes.
//! - [`refinement`]: closure refinements and their declarative form.
//! - [`engine`]: the per-kind validation algorithms.
//! - [`schema`]: the field-name → rule container.
//! - [`document`]: YAML/JSON schema documents with named cross-references.
//!
//! ## Invariants
//!
//! - A `Rule` can only be obtained through [`Rule::new`] or its shorthands,
//!   so a rule whose struct does not fit its kind never reaches the engine.
//! - Validation is total: every value/rule pair yields `true` or `false`.
//! - Nested schemas are shared immutably; schema graphs are acyclic.
//!
//! ## Crate Policy
//!
//! - Depends only on `kdict-core` within the workspace.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod engine;
pub mod refinement;
pub mod rule;
pub mod schema;

pub use document::{DocumentError, RuleEntry, SchemaDocument, SchemaSet};
pub use engine::validate;
pub use refinement::{Parity, Refinement, RefinementSpec};
pub use rule::{Member, Rule, RuleStruct};
pub use schema::{FieldDefinition, Schema};
