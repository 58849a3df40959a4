//! # Error Types
//!
//! Defines the error types used throughout kdict. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A failed validation is never an error. `check` answers `false` and that
//!   is the complete signal.
//! - A malformed rule definition is always an error, raised synchronously
//!   when the rule is constructed.

use thiserror::Error;

use crate::kind::RuleKind;

/// A rule definition that can never validate anything meaningfully.
///
/// Raised at definition time. A rule that made it past construction is
/// well-formed for its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The rule kind identifier is not one of the eight known kinds.
    #[error("unknown rule kind: {0:?}")]
    UnknownRuleKind(String),

    /// The type tag identifier is not one of the known primitive tags.
    #[error("unknown type tag: {0:?}")]
    UnknownTypeTag(String),

    /// A refinement was attached to a kind that never accepts one.
    #[error("rule kind {kind} does not accept a refinement")]
    RefinementNotAllowed {
        /// The kind the refinement was attached to.
        kind: RuleKind,
    },

    /// The struct does not have the shape required by the kind.
    #[error("malformed struct for {kind}: {reason}")]
    MalformedStruct {
        /// The kind whose struct is malformed.
        kind: RuleKind,
        /// What is wrong with the struct.
        reason: String,
    },
}

/// A JSON or YAML tree that has no [`Value`](crate::Value) equivalent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Map keys must be scalars.
    #[error("unsupported map key: {0}")]
    UnsupportedKey(String),

    /// A number that is neither an `i64` nor an `f64`.
    #[error("unsupported number: {0}")]
    UnsupportedNumber(String),

    /// A symbol tag on something other than a string.
    #[error("symbol tag must wrap a string, got {0}")]
    InvalidSymbol(String),
}

impl DefinitionError {
    /// Shorthand for [`DefinitionError::MalformedStruct`].
    pub fn malformed(kind: RuleKind, reason: impl Into<String>) -> Self {
        Self::MalformedStruct {
            kind,
            reason: reason.into(),
        }
    }
}
