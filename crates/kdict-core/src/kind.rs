//! # Rule Kinds: The Closed Validator Set
//!
//! Defines the `RuleKind` enum with all eight validator variants. Every
//! `match` on `RuleKind` must be exhaustive, so a new kind cannot be added
//! without every dispatcher handling it.
//!
//! String-driven definitions (schema documents, CLI input) name kinds by
//! their snake_case identifier. Parsing an unknown identifier is the only
//! way to reach an "unknown rule kind" and it fails with
//! [`DefinitionError::UnknownRuleKind`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DefinitionError;

/// The eight rule kinds a field can be validated with.
///
/// | Kind | Struct | Refinement |
/// |------|--------|------------|
/// | TypeOf | one type tag | per scalar |
/// | ArrayOf | one type tag | per flattened element |
/// | AnyOf | literal values | never |
/// | AnyNOf | literals and type tags | on type-tag matches only |
/// | FormOf | ordered type tags | per element |
/// | KwargsOf | nested schema | never |
/// | AdvFormOf | ordered sub-rules | carried by each sub-rule |
/// | AndKwargsOf | ordered sub-rules ending in KwargsOf | carried by each sub-rule |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A single scalar of one type.
    TypeOf,
    /// A sequence, flattened, whose elements are all of one type.
    ArrayOf,
    /// One of a fixed set of literal values.
    AnyOf,
    /// One of a set of literal values, or any value of a listed type.
    #[serde(rename = "any_n_of")]
    AnyNOf,
    /// A fixed-length sequence with one type per position.
    FormOf,
    /// A mapping validated field-by-field against a nested schema.
    KwargsOf,
    /// A fixed-length sequence with one full sub-rule per position.
    AdvFormOf,
    /// Positional sub-rules followed by an optional trailing mapping.
    AndKwargsOf,
}

/// Total number of rule kinds.
pub const RULE_KIND_COUNT: usize = 8;

impl RuleKind {
    /// Returns all rule kinds in declaration order.
    pub fn all_kinds() -> &'static [RuleKind] {
        &[
            Self::TypeOf,
            Self::ArrayOf,
            Self::AnyOf,
            Self::AnyNOf,
            Self::FormOf,
            Self::KwargsOf,
            Self::AdvFormOf,
            Self::AndKwargsOf,
        ]
    }

    /// Returns the snake_case identifier for this kind.
    ///
    /// Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeOf => "type_of",
            Self::ArrayOf => "array_of",
            Self::AnyOf => "any_of",
            Self::AnyNOf => "any_n_of",
            Self::FormOf => "form_of",
            Self::KwargsOf => "kwargs_of",
            Self::AdvFormOf => "adv_form_of",
            Self::AndKwargsOf => "and_kwargs_of",
        }
    }

    /// Whether a rule of this kind may carry its own refinement.
    ///
    /// `AdvFormOf` and `AndKwargsOf` return false: their sub-rules carry
    /// refinements individually.
    pub fn accepts_refinement(&self) -> bool {
        match self {
            Self::TypeOf | Self::ArrayOf | Self::AnyNOf | Self::FormOf => true,
            Self::AnyOf | Self::KwargsOf | Self::AdvFormOf | Self::AndKwargsOf => false,
        }
    }

    /// Whether this kind may appear as a positional sub-rule of
    /// `AdvFormOf` or `AndKwargsOf`.
    pub fn is_positional(&self) -> bool {
        !matches!(self, Self::KwargsOf | Self::AndKwargsOf)
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type_of" => Ok(Self::TypeOf),
            "array_of" => Ok(Self::ArrayOf),
            "any_of" => Ok(Self::AnyOf),
            "any_n_of" => Ok(Self::AnyNOf),
            "form_of" => Ok(Self::FormOf),
            "kwargs_of" => Ok(Self::KwargsOf),
            "adv_form_of" => Ok(Self::AdvFormOf),
            "and_kwargs_of" => Ok(Self::AndKwargsOf),
            other => Err(DefinitionError::UnknownRuleKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(RuleKind::all_kinds().len(), RULE_KIND_COUNT);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in RuleKind::all_kinds() {
            let parsed: RuleKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_from_str_unknown_kind() {
        let err = "typeoff".parse::<RuleKind>().unwrap_err();
        assert_eq!(err, DefinitionError::UnknownRuleKind("typeoff".into()));
        assert!("TypeOf".parse::<RuleKind>().is_err());
        assert!("".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in RuleKind::all_kinds() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: RuleKind = serde_json::from_str(&json).unwrap();
            assert_eq!(*kind, back);
        }
    }

    #[test]
    fn test_refinement_acceptance() {
        let accepting: Vec<_> = RuleKind::all_kinds()
            .iter()
            .filter(|k| k.accepts_refinement())
            .collect();
        assert_eq!(
            accepting,
            vec![&RuleKind::TypeOf, &RuleKind::ArrayOf, &RuleKind::AnyNOf, &RuleKind::FormOf]
        );
    }

    #[test]
    fn test_positional_kinds_exclude_kwargs() {
        assert!(!RuleKind::KwargsOf.is_positional());
        assert!(!RuleKind::AndKwargsOf.is_positional());
        assert!(RuleKind::AdvFormOf.is_positional());
        assert!(RuleKind::TypeOf.is_positional());
    }
}
