//! # Schema
//!
//! A schema maps field names to rules. It is built once (by `define`,
//! `define_all` or `define_rule`) and then only read: `check` is the entry
//! point into the rule engine.
//!
//! A schema nested inside a `KwargsOf` or `AndKwargsOf` rule is shared as
//! an `Arc<Schema>`. Once shared it can no longer be mutated, so a schema
//! can never come to contain itself.
//!
//! ## Thread Safety
//!
//! `Schema` is `Send + Sync`. A built schema can be checked against from
//! any number of threads without locking.

use std::collections::HashMap;

use kdict_core::{DefinitionError, RuleKind, Value};

use crate::engine;
use crate::refinement::Refinement;
use crate::rule::{Rule, RuleStruct};

/// One `(name, kind, struct, refinement)` entry for [`Schema::define_all`].
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: RuleKind,
    pub structure: RuleStruct,
    pub refinement: Option<Refinement>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: RuleKind, structure: RuleStruct) -> Self {
        Self {
            name: name.into(),
            kind,
            structure,
            refinement: None,
        }
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = Some(refinement);
        self
    }
}

/// A named collection of field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<String, Rule>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field. A field that already exists is overwritten.
    ///
    /// # Errors
    ///
    /// Any [`DefinitionError`] from [`Rule::new`]. On error the schema is
    /// unchanged.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        kind: RuleKind,
        structure: RuleStruct,
        refinement: Option<Refinement>,
    ) -> Result<(), DefinitionError> {
        let rule = Rule::new(kind, structure, refinement)?;
        self.define_rule(name, rule);
        Ok(())
    }

    /// Register several fields in order, stopping at the first error.
    ///
    /// Entries before the failing one stay registered.
    pub fn define_all(
        &mut self,
        entries: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<(), DefinitionError> {
        for entry in entries {
            self.define(entry.name, entry.kind, entry.structure, entry.refinement)?;
        }
        Ok(())
    }

    /// Register an already-built rule. Last write wins.
    pub fn define_rule(&mut self, name: impl Into<String>, rule: Rule) {
        let name = name.into();
        if self.fields.insert(name.clone(), rule).is_some() {
            tracing::debug!(field = %name, "field redefined");
        }
    }

    /// Check `value` against the rule registered for `name`.
    ///
    /// Returns false for an unregistered name.
    pub fn check(&self, name: &str, value: &Value) -> bool {
        let Some(rule) = self.fields.get(name) else {
            tracing::trace!(field = name, "no such field");
            return false;
        };
        let passed = engine::validate(value, rule);
        if !passed {
            tracing::trace!(
                field = name,
                kind = %rule.kind(),
                value_type = value.type_name(),
                "field rejected"
            );
        }
        passed
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names, sorted alphabetically.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Iterate over `(name, rule)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdict_core::TypeTag;

    #[test]
    fn test_define_stores_rule() {
        let mut schema = Schema::new();
        schema
            .define(
                "test",
                RuleKind::TypeOf,
                RuleStruct::Tag(TypeTag::Integer),
                Some(Refinement::new(|_| true)),
            )
            .unwrap();
        let rule = schema.get("test").unwrap();
        assert_eq!(rule.kind(), RuleKind::TypeOf);
        assert!(rule.refinement().is_some());
    }

    #[test]
    fn test_define_rejects_bad_definition_and_leaves_schema_unchanged() {
        let mut schema = Schema::new();
        let err = schema
            .define(
                "test",
                RuleKind::AnyOf,
                RuleStruct::Literals(vec![Value::from(1)]),
                Some(Refinement::new(|_| true)),
            )
            .unwrap_err();
        assert!(matches!(err, DefinitionError::RefinementNotAllowed { .. }));
        assert!(schema.is_empty());
    }

    #[test]
    fn test_unknown_kind_identifier_is_a_definition_error() {
        let err = "typeoff".parse::<RuleKind>().unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownRuleKind(_)));
    }

    #[test]
    fn test_redefine_overwrites() {
        let mut schema = Schema::new();
        schema.define_rule("x", Rule::type_of(TypeTag::Integer));
        schema.define_rule("x", Rule::type_of(TypeTag::Text));
        assert_eq!(schema.len(), 1);
        assert!(schema.check("x", &Value::from("now text")));
        assert!(!schema.check("x", &Value::from(3)));
    }

    #[test]
    fn test_define_all_in_order() {
        let mut schema = Schema::new();
        schema
            .define_all([
                FieldDefinition::new("one", RuleKind::TypeOf, RuleStruct::Tag(TypeTag::Text)),
                FieldDefinition::new(
                    "two",
                    RuleKind::AnyOf,
                    RuleStruct::Literals(vec![Value::from("this"), Value::from("that")]),
                ),
            ])
            .unwrap();
        assert_eq!(schema.field_names(), vec!["one", "two"]);
        assert_eq!(schema.get("two").unwrap().kind(), RuleKind::AnyOf);
    }

    #[test]
    fn test_define_all_stops_at_first_error() {
        let mut schema = Schema::new();
        let result = schema.define_all([
            FieldDefinition::new("ok", RuleKind::TypeOf, RuleStruct::Tag(TypeTag::Text)),
            FieldDefinition::new("bad", RuleKind::FormOf, RuleStruct::Tag(TypeTag::Text)),
            FieldDefinition::new("never", RuleKind::TypeOf, RuleStruct::Tag(TypeTag::Text)),
        ]);
        assert!(result.is_err());
        assert!(schema.contains("ok"));
        assert!(!schema.contains("bad"));
        assert!(!schema.contains("never"));
    }

    #[test]
    fn test_check_unknown_field_is_false() {
        let mut schema = Schema::new();
        schema.define_rule("test", Rule::type_of(TypeTag::Integer));
        assert!(!schema.check("tes", &Value::from(3)));
    }

    #[test]
    fn test_check_delegates_to_engine() {
        let mut schema = Schema::new();
        schema.define_rule("test", Rule::type_of(TypeTag::Integer));
        schema.define_rule("test2", Rule::array_of(TypeTag::Float));
        assert!(schema.check("test", &Value::from(3)));
        assert!(schema.check("test2", &Value::from(vec![1.0, 2.1, 3.5])));
        assert!(!schema.check("test", &Value::from("3")));
        assert!(!schema.check(
            "test2",
            &Value::from(vec![Value::from(1), Value::from(2), Value::from(3.5)])
        ));
    }

    #[test]
    fn test_define_all_with_refinement() {
        let mut schema = Schema::new();
        schema
            .define_all([FieldDefinition::new(
                "rgba",
                RuleKind::FormOf,
                RuleStruct::Tags(vec![TypeTag::Numeric; 4]),
            )
            .with_refinement(Refinement::number(|n| (0.0..=1.0).contains(&n)))])
            .unwrap();
        assert!(schema.check("rgba", &Value::from(vec![0.5, 1.0, 0.25, 1.0])));
        assert!(!schema.check("rgba", &Value::from(vec![0.5, 1.0, 0.25, 11.5])));
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }

    #[test]
    fn test_iter_visits_every_field() {
        let mut schema = Schema::new();
        schema.define_rule("a", Rule::type_of(TypeTag::Bool));
        schema.define_rule("b", Rule::array_of(TypeTag::Bool));
        let mut kinds: Vec<_> = schema.iter().map(|(n, r)| (n, r.kind())).collect();
        kinds.sort_by_key(|(n, _)| *n);
        assert_eq!(kinds, vec![("a", RuleKind::TypeOf), ("b", RuleKind::ArrayOf)]);
    }
}
