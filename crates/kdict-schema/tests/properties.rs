//! Property tests for the rule engine.
//!
//! Each property holds for every primitive type tag and every generated
//! value, not just the handful of cases covered by the unit tests.

use std::sync::Arc;

use kdict_core::{TypeTag, Value};
use kdict_schema::{validate, Member, Rule, Schema};
use proptest::prelude::*;

fn type_tag() -> impl Strategy<Value = TypeTag> {
    prop::sample::select(TypeTag::all_tags().to_vec())
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-zA-Z0-9_ ]{0,12}".prop_map(Value::Text),
        "[a-z]{1,8}".prop_map(Value::Symbol),
    ]
}

/// Arbitrary values, nested up to four levels deep.
fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6).prop_map(Value::Map),
        ]
    })
}

/// Arrays (nested arbitrarily) whose leaves are scalars.
fn nested_array() -> impl Strategy<Value = Value> {
    let leaf = scalar();
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(Value::Array)
    })
    .prop_map(|v| match v {
        array @ Value::Array(_) => array,
        scalar => Value::Array(vec![scalar]),
    })
}

fn flatten(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten(item, out)),
        leaf => out.push(leaf.clone()),
    }
}

fn composite() -> impl Strategy<Value = Value> {
    value().prop_filter("composite values only", Value::is_composite)
}

fn schema_with_fields(names: &[String]) -> Arc<Schema> {
    let mut schema = Schema::new();
    for name in names {
        schema.define_rule(name.as_str(), Rule::type_of(TypeTag::Numeric));
    }
    Arc::new(schema)
}

proptest! {
    /// `TypeOf` never accepts a sequence or a mapping.
    #[test]
    fn type_of_rejects_composites(tag in type_tag(), v in composite()) {
        prop_assert!(!validate(&v, &Rule::type_of(tag)));
    }

    /// `ArrayOf` only sees the leaves of a nested sequence.
    #[test]
    fn array_of_is_flatten_invariant(tag in type_tag(), v in nested_array()) {
        let mut leaves = Vec::new();
        flatten(&v, &mut leaves);
        let rule = Rule::array_of(tag);
        prop_assert_eq!(validate(&v, &rule), validate(&Value::Array(leaves), &rule));
    }

    /// `FormOf` fails on any length mismatch.
    #[test]
    fn form_of_rejects_wrong_length(
        tags in prop::collection::vec(type_tag(), 0..5),
        items in prop::collection::vec(scalar(), 0..8),
    ) {
        prop_assume!(items.len() != tags.len());
        prop_assert!(!validate(&Value::Array(items), &Rule::form_of(tags)));
    }

    /// `AdvFormOf` fails on any length mismatch.
    #[test]
    fn adv_form_of_rejects_wrong_length(
        tags in prop::collection::vec(type_tag(), 1..5),
        items in prop::collection::vec(scalar(), 0..8),
    ) {
        prop_assume!(items.len() != tags.len());
        let rule = Rule::adv_form_of(tags.into_iter().map(Rule::type_of).collect()).unwrap();
        prop_assert!(!validate(&Value::Array(items), &rule));
    }

    /// An empty mapping satisfies every `KwargsOf`.
    #[test]
    fn kwargs_of_accepts_empty_map(names in prop::collection::vec("[a-z]{1,6}", 0..6)) {
        let rule = Rule::kwargs_of(schema_with_fields(&names));
        prop_assert!(validate(&Value::Map(Default::default()), &rule));
    }

    /// A key the nested schema does not declare fails `KwargsOf`.
    #[test]
    fn kwargs_of_rejects_unknown_key(
        names in prop::collection::vec("[a-z]{1,6}", 0..6),
        stranger in "[A-Z]{1,6}",
        v in scalar(),
    ) {
        let rule = Rule::kwargs_of(schema_with_fields(&names));
        prop_assert!(!validate(&Value::map([(stranger, v)]), &rule));
    }

    /// Every literal of an `AnyNOf` is accepted as itself.
    #[test]
    fn any_n_of_accepts_its_literals(literals in prop::collection::vec(scalar(), 1..6)) {
        let rule = Rule::any_n_of(literals.iter().cloned().map(Member::Literal));
        for literal in &literals {
            prop_assert!(validate(literal, &rule));
        }
    }

    /// Checking is a pure function of its inputs.
    #[test]
    fn check_is_idempotent(tag in type_tag(), v in value()) {
        let mut schema = Schema::new();
        schema.define_rule("scalar", Rule::type_of(tag));
        schema.define_rule("array", Rule::array_of(tag));
        for field in ["scalar", "array", "missing"] {
            let first = schema.check(field, &v);
            prop_assert_eq!(first, schema.check(field, &v));
            prop_assert_eq!(first, schema.check(field, &v));
        }
    }
}
