//! # Rule Engine
//!
//! One pure predicate per rule kind, and the dispatcher that routes a rule
//! to its predicate. `KwargsOf`, `AdvFormOf` and `AndKwargsOf` recurse back
//! into the dispatcher (through a nested [`Schema`] for mappings); the
//! scalar kinds terminate the recursion.
//!
//! ## Invariants
//!
//! - A refinement only narrows. It is ANDed with the structural check and
//!   never consulted when the structural check already failed.
//! - `AnyNOf` consults its refinement only for matches made through a type
//!   tag. A literal match succeeds on its own.
//! - Positional kinds (`FormOf`, `AdvFormOf`) demand an exact length match.
//! - `ArrayOf` flattens every level of nesting before checking elements.
//!
//! The engine holds no state. Recursion depth is bounded by the nesting
//! depth of the rules, which is finite because nested schemas are immutable
//! once shared.

use kdict_core::{TypeTag, Value};

use crate::refinement::Refinement;
use crate::rule::{Member, Rule, RuleBody};
use crate::schema::Schema;

/// Check `value` against `rule`. Composite kinds recurse through here.
pub fn validate(value: &Value, rule: &Rule) -> bool {
    let refinement = rule.refinement();
    match rule.body() {
        RuleBody::TypeOf(tag) => type_of(value, *tag, refinement),
        RuleBody::ArrayOf(tag) => array_of(value, *tag, refinement),
        RuleBody::AnyOf(allowed) => any_of(value, allowed),
        RuleBody::AnyNOf(members) => any_n_of(value, members, refinement),
        RuleBody::FormOf(tags) => form_of(value, tags, refinement),
        RuleBody::KwargsOf(schema) => kwargs_of(value, schema),
        RuleBody::AdvFormOf(rules) => adv_form_of(value, rules),
        RuleBody::AndKwargsOf { positional, kwargs } => and_kwargs_of(value, positional, kwargs),
    }
}

fn refined(refinement: Option<&Refinement>, value: &Value) -> bool {
    refinement.map_or(true, |r| r.test(value))
}

fn type_of(value: &Value, tag: TypeTag, refinement: Option<&Refinement>) -> bool {
    !value.is_composite() && tag.matches(value) && refined(refinement, value)
}

fn array_of(value: &Value, tag: TypeTag, refinement: Option<&Refinement>) -> bool {
    let Value::Array(items) = value else {
        return false;
    };
    let mut flat = Vec::new();
    flatten(items, &mut flat);
    flat.into_iter()
        .all(|element| tag.matches(element) && refined(refinement, element))
}

/// Collect the leaves of arbitrarily nested arrays, in order.
fn flatten<'a>(items: &'a [Value], out: &mut Vec<&'a Value>) {
    for item in items {
        match item {
            Value::Array(inner) => flatten(inner, out),
            leaf => out.push(leaf),
        }
    }
}

fn any_of(value: &Value, allowed: &[Value]) -> bool {
    allowed.iter().any(|candidate| candidate == value)
}

fn any_n_of(value: &Value, members: &[Member], refinement: Option<&Refinement>) -> bool {
    let literal_match = members
        .iter()
        .any(|m| matches!(m, Member::Literal(literal) if literal == value));
    if literal_match {
        return true;
    }
    members.iter().any(|m| match m {
        Member::Type(tag) => tag.matches(value) && refined(refinement, value),
        Member::Literal(_) => false,
    })
}

fn form_of(value: &Value, tags: &[TypeTag], refinement: Option<&Refinement>) -> bool {
    let Value::Array(items) = value else {
        return false;
    };
    items.len() == tags.len()
        && items
            .iter()
            .zip(tags)
            .all(|(item, tag)| tag.matches(item) && refined(refinement, item))
}

fn kwargs_of(value: &Value, schema: &Schema) -> bool {
    let Value::Map(entries) = value else {
        return false;
    };
    if !entries.keys().all(|key| schema.contains(key)) {
        return false;
    }
    entries.iter().all(|(key, sub_value)| schema.check(key, sub_value))
}

fn adv_form_of(value: &Value, rules: &[Rule]) -> bool {
    match value {
        Value::Array(items) => positional(items, rules),
        _ => false,
    }
}

/// Exact-length, in-order pairing of values with sub-rules.
fn positional(items: &[Value], rules: &[Rule]) -> bool {
    items.len() == rules.len()
        && items
            .iter()
            .zip(rules)
            .all(|(item, rule)| validate(item, rule))
}

fn and_kwargs_of(value: &Value, rules: &[Rule], kwargs: &Schema) -> bool {
    match value {
        Value::Map(_) => false,
        Value::Array(items) => match items.split_last() {
            None => false,
            Some((last, prefix)) if last.is_map() => {
                !prefix.is_empty()
                    && prefix.len() <= rules.len()
                    && positional(prefix, &rules[..prefix.len()])
                    && kwargs_of(last, kwargs)
            }
            Some(_) => items.len() <= rules.len() && positional(items, &rules[..items.len()]),
        },
        scalar => rules.first().is_some_and(|first| validate(scalar, first)),
    }
}
