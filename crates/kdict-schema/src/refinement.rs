//! # Refinements
//!
//! A refinement is an extra predicate attached to a rule. It only ever
//! narrows what the rule accepts: the engine ANDs it with the structural
//! check, and only after the structural check has passed.
//!
//! Refinements are written in Rust as closures (see the typed constructors
//! on [`Refinement`]) or declared in schema documents as a
//! [`RefinementSpec`].

use std::fmt;
use std::sync::Arc;

use kdict_core::Value;
use serde::{Deserialize, Serialize};

/// A side-effect-free predicate over a single value.
///
/// Cheap to clone; clones share the same closure.
#[derive(Clone)]
pub struct Refinement(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Refinement {
    /// A refinement over any value.
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// A refinement over integers. Any other value fails.
    pub fn integer(predicate: impl Fn(i64) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |v| v.as_i64().is_some_and(&predicate))
    }

    /// A refinement over numbers, integer or float. Any other value fails.
    pub fn number(predicate: impl Fn(f64) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |v| v.as_f64().is_some_and(&predicate))
    }

    /// A refinement over text. Any other value fails.
    pub fn text(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |v| v.as_str().is_some_and(&predicate))
    }

    /// A refinement over symbols. Any other value fails.
    pub fn symbol(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |v| v.as_symbol().is_some_and(&predicate))
    }

    /// A refinement over booleans. Any other value fails.
    pub fn boolean(predicate: impl Fn(bool) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |v| v.as_bool().is_some_and(&predicate))
    }

    /// Evaluate the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Refinement(..)")
    }
}

/// Integer parity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Even,
    Odd,
}

/// Declarative refinement, as written in a schema document.
///
/// Every constraint that is present must hold. A constraint that needs a
/// particular shape of value fails on any other shape: `min` on a string is
/// false, `min_len` on a number is false.
///
/// ```yaml
/// refine: { min: 95, max: 800, parity: even }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinementSpec {
    /// Inclusive lower bound on a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound on a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Minimum character count of a text value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,
    /// Maximum character count of a text value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    /// Required parity of an integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parity: Option<Parity>,
}

impl RefinementSpec {
    /// Evaluate every present constraint against `value`.
    pub fn holds(&self, value: &Value) -> bool {
        if self.min.is_some() || self.max.is_some() {
            let Some(n) = value.as_f64() else {
                return false;
            };
            if self.min.is_some_and(|min| n < min) || self.max.is_some_and(|max| n > max) {
                return false;
            }
        }

        if self.min_len.is_some() || self.max_len.is_some() {
            let Some(s) = value.as_str() else {
                return false;
            };
            let len = s.chars().count();
            if self.min_len.is_some_and(|min| len < min)
                || self.max_len.is_some_and(|max| len > max)
            {
                return false;
            }
        }

        if let Some(parity) = self.parity {
            let Some(n) = value.as_i64() else {
                return false;
            };
            let even = n % 2 == 0;
            if even != (parity == Parity::Even) {
                return false;
            }
        }

        true
    }
}

impl From<RefinementSpec> for Refinement {
    fn from(spec: RefinementSpec) -> Self {
        Refinement::new(move |v| spec.holds(v))
    }
}
