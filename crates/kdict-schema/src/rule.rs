//! # Rules
//!
//! A rule is a kind, a kind-specific struct, and an optional refinement.
//! [`Rule::new`] is the single checked construction path: it pairs the kind
//! with the struct shape the kind requires, and rejects refinements on kinds
//! that never take one. A `Rule` value is therefore always well-formed, and
//! the engine never has to second-guess one at check time.
//!
//! Internally the kind and its struct are fused into one [`RuleBody`]
//! variant, so the dispatcher is an exhaustive `match` with no unreachable
//! arms.

use std::sync::Arc;

use kdict_core::{DefinitionError, RuleKind, TypeTag, Value};

use crate::refinement::Refinement;
use crate::schema::Schema;

/// One entry of an `AnyNOf` set: a literal value or a type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Matches a value equal to this one.
    Literal(Value),
    /// Matches any value of this type.
    Type(TypeTag),
}

impl Member {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }
}

impl From<TypeTag> for Member {
    fn from(tag: TypeTag) -> Self {
        Self::Type(tag)
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// The kind-specific configuration of a rule, before it is paired with a kind.
#[derive(Debug, Clone)]
pub enum RuleStruct {
    /// One type tag (`TypeOf`, `ArrayOf`).
    Tag(TypeTag),
    /// A set of literal values (`AnyOf`, or an `AnyNOf` without tags).
    Literals(Vec<Value>),
    /// Literals mixed with type tags (`AnyNOf`).
    Members(Vec<Member>),
    /// An ordered list of type tags (`FormOf`).
    Tags(Vec<TypeTag>),
    /// A nested schema (`KwargsOf`).
    Schema(Arc<Schema>),
    /// An ordered list of sub-rules (`AdvFormOf`, `AndKwargsOf`).
    Rules(Vec<Rule>),
}

impl RuleStruct {
    fn shape(&self) -> &'static str {
        match self {
            Self::Tag(_) => "a type tag",
            Self::Literals(_) => "a literal set",
            Self::Members(_) => "a literal/type-tag set",
            Self::Tags(_) => "a type-tag sequence",
            Self::Schema(_) => "a schema",
            Self::Rules(_) => "a sub-rule sequence",
        }
    }
}

/// Kind and struct, fused.
#[derive(Debug, Clone)]
pub(crate) enum RuleBody {
    TypeOf(TypeTag),
    ArrayOf(TypeTag),
    AnyOf(Vec<Value>),
    AnyNOf(Vec<Member>),
    FormOf(Vec<TypeTag>),
    KwargsOf(Arc<Schema>),
    AdvFormOf(Vec<Rule>),
    AndKwargsOf {
        /// Never empty; none of these is `KwargsOf`/`AndKwargsOf`.
        positional: Vec<Rule>,
        kwargs: Arc<Schema>,
    },
}

/// A validated rule definition.
#[derive(Debug, Clone)]
pub struct Rule {
    body: RuleBody,
    refinement: Option<Refinement>,
}

impl Rule {
    /// Build a rule from a kind, a struct and an optional refinement.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::RefinementNotAllowed`] if `refinement` is given
    ///   for `AnyOf`, `KwargsOf`, `AdvFormOf` or `AndKwargsOf`.
    /// - [`DefinitionError::MalformedStruct`] if `structure` does not have
    ///   the shape `kind` requires, if an `AdvFormOf` sub-rule is
    ///   `KwargsOf`/`AndKwargsOf`, or if an `AndKwargsOf` sequence does not
    ///   end in `KwargsOf` after at least one positional sub-rule.
    pub fn new(
        kind: RuleKind,
        structure: RuleStruct,
        refinement: Option<Refinement>,
    ) -> Result<Self, DefinitionError> {
        if refinement.is_some() && !kind.accepts_refinement() {
            return Err(DefinitionError::RefinementNotAllowed { kind });
        }

        let body = match (kind, structure) {
            (RuleKind::TypeOf, RuleStruct::Tag(tag)) => RuleBody::TypeOf(tag),
            (RuleKind::ArrayOf, RuleStruct::Tag(tag)) => RuleBody::ArrayOf(tag),
            (RuleKind::AnyOf, RuleStruct::Literals(values)) => RuleBody::AnyOf(values),
            (RuleKind::AnyNOf, RuleStruct::Members(members)) => RuleBody::AnyNOf(members),
            (RuleKind::AnyNOf, RuleStruct::Literals(values)) => {
                RuleBody::AnyNOf(values.into_iter().map(Member::Literal).collect())
            }
            (RuleKind::FormOf, RuleStruct::Tags(tags)) => RuleBody::FormOf(tags),
            (RuleKind::KwargsOf, RuleStruct::Schema(schema)) => RuleBody::KwargsOf(schema),
            (RuleKind::AdvFormOf, RuleStruct::Rules(rules)) => {
                if let Some(bad) = rules.iter().find(|r| !r.kind().is_positional()) {
                    return Err(DefinitionError::malformed(
                        kind,
                        format!("sub-rule of kind {} is not allowed", bad.kind()),
                    ));
                }
                RuleBody::AdvFormOf(rules)
            }
            (RuleKind::AndKwargsOf, RuleStruct::Rules(mut rules)) => {
                let kwargs = match rules.pop() {
                    Some(Rule {
                        body: RuleBody::KwargsOf(schema),
                        ..
                    }) => schema,
                    Some(last) => {
                        return Err(DefinitionError::malformed(
                            kind,
                            format!("last sub-rule must be kwargs_of, got {}", last.kind()),
                        ))
                    }
                    None => {
                        return Err(DefinitionError::malformed(kind, "sub-rule sequence is empty"))
                    }
                };
                if rules.is_empty() {
                    return Err(DefinitionError::malformed(
                        kind,
                        "at least one positional sub-rule must precede kwargs_of",
                    ));
                }
                if let Some(bad) = rules.iter().find(|r| !r.kind().is_positional()) {
                    return Err(DefinitionError::malformed(
                        kind,
                        format!("positional sub-rule of kind {} is not allowed", bad.kind()),
                    ));
                }
                RuleBody::AndKwargsOf {
                    positional: rules,
                    kwargs,
                }
            }
            (kind, structure) => {
                return Err(DefinitionError::malformed(
                    kind,
                    format!("{} is not a valid struct", structure.shape()),
                ))
            }
        };

        Ok(Self { body, refinement })
    }

    /// `TypeOf`: a scalar of type `tag`.
    pub fn type_of(tag: TypeTag) -> Self {
        Self {
            body: RuleBody::TypeOf(tag),
            refinement: None,
        }
    }

    /// `ArrayOf`: a sequence, flattened, of elements of type `tag`.
    pub fn array_of(tag: TypeTag) -> Self {
        Self {
            body: RuleBody::ArrayOf(tag),
            refinement: None,
        }
    }

    /// `AnyOf`: one of `values`.
    pub fn any_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            body: RuleBody::AnyOf(values.into_iter().map(Into::into).collect()),
            refinement: None,
        }
    }

    /// `AnyNOf`: one of the literal members, or any value of a member type.
    pub fn any_n_of<M: Into<Member>>(members: impl IntoIterator<Item = M>) -> Self {
        Self {
            body: RuleBody::AnyNOf(members.into_iter().map(Into::into).collect()),
            refinement: None,
        }
    }

    /// `FormOf`: a sequence with exactly one value per tag, in order.
    pub fn form_of(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        Self {
            body: RuleBody::FormOf(tags.into_iter().collect()),
            refinement: None,
        }
    }

    /// `KwargsOf`: a mapping validated against `schema`.
    pub fn kwargs_of(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            body: RuleBody::KwargsOf(schema.into()),
            refinement: None,
        }
    }

    /// `AdvFormOf`: a sequence with exactly one value per sub-rule, in order.
    pub fn adv_form_of(rules: Vec<Rule>) -> Result<Self, DefinitionError> {
        Self::new(RuleKind::AdvFormOf, RuleStruct::Rules(rules), None)
    }

    /// `AndKwargsOf`: positional sub-rules followed by a `KwargsOf`.
    pub fn and_kwargs_of(rules: Vec<Rule>) -> Result<Self, DefinitionError> {
        Self::new(RuleKind::AndKwargsOf, RuleStruct::Rules(rules), None)
    }

    /// Attach a refinement.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::RefinementNotAllowed`] if this kind never takes one.
    pub fn refined(mut self, refinement: Refinement) -> Result<Self, DefinitionError> {
        let kind = self.kind();
        if !kind.accepts_refinement() {
            return Err(DefinitionError::RefinementNotAllowed { kind });
        }
        self.refinement = Some(refinement);
        Ok(self)
    }

    pub fn kind(&self) -> RuleKind {
        match &self.body {
            RuleBody::TypeOf(_) => RuleKind::TypeOf,
            RuleBody::ArrayOf(_) => RuleKind::ArrayOf,
            RuleBody::AnyOf(_) => RuleKind::AnyOf,
            RuleBody::AnyNOf(_) => RuleKind::AnyNOf,
            RuleBody::FormOf(_) => RuleKind::FormOf,
            RuleBody::KwargsOf(_) => RuleKind::KwargsOf,
            RuleBody::AdvFormOf(_) => RuleKind::AdvFormOf,
            RuleBody::AndKwargsOf { .. } => RuleKind::AndKwargsOf,
        }
    }

    pub fn refinement(&self) -> Option<&Refinement> {
        self.refinement.as_ref()
    }

    pub(crate) fn body(&self) -> &RuleBody {
        &self.body
    }
}
