//! # Schema Documents
//!
//! Declarative schema definitions in YAML or JSON. A document declares any
//! number of named schemas; `kwargs_of` rules refer to other schemas in the
//! same document by name.
//!
//! ```yaml
//! schemas:
//!   engine:
//!     hp:    { kind: type_of, struct: integer, refine: { min: 95, max: 800 } }
//!     turbo: { kind: type_of, struct: bool }
//!   car:
//!     engine: { kind: kwargs_of, struct: engine }
//!     model:  { kind: any_of, struct: [SpaceCowboy, Peanut, Icarus] }
//! ```
//!
//! ## Struct encoding per kind
//!
//! | Kind | `struct` |
//! |------|----------|
//! | `type_of`, `array_of` | tag name |
//! | `any_of` | list of literals |
//! | `any_n_of` | list of literals and `{ $type: tag }` entries |
//! | `form_of` | list of tag names |
//! | `kwargs_of` | schema name |
//! | `adv_form_of`, `and_kwargs_of` | list of rule entries |
//!
//! Literal symbols are written `!sym name` in YAML or `{"$symbol": "name"}`
//! in either format.
//!
//! ## Resolution
//!
//! Schemas are built depth-first in reference order. A reference to a name
//! the document does not declare, or a chain of references that leads back
//! to a schema still being built, is rejected.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use kdict_core::{DefinitionError, RuleKind, TypeTag, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::refinement::{Refinement, RefinementSpec};
use crate::rule::{Member, Rule, RuleStruct};
use crate::schema::Schema;

/// Mapping key that marks an `any_n_of` entry as a type tag.
pub const TYPE_KEY: &str = "$type";

/// Error while loading or building a schema document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("cannot load schema document '{path}': {reason}")]
    Load {
        /// Path to the document.
        path: String,
        /// Reason the document could not be read.
        reason: String,
    },

    /// The document is not valid YAML/JSON or does not have the document shape.
    #[error("invalid schema document: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },

    /// A nested rule entry could not be parsed.
    #[error("invalid rule entry at {schema}.{field}: {reason}")]
    InvalidEntry {
        /// Schema containing the entry.
        schema: String,
        /// Field containing the entry.
        field: String,
        /// Parser message.
        reason: String,
    },

    /// A rule refers to a schema the document does not declare.
    #[error("{schema}.{field} refers to unknown schema '{name}'")]
    UnknownSchema {
        /// Referenced name.
        name: String,
        /// Schema containing the reference.
        schema: String,
        /// Field containing the reference.
        field: String,
    },

    /// Schema references form a cycle.
    #[error("schema reference cycle: {cycle}")]
    SchemaCycle {
        /// The cycle, written `a -> b -> a`.
        cycle: String,
    },

    /// A rule entry was rejected by rule construction.
    #[error("invalid definition at {schema}.{field}: {source}")]
    Definition {
        /// Schema containing the entry.
        schema: String,
        /// Field containing the entry.
        field: String,
        /// The underlying definition error.
        #[source]
        source: DefinitionError,
    },
}

/// One rule entry as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    /// Rule kind identifier. Kept as a string so that an unknown kind is
    /// reported as a definition error rather than a parse error.
    pub kind: String,
    /// Kind-specific struct.
    #[serde(rename = "struct")]
    pub structure: serde_yaml::Value,
    /// Optional declarative refinement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine: Option<RefinementSpec>,
}

/// A parsed, not yet built, schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Schema name → field name → rule entry.
    pub schemas: BTreeMap<String, BTreeMap<String, RuleEntry>>,
}

impl SchemaDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
            reason: format!("invalid YAML: {e}"),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(content).map_err(|e| DocumentError::Parse {
            reason: format!("invalid JSON: {e}"),
        })
    }

    /// Load a document from a file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Load {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let document = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            _ => Self::from_json_str(&content)?,
        };

        tracing::debug!(
            path = %path.display(),
            schemas = document.schemas.len(),
            "loaded schema document"
        );
        Ok(document)
    }

    /// Build every schema in the document.
    ///
    /// # Errors
    ///
    /// The first [`DocumentError`] encountered, in schema-name order.
    pub fn build(&self) -> Result<SchemaSet, DocumentError> {
        let mut builder = Builder {
            document: self,
            built: HashMap::new(),
            in_progress: Vec::new(),
        };
        for name in self.schemas.keys() {
            builder.resolve(name, None)?;
        }
        Ok(SchemaSet {
            schemas: builder.built,
        })
    }
}

/// The built schemas of a document, by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaSet {
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Schema names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

struct Builder<'a> {
    document: &'a SchemaDocument,
    built: HashMap<String, Arc<Schema>>,
    /// Schemas currently being built, outermost first.
    in_progress: Vec<String>,
}

/// Where in the document a rule entry sits.
#[derive(Clone, Copy)]
struct Site<'s> {
    schema: &'s str,
    field: &'s str,
}

impl Site<'_> {
    fn definition(&self, source: DefinitionError) -> DocumentError {
        DocumentError::Definition {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            source,
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> DocumentError {
        DocumentError::InvalidEntry {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            reason: reason.into(),
        }
    }
}

impl Builder<'_> {
    fn resolve(&mut self, name: &str, from: Option<Site<'_>>) -> Result<Arc<Schema>, DocumentError> {
        if let Some(schema) = self.built.get(name) {
            return Ok(Arc::clone(schema));
        }

        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle: Vec<&str> = self.in_progress[start..].iter().map(|s| s.as_str()).collect();
            cycle.push(name);
            return Err(DocumentError::SchemaCycle {
                cycle: cycle.join(" -> "),
            });
        }

        let document = self.document;
        let Some(fields) = document.schemas.get(name) else {
            let (schema, field) = from.map_or(("", ""), |site| (site.schema, site.field));
            return Err(DocumentError::UnknownSchema {
                name: name.to_string(),
                schema: schema.to_string(),
                field: field.to_string(),
            });
        };

        self.in_progress.push(name.to_string());
        let mut schema = Schema::new();
        for (field, entry) in fields {
            let site = Site {
                schema: name,
                field,
            };
            let rule = self.build_rule(site, entry)?;
            schema.define_rule(field.as_str(), rule);
        }
        self.in_progress.pop();

        tracing::debug!(schema = name, fields = schema.len(), "built schema");
        let schema = Arc::new(schema);
        self.built.insert(name.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    fn build_rule(&mut self, site: Site<'_>, entry: &RuleEntry) -> Result<Rule, DocumentError> {
        let kind: RuleKind = entry.kind.parse().map_err(|e| site.definition(e))?;
        let refinement = entry.refine.clone().map(Refinement::from);

        let structure = match kind {
            RuleKind::TypeOf | RuleKind::ArrayOf => {
                RuleStruct::Tag(parse_tag(&entry.structure, kind).map_err(|e| site.definition(e))?)
            }
            RuleKind::AnyOf => {
                let items = sequence(&entry.structure, kind).map_err(|e| site.definition(e))?;
                let literals = items
                    .iter()
                    .map(|item| literal(item, kind))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| site.definition(e))?;
                RuleStruct::Literals(literals)
            }
            RuleKind::AnyNOf => {
                let items = sequence(&entry.structure, kind).map_err(|e| site.definition(e))?;
                let members = items
                    .iter()
                    .map(|item| member(item, kind))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| site.definition(e))?;
                RuleStruct::Members(members)
            }
            RuleKind::FormOf => {
                let items = sequence(&entry.structure, kind).map_err(|e| site.definition(e))?;
                let tags = items
                    .iter()
                    .map(|item| parse_tag(item, kind))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| site.definition(e))?;
                RuleStruct::Tags(tags)
            }
            RuleKind::KwargsOf => {
                let Some(name) = entry.structure.as_str() else {
                    return Err(site.definition(DefinitionError::malformed(
                        kind,
                        "expected a schema name",
                    )));
                };
                RuleStruct::Schema(self.resolve(name, Some(site))?)
            }
            RuleKind::AdvFormOf | RuleKind::AndKwargsOf => {
                let items = sequence(&entry.structure, kind).map_err(|e| site.definition(e))?;
                let mut rules = Vec::with_capacity(items.len());
                for item in items {
                    let sub: RuleEntry = serde_yaml::from_value(item.clone())
                        .map_err(|e| site.invalid(e.to_string()))?;
                    rules.push(self.build_rule(site, &sub)?);
                }
                RuleStruct::Rules(rules)
            }
        };

        Rule::new(kind, structure, refinement).map_err(|e| site.definition(e))
    }
}

fn sequence(value: &serde_yaml::Value, kind: RuleKind) -> Result<&[serde_yaml::Value], DefinitionError> {
    value
        .as_sequence()
        .map(|seq| seq.as_slice())
        .ok_or_else(|| DefinitionError::malformed(kind, "expected a list"))
}

fn parse_tag(value: &serde_yaml::Value, kind: RuleKind) -> Result<TypeTag, DefinitionError> {
    match value.as_str() {
        Some(name) => name.parse(),
        None => Err(DefinitionError::malformed(kind, "expected a type tag name")),
    }
}

fn literal(value: &serde_yaml::Value, kind: RuleKind) -> Result<Value, DefinitionError> {
    Value::from_yaml(value).map_err(|e| DefinitionError::malformed(kind, e.to_string()))
}

fn member(value: &serde_yaml::Value, kind: RuleKind) -> Result<Member, DefinitionError> {
    if let Some(mapping) = value.as_mapping() {
        if mapping.len() == 1 {
            if let Some(tag) = mapping.get(TYPE_KEY) {
                return parse_tag(tag, kind).map(Member::Type);
            }
        }
    }
    literal(value, kind).map(Member::Literal)
}
