//! Rule-set documents
//!
//! A [`Document`] is one materialized rule-set definition: its `extends`
//! references, raw rule declarations, and the auxiliary mappings that get
//! merged alongside them. Documents are immutable once built and are shared
//! between resolutions through `Arc`.
//!
//! Rule declarations are kept raw here. They are normalized into
//! [`RuleSetting`](crate::RuleSetting)s only when the rule merger reads them,
//! so an invalid declaration in one document never prevents the document
//! itself from being constructed.

use crate::error::DocumentError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Canonical document identity, assigned by the reference resolver
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One rule-set definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Resolver-assigned identity
    pub id: DocumentId,
    /// Extended documents, lowest precedence first
    pub extends: Vec<String>,
    /// Raw rule declarations (severity or `[severity, ...options]`)
    pub rules: IndexMap<String, Value>,
    /// Shared settings, arbitrarily nested
    pub settings: Map<String, Value>,
    /// Environment toggles
    pub env: IndexMap<String, bool>,
    /// Parser options
    pub parser_options: Map<String, Value>,
    /// Declared plugin names, in declaration order
    pub plugins: Vec<String>,
}

/// `extends` accepts a single reference or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtendsField {
    One(String),
    Many(Vec<String>),
}

impl Default for ExtendsField {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<ExtendsField> for Vec<String> {
    fn from(field: ExtendsField) -> Self {
        match field {
            ExtendsField::One(reference) => vec![reference],
            ExtendsField::Many(references) => references,
        }
    }
}

/// Serialized document shape (eslintrc style, unknown keys ignored)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DocumentBody {
    extends: ExtendsField,
    rules: IndexMap<String, Value>,
    settings: Map<String, Value>,
    env: IndexMap<String, bool>,
    parser_options: Map<String, Value>,
    plugins: Vec<String>,
}

impl Document {
    /// Create an empty document with the given identity
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Build a document from an already-parsed eslintrc-shaped JSON value
    pub fn from_value(id: impl Into<DocumentId>, value: Value) -> Result<Self, DocumentError> {
        let id = id.into();
        if !value.is_object() {
            return Err(DocumentError::NotAnObject { id });
        }

        let body: DocumentBody = serde_json::from_value(value).map_err(|source| {
            DocumentError::Invalid {
                id: id.clone(),
                source,
            }
        })?;

        Ok(Self {
            id,
            extends: body.extends.into(),
            rules: body.rules,
            settings: body.settings,
            env: body.env,
            parser_options: body.parser_options,
            plugins: body.plugins,
        })
    }

    pub fn with_extends(mut self, reference: impl Into<String>) -> Self {
        self.extends.push(reference.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>, declaration: Value) -> Self {
        self.rules.insert(rule.into(), declaration);
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.env.insert(name.into(), enabled);
        self
    }

    pub fn with_parser_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parser_options.insert(key.into(), value);
        self
    }

    pub fn with_plugin(mut self, name: impl Into<String>) -> Self {
        self.plugins.push(name.into());
        self
    }
}
