//! Rule option schemas
//!
//! The validator asks a [`RuleSchemaLookup`] whether a rule's merged options
//! are acceptable. [`JsonSchemaRegistry`] is the stock implementation, backed by
//! JSON Schema (draft 4, the dialect rule schemas are written in).
//!
//! A rule schema is either a full schema for the options array, or an array
//! of schemas listing the positional options:
//!
//! ```json
//! [{ "enum": ["always", "never"] }, { "type": "object" }]
//! ```
//!
//! which accepts at most two options, each checked against its own schema.

use crate::error::SchemaError;
use jsonschema::{Draft, Validator};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Options rejected by a rule's schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .details.join("; "))]
pub struct SchemaViolation {
    pub details: Vec<String>,
}

impl SchemaViolation {
    pub fn new(details: Vec<String>) -> Self {
        Self { details }
    }
}

/// Per-rule option validation supplied by the rule engine
pub trait RuleSchemaLookup {
    /// Check `options` (the declaration minus its severity) for `rule`
    ///
    /// Rules without a known schema pass.
    fn validate(&self, rule: &str, options: &[Value]) -> Result<(), SchemaViolation>;
}

impl<T: RuleSchemaLookup + ?Sized> RuleSchemaLookup for &T {
    fn validate(&self, rule: &str, options: &[Value]) -> Result<(), SchemaViolation> {
        (**self).validate(rule, options)
    }
}

impl<T: RuleSchemaLookup + ?Sized> RuleSchemaLookup for Arc<T> {
    fn validate(&self, rule: &str, options: &[Value]) -> Result<(), SchemaViolation> {
        (**self).validate(rule, options)
    }
}

/// Accepts every rule's options
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchemas;

impl RuleSchemaLookup for NoSchemas {
    fn validate(&self, _rule: &str, _options: &[Value]) -> Result<(), SchemaViolation> {
        Ok(())
    }
}

/// Compiled JSON Schemas keyed by rule name
#[derive(Default)]
pub struct JsonSchemaRegistry {
    validators: HashMap<String, Validator>,
}

impl JsonSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register the option schema for `rule`
    pub fn register(&mut self, rule: impl Into<String>, schema: Value) -> Result<(), SchemaError> {
        let rule = rule.into();
        let schema = options_schema(schema);
        let validator = jsonschema::options()
            .with_draft(Draft::Draft4)
            .build(&schema)
            .map_err(|err| SchemaError::InvalidSchema {
                rule: rule.clone(),
                message: err.to_string(),
            })?;
        self.validators.insert(rule, validator);
        Ok(())
    }

    pub fn with_schema(mut self, rule: impl Into<String>, schema: Value) -> Result<Self, SchemaError> {
        self.register(rule, schema)?;
        Ok(self)
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.validators.contains_key(rule)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for JsonSchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<_> = self.validators.keys().collect();
        rules.sort();
        f.debug_struct("JsonSchemaRegistry")
            .field("rules", &rules)
            .finish()
    }
}

impl RuleSchemaLookup for JsonSchemaRegistry {
    fn validate(&self, rule: &str, options: &[Value]) -> Result<(), SchemaViolation> {
        let Some(validator) = self.validators.get(rule) else {
            return Ok(());
        };

        let instance = Value::Array(options.to_vec());
        let details: Vec<String> = validator
            .iter_errors(&instance)
            .map(|err| err.to_string())
            .collect();

        if details.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation::new(details))
        }
    }
}

/// Schema for the whole options array
fn options_schema(schema: Value) -> Value {
    match schema {
        // Draft 4 rejects an empty `items` array; `[]` means no options at all.
        Value::Array(items) if items.is_empty() => json!({
            "type": "array",
            "minItems": 0,
            "maxItems": 0
        }),
        Value::Array(items) => {
            let max = items.len();
            json!({
                "type": "array",
                "items": items,
                "minItems": 0,
                "maxItems": max
            })
        }
        other => other,
    }
}
