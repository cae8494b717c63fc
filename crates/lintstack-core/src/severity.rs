//! Rule severities and normalized rule settings

use schemars::JsonSchema;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical rule severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Report without failing
    Warn,
    /// Report and fail
    Error,
}

impl RuleSeverity {
    /// Normalize a severity value
    ///
    /// Accepts the integers 0/1/2 and the names `off`/`warn`/`error` in any case.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                let level = number.as_u64().or_else(|| {
                    number
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                        .map(|f| f as u64)
                })?;
                Self::from_level(level)
            }
            Value::String(name) => name.parse().ok(),
            _ => None,
        }
    }

    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Self::Off),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != Self::Off
    }
}

impl fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSeverity {
    type Err = InvalidSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(InvalidSeverity {
                value: Value::String(s.to_string()),
            }),
        }
    }
}

/// A rule declaration whose severity could not be normalized
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid severity {value}: expected 0, 1, 2, \"off\", \"warn\" or \"error\"")]
pub struct InvalidSeverity {
    /// The offending declaration, as written
    pub value: Value,
}

/// A normalized rule declaration
///
/// The option list is opaque here; only the rule itself knows its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: RuleSeverity,
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn new(severity: RuleSeverity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    /// Normalize a raw declaration: a bare severity or `[severity, ...options]`
    pub fn from_declaration(declaration: &Value) -> Result<Self, InvalidSeverity> {
        let invalid = || InvalidSeverity {
            value: declaration.clone(),
        };

        match declaration {
            Value::Array(items) => {
                let (first, options) = items.split_first().ok_or_else(invalid)?;
                let severity = RuleSeverity::from_value(first).ok_or_else(invalid)?;
                Ok(Self::new(severity).with_options(options.to_vec()))
            }
            other => RuleSeverity::from_value(other)
                .map(Self::new)
                .ok_or_else(invalid),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.severity.is_enabled()
    }
}

/// Written back in the declaration shape: the bare severity when there are no
/// options, `[severity, ...options]` otherwise.
impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            return self.severity.serialize(serializer);
        }

        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(&self.severity)?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}
