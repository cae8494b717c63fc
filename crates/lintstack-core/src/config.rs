//! Resolver configuration
//!
//! Controls which validation passes run and how severe each diagnostic code is.
//! Accepted as JSON or TOML:
//!
//! ```jsonc
//! {
//!   "checkPluginRules": true,
//!   "checkRuleSchemas": true,
//!   "validateDisabledRules": false,
//!   "pluginPrefix": "eslint-plugin",
//!   "severityOverrides": {
//!     "unknown-plugin-rule": "error"
//!   }
//! }
//! ```

use crate::diagnostics::{DiagnosticCode, DiagnosticSeverity};
use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default package prefix stripped from plugin names
pub const DEFAULT_PLUGIN_PREFIX: &str = "eslint-plugin";

/// Resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Report `plugin/rule` entries whose plugin is not registered
    #[schemars(description = "Report plugin rules whose plugin is not declared")]
    pub check_plugin_rules: bool,

    /// Run the schema lookup against each rule's options
    #[schemars(description = "Validate rule options against rule schemas")]
    pub check_rule_schemas: bool,

    /// Also validate options of rules that resolve to `off`
    #[schemars(description = "Validate options of disabled rules too")]
    pub validate_disabled_rules: bool,

    /// Package prefix stripped when normalizing plugin names
    #[schemars(description = "Plugin package prefix, e.g. 'eslint-plugin'")]
    pub plugin_prefix: String,

    /// Per-code severity overrides
    #[schemars(description = "Override the severity of individual diagnostic codes")]
    pub severity_overrides: BTreeMap<DiagnosticCode, DiagnosticSeverity>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            check_plugin_rules: true,
            check_rule_schemas: true,
            validate_disabled_rules: false,
            plugin_prefix: DEFAULT_PLUGIN_PREFIX.to_string(),
            severity_overrides: BTreeMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// JSON Schema describing this configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ResolverConfig)
    }

    /// Effective severity for a diagnostic code
    pub fn severity_for(&self, code: DiagnosticCode) -> DiagnosticSeverity {
        self.severity_overrides
            .get(&code)
            .copied()
            .unwrap_or_else(|| code.default_severity())
    }

    pub fn with_severity(mut self, code: DiagnosticCode, severity: DiagnosticSeverity) -> Self {
        self.severity_overrides.insert(code, severity);
        self
    }
}
