//! The flattened configuration produced by a resolution

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::document::DocumentId;
use crate::plugins::PluginBinding;
use crate::severity::{RuleSetting, RuleSeverity};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// One deterministic, conflict-checked configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    /// Document the resolution started from
    pub root: DocumentId,
    /// Linearized documents, lowest precedence first
    pub sources: Vec<DocumentId>,
    pub rules: IndexMap<String, RuleSetting>,
    /// Document whose declaration won, per rule
    pub rule_origins: IndexMap<String, DocumentId>,
    pub settings: Map<String, Value>,
    pub env: IndexMap<String, bool>,
    pub parser_options: Map<String, Value>,
    pub plugins: Vec<PluginBinding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EffectiveConfig {
    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }

    pub fn severity(&self, name: &str) -> Option<RuleSeverity> {
        self.rules.get(name).map(|setting| setting.severity)
    }

    /// Document that supplied the effective setting of `rule`
    pub fn origin_of(&self, rule: &str) -> Option<&DocumentId> {
        self.rule_origins.get(rule)
    }

    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|binding| binding.name.as_str())
    }

    /// Rules that are not `off`
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.rules
            .iter()
            .filter(|(_, setting)| setting.is_enabled())
            .map(|(name, setting)| (name.as_str(), setting))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics_with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// eslintrc-shaped JSON for the rule engine
    pub fn to_json(&self) -> Value {
        json!({
            "rules": self.rules,
            "settings": self.settings,
            "env": self.env,
            "parserOptions": self.parser_options,
            "plugins": self.plugin_names().collect::<Vec<_>>(),
        })
    }
}
