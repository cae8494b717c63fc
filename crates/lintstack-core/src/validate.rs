//! Post-merge validation
//!
//! Runs once every merger has finished and only reports; merged rules are
//! never changed here.

use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::document::DocumentId;
use crate::merge::RuleMerge;
use crate::plugins::{PluginRegistry, rule_namespace};
use crate::schema::RuleSchemaLookup;
use tracing::{debug, trace};

/// Checks merged rules against registered plugins and rule schemas
pub struct Validator<'a, S: ?Sized> {
    config: &'a ResolverConfig,
    schemas: &'a S,
}

impl<'a, S: RuleSchemaLookup + ?Sized> Validator<'a, S> {
    pub fn new(config: &'a ResolverConfig, schemas: &'a S) -> Self {
        Self { config, schemas }
    }

    /// Diagnose the merged rules, in rule order
    ///
    /// A rule whose plugin is not registered is reported (when enabled) and
    /// its options are not checked. Rules set to `off` are only checked when
    /// `validate_disabled_rules` is on.
    pub fn check(&self, merge: &RuleMerge, plugins: &PluginRegistry) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (rule, setting) in &merge.rules {
            let origin = merge.origins.get(rule);

            if let Some(namespace) = rule_namespace(rule)
                && !plugins.contains(namespace)
            {
                if self.config.check_plugin_rules {
                    diagnostics.push(self.diagnostic(
                        DiagnosticCode::UnknownPluginRule,
                        format!("Rule '{rule}' belongs to plugin '{namespace}', which is not declared"),
                        rule,
                        origin,
                    ));
                }
                continue;
            }

            if !self.config.check_rule_schemas
                || (!setting.is_enabled() && !self.config.validate_disabled_rules)
            {
                continue;
            }

            trace!("Checking options of '{}'", rule);
            if let Err(violation) = self.schemas.validate(rule, &setting.options) {
                diagnostics.push(self.diagnostic(
                    DiagnosticCode::SchemaValidationFailed,
                    format!("Invalid options for rule '{rule}': {violation}"),
                    rule,
                    origin,
                ));
            }
        }

        debug!(
            "Validated {} rules, {} diagnostics",
            merge.rules.len(),
            diagnostics.len()
        );
        diagnostics
    }

    fn diagnostic(
        &self,
        code: DiagnosticCode,
        message: String,
        rule: &str,
        origin: Option<&DocumentId>,
    ) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(code, message)
            .with_severity(self.config.severity_for(code))
            .with_rule(rule);
        if let Some(origin) = origin {
            diagnostic = diagnostic.with_document(origin);
        }
        diagnostic
    }
}
