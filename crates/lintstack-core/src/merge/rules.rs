//! Rule merging
//!
//! A declaration replaces the previous value for its rule wholesale. Option
//! lists are never combined: `["error", "always"]` followed by `"warn"` gives
//! `warn` with no options.

use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::document::{Document, DocumentId};
use crate::severity::RuleSetting;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Outcome of merging rule declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMerge {
    /// Effective rules, in order of first declaration
    pub rules: IndexMap<String, RuleSetting>,
    /// Document whose declaration won, per rule
    pub origins: IndexMap<String, DocumentId>,
    /// Declarations that could not be normalized
    pub diagnostics: Vec<Diagnostic>,
}

/// Merge rule declarations across `documents`, lowest precedence first
///
/// A declaration that does not normalize is reported as
/// [`DiagnosticCode::InvalidSeverityValue`] and leaves the prior value, or its
/// absence, in place.
pub fn merge_rules(documents: &[Arc<Document>], config: &ResolverConfig) -> RuleMerge {
    let mut merge = RuleMerge::default();

    for document in documents {
        for (rule, declaration) in &document.rules {
            let setting = match RuleSetting::from_declaration(declaration) {
                Ok(setting) => setting,
                Err(err) => {
                    warn!("Rule '{}' in '{}': {}", rule, document.id, err);
                    merge.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::InvalidSeverityValue,
                            format!("Rule '{rule}': {err}"),
                        )
                        .with_severity(config.severity_for(DiagnosticCode::InvalidSeverityValue))
                        .with_document(&document.id)
                        .with_rule(rule.as_str()),
                    );
                    continue;
                }
            };

            if let Some(previous) = merge.origins.get(rule) {
                trace!("Rule '{}' from '{}' overrides '{}'", rule, document.id, previous);
            }
            merge.rules.insert(rule.clone(), setting);
            merge.origins.insert(rule.clone(), document.id.clone());
        }
    }

    merge
}
