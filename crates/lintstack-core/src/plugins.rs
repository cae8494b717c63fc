//! Plugin registry
//!
//! Plugins are identified by their normalized name. The package prefix is
//! stripped, so `eslint-plugin-import` and `import` are the same plugin:
//!
//! | declared                    | registered    |
//! |-----------------------------|---------------|
//! | `eslint-plugin-import`      | `import`      |
//! | `@scope/eslint-plugin`      | `@scope`      |
//! | `@scope/eslint-plugin-foo`  | `@scope/foo`  |
//!
//! Each name is bound to the implementation the resolver maps it to. Declaring
//! an already-registered name again is fine as long as it resolves to the same
//! implementation; otherwise the first binding stays and a
//! [`DiagnosticCode::DuplicatePluginConflict`] is reported.

use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::document::{Document, DocumentId};
use crate::resolver::{PluginSource, ReferenceResolver};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{trace, warn};

/// A registered plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginBinding {
    /// Normalized plugin name, the namespace of its rules
    pub name: String,
    pub source: PluginSource,
    /// First document that declared the plugin
    pub declared_in: DocumentId,
}

/// Result of registering one binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// Same name and same implementation as an existing binding
    AlreadyBound,
    /// Same name, different implementation; carries the binding that was kept
    Conflict(PluginBinding),
}

/// Ordered, deduplicated plugin bindings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginRegistry {
    bindings: IndexMap<String, PluginBinding>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding unless its name is already taken
    pub fn register(&mut self, binding: PluginBinding) -> Registration {
        match self.bindings.get(&binding.name) {
            Some(existing) if existing.source == binding.source => Registration::AlreadyBound,
            Some(existing) => Registration::Conflict(existing.clone()),
            None => {
                self.bindings.insert(binding.name.clone(), binding);
                Registration::Added
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PluginBinding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> Vec<PluginBinding> {
        self.bindings.into_values().collect()
    }
}

/// Strip the plugin package prefix from a declared plugin name
pub fn normalize_plugin_name(name: &str, prefix: &str) -> String {
    let dashed = format!("{prefix}-");

    if name.starts_with('@') {
        return match name.split_once('/') {
            Some((scope, rest)) if rest == prefix => scope.to_string(),
            Some((scope, rest)) => match rest.strip_prefix(&dashed) {
                Some(short) => format!("{scope}/{short}"),
                None => format!("{scope}/{rest}"),
            },
            None => name.to_string(),
        };
    }

    name.strip_prefix(&dashed).unwrap_or(name).to_string()
}

/// Plugin namespace of a rule name: everything before the last `/`
///
/// Core rules have no namespace.
pub fn rule_namespace(rule: &str) -> Option<&str> {
    rule.rsplit_once('/').map(|(namespace, _)| namespace)
}

/// Register every plugin declared by `documents`, lowest precedence first
pub fn register_plugins<R>(
    documents: &[Arc<Document>],
    resolver: &R,
    config: &ResolverConfig,
) -> (PluginRegistry, Vec<Diagnostic>)
where
    R: ReferenceResolver + ?Sized,
{
    let mut registry = PluginRegistry::new();
    let mut diagnostics = Vec::new();

    for document in documents {
        for declared in &document.plugins {
            let name = normalize_plugin_name(declared, &config.plugin_prefix);

            let Some(source) = resolver.resolve_plugin(&name, &document.id) else {
                warn!("Plugin '{}' declared in '{}' could not be resolved", declared, document.id);
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::UnresolvedPlugin,
                        format!("Plugin '{declared}' could not be resolved"),
                    )
                    .with_severity(config.severity_for(DiagnosticCode::UnresolvedPlugin))
                    .with_document(&document.id),
                );
                continue;
            };

            let binding = PluginBinding {
                name: name.clone(),
                source,
                declared_in: document.id.clone(),
            };
            let source = binding.source.clone();

            match registry.register(binding) {
                Registration::Added => trace!("Registered plugin '{}' ({})", name, source),
                Registration::AlreadyBound => {
                    trace!("Plugin '{}' from '{}' already registered", name, document.id)
                }
                Registration::Conflict(kept) => {
                    warn!(
                        "Plugin '{}' from '{}' ({}) conflicts with '{}' ({})",
                        name, document.id, source, kept.declared_in, kept.source
                    );
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::DuplicatePluginConflict,
                            format!(
                                "Plugin '{name}' is bound to '{}' and '{source}'",
                                kept.source
                            ),
                        )
                        .with_severity(config.severity_for(DiagnosticCode::DuplicatePluginConflict))
                        .with_document(&kept.declared_in)
                        .with_document(&document.id),
                    );
                }
            }
        }
    }

    (registry, diagnostics)
}
