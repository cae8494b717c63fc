//! Lintstack Core
//!
//! Flattens a graph of lint rule-set documents linked by `extends` into one
//! effective configuration. Documents are linearized by precedence, their
//! rules, settings, env and parser options merged, plugins deduplicated by
//! implementation, and the result validated.
//!
//! Storage stays outside: callers supply a [`ReferenceResolver`] and a
//! [`DocumentLoader`], or use the in-memory [`MemoryCatalog`].

pub mod cache;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod effective;
pub mod error;
pub mod linearize;
pub mod merge;
pub mod pipeline;
pub mod plugins;
pub mod resolver;
pub mod result;
pub mod schema;
pub mod severity;
pub mod validate;

// Re-export commonly used types
pub use cache::CachingLoader;
pub use catalog::MemoryCatalog;
pub use config::{DEFAULT_PLUGIN_PREFIX, ResolverConfig};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
pub use document::{Document, DocumentId};
pub use effective::EffectiveConfig;
pub use error::{ConfigError, DocumentError, ErrorKind, LoadError, ResolveError, SchemaError};
pub use linearize::linearize;
pub use merge::{RuleMerge, deep_merge_into, merge_env, merge_parser_options, merge_rules, merge_settings};
pub use pipeline::{ConfigResolver, Stage};
pub use plugins::{
    PluginBinding, PluginRegistry, Registration, normalize_plugin_name, register_plugins,
    rule_namespace,
};
pub use resolver::{DocumentLoader, PluginSource, ReferenceResolver};
pub use result::Result;
pub use schema::{JsonSchemaRegistry, NoSchemas, RuleSchemaLookup, SchemaViolation};
pub use severity::{InvalidSeverity, RuleSetting, RuleSeverity};
pub use validate::Validator;

/// Install a global `tracing` subscriber filtered by `RUST_LOG`
///
/// Falls back to `lintstack_core=info`. Returns `false` when a subscriber is
/// already installed, so test binaries can call it from every test.
pub fn init_tracing() -> bool {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintstack_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .is_ok()
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        assert!(!init_tracing());
    }
}
