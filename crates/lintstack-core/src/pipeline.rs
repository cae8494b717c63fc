//! Resolution pipeline
//!
//! A resolution moves through fixed stages:
//!
//! ```text
//! Start → Linearized → RulesMerged → SettingsMerged → PluginsRegistered → Validated → Done
//!   │
//!   └──→ Failed
//! ```
//!
//! Only linearization can fail. Every later stage reports problems as
//! diagnostics and always reaches `Done` with a best-effort
//! [`EffectiveConfig`].

use crate::config::ResolverConfig;
use crate::document::{Document, DocumentId};
use crate::effective::EffectiveConfig;
use crate::error::ResolveError;
use crate::linearize::linearize;
use crate::merge::{merge_env, merge_parser_options, merge_rules, merge_settings};
use crate::plugins::register_plugins;
use crate::resolver::{DocumentLoader, ReferenceResolver};
use crate::result::Result;
use crate::schema::{NoSchemas, RuleSchemaLookup};
use crate::validate::Validator;
use std::fmt;
use std::sync::Arc;
use tracing::{Level, debug, span, trace};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    Linearized,
    RulesMerged,
    SettingsMerged,
    PluginsRegistered,
    Validated,
    Done,
    Failed,
}

impl Stage {
    /// Successor on the success path, `None` for terminal stages
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Linearized),
            Stage::Linearized => Some(Stage::RulesMerged),
            Stage::RulesMerged => Some(Stage::SettingsMerged),
            Stage::SettingsMerged => Some(Stage::PluginsRegistered),
            Stage::PluginsRegistered => Some(Stage::Validated),
            Stage::Validated => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }

    /// Only linearization, the step out of `Start`, may fail
    pub fn can_fail(self) -> bool {
        self == Stage::Start
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    fn advance(&mut self) {
        if let Some(next) = self.next() {
            trace!("Stage {} -> {}", self, next);
            *self = next;
        }
    }

    fn fail(&mut self, error: &ResolveError) {
        debug_assert!(self.can_fail(), "stage {self} cannot fail");
        debug!("Stage {} -> {}: {}", self, Stage::Failed, error);
        *self = Stage::Failed;
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Linearized => "linearized",
            Stage::RulesMerged => "rules-merged",
            Stage::SettingsMerged => "settings-merged",
            Stage::PluginsRegistered => "plugins-registered",
            Stage::Validated => "validated",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Resolves root documents into [`EffectiveConfig`]s
///
/// Holds no per-resolution state, so one resolver can serve concurrent
/// resolutions when its collaborators are `Sync`.
///
/// ```rust
/// use lintstack_core::{ConfigResolver, Document, MemoryCatalog, RuleSeverity};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let catalog = MemoryCatalog::new()
///     .with_document(Document::new("base").with_rule("semi", json!("warn")));
/// let root = Arc::new(
///     Document::new("app")
///         .with_extends("./base")
///         .with_rule("semi", json!(2)),
/// );
///
/// let config = ConfigResolver::new(&catalog, &catalog).resolve(&root).unwrap();
/// assert_eq!(config.severity("semi"), Some(RuleSeverity::Error));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver<R, L, S = NoSchemas> {
    resolver: R,
    loader: L,
    schemas: S,
    config: ResolverConfig,
}

impl<R, L> ConfigResolver<R, L, NoSchemas>
where
    R: ReferenceResolver,
    L: DocumentLoader,
{
    pub fn new(resolver: R, loader: L) -> Self {
        Self {
            resolver,
            loader,
            schemas: NoSchemas,
            config: ResolverConfig::default(),
        }
    }
}

impl<R, L, S> ConfigResolver<R, L, S> {
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate rule options with `schemas`
    pub fn with_schemas<T: RuleSchemaLookup>(self, schemas: T) -> ConfigResolver<R, L, T> {
        ConfigResolver {
            resolver: self.resolver,
            loader: self.loader,
            schemas,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl<R, L, S> ConfigResolver<R, L, S>
where
    R: ReferenceResolver,
    L: DocumentLoader,
    S: RuleSchemaLookup,
{
    /// Resolve an already-materialized root document
    pub fn resolve(&self, root: &Arc<Document>) -> Result<EffectiveConfig> {
        let span = span!(Level::DEBUG, "resolve", root = %root.id);
        let _enter = span.enter();

        let mut stage = Stage::Start;

        let documents = match linearize(root, &self.resolver, &self.loader) {
            Ok(documents) => documents,
            Err(error) => {
                stage.fail(&error);
                return Err(error);
            }
        };
        stage.advance();

        let rules = merge_rules(&documents, &self.config);
        stage.advance();

        let settings = merge_settings(&documents);
        let env = merge_env(&documents);
        let parser_options = merge_parser_options(&documents);
        stage.advance();

        let (plugins, plugin_diagnostics) =
            register_plugins(&documents, &self.resolver, &self.config);
        stage.advance();

        let validation = Validator::new(&self.config, &self.schemas).check(&rules, &plugins);
        stage.advance();

        let mut diagnostics = rules.diagnostics;
        diagnostics.extend(plugin_diagnostics);
        diagnostics.extend(validation);

        let config = EffectiveConfig {
            root: root.id.clone(),
            sources: documents.iter().map(|doc| doc.id.clone()).collect(),
            rules: rules.rules,
            rule_origins: rules.origins,
            settings,
            env,
            parser_options,
            plugins: plugins.into_bindings(),
            diagnostics,
        };
        stage.advance();

        debug!(
            "Resolved '{}': {} rules from {} documents, {} diagnostics ({})",
            config.root,
            config.rules.len(),
            config.sources.len(),
            config.diagnostics.len(),
            stage
        );
        Ok(config)
    }

    /// Load the root through the loader, then resolve it
    pub fn resolve_id(&self, id: &DocumentId) -> Result<EffectiveConfig> {
        let root = self.loader.load(id).map_err(|err| {
            ResolveError::unresolved(id.as_str(), None).with_reason(err.to_string())
        })?;
        self.resolve(&root)
    }
}
