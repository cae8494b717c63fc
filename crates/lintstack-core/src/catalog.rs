//! In-memory document catalog
//!
//! [`MemoryCatalog`] is both a [`ReferenceResolver`] and a [`DocumentLoader`]
//! over documents the caller has already materialized. Identities are
//! slash-separated paths such as `rules/best-practices`, and references are
//! resolved the way eslintrc-style configurations write them:
//!
//! - `./errors`, `../base`: relative to the referring document's directory
//! - `/shared/base`: relative to the catalog root
//! - `airbnb`: a registered alias, an exact identity, or the
//!   `eslint-config-airbnb` package convention
//!
//! A trailing `.js` or `.json` on a reference is ignored when the bare
//! identity exists.

use crate::document::{Document, DocumentId};
use crate::error::LoadError;
use crate::resolver::{DocumentLoader, PluginSource, ReferenceResolver};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

const CONFIG_PACKAGE_PREFIX: &str = "eslint-config";
const SOURCE_SUFFIXES: [&str; 2] = [".js", ".json"];

/// Resolver and loader over in-memory documents
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    documents: IndexMap<DocumentId, Arc<Document>>,
    aliases: HashMap<String, DocumentId>,
    plugins: HashMap<String, PluginSource>,
    scoped_plugins: HashMap<(DocumentId, String), PluginSource>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any previous document with the same identity
    pub fn insert(&mut self, document: Document) -> Arc<Document> {
        let document = Arc::new(document);
        self.documents
            .insert(document.id.clone(), Arc::clone(&document));
        document
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.insert(document);
        self
    }

    /// Make a bare name resolve to `id`
    pub fn alias(&mut self, name: impl Into<String>, id: impl Into<DocumentId>) {
        self.aliases.insert(name.into(), id.into());
    }

    pub fn with_alias(mut self, name: impl Into<String>, id: impl Into<DocumentId>) -> Self {
        self.alias(name, id);
        self
    }

    /// Bind a plugin name for every referring document
    pub fn register_plugin(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.plugins
            .insert(name.into(), PluginSource::new(source.into()));
    }

    pub fn with_plugin(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.register_plugin(name, source);
        self
    }

    /// Bind a plugin name as seen from one referring document
    ///
    /// Scoped bindings take precedence over global ones, which is how two
    /// documents can end up resolving the same name to different sources.
    pub fn register_plugin_for(
        &mut self,
        referrer: impl Into<DocumentId>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.scoped_plugins.insert(
            (referrer.into(), name.into()),
            PluginSource::new(source.into()),
        );
    }

    pub fn with_plugin_for(
        mut self,
        referrer: impl Into<DocumentId>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.register_plugin_for(referrer, name, source);
        self
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Arc<Document>> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// First candidate path that names a known document
    fn find_path(&self, path: &str) -> Option<DocumentId> {
        let exact = DocumentId::new(path);
        if self.contains(&exact) {
            return Some(exact);
        }

        SOURCE_SUFFIXES
            .iter()
            .filter_map(|suffix| path.strip_suffix(suffix))
            .map(DocumentId::new)
            .find(|id| self.contains(id))
    }

    fn resolve_name(&self, name: &str) -> Option<DocumentId> {
        if let Some(id) = self.aliases.get(name) {
            return Some(id.clone());
        }

        self.find_path(name)
            .or_else(|| self.find_path(&config_package_name(name)))
    }
}

impl FromIterator<Document> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for document in iter {
            catalog.insert(document);
        }
        catalog
    }
}

impl ReferenceResolver for MemoryCatalog {
    fn resolve(&self, reference: &str, referrer: &DocumentId) -> Option<DocumentId> {
        let resolved = if reference.starts_with("./") || reference.starts_with("../") {
            join_path(parent_dir(referrer.as_str()), reference).and_then(|p| self.find_path(&p))
        } else if let Some(absolute) = reference.strip_prefix('/') {
            join_path("", absolute).and_then(|p| self.find_path(&p))
        } else {
            self.resolve_name(reference)
        };

        trace!(
            "Resolved '{}' from '{}' to {:?}",
            reference, referrer, resolved
        );
        resolved
    }

    fn resolve_plugin(&self, name: &str, referrer: &DocumentId) -> Option<PluginSource> {
        self.scoped_plugins
            .get(&(referrer.clone(), name.to_string()))
            .or_else(|| self.plugins.get(name))
            .cloned()
    }
}

impl DocumentLoader for MemoryCatalog {
    fn load(&self, id: &DocumentId) -> Result<Arc<Document>, LoadError> {
        self.get(id).cloned().ok_or_else(|| LoadError::not_found(id))
    }
}

fn parent_dir(id: &str) -> &str {
    id.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Join `reference` onto `base`, folding `.` and `..` segments
///
/// Returns `None` when `..` climbs above the catalog root.
fn join_path(base: &str, reference: &str) -> Option<String> {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Package name a bare shareable-config name stands for
///
/// `airbnb` → `eslint-config-airbnb`, `@scope` → `@scope/eslint-config`,
/// `@scope/strict` → `@scope/eslint-config-strict`.
fn config_package_name(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((_, rest)) if rest.starts_with(CONFIG_PACKAGE_PREFIX) => name.to_string(),
            Some((scope, rest)) => format!("@{scope}/{CONFIG_PACKAGE_PREFIX}-{rest}"),
            None => format!("{name}/{CONFIG_PACKAGE_PREFIX}"),
        },
        None if name.starts_with(CONFIG_PACKAGE_PREFIX) => name.to_string(),
        None => format!("{CONFIG_PACKAGE_PREFIX}-{name}"),
    }
}
