//! Lookup capabilities supplied by the embedding application
//!
//! Resolution never touches storage itself. It asks a [`ReferenceResolver`] what
//! an `extends` reference or a plugin name means, and a [`DocumentLoader`] for
//! the document behind an identity.

use crate::document::{Document, DocumentId};
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a resolved plugin implementation
///
/// Two declarations of the same plugin name are compatible only when they
/// resolve to equal sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginSource(String);

impl PluginSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps references to canonical identities
pub trait ReferenceResolver {
    /// Resolve an `extends` reference declared by `referrer`
    fn resolve(&self, reference: &str, referrer: &DocumentId) -> Option<DocumentId>;

    /// Resolve a plugin name declared by `referrer` to its implementation
    ///
    /// By default a plugin name stands for itself, so only explicit resolvers
    /// can produce conflicts.
    fn resolve_plugin(&self, name: &str, _referrer: &DocumentId) -> Option<PluginSource> {
        Some(PluginSource::new(name))
    }
}

/// Produces materialized documents by identity
pub trait DocumentLoader {
    fn load(&self, id: &DocumentId) -> Result<Arc<Document>, LoadError>;
}

impl<T: ReferenceResolver + ?Sized> ReferenceResolver for &T {
    fn resolve(&self, reference: &str, referrer: &DocumentId) -> Option<DocumentId> {
        (**self).resolve(reference, referrer)
    }

    fn resolve_plugin(&self, name: &str, referrer: &DocumentId) -> Option<PluginSource> {
        (**self).resolve_plugin(name, referrer)
    }
}

impl<T: ReferenceResolver + ?Sized> ReferenceResolver for Arc<T> {
    fn resolve(&self, reference: &str, referrer: &DocumentId) -> Option<DocumentId> {
        (**self).resolve(reference, referrer)
    }

    fn resolve_plugin(&self, name: &str, referrer: &DocumentId) -> Option<PluginSource> {
        (**self).resolve_plugin(name, referrer)
    }
}

impl<T: DocumentLoader + ?Sized> DocumentLoader for &T {
    fn load(&self, id: &DocumentId) -> Result<Arc<Document>, LoadError> {
        (**self).load(id)
    }
}

impl<T: DocumentLoader + ?Sized> DocumentLoader for Arc<T> {
    fn load(&self, id: &DocumentId) -> Result<Arc<Document>, LoadError> {
        (**self).load(id)
    }
}
