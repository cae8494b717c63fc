//! Single-flight document cache
//!
//! [`CachingLoader`] wraps any [`DocumentLoader`] so that concurrent
//! resolutions sharing it load each identity at most once. A request for an
//! identity that is already being loaded waits for that load instead of
//! starting its own. Failed loads are not remembered; the next request retries.

use crate::document::{Document, DocumentId};
use crate::error::LoadError;
use crate::resolver::{DocumentLoader, PluginSource, ReferenceResolver};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::trace;

type Slot = Arc<OnceCell<Arc<Document>>>;

/// Memoizing wrapper around a [`DocumentLoader`]
#[derive(Debug)]
pub struct CachingLoader<L> {
    inner: L,
    slots: DashMap<DocumentId, Slot>,
}

impl<L: DocumentLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            slots: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Number of identities with a cached document
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.slots
            .get(id)
            .is_some_and(|entry| entry.value().get().is_some())
    }

    /// Drop the cached document for one identity
    pub fn invalidate(&self, id: &DocumentId) {
        self.slots.remove(id);
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    fn slot(&self, id: &DocumentId) -> Slot {
        // The shard lock is released before the load runs; waiters block on
        // the cell, not on the map.
        let entry = self.slots.entry(id.clone()).or_default();
        Arc::clone(entry.value())
    }
}

impl<L: DocumentLoader> DocumentLoader for CachingLoader<L> {
    fn load(&self, id: &DocumentId) -> Result<Arc<Document>, LoadError> {
        let slot = self.slot(id);
        if let Some(document) = slot.get() {
            trace!("Document cache hit: {}", id);
            return Ok(Arc::clone(document));
        }

        let loaded = slot
            .get_or_try_init(|| {
                trace!("Document cache miss: {}", id);
                self.inner.load(id)
            })
            .cloned();

        if loaded.is_err() {
            // Drop the empty slot unless a concurrent load filled it meanwhile
            self.slots.remove_if(id, |_, slot| slot.get().is_none());
        }
        loaded
    }
}

/// A caching loader is usually built around a catalog that also resolves.
impl<L: ReferenceResolver> ReferenceResolver for CachingLoader<L> {
    fn resolve(&self, reference: &str, referrer: &DocumentId) -> Option<DocumentId> {
        self.inner.resolve(reference, referrer)
    }

    fn resolve_plugin(&self, name: &str, referrer: &DocumentId) -> Option<PluginSource> {
        self.inner.resolve_plugin(name, referrer)
    }
}
