//! Extends linearization
//!
//! Flattens a document's transitive `extends` graph into one sequence ordered
//! from lowest to highest precedence. Later documents in the sequence override
//! earlier ones when merged.
//!
//! # Ordering
//!
//! Traversal is depth-first. Each `extends` list is expanded in declared order
//! and the declaring document follows its own expansion, so a document always
//! outranks everything it extends, and later `extends` entries outrank earlier
//! ones.
//!
//! A document reachable along several paths appears once, at its last
//! position in traversal order. For
//!
//! ```text
//! root extends [A, C]
//! A extends [X]
//! C extends [X]
//! ```
//!
//! the traversal visits `X A X C root` and the result is `A X C root`.
//!
//! # Example
//!
//! ```rust
//! use lintstack_core::{Document, MemoryCatalog, linearize};
//! use std::sync::Arc;
//!
//! let catalog = MemoryCatalog::new()
//!     .with_document(Document::new("base"))
//!     .with_document(Document::new("strict").with_extends("./base"));
//! let root = Arc::new(Document::new("app").with_extends("./strict"));
//!
//! let order = linearize(&root, &catalog, &catalog).unwrap();
//! let ids: Vec<_> = order.iter().map(|doc| doc.id.as_str()).collect();
//! assert_eq!(ids, vec!["base", "strict", "app"]);
//! ```

use crate::document::{Document, DocumentId};
use crate::error::ResolveError;
use crate::resolver::{DocumentLoader, ReferenceResolver};
use crate::result::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Linearize `root` and everything it transitively extends
///
/// Fails with [`ResolveError::CycleDetected`] when a document is reachable
/// from itself, or [`ResolveError::UnresolvedReference`] when a reference
/// cannot be resolved or its document cannot be loaded. No partial sequence is
/// returned in either case.
pub fn linearize<R, L>(
    root: &Arc<Document>,
    resolver: &R,
    loader: &L,
) -> Result<Vec<Arc<Document>>>
where
    R: ReferenceResolver + ?Sized,
    L: DocumentLoader + ?Sized,
{
    let mut linearizer = Linearizer {
        resolver,
        loader,
        marks: HashMap::new(),
        expansions: HashMap::new(),
        stack: Vec::new(),
    };

    let order = linearizer.expand(&root.id, root)?;
    debug!(
        "Linearized '{}' into {} documents ({} loaded)",
        root.id,
        order.len(),
        linearizer.expansions.len().saturating_sub(1)
    );
    Ok(order)
}

struct Linearizer<'a, R: ?Sized, L: ?Sized> {
    resolver: &'a R,
    loader: &'a L,
    marks: HashMap<DocumentId, Mark>,
    /// Deduplicated expansion of every finished document
    expansions: HashMap<DocumentId, Vec<Arc<Document>>>,
    /// Identities currently being expanded, outermost first
    stack: Vec<DocumentId>,
}

impl<R, L> Linearizer<'_, R, L>
where
    R: ReferenceResolver + ?Sized,
    L: DocumentLoader + ?Sized,
{
    fn expand(&mut self, id: &DocumentId, document: &Arc<Document>) -> Result<Vec<Arc<Document>>> {
        self.marks.insert(id.clone(), Mark::InProgress);
        self.stack.push(id.clone());

        let mut sequence = Vec::new();
        for reference in &document.extends {
            let target = self
                .resolver
                .resolve(reference, id)
                .ok_or_else(|| ResolveError::unresolved(reference, Some(id)))?;
            trace!("Edge: {} -> {} ('{}')", id, target, reference);

            match self.marks.get(&target) {
                Some(Mark::InProgress) => return Err(self.cycle_through(&target)),
                Some(Mark::Done) => {
                    if let Some(expansion) = self.expansions.get(&target) {
                        sequence.extend(expansion.iter().cloned());
                    }
                }
                None => {
                    let child = self.loader.load(&target).map_err(|err| {
                        ResolveError::unresolved(reference, Some(id)).with_reason(err.to_string())
                    })?;
                    sequence.extend(self.expand(&target, &child)?);
                }
            }
        }
        sequence.push(Arc::clone(document));

        let expansion = keep_last_occurrence(sequence);
        self.stack.pop();
        self.marks.insert(id.clone(), Mark::Done);
        self.expansions.insert(id.clone(), expansion.clone());
        Ok(expansion)
    }

    /// Cycle path from the first visit of `target` back to it
    fn cycle_through(&self, target: &DocumentId) -> ResolveError {
        let start = self
            .stack
            .iter()
            .position(|id| id == target)
            .unwrap_or_default();
        let mut path = self.stack[start..].to_vec();
        path.push(target.clone());
        debug!("Cycle detected: {:?}", path);
        ResolveError::cycle(path)
    }
}

/// Drop every occurrence of a document but its last
fn keep_last_occurrence(sequence: Vec<Arc<Document>>) -> Vec<Arc<Document>> {
    let mut seen = HashSet::new();
    let mut kept: Vec<_> = sequence
        .into_iter()
        .rev()
        .filter(|doc| seen.insert(doc.id.clone()))
        .collect();
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::error::{ErrorKind, LoadError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ids(order: &[Arc<Document>]) -> Vec<&str> {
        order.iter().map(|doc| doc.id.as_str()).collect()
    }

    struct CountingLoader {
        catalog: MemoryCatalog,
        loads: AtomicUsize,
    }

    impl DocumentLoader for CountingLoader {
        fn load(&self, id: &DocumentId) -> std::result::Result<Arc<Document>, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.catalog.load(id)
        }
    }

    #[test]
    fn test_document_follows_what_it_extends() {
        let catalog = MemoryCatalog::new()
            .with_document(Document::new("x"))
            .with_document(Document::new("y").with_extends("./x"));
        let root = Arc::new(Document::new("app").with_extends("./y"));

        let order = linearize(&root, &catalog, &catalog).unwrap();
        assert_eq!(ids(&order), vec!["x", "y", "app"]);
    }

    #[test]
    fn test_extends_entries_keep_declared_order() {
        let catalog = MemoryCatalog::new()
            .with_document(Document::new("a"))
            .with_document(Document::new("b"));
        let root = Arc::new(Document::new("app").with_extends("./a").with_extends("./b"));

        let order = linearize(&root, &catalog, &catalog).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "app"]);
    }

    #[test]
    fn test_shared_ancestor_keeps_last_occurrence() {
        let catalog = MemoryCatalog::new()
            .with_document(Document::new("x"))
            .with_document(Document::new("a").with_extends("./x"))
            .with_document(Document::new("c").with_extends("./x"));
        let root = Arc::new(Document::new("root").with_extends("./a").with_extends("./c"));

        let order = linearize(&root, &catalog, &catalog).unwrap();
        assert_eq!(ids(&order), vec!["a", "x", "c", "root"]);
    }

    #[test]
    fn test_shared_ancestor_is_loaded_once() {
        let loader = CountingLoader {
            catalog: MemoryCatalog::new()
                .with_document(Document::new("x"))
                .with_document(Document::new("a").with_extends("./x"))
                .with_document(Document::new("b").with_extends("./x"))
                .with_document(Document::new("c").with_extends("./a").with_extends("./b")),
            loads: AtomicUsize::new(0),
        };
        let root = Arc::new(Document::new("root").with_extends("./c").with_extends("./a"));

        linearize(&root, &loader.catalog, &loader).unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_cycle_reports_path_from_entry_point() {
        let catalog = MemoryCatalog::new()
            .with_document(Document::new("c").with_extends("./d"))
            .with_document(Document::new("d").with_extends("./c"));
        let root = Arc::new(Document::new("app").with_extends("./c"));

        let err = linearize(&root, &catalog, &catalog).unwrap_err();
        assert_eq!(err, ResolveError::cycle(vec!["c".into(), "d".into(), "c".into()]));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let catalog = MemoryCatalog::new();
        let root = Arc::new(Document::new("app").with_extends("./app"));

        // The root is not in the catalog, so the resolver cannot map it.
        let err = linearize(&root, &catalog, &catalog).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unresolved);

        let catalog = MemoryCatalog::new().with_document(Document::new("app").with_extends("./app"));
        let err = linearize(&root, &catalog, &catalog).unwrap_err();
        assert_eq!(err, ResolveError::cycle(vec!["app".into(), "app".into()]));
    }

    #[test]
    fn test_unresolvable_reference_aborts() {
        let catalog = MemoryCatalog::new().with_document(Document::new("base"));
        let root = Arc::new(
            Document::new("index")
                .with_extends("./base")
                .with_extends("./rules/strict"),
        );

        let err = linearize(&root, &catalog, &catalog).unwrap_err();
        assert_eq!(
            err,
            ResolveError::unresolved("./rules/strict", Some(&"index".into()))
        );
    }

    #[test]
    fn test_load_failure_is_unresolved_with_reason() {
        struct Resolves;
        impl ReferenceResolver for Resolves {
            fn resolve(&self, reference: &str, _: &DocumentId) -> Option<DocumentId> {
                Some(DocumentId::new(reference))
            }
        }

        let root = Arc::new(Document::new("app").with_extends("ghost"));
        let err = linearize(&root, &Resolves, &MemoryCatalog::new()).unwrap_err();

        insta::assert_snapshot!(
            err.to_string(),
            @"Unresolved reference 'ghost' extended by 'app': Document not found: ghost"
        );
    }
}
