use crate::catalog::types::Catalog;
use std::sync::{Arc, RwLock};

/// Holder of the currently published catalog snapshot
///
/// The lock only guards the pointer; readers clone the `Arc` and search the
/// snapshot without holding the lock, so a concurrent `publish` never exposes
/// a partially built catalog to an in-flight search.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(initial: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns the snapshot active right now
    pub fn snapshot(&self) -> Arc<Catalog> {
        // A poisoned lock still holds a complete Arc; the swap cannot tear
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Replaces the active snapshot, returning the previous one
    pub fn publish(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(
            "Publishing catalog snapshot with {} records (previous: {})",
            next.len(),
            guard.len()
        );
        std::mem::replace(&mut *guard, next)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::empty())
    }
}
