//! Shared storage vocabulary used by every workflow's store trait.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Error enumeration for entity store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One page of a fixed-size, 1-indexed listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page. Page numbers start at 1; a
    /// request past the last page yields an empty item list, not an error.
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let total_items = items.len();
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page_size)
        };
        let page = page.max(1);
        let start = (page - 1).saturating_mul(page_size);
        let items = if start >= total_items {
            Vec::new()
        } else {
            items
                .into_iter()
                .skip(start)
                .take(page_size)
                .collect()
        };

        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// Registry of per-entity mutexes. Services take the entity's lock around a
/// read-modify-write so concurrent mutations of the same Application or
/// Assignment are serialized while unrelated entities proceed in parallel.
pub struct EntityLocks<K> {
    inner: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for EntityLocks<K> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> EntityLocks<K> {
    pub fn acquire(&self, key: &K) -> Arc<Mutex<()>> {
        let mut guard = self.inner.lock().expect("entity lock registry poisoned");
        guard.entry(key.clone()).or_default().clone()
    }
}
