//! History service - saved list retrieval and caching
//!
//! Keeps an in-memory cache of the signed-in user's saved lists so the
//! history and detail views do not refetch on every render. The cache
//! is scoped to one owner: when a different user refreshes, the
//! previous user's lists are dropped before any fetch happens, so stale
//! data can never be shown across a user switch.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{List, User};
use crate::ports::ListStore;

#[derive(Debug, Default)]
struct Cache {
    owner: Option<String>,
    lists: Vec<List>,
}

/// Service for reading and bulk-deleting saved lists
pub struct HistoryService {
    store: Arc<dyn ListStore>,
    cache: Mutex<Cache>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Fetch the user's lists from the store into the cache.
    ///
    /// On an owner switch the old cache is cleared before the fetch, so
    /// a failed fetch leaves an empty cache rather than another user's
    /// data. A failed fetch for the same owner keeps the existing cache.
    pub fn refresh(&self, user: &User) -> Result<()> {
        {
            let mut cache = self.lock_cache()?;
            if cache.owner.as_deref() != Some(user.id.as_str()) {
                cache.lists.clear();
                cache.owner = Some(user.id.clone());
            }
        }

        let lists = self.store.list_all(&user.id)?;

        let mut cache = self.lock_cache()?;
        // The owner may have switched again while the fetch was in flight
        if cache.owner.as_deref() == Some(user.id.as_str()) {
            cache.lists = lists;
        }
        Ok(())
    }

    /// Cached lists, most recent trip date first. Lists sharing a date
    /// keep their fetch order (the sort is stable).
    pub fn lists_sorted(&self) -> Result<Vec<List>> {
        let cache = self.lock_cache()?;
        let mut lists = cache.lists.clone();
        lists.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(lists)
    }

    /// Look up a single cached list by id
    pub fn get(&self, id: Uuid) -> Result<Option<List>> {
        let cache = self.lock_cache()?;
        Ok(cache.lists.iter().find(|list| list.id == id).cloned())
    }

    /// Number of cached lists
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock_cache()?.lists.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock_cache()?.lists.is_empty())
    }

    /// Add a freshly saved list to the cache without refetching.
    /// Ignored when the cache belongs to a different owner.
    pub fn append(&self, list: &List) -> Result<()> {
        let mut cache = self.lock_cache()?;
        match &cache.owner {
            Some(owner) if *owner == list.user_id => {
                cache.lists.push(list.clone());
            }
            None => {
                cache.owner = Some(list.user_id.clone());
                cache.lists.push(list.clone());
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Delete every saved list for the user. The cache is only cleared
    /// after the store confirms the delete.
    pub fn clear_all(&self, user: &User) -> Result<()> {
        self.store.delete_all(&user.id)?;

        let mut cache = self.lock_cache()?;
        if cache.owner.as_deref() == Some(user.id.as_str()) {
            cache.lists.clear();
        }
        Ok(())
    }

    /// Drop the cache entirely (used on sign-out)
    pub fn reset(&self) -> Result<()> {
        let mut cache = self.lock_cache()?;
        cache.owner = None;
        cache.lists.clear();
        Ok(())
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, Cache>> {
        self.cache
            .lock()
            .map_err(|e| Error::Other(format!("history cache lock poisoned: {}", e)))
    }
}
