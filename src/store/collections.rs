// SPDX-License-Identifier: MIT

//! Cached collections for feature stores (accounts, transactions,
//! categories) and the reset contract the auth service uses on logout.
//!
//! These caches hold data fetched under one user's token; clearing them on
//! logout is what keeps a later session from seeing the previous user's
//! data.

use std::sync::Mutex;

/// Store reset errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store mutex poisoned: {0}")]
    Poisoned(&'static str),
}

/// A store that can be returned to its empty initial state.
///
/// Implementors are registered with the auth service at construction time;
/// logout resets each one best-effort, logging failures without aborting.
pub trait Resettable: Send + Sync {
    /// Store name, for logging.
    fn name(&self) -> &'static str;

    /// Clear all cached data back to the initial state.
    fn reset(&self) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct CacheInner<T> {
    items: Vec<T>,
    current: Option<T>,
    last_error: Option<String>,
}

impl<T> Default for CacheInner<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            last_error: None,
        }
    }
}

/// A cached collection plus its "currently selected item" and "last error"
/// fields, mirroring what a feature store keeps between views.
pub struct CollectionCache<T> {
    name: &'static str,
    inner: Mutex<CacheInner<T>>,
}

impl<T: Clone + Send> CollectionCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn set_items(&self, items: Vec<T>) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.items = items;
        inner.last_error = None;
        Ok(())
    }

    pub fn items(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.lock()?.items.clone())
    }

    pub fn set_current(&self, current: Option<T>) -> Result<(), StoreError> {
        self.lock()?.current = current;
        Ok(())
    }

    pub fn current(&self) -> Result<Option<T>, StoreError> {
        Ok(self.lock()?.current.clone())
    }

    pub fn set_error(&self, error: impl Into<String>) -> Result<(), StoreError> {
        self.lock()?.last_error = Some(error.into());
        Ok(())
    }

    pub fn last_error(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.last_error.clone())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner.items.is_empty() && inner.current.is_none() && inner.last_error.is_none())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CacheInner<T>>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned(self.name))
    }
}

impl<T: Clone + Send> Resettable for CollectionCache<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reset(&self) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        *inner = CacheInner::default();
        Ok(())
    }
}
