//! Idempotent asset cache
//!
//! Each key is loaded at most once per session. Concurrent requests for a key
//! whose load is still in flight share that load instead of starting another.
//! Only a failed load may be retried.

use super::AssetError;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::collections::HashMap;
use std::rc::Rc;

/// Future resolving to a cached asset, shareable between waiters
pub type SharedLoad<V> = Shared<LocalBoxFuture<'static, Result<Rc<V>, AssetError>>>;

enum Slot<V> {
    Pending(SharedLoad<V>),
    Ready(Rc<V>),
}

/// Cache of loaded assets keyed by logical name
pub struct AssetCache<V> {
    slots: HashMap<String, Slot<V>>,
    loads_started: usize,
}

impl<V> Default for AssetCache<V> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            loads_started: 0,
        }
    }
}

impl<V: 'static> AssetCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached asset, if its load has completed successfully
    pub fn get(&mut self, key: &str) -> Option<Rc<V>> {
        let ready = match self.slots.get(key)? {
            Slot::Ready(asset) => return Some(Rc::clone(asset)),
            Slot::Pending(load) => match load.peek() {
                Some(Ok(asset)) => Rc::clone(asset),
                _ => return None,
            },
        };

        self.slots.insert(key.to_string(), Slot::Ready(Rc::clone(&ready)));
        Some(ready)
    }

    /// Return the load for `key`, starting it with `load` only if the key has
    /// never been requested or its previous load failed.
    pub fn get_or_load<F>(&mut self, key: &str, load: F) -> (SharedLoad<V>, bool)
    where
        F: FnOnce() -> LocalBoxFuture<'static, Result<V, AssetError>>,
    {
        if let Some(asset) = self.get(key) {
            let ready: LocalBoxFuture<'static, _> = futures::future::ready(Ok(asset)).boxed_local();
            return (ready.shared(), false);
        }

        if let Some(Slot::Pending(pending)) = self.slots.get(key) {
            if !matches!(pending.peek(), Some(Err(_))) {
                return (pending.clone(), false);
            }
            log::debug!("Retrying failed load for '{}'", key);
        }

        let shared = load().map(|result| result.map(Rc::new)).boxed_local().shared();
        self.slots.insert(key.to_string(), Slot::Pending(shared.clone()));
        self.loads_started += 1;
        (shared, true)
    }

    /// Whether `key` has been requested
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of keys requested
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been requested
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of underlying loads started, retries included
    pub fn loads_started(&self) -> usize {
        self.loads_started
    }
}
