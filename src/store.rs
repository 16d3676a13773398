// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{Api, Entity, Listable};
use crate::error::ClientError;
use crate::models::Id;
use parking_lot::RwLock;
use std::sync::Arc;

/// Copy of one entry taken before an optimistic change: its position and
/// value, or `None` when the id was absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    id: Id,
    entry: Option<(usize, T)>,
}

impl<T> Snapshot<T> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn entry(&self) -> Option<&T> {
        self.entry.as_ref().map(|(_, e)| e)
    }
}

struct Inner<T> {
    items: Vec<T>,
    error: Option<String>,
}

/// In-memory collection of one resource, in server order.
///
/// Cloning is cheap and shares the same collection.
pub struct Store<R: Listable> {
    api: Api,
    inner: Arc<RwLock<Inner<R::Entity>>>,
}

impl<R: Listable> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Listable> Store<R> {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            inner: Arc::new(RwLock::new(Inner {
                items: Vec::new(),
                error: None,
            })),
        }
    }

    /// Replace the whole collection with a fresh list fetch.
    ///
    /// Loads are not coalesced: whichever response resolves last wins.
    /// On failure the collection is emptied and the error kept for display.
    pub async fn load(&self) -> Result<usize, ClientError> {
        match self.api.list::<R>().await {
            Ok(items) => {
                let n = items.len();
                let mut g = self.inner.write();
                g.items = items;
                g.error = None;
                tracing::debug!(resource = R::NAME, count = n, "store loaded");
                Ok(n)
            }
            Err(e) => {
                tracing::warn!(resource = R::NAME, error = %e, "load failed, showing empty list");
                let mut g = self.inner.write();
                g.items.clear();
                g.error = Some(format!("Failed to load {}: {}", R::NAME, e.message()));
                Err(e)
            }
        }
    }

    /// Current items, fetched first when the store is empty or `refresh` is
    /// set. Unlike [`load`](Self::load), a failed fetch keeps what is there
    /// and sets no banner.
    pub async fn cached(&self, refresh: bool) -> Vec<R::Entity> {
        if refresh || self.is_empty() {
            match self.api.list::<R>().await {
                Ok(items) => {
                    let mut g = self.inner.write();
                    g.items = items;
                    g.error = None;
                }
                Err(e) => tracing::debug!(resource = R::NAME, error = %e, "lookup fetch failed"),
            }
        }
        self.items()
    }

    /// Replace the entry with the same id, or prepend.
    pub fn upsert(&self, entity: R::Entity) {
        let mut g = self.inner.write();
        match g.items.iter().position(|e| e.id() == entity.id()) {
            Some(i) => g.items[i] = entity,
            None => g.items.insert(0, entity),
        }
    }

    /// Remove by id, returning the entity and where it was. No-op if absent.
    pub fn remove(&self, id: Id) -> Option<(usize, R::Entity)> {
        let mut g = self.inner.write();
        let i = g.items.iter().position(|e| e.id() == id)?;
        Some((i, g.items.remove(i)))
    }

    /// Apply `f` to the entry with `id`; returns false if absent.
    pub fn modify(&self, id: Id, f: impl FnOnce(&mut R::Entity)) -> bool {
        let mut g = self.inner.write();
        match g.items.iter_mut().find(|e| e.id() == id) {
            Some(e) => {
                f(e);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, id: Id) -> Snapshot<R::Entity> {
        let g = self.inner.read();
        Snapshot {
            id,
            entry: g
                .items
                .iter()
                .position(|e| e.id() == id)
                .map(|i| (i, g.items[i].clone())),
        }
    }

    /// Undo an optimistic change to the snapshot's entry.
    ///
    /// `applied` is what the change left behind (`None` after a remove). The
    /// snapshot goes back verbatim only while the store still holds exactly
    /// that; a reload or another mutation that touched the entry since wins.
    /// Other entries are never touched. Returns whether anything was restored.
    pub fn restore(&self, snap: &Snapshot<R::Entity>, applied: Option<&R::Entity>) -> bool {
        let mut g = self.inner.write();
        let pos = g.items.iter().position(|e| e.id() == snap.id);
        if pos.map(|i| &g.items[i]) != applied {
            tracing::debug!(
                resource = R::NAME,
                id = snap.id,
                "entry changed since snapshot, keeping it"
            );
            return false;
        }
        match (&snap.entry, pos) {
            (Some((_, e)), Some(i)) => g.items[i] = e.clone(),
            (Some((at, e)), None) => {
                let at = (*at).min(g.items.len());
                g.items.insert(at, e.clone());
            }
            (None, Some(i)) => {
                g.items.remove(i);
            }
            (None, None) => {}
        }
        true
    }

    pub fn get(&self, id: Id) -> Option<R::Entity> {
        self.inner.read().items.iter().find(|e| e.id() == id).cloned()
    }

    pub fn items(&self) -> Vec<R::Entity> {
        self.inner.read().items.clone()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.inner.read().items.iter().map(|e| e.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Banner text from the last failed load, if any.
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Seed the collection directly, bypassing the API.
    pub fn replace(&self, items: Vec<R::Entity>) {
        let mut g = self.inner.write();
        g.items = items;
        g.error = None;
    }
}
