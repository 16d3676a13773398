// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-resource invalidation.
//!
//! One event kind, no payload: a listener that hears it reloads its whole
//! store. Documented listeners (wired in [`crate::app::App::watch`]):
//! accounts, budgets and transactions. Savings goals neither emit nor listen.

use crate::api::Listable;
use crate::store::Store;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ResourceChanged,
}

#[derive(Debug, Clone)]
pub struct InvalidationBus {
    tx: broadcast::Sender<Signal>,
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Broadcast `resource-changed`. Having no listeners is fine.
    pub fn emit(&self) {
        let n = self.tx.send(Signal::ResourceChanged).unwrap_or(0);
        tracing::debug!(listeners = n, "resource-changed");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Reload `store` on every signal until the bus is dropped.
    pub fn listen<R: Listable>(&self, store: Store<R>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Signal::ResourceChanged) => {}
                    Err(RecvError::Lagged(missed)) => {
                        tracing::debug!(resource = R::NAME, missed, "listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
                // errors already degrade the store and are traced there
                let _ = store.load().await;
            }
        })
    }

    /// Emit on a fixed period as a fallback for missed signals.
    pub fn spawn_poller(&self, period: Duration) -> JoinHandle<()> {
        let bus = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // first tick fires immediately; stores are loaded already
            ticker.tick().await;
            loop {
                ticker.tick().await;
                bus.emit();
            }
        })
    }
}
