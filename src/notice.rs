// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A dismissable inline message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Notices {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn push(&self, level: Level, message: String) {
        match level {
            Level::Error => tracing::warn!(%message, "notice"),
            Level::Info => tracing::info!(%message, "notice"),
        }
        self.inner.lock().push(Notice { level, message });
    }

    pub fn list(&self) -> Vec<Notice> {
        self.inner.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner
            .lock()
            .iter()
            .filter(|n| n.level == Level::Error)
            .map(|n| n.message.clone())
            .collect()
    }

    /// Dismiss one notice; out-of-range indices are ignored.
    pub fn dismiss(&self, index: usize) -> Option<Notice> {
        let mut g = self.inner.lock();
        (index < g.len()).then(|| g.remove(index))
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_removes_only_that_notice() {
        let n = Notices::new();
        n.error("Failed to delete account");
        n.info("Saved");
        assert_eq!(n.dismiss(5), None);
        let gone = n.dismiss(0).unwrap();
        assert_eq!(gone.message, "Failed to delete account");
        assert_eq!(n.list().len(), 1);
        assert!(n.errors().is_empty());
    }
}
