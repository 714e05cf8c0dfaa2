//! Downstream view invalidation
//!
//! Views are cached elsewhere; the panel only signals that they are stale.
//! `ViewCache` keeps a staleness generation per key and broadcasts every
//! invalidation so whoever renders a view can refetch it.

use encore_core::domain::view::ViewKey;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

/// Capability to mark a cached view stale
pub trait ViewInvalidator: Send + Sync {
    fn mark_stale(&self, key: &ViewKey);
}

/// Default broadcast buffer; slow listeners observe `Lagged`
const CHANNEL_CAPACITY: usize = 64;

/// In-memory staleness registry
pub struct ViewCache {
    generations: Mutex<HashMap<ViewKey, u64>>,
    changes: broadcast::Sender<ViewKey>,
}

impl ViewCache {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            generations: Mutex::new(HashMap::new()),
            changes,
        }
    }

    /// Number of times `key` has been marked stale
    pub fn generation(&self, key: &ViewKey) -> u64 {
        self.generations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Receives every key as it is marked stale
    pub fn subscribe(&self) -> broadcast::Receiver<ViewKey> {
        self.changes.subscribe()
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewInvalidator for ViewCache {
    fn mark_stale(&self, key: &ViewKey) {
        let generation = {
            let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
            let generation = generations.entry(*key).or_insert(0);
            *generation += 1;
            *generation
        };

        debug!(view = %key, generation, "View marked stale");

        // Only fails when nobody is listening.
        let _ = self.changes.send(*key);
    }
}
