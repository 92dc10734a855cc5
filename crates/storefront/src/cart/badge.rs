//! Session-scoped store for the cart badge count.
//!
//! Created once per session and injected into whatever renders the
//! badge, instead of living as ambient module-level state. Observers
//! subscribe through a watch channel and see the latest count.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{ApiError, CartBackend};

/// Shared, observable cart item count.
#[derive(Debug, Clone)]
pub struct BadgeStore {
    tx: Arc<watch::Sender<u32>>,
}

impl Default for BadgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeStore {
    /// Create a store with a count of zero.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Subscribe to count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.tx.subscribe()
    }

    /// Publish a new count.
    pub fn set(&self, count: u32) {
        self.tx.send_replace(count);
    }

    /// Fetch the authoritative count from the backend and publish it.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the published count is left unchanged.
    pub async fn refresh<B: CartBackend>(&self, backend: &B) -> Result<u32, ApiError> {
        let count = backend.fetch_cart_count().await?;
        self.set(count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let store = BadgeStore::new();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_set_publishes_to_subscribers() {
        let store = BadgeStore::new();
        let rx = store.subscribe();

        store.set(3);

        assert_eq!(store.count(), 3);
        assert_eq!(*rx.borrow(), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let store = BadgeStore::new();
        let other = store.clone();

        store.set(7);

        assert_eq!(other.count(), 7);
    }
}
