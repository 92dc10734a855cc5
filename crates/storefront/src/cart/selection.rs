//! Tracks which cart lines the user has marked for checkout.
//!
//! The selection lives alongside the snapshot, not inside it, and is
//! reconciled against the current line ids whenever the snapshot changes.
//! Invariant: the selection is always a subset of the snapshot's ids
//! after reconciliation.

use std::collections::HashSet;

use ongil_core::CartId;

/// The set of selected cart line ids.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: HashSet<CartId>,
}

impl SelectionTracker {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a single id. Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: CartId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Drop an id. Removing an id that is not selected is a no-op.
    pub fn remove(&mut self, id: CartId) {
        self.selected.remove(&id);
    }

    /// Replace the selection with exactly the given ids.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = CartId>) {
        self.selected = ids.into_iter().collect();
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: CartId) -> bool {
        self.selected.contains(&id)
    }

    /// Intersect with the current snapshot ids, dropping stale entries.
    pub fn reconcile(&mut self, current: &[CartId]) {
        let keep: HashSet<CartId> = current.iter().copied().collect();
        self.selected.retain(|id| keep.contains(id));
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = CartId> + '_ {
        self.selected.iter().copied()
    }
}
