//! Cart orchestration: optimistic dispatch, debouncing, and recovery.
//!
//! Every mutating operation applies the reducer to local state *before*
//! returning its dispatch future, so the UI reflects the change with
//! zero latency. Awaiting the returned future drives the remote call;
//! if the backend rejects or errors, the service refetches the whole
//! snapshot instead of attempting an inverse patch.
//!
//! Rapid quantity edits on one line are debounced: each edit bumps a
//! per-line epoch and only the dispatch holding the latest epoch still
//! talks to the backend, so superseded edits can never land out of
//! order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{instrument, warn};

use ongil_core::{CartId, CurrencyCode, Price, ProductId};

use crate::api::{ApiError, CartBackend, LineUpdate, MutationOutcome};
use crate::cart::badge::BadgeStore;
use crate::cart::error::CartError;
use crate::cart::reducer::{CartAction, reduce};
use crate::cart::selection::SelectionTracker;
use crate::cart::types::{CartLine, CartSnapshot, Product};

/// A destructive operation awaiting explicit user confirmation.
///
/// Nothing is mutated, locally or remotely, until `confirm_pending` is
/// called; `decline_pending` discards the request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRemoval {
    /// A single line.
    Single(CartId),
    /// The lines that were selected when removal was requested.
    Selected(Vec<CartId>),
}

impl PendingRemoval {
    /// The ids this removal would drop.
    #[must_use]
    pub fn ids(&self) -> Vec<CartId> {
        match self {
            Self::Single(id) => vec![*id],
            Self::Selected(ids) => ids.clone(),
        }
    }
}

#[derive(Default)]
struct CartState {
    snapshot: CartSnapshot,
    selection: SelectionTracker,
    pending_removal: Option<PendingRemoval>,
    /// Per-line edit epochs; a dispatch only fires while it holds the
    /// latest epoch for its line.
    quantity_epochs: HashMap<CartId, u64>,
}

struct CartServiceInner<B> {
    backend: B,
    badge: BadgeStore,
    debounce: Duration,
    state: Mutex<CartState>,
}

impl<B> CartServiceInner<B> {
    // The lock is never held across an await; poison recovery keeps a
    // panicked test from wedging every later operation
    fn state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Orchestrates the optimistic cart.
///
/// Cheaply cloneable; clones share state, backend, and badge store.
pub struct CartService<B> {
    inner: Arc<CartServiceInner<B>>,
}

impl<B> Clone for CartService<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: CartBackend + 'static> CartService<B> {
    /// Create a service over a backend.
    #[must_use]
    pub fn new(backend: B, badge: BadgeStore, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(CartServiceInner {
                backend,
                badge,
                debounce,
                state: Mutex::new(CartState::default()),
            }),
        }
    }

    /// Fetch the snapshot, select every line, and publish the badge count.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot fetch fails. A badge refresh
    /// failure is logged but does not fail hydration.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<(), CartError> {
        let lines = self.inner.backend.fetch_cart().await?;
        {
            let mut state = self.inner.state();
            state.snapshot = CartSnapshot::new(lines);
            let ids: Vec<CartId> = state.snapshot.ids().collect();
            state.selection.select_all(ids);
            state.pending_removal = None;
            state.quantity_epochs.clear();
        }
        if let Err(err) = self.inner.badge.refresh(&self.inner.backend).await {
            warn!(error = %err, "cart badge refresh failed during hydrate");
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current (optimistic) cart lines, in server order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.state().snapshot.lines().to_vec()
    }

    /// A single line by id.
    #[must_use]
    pub fn line(&self, id: CartId) -> Option<CartLine> {
        self.inner.state().snapshot.get(id).cloned()
    }

    /// The badge store backing the cart count indicator.
    #[must_use]
    pub fn badge(&self) -> &BadgeStore {
        &self.inner.badge
    }

    /// Sum of `total_price` over the selected lines only.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        let state = self.inner.state();
        let mut total: Option<Price> = None;
        for line in state.snapshot.lines() {
            if !state.selection.contains(line.id) {
                continue;
            }
            total = Some(match total {
                None => line.total_price,
                Some(sum) => sum.try_add(line.total_price).unwrap_or_else(|err| {
                    warn!(error = %err, line = %line.id, "skipping line with mismatched currency");
                    sum
                }),
            });
        }
        total.unwrap_or(Price::zero(CurrencyCode::KRW))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Flip one line's selection. Ids outside the snapshot are ignored.
    pub fn toggle_selection(&self, id: CartId) {
        let mut state = self.inner.state();
        if state.snapshot.contains(id) {
            state.selection.toggle(id);
        }
    }

    /// Select every line in the snapshot.
    pub fn select_all(&self) {
        let mut state = self.inner.state();
        let ids: Vec<CartId> = state.snapshot.ids().collect();
        state.selection.select_all(ids);
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        self.inner.state().selection.clear();
    }

    /// Whether a line is selected.
    #[must_use]
    pub fn is_selected(&self, id: CartId) -> bool {
        self.inner.state().selection.contains(id)
    }

    /// Selected ids in snapshot order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<CartId> {
        let state = self.inner.state();
        state
            .snapshot
            .ids()
            .filter(|id| state.selection.contains(*id))
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Change a line's quantity.
    ///
    /// The local snapshot is updated before this returns; the returned
    /// future waits out the debounce window and dispatches the remote
    /// update only if no newer edit has superseded it.
    ///
    /// # Errors
    ///
    /// The future resolves to `Validation` for a zero quantity,
    /// `UnknownLine` for an id outside the snapshot, and `Rejected` /
    /// `Backend` (after a resync) when the remote call fails.
    pub fn handle_quantity(
        &self,
        id: CartId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), CartError>> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        let prepared = {
            let mut state = inner.state();
            if quantity == 0 {
                Err(CartError::Validation(
                    "수량은 1개 이상이어야 합니다.".to_string(),
                ))
            } else if state.snapshot.contains(id) {
                let snapshot = std::mem::take(&mut state.snapshot);
                state.snapshot = reduce(snapshot, &CartAction::SetQuantity { id, quantity });
                let epoch = state
                    .quantity_epochs
                    .entry(id)
                    .and_modify(|e| *e += 1)
                    .or_insert(1);
                Ok(*epoch)
            } else {
                Err(CartError::UnknownLine(id))
            }
        };
        async move {
            let epoch = prepared?;
            tokio::time::sleep(inner.debounce).await;
            let quantity = {
                let state = inner.state();
                if state.quantity_epochs.get(&id).copied() != Some(epoch) {
                    // Superseded by a newer edit for the same line
                    return Ok(());
                }
                match state.snapshot.get(id) {
                    Some(line) => line.quantity,
                    // Removed while the edit was pending
                    None => return Ok(()),
                }
            };
            let result = inner
                .backend
                .update_line(id, LineUpdate::quantity(quantity))
                .await;
            settle(&inner, result).await
        }
    }

    /// Change a line's selected color and size.
    ///
    /// Applied locally before this returns; the remote update dispatches
    /// immediately (no debounce) when the future is awaited.
    ///
    /// # Errors
    ///
    /// The future resolves to `UnknownLine` for an id outside the
    /// snapshot, and `Rejected` / `Backend` (after a resync) when the
    /// remote call fails.
    pub fn handle_option_change(
        &self,
        id: CartId,
        color: impl Into<String>,
        size: impl Into<String>,
    ) -> impl Future<Output = Result<(), CartError>> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        let color = color.into();
        let size = size.into();
        let prepared = {
            let mut state = inner.state();
            if state.snapshot.contains(id) {
                let snapshot = std::mem::take(&mut state.snapshot);
                state.snapshot = reduce(
                    snapshot,
                    &CartAction::ChangeOptions {
                        id,
                        color: color.clone(),
                        size: size.clone(),
                    },
                );
                Ok(())
            } else {
                Err(CartError::UnknownLine(id))
            }
        };
        async move {
            prepared?;
            let result = inner
                .backend
                .update_line(id, LineUpdate::options(color, size))
                .await;
            settle(&inner, result).await
        }
    }

    /// Product options for the option-change UI (served from cache).
    ///
    /// # Errors
    ///
    /// Returns a backend error if the product cannot be fetched.
    pub async fn available_options(&self, product_id: ProductId) -> Result<Product, CartError> {
        Ok(self.inner.backend.fetch_product(product_id).await?)
    }

    // =========================================================================
    // Two-Phase Removal
    // =========================================================================

    /// Ask for confirmation before removing a single line.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the id is not in the snapshot.
    pub fn request_remove(&self, id: CartId) -> Result<(), CartError> {
        let mut state = self.inner.state();
        if !state.snapshot.contains(id) {
            return Err(CartError::UnknownLine(id));
        }
        state.pending_removal = Some(PendingRemoval::Single(id));
        Ok(())
    }

    /// Ask for confirmation before removing every selected line.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if nothing is selected.
    pub fn request_remove_selected(&self) -> Result<(), CartError> {
        let mut state = self.inner.state();
        let ids: Vec<CartId> = state
            .snapshot
            .ids()
            .filter(|id| state.selection.contains(*id))
            .collect();
        if ids.is_empty() {
            return Err(CartError::Validation("선택된 상품이 없습니다.".to_string()));
        }
        state.pending_removal = Some(PendingRemoval::Selected(ids));
        Ok(())
    }

    /// The removal currently awaiting confirmation, if any.
    #[must_use]
    pub fn pending_removal(&self) -> Option<PendingRemoval> {
        self.inner.state().pending_removal.clone()
    }

    /// Discard the pending removal without mutating anything.
    ///
    /// Returns whether a removal was pending.
    pub fn decline_pending(&self) -> bool {
        self.inner.state().pending_removal.take().is_some()
    }

    /// Confirm the pending removal.
    ///
    /// The lines disappear from the local snapshot (and selection)
    /// before this returns; awaiting the future drives the remote
    /// delete. On success the badge count is refreshed out of band.
    ///
    /// # Errors
    ///
    /// The future resolves to `NothingPending` if no removal was
    /// pending, and `Rejected` / `Backend` (after a resync) when the
    /// remote call fails.
    pub fn confirm_pending(&self) -> impl Future<Output = Result<(), CartError>> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        let pending = {
            let mut state = inner.state();
            let pending = state.pending_removal.take();
            if let Some(pending) = &pending {
                let action = match pending {
                    PendingRemoval::Single(id) => CartAction::Remove { id: *id },
                    PendingRemoval::Selected(ids) => CartAction::RemoveMany { ids: ids.clone() },
                };
                let snapshot = std::mem::take(&mut state.snapshot);
                state.snapshot = reduce(snapshot, &action);
                let ids: Vec<CartId> = state.snapshot.ids().collect();
                state.selection.reconcile(&ids);
                for id in pending.ids() {
                    state.quantity_epochs.remove(&id);
                }
            }
            pending
        };
        async move {
            let Some(pending) = pending else {
                return Err(CartError::NothingPending);
            };
            let result = match &pending {
                PendingRemoval::Single(id) => inner.backend.remove_line(*id).await,
                PendingRemoval::Selected(ids) => inner.backend.remove_lines(ids.clone()).await,
            };
            settle(&inner, result).await?;
            // Side channel: the global badge follows successful deletes
            if let Err(err) = inner.badge.refresh(&inner.backend).await {
                warn!(error = %err, "cart badge refresh failed after delete");
            }
            Ok(())
        }
    }
}

/// Map a mutation result, resynchronizing on any failure.
async fn settle<B: CartBackend>(
    inner: &CartServiceInner<B>,
    result: Result<MutationOutcome, ApiError>,
) -> Result<(), CartError> {
    match result {
        Ok(outcome) if outcome.success => Ok(()),
        Ok(outcome) => {
            resync(inner).await;
            Err(CartError::Rejected(outcome.message))
        }
        Err(err) => {
            resync(inner).await;
            Err(CartError::Backend(err))
        }
    }
}

/// Discard speculative state and re-derive it from the server.
async fn resync<B: CartBackend>(inner: &CartServiceInner<B>) {
    warn!("remote cart mutation failed, resynchronizing from server");
    match inner.backend.fetch_cart().await {
        Ok(lines) => {
            let mut state = inner.state();
            state.snapshot = CartSnapshot::new(lines);
            let ids: Vec<CartId> = state.snapshot.ids().collect();
            state.selection.reconcile(&ids);
        }
        Err(err) => {
            // Keep the stale overlay; the next successful fetch fixes it
            tracing::error!(error = %err, "cart resync failed");
        }
    }
}
