//! Optimistic cart engine.
//!
//! # Architecture
//!
//! User intent flows through the [`CartService`], which applies a pure
//! [`reducer`] action to the local snapshot synchronously (zero perceived
//! latency) and then dispatches the matching remote call. The server
//! remains the source of truth: when a remote mutation fails, the
//! speculative local state is discarded by refetching the whole snapshot
//! rather than computing an inverse patch.
//!
//! - [`types`] - Cart lines, snapshots, and products
//! - [`reducer`] - Pure snapshot transitions for optimistic updates
//! - [`selection`] - The set of lines marked for checkout/bulk actions
//! - [`badge`] - Session-scoped cart badge count store
//! - [`service`] - Orchestration, debouncing, and failure recovery

pub mod badge;
pub mod error;
pub mod reducer;
pub mod selection;
pub mod service;
pub mod types;

pub use badge::BadgeStore;
pub use error::CartError;
pub use reducer::{CartAction, reduce};
pub use selection::SelectionTracker;
pub use service::{CartService, PendingRemoval};
pub use types::{CartLine, CartSnapshot, Product};
