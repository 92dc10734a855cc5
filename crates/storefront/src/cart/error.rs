//! Error type for cart operations.

use thiserror::Error;

use ongil_core::CartId;

use crate::api::ApiError;

/// Errors that can occur while operating on the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// User input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Backend call failed (transport, status, decode).
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    /// Backend answered `success: false` for a mutation.
    #[error("Mutation rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    /// The referenced line is not in the current snapshot.
    #[error("No cart line with id {0}")]
    UnknownLine(CartId),

    /// Confirmation was requested with no removal pending.
    #[error("No removal pending confirmation")]
    NothingPending,
}
