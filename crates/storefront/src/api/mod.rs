//! Remote commerce backend client and integration seams.
//!
//! # Architecture
//!
//! - The OnGil backend owns all business logic (pricing, inventory,
//!   order validation, review aggregation) - this module only speaks
//!   its REST dialect
//! - The backend is source of truth - NO local persistence, direct API calls
//! - In-memory caching via `moka` for product lookups (5 minute TTL)
//! - [`CartBackend`] and [`ReviewBackend`] decouple the engine from HTTP
//!   so tests can drive it with an in-process backend
//!
//! # Example
//!
//! ```rust,ignore
//! use ongil_storefront::api::{CartBackend, OngilClient};
//!
//! let client = OngilClient::new(&config.api)?;
//!
//! // Fetch the cart snapshot
//! let lines = client.fetch_cart().await?;
//!
//! // Update a line's quantity
//! let outcome = client
//!     .update_line(lines[0].id, LineUpdate::quantity(3))
//!     .await?;
//! ```

mod client;
mod error;
pub mod types;

pub use client::OngilClient;
pub use error::ApiError;
pub use types::{LineUpdate, MutationOutcome};

use std::future::Future;

use ongil_core::{CartId, ProductId, ReviewId};

use crate::cart::{CartLine, Product};
use crate::review::{BasicsAnswers, DetailsAnswers, ReviewDraft, SubmissionForm};

/// Remote operations backing the cart engine.
///
/// All mutations are idempotent at the HTTP layer, but no retry logic is
/// layered on top: a failure surfaces immediately so the service can
/// resynchronize from the server.
pub trait CartBackend: Send + Sync {
    /// Fetch the full cart snapshot (ground truth).
    fn fetch_cart(&self) -> impl Future<Output = Result<Vec<CartLine>, ApiError>> + Send;

    /// Fetch the authoritative cart item count for the badge.
    fn fetch_cart_count(&self) -> impl Future<Output = Result<u32, ApiError>> + Send;

    /// Update quantity and/or selected options on a single line.
    fn update_line(
        &self,
        id: CartId,
        update: LineUpdate,
    ) -> impl Future<Output = Result<MutationOutcome, ApiError>> + Send;

    /// Remove a single line.
    fn remove_line(&self, id: CartId)
    -> impl Future<Output = Result<MutationOutcome, ApiError>> + Send;

    /// Remove several lines in one call.
    fn remove_lines(
        &self,
        ids: Vec<CartId>,
    ) -> impl Future<Output = Result<MutationOutcome, ApiError>> + Send;

    /// Fetch a product (color/size options for the option-change UI).
    fn fetch_product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, ApiError>> + Send;
}

/// Remote operations backing the review wizard.
pub trait ReviewBackend: Send + Sync {
    /// Persist step-one answers, creating a review draft.
    ///
    /// The returned draft carries the server-side flags that decide
    /// whether the secondary-question step is shown.
    fn save_review_basics(
        &self,
        product_id: ProductId,
        answers: &BasicsAnswers,
    ) -> impl Future<Output = Result<ReviewDraft, ApiError>> + Send;

    /// Persist step-two answers on an existing draft.
    fn save_review_details(
        &self,
        review_id: ReviewId,
        answers: &DetailsAnswers,
    ) -> impl Future<Output = Result<MutationOutcome, ApiError>> + Send;

    /// Submit the finished review.
    fn submit_review(
        &self,
        review_id: ReviewId,
        form: &SubmissionForm,
    ) -> impl Future<Output = Result<MutationOutcome, ApiError>> + Send;
}
