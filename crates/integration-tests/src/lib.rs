//! Integration-test support for the OnGil storefront engine.
//!
//! Provides [`RecordingBackend`], an in-process stand-in for the remote
//! commerce backend that logs every call, lets tests script failures,
//! and applies successful mutations to its own cart so that a resync
//! observes realistic server truth.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ongil-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use ongil_core::{CartId, CurrencyCode, Price, ProductId, ReviewId};
use ongil_storefront::api::{
    ApiError, CartBackend, LineUpdate, MutationOutcome, ReviewBackend,
};
use ongil_storefront::cart::{CartLine, Product};
use ongil_storefront::review::{BasicsAnswers, DetailsAnswers, ReviewDraft, SubmissionForm};

/// Initialize tracing for a test binary. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a cart line with a derived total.
#[must_use]
pub fn cart_line(id: i64, unit_won: i64, quantity: u32) -> CartLine {
    let unit_price = Price::new(Decimal::from(unit_won), CurrencyCode::KRW);
    CartLine {
        id: CartId::new(id),
        product_id: ProductId::new(id * 10),
        name: format!("상품 {id}"),
        brand: "온길".to_string(),
        thumbnail_url: format!("https://cdn.ongil.example/{id}.jpg"),
        selected_color: "black".to_string(),
        selected_size: "M".to_string(),
        quantity,
        unit_price,
        total_price: unit_price.times(quantity),
    }
}

/// One remote call observed by the recording backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    FetchCart,
    FetchCartCount,
    UpdateLine { id: CartId, update: LineUpdate },
    RemoveLine(CartId),
    RemoveLines(Vec<CartId>),
    FetchProduct(ProductId),
    SaveBasics(ProductId),
    SaveDetails(ReviewId),
    SubmitReview(ReviewId),
}

#[derive(Default)]
struct RecordingState {
    cart: Vec<CartLine>,
    products: Vec<Product>,
    calls: Vec<BackendCall>,
    /// Scripted results for the next mutations, oldest first. When the
    /// queue is empty, mutations succeed.
    mutations: VecDeque<Result<MutationOutcome, ApiError>>,
    /// Scripted results for the next `save_review_basics` calls.
    basics: VecDeque<Result<ReviewDraft, ApiError>>,
}

/// An in-process backend that records calls and scripts outcomes.
///
/// Clones share state, so a test can hold one clone for assertions
/// while the engine owns another.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose cart already holds the given lines.
    #[must_use]
    pub fn with_cart(lines: Vec<CartLine>) -> Self {
        let backend = Self::new();
        backend.set_cart(lines);
        backend
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the server-side cart.
    pub fn set_cart(&self, lines: Vec<CartLine>) {
        self.state().cart = lines;
    }

    /// The server-side cart as it stands.
    #[must_use]
    pub fn cart(&self) -> Vec<CartLine> {
        self.state().cart.clone()
    }

    /// Register a product for `fetch_product`.
    pub fn add_product(&self, product: Product) {
        self.state().products.push(product);
    }

    /// Script the result of the next cart/review mutation.
    pub fn script_mutation(&self, result: Result<MutationOutcome, ApiError>) {
        self.state().mutations.push_back(result);
    }

    /// Script the result of the next `save_review_basics` call.
    pub fn script_basics(&self, result: Result<ReviewDraft, ApiError>) {
        self.state().basics.push_back(result);
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    /// How many observed calls match the predicate.
    #[must_use]
    pub fn count_calls(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.state().calls.iter().filter(|call| matches(call)).count()
    }

    fn next_mutation(state: &mut RecordingState) -> Result<MutationOutcome, ApiError> {
        state
            .mutations
            .pop_front()
            .unwrap_or_else(|| Ok(MutationOutcome::ok()))
    }
}

impl CartBackend for RecordingBackend {
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::FetchCart);
        Ok(state.cart.clone())
    }

    async fn fetch_cart_count(&self) -> Result<u32, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::FetchCartCount);
        Ok(u32::try_from(state.cart.len()).unwrap_or(0))
    }

    async fn update_line(&self, id: CartId, update: LineUpdate) -> Result<MutationOutcome, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::UpdateLine {
            id,
            update: update.clone(),
        });
        let result = Self::next_mutation(&mut state);
        if matches!(&result, Ok(outcome) if outcome.success) {
            if let Some(line) = state.cart.iter_mut().find(|line| line.id == id) {
                if let Some(quantity) = update.quantity {
                    line.quantity = quantity;
                    line.total_price = line.unit_price.times(quantity);
                }
                if let Some(color) = update.selected_color {
                    line.selected_color = color;
                }
                if let Some(size) = update.selected_size {
                    line.selected_size = size;
                }
            }
        }
        result
    }

    async fn remove_line(&self, id: CartId) -> Result<MutationOutcome, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::RemoveLine(id));
        let result = Self::next_mutation(&mut state);
        if matches!(&result, Ok(outcome) if outcome.success) {
            state.cart.retain(|line| line.id != id);
        }
        result
    }

    async fn remove_lines(&self, ids: Vec<CartId>) -> Result<MutationOutcome, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::RemoveLines(ids.clone()));
        let result = Self::next_mutation(&mut state);
        if matches!(&result, Ok(outcome) if outcome.success) {
            state.cart.retain(|line| !ids.contains(&line.id));
        }
        result
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::FetchProduct(id));
        state
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/products/{id}")))
    }
}

impl ReviewBackend for RecordingBackend {
    async fn save_review_basics(
        &self,
        product_id: ProductId,
        _answers: &BasicsAnswers,
    ) -> Result<ReviewDraft, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::SaveBasics(product_id));
        state.basics.pop_front().unwrap_or_else(|| {
            Ok(ReviewDraft {
                review_id: ReviewId::new(1),
                needs_size_detail: false,
                needs_material_detail: false,
            })
        })
    }

    async fn save_review_details(
        &self,
        review_id: ReviewId,
        _answers: &DetailsAnswers,
    ) -> Result<MutationOutcome, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::SaveDetails(review_id));
        Self::next_mutation(&mut state)
    }

    async fn submit_review(
        &self,
        review_id: ReviewId,
        _form: &SubmissionForm,
    ) -> Result<MutationOutcome, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::SubmitReview(review_id));
        Self::next_mutation(&mut state)
    }
}
