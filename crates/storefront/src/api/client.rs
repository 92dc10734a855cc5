//! HTTP client for the OnGil commerce backend.
//!
//! Plain REST with JSON bodies over `reqwest`. Products are cached with
//! `moka` (5-minute TTL); cart payloads are never cached - they are
//! mutable state owned by the server.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use uuid::Uuid;

use ongil_core::{CartId, ProductId, ReviewId};

use crate::api::types::{
    CartCountDto, CartSnapshotDto, LineUpdate, MutationOutcome, ProductDto, ReviewDraftDto,
};
use crate::api::{ApiError, CartBackend, ReviewBackend};
use crate::cart::{CartLine, Product};
use crate::config::ApiConfig;
use crate::review::{BasicsAnswers, DetailsAnswers, ReviewDraft, SubmissionForm};

/// The HTTP header used to correlate requests in backend logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Maximum characters of a response body to include in logs and errors.
const BODY_LOG_LIMIT: usize = 500;
const BODY_ERROR_LIMIT: usize = 200;

// =============================================================================
// OngilClient
// =============================================================================

/// Client for the OnGil commerce backend.
///
/// Cheaply cloneable via `Arc`. Every request carries a fresh UUID in the
/// `x-request-id` header so a failing call can be found in backend logs.
#[derive(Clone)]
pub struct OngilClient {
    inner: Arc<OngilClientInner>,
}

struct OngilClientInner {
    client: reqwest::Client,
    base: String,
    token: String,
    products: Cache<ProductId, Product>,
}

impl OngilClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(OngilClientInner {
                client,
                base: config.base_url.as_str().trim_end_matches('/').to_string(),
                token: config.token.expose_secret().to_string(),
                products,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ApiError> {
        let response = request
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .bearer_auth(&self.inner.token)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&text, BODY_LOG_LIMIT),
                "OnGil API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&text, BODY_ERROR_LIMIT),
            });
        }

        Ok(text)
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(text, BODY_LOG_LIMIT),
                "Failed to parse OnGil API response"
            );
            ApiError::Decode(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.url(path));
        let text = self.execute(path, request).await?;
        Self::decode(&text)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.request(method, self.url(path)).json(body);
        let text = self.execute(path, request).await?;
        Self::decode(&text)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.products.invalidate(&id).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.products.invalidate_all();
        self.inner.products.run_pending_tasks().await;
    }
}

fn truncate(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

// =============================================================================
// Cart Operations
// =============================================================================

impl CartBackend for OngilClient {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let snapshot: CartSnapshotDto = self.get_json("/cart").await?;
        Ok(snapshot.items.into_iter().map(CartLine::from).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_cart_count(&self) -> Result<u32, ApiError> {
        let dto: CartCountDto = self.get_json("/cart/count").await?;
        Ok(dto.count)
    }

    #[instrument(skip(self, update), fields(cart_id = %id))]
    async fn update_line(&self, id: CartId, update: LineUpdate) -> Result<MutationOutcome, ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/cart/items/{id}"),
            &update,
        )
        .await
    }

    #[instrument(skip(self), fields(cart_id = %id))]
    async fn remove_line(&self, id: CartId) -> Result<MutationOutcome, ApiError> {
        let path = format!("/cart/items/{id}");
        let request = self.inner.client.delete(self.url(&path));
        let text = self.execute(&path, request).await?;
        Self::decode(&text)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn remove_lines(&self, ids: Vec<CartId>) -> Result<MutationOutcome, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/cart/items/remove",
            &serde_json::json!({ "cartIds": ids }),
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let dto: ProductDto = self.get_json(&format!("/products/{id}")).await?;
        let product = Product::from(dto);

        // Cache the result
        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }
}

// =============================================================================
// Review Operations
// =============================================================================

impl ReviewBackend for OngilClient {
    #[instrument(skip(self, answers), fields(product_id = %product_id))]
    async fn save_review_basics(
        &self,
        product_id: ProductId,
        answers: &BasicsAnswers,
    ) -> Result<ReviewDraft, ApiError> {
        let body = serde_json::json!({
            "productId": product_id,
            "rating": answers.rating,
            "sizeFit": answers.size_fit,
            "materialFeel": answers.material_feel,
            "comfort": answers.comfort,
        });
        let dto: ReviewDraftDto = self
            .send_json(reqwest::Method::POST, "/reviews", &body)
            .await?;
        Ok(ReviewDraft::from(dto))
    }

    #[instrument(skip(self, answers), fields(review_id = %review_id))]
    async fn save_review_details(
        &self,
        review_id: ReviewId,
        answers: &DetailsAnswers,
    ) -> Result<MutationOutcome, ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/reviews/{review_id}/details"),
            answers,
        )
        .await
    }

    #[instrument(skip(self, form), fields(review_id = %review_id))]
    async fn submit_review(
        &self,
        review_id: ReviewId,
        form: &SubmissionForm,
    ) -> Result<MutationOutcome, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/reviews/{review_id}/submit"),
            form,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> ApiConfig {
        ApiConfig {
            base_url: "https://api.ongil.example/v1/".parse().unwrap(),
            token: SecretString::from("kQ9vX2mZ7pL4wN8rT3yB6dF1gH5jC0aE"),
            timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = OngilClient::new(&test_config()).unwrap();
        assert_eq!(client.url("/cart"), "https://api.ongil.example/v1/cart");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("가나다라", 2), "가나");
        assert_eq!(truncate("ab", 10), "ab");
    }
}
