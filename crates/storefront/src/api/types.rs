//! Wire types for the OnGil backend REST API.
//!
//! These mirror the backend's camelCase JSON and are converted into the
//! engine's domain types at the client boundary. Decimal amounts travel
//! as strings to preserve precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ongil_core::{CartId, CurrencyCode, Price, ProductId, ReviewId};

use crate::cart::{CartLine, Product};
use crate::review::ReviewDraft;

// =============================================================================
// Mutation Results
// =============================================================================

/// Result of a backend mutation.
///
/// The backend reports soft failures (stock exhausted, line already gone)
/// with `success: false` and an optional user-facing message rather than
/// a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationOutcome {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Optional user-facing message, usually present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MutationOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A rejected outcome with a message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Partial update to a cart line.
///
/// Only the set fields are sent; the backend leaves the rest untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl LineUpdate {
    /// Update only the quantity.
    #[must_use]
    pub const fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            selected_color: None,
            selected_size: None,
        }
    }

    /// Update only the selected variant options.
    #[must_use]
    pub fn options(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            quantity: None,
            selected_color: Some(color.into()),
            selected_size: Some(size.into()),
        }
    }
}

// =============================================================================
// Cart DTOs
// =============================================================================

/// A cart line as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub cart_id: i64,
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub thumbnail_url: String,
    pub selected_color: String,
    pub selected_size: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// The full cart payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSnapshotDto {
    pub items: Vec<CartLineDto>,
}

/// Cart badge count payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CartCountDto {
    pub count: u32,
}

impl From<CartLineDto> for CartLine {
    fn from(dto: CartLineDto) -> Self {
        // The backend bills in won; the wire format carries no currency
        Self {
            id: CartId::new(dto.cart_id),
            product_id: ProductId::new(dto.product_id),
            name: dto.name,
            brand: dto.brand,
            thumbnail_url: dto.thumbnail_url,
            selected_color: dto.selected_color,
            selected_size: dto.selected_size,
            quantity: dto.quantity,
            unit_price: Price::new(dto.price, CurrencyCode::KRW),
            total_price: Price::new(dto.total_price, CurrencyCode::KRW),
        }
    }
}

// =============================================================================
// Product DTOs
// =============================================================================

/// A product as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    pub thumbnail_url: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: ProductId::new(dto.product_id),
            name: dto.name,
            brand: dto.brand,
            thumbnail_url: dto.thumbnail_url,
            price: Price::new(dto.price, CurrencyCode::KRW),
            colors: dto.colors,
            sizes: dto.sizes,
        }
    }
}

// =============================================================================
// Review DTOs
// =============================================================================

/// Draft created by persisting step-one review answers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraftDto {
    pub review_id: i64,
    pub needs_size_secondary_question: bool,
    pub needs_material_secondary_question: bool,
}

impl From<ReviewDraftDto> for ReviewDraft {
    fn from(dto: ReviewDraftDto) -> Self {
        Self {
            review_id: ReviewId::new(dto.review_id),
            needs_size_detail: dto.needs_size_secondary_question,
            needs_material_detail: dto.needs_material_secondary_question,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_update_serializes_only_set_fields() {
        let update = LineUpdate::quantity(3);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "quantity": 3 }));

        let update = LineUpdate::options("black", "XL");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "selectedColor": "black", "selectedSize": "XL" })
        );
    }

    #[test]
    fn test_cart_line_dto_deserializes_camel_case() {
        let json = serde_json::json!({
            "cartId": 1,
            "productId": 10,
            "name": "편안한 면 티셔츠",
            "brand": "온길",
            "thumbnailUrl": "https://cdn.ongil.example/tshirt.jpg",
            "selectedColor": "navy",
            "selectedSize": "L",
            "quantity": 2,
            "price": "12900",
            "totalPrice": "25800"
        });

        let dto: CartLineDto = serde_json::from_value(json).unwrap();
        let line = CartLine::from(dto);
        assert_eq!(line.id, CartId::new(1));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price.amount, Decimal::from(12900));
        assert_eq!(line.total_price.amount, Decimal::from(25800));
        assert_eq!(line.unit_price.currency_code, CurrencyCode::KRW);
    }

    #[test]
    fn test_review_draft_dto_maps_secondary_question_flags() {
        let json = serde_json::json!({
            "reviewId": 77,
            "needsSizeSecondaryQuestion": true,
            "needsMaterialSecondaryQuestion": false
        });

        let draft = ReviewDraft::from(serde_json::from_value::<ReviewDraftDto>(json).unwrap());
        assert_eq!(draft.review_id, ReviewId::new(77));
        assert!(draft.needs_size_detail);
        assert!(!draft.needs_material_detail);
    }

    #[test]
    fn test_mutation_outcome_message_defaults_to_none() {
        let outcome: MutationOutcome = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(outcome.success);
        assert!(outcome.message.is_none());
    }
}
