//! Domain types for the cart engine.

use serde::{Deserialize, Serialize};

use ongil_core::{CartId, Price, ProductId};

/// A single line item in the cart.
///
/// `total_price` must always equal `unit_price × quantity` after any
/// local mutation. The reducer recomputes it on every quantity change;
/// the server's figure is only taken verbatim when a fresh snapshot is
/// fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartId,
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub thumbnail_url: String,
    pub selected_color: String,
    pub selected_size: String,
    /// Positive item count.
    pub quantity: u32,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Line total, derived from `unit_price × quantity`.
    pub total_price: Price,
}

/// Ordered sequence of cart lines, sourced from the server.
///
/// The optimistic overlay temporarily diverges from the last fetched
/// snapshot; a resync replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Create a snapshot from server-ordered lines.
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in server order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the snapshot, yielding its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: CartId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Whether a line with this id exists.
    #[must_use]
    pub fn contains(&self, id: CartId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of all lines, in order.
    pub fn ids(&self) -> impl Iterator<Item = CartId> + '_ {
        self.lines.iter().map(|line| line.id)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Product data needed by the option-change UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub thumbnail_url: String,
    pub price: Price,
    /// Available color options.
    pub colors: Vec<String>,
    /// Available size options.
    pub sizes: Vec<String>,
}
