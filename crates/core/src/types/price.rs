//! Type-safe price representation using decimal arithmetic.
//!
//! Prices carry their currency and never use floating point. Quantity
//! multiplication and same-currency addition are the only arithmetic the
//! storefront needs; anything else is a sign the calculation belongs to
//! the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from price arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Tried to combine prices in different currencies.
    #[error("currency mismatch: {0:?} vs {1:?}")]
    CurrencyMismatch(CurrencyCode, CurrencyCode),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., won, not jeon).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Multiply the unit amount by a quantity.
    ///
    /// This is how line totals are derived locally: unit price times
    /// quantity, never a server-provided total.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }

    /// Add two prices in the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if the currencies differ.
    pub fn try_add(self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch(
                self.currency_code,
                other.currency_code,
            ));
        }
        Ok(Self {
            amount: self.amount + other.amount,
            currency_code: self.currency_code,
        })
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Korean won - the platform's home currency.
    #[default]
    KRW,
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::KRW => "₩",
            Self::USD => "$",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::KRW => "KRW",
            Self::USD => "USD",
        }
    }
}
