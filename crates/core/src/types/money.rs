//! Type-safe money representation using decimal arithmetic.
//!
//! Monetary amounts from the backend arrive as decimal strings and are
//! never represented as floats. Client-side arithmetic over these values
//! produces display estimates only; order totals are always taken from
//! the backend response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., birr, not santim).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Scale by an item quantity (line total).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency: self.currency,
        }
    }

    /// Add another amount, keeping this currency.
    ///
    /// The backend never mixes currencies within one cart or order, so
    /// the right-hand currency is not consulted.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        }
    }

    /// Format for display (e.g., "ETB 45.94").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency.code(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ETB,
    USD,
}

impl CurrencyCode {
    /// The three-letter currency code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ETB => "ETB",
            Self::USD => "USD",
        }
    }
}
