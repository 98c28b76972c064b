//! Monetary amount newtype.
//!
//! Milestone amounts and contract budgets are strictly positive decimals;
//! `Money` enforces this at construction so the ledger and escrow math never
//! re-validate. Derived escrow figures (which may legitimately be zero) are
//! plain `Decimal` values, not `Money`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ContractError;

/// A strictly positive decimal amount in the contract's (single) currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    ///
    /// # Errors
    /// Returns [`ContractError::NonPositiveAmount`] when `amount <= 0`.
    pub fn new(amount: Decimal) -> Result<Self, ContractError> {
        if amount <= Decimal::ZERO {
            return Err(ContractError::NonPositiveAmount { amount });
        }
        Ok(Self(amount))
    }

    /// Returns the wrapped decimal value.
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ContractError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
