//! Inventory stock arithmetic.
//!
//! Quantities are whole units and never negative. Item names are unique
//! ignoring case and surrounding whitespace.

use thiserror::Error;

/// Stock rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// A quantity was negative where only non-negative values are allowed.
    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    /// A movement quantity was zero or negative.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Removing `requested` units would take stock below zero.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    Insufficient {
        /// Units on hand.
        available: i32,
        /// Units requested.
        requested: i32,
    },

    /// Adding units would overflow the stored quantity.
    #[error("Quantity is too large")]
    Overflow,
}

/// Canonical form of an item name used for uniqueness checks.
#[must_use]
pub fn normalize_item_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Checks a quantity supplied on create or update.
///
/// # Errors
///
/// Returns `StockError::NegativeQuantity` for values below zero.
pub const fn check_quantity(quantity: i32) -> Result<i32, StockError> {
    if quantity < 0 {
        Err(StockError::NegativeQuantity)
    } else {
        Ok(quantity)
    }
}

/// Quantity after merging `added` units into an existing item.
///
/// # Errors
///
/// Returns `StockError::NegativeQuantity` if `added < 0` and
/// `StockError::Overflow` if the sum does not fit.
pub fn merge_quantity(existing: i32, added: i32) -> Result<i32, StockError> {
    check_quantity(added)?;
    existing.checked_add(added).ok_or(StockError::Overflow)
}

/// Quantity left after removing `requested` units.
///
/// # Errors
///
/// Returns `StockError::NonPositiveQuantity` if `requested <= 0` and
/// `StockError::Insufficient` if fewer than `requested` units are on hand.
pub const fn take(available: i32, requested: i32) -> Result<i32, StockError> {
    if requested <= 0 {
        return Err(StockError::NonPositiveQuantity);
    }
    if requested > available {
        return Err(StockError::Insufficient {
            available,
            requested,
        });
    }
    Ok(available - requested)
}
