//! Vig accounting
//!
//! Two monotonic counters: fees accrued across all submissions and fees
//! withdrawn by the owner. `withdrawn <= accrued` holds after every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::EscrowError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VigLedger {
    total_accrued: Decimal,
    total_withdrawn: Decimal,
}

impl VigLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_accrued(&self) -> Decimal {
        self.total_accrued
    }

    pub fn total_withdrawn(&self) -> Decimal {
        self.total_withdrawn
    }

    /// Fees accrued but not yet withdrawn.
    pub fn available(&self) -> Decimal {
        self.total_accrued - self.total_withdrawn
    }

    /// Compute the accrued total after collecting `fee`, without applying it.
    pub fn accrual_after(&self, fee: Decimal) -> Result<Decimal, EscrowError> {
        self.total_accrued.checked_add(fee).ok_or(EscrowError::Overflow)
    }

    /// Compute the withdrawn total after taking `amount`, without applying it.
    ///
    /// Rejects anything above `available()`.
    pub fn withdrawal_after(&self, amount: Decimal) -> Result<Decimal, EscrowError> {
        if amount < Decimal::ZERO {
            return Err(EscrowError::InvalidAmount { amount });
        }

        let available = self.available();
        if amount > available {
            return Err(EscrowError::WithdrawLimitExceeded {
                requested: amount,
                available,
            });
        }

        self.total_withdrawn
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)
    }

    /// Apply a value produced by `accrual_after`.
    pub(crate) fn commit_accrual(&mut self, total_accrued: Decimal) {
        debug_assert!(total_accrued >= self.total_accrued);
        self.total_accrued = total_accrued;
    }

    /// Apply a value produced by `withdrawal_after`.
    pub(crate) fn commit_withdrawal(&mut self, total_withdrawn: Decimal) {
        debug_assert!(total_withdrawn >= self.total_withdrawn);
        debug_assert!(total_withdrawn <= self.total_accrued);
        self.total_withdrawn = total_withdrawn;
    }
}
