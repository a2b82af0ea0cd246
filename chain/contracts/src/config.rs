//! Escrow configuration
//!
//! Fee and deposit bounds, loadable from JSON. Decimals are encoded as
//! strings so no precision is lost in transit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Owner-adjustable escrow parameters.
///
/// `min_deposit <= max_deposit` is expected but never enforced: an
/// inconsistent pair simply makes every submission fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowConfig {
    /// Vig charged per submission, on top of the deposit.
    pub fee_amount: Decimal,
    /// Smallest deposit accepted (inclusive).
    pub min_deposit: Decimal,
    /// Largest deposit accepted (inclusive).
    pub max_deposit: Decimal,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            min_deposit: Decimal::ZERO,
            max_deposit: Decimal::ONE,
        }
    }
}

impl EscrowConfig {
    /// Config with the given fee and minimum deposit, default maximum.
    pub fn with_fee_and_min(fee_amount: Decimal, min_deposit: Decimal) -> Self {
        Self {
            fee_amount,
            min_deposit,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Smallest total value a submitter must attach. Saturates at
    /// `Decimal::MAX`, which no attached value can exceed.
    pub fn min_payable(&self) -> Decimal {
        self.fee_amount
            .checked_add(self.min_deposit)
            .unwrap_or(Decimal::MAX)
    }

    /// Whether any deposit can currently satisfy the bounds.
    pub fn bounds_consistent(&self) -> bool {
        self.min_deposit <= self.max_deposit
    }
}
