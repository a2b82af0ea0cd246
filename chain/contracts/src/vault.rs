//! Vault — native-value custody for the escrow contract
//!
//! The escrow core never moves value itself; it asks a `ValueTransfer`
//! implementation to do so. `Vault` is the in-memory host ledger used by
//! tests and simulations:
//! - Per-account native balances
//! - A single custody balance held by the contract
//! - Overflow/underflow checked credit and debit
//!
//! Every transfer is all-or-nothing: both legs are computed before either
//! balance is written.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use types::ids::AccountId;

use crate::errors::TransferError;

/// Native-value movement provided by the hosting ledger.
pub trait ValueTransfer {
    /// Move `amount` from `from` into contract custody.
    fn collect(&mut self, from: &AccountId, amount: Decimal) -> Result<(), TransferError>;

    /// Move `amount` out of contract custody to `to`.
    fn pay(&mut self, to: &AccountId, amount: Decimal) -> Result<(), TransferError>;
}

/// In-memory host ledger.
#[derive(Debug, Default)]
pub struct Vault {
    /// Balances: account -> native amount
    balances: HashMap<AccountId, Decimal>,
    /// Value held by the contract
    custody: Decimal,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Funding ─────────────────────────

    /// Mint `amount` into an account. Used to seed test and simulation wallets.
    pub fn fund(&mut self, account_id: AccountId, amount: Decimal) -> Result<(), TransferError> {
        check_amount(amount)?;
        let current = self.balance(&account_id);
        let new_balance = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.balances.insert(account_id, new_balance);
        Ok(())
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Balance of an account; zero if unknown.
    pub fn balance(&self, account_id: &AccountId) -> Decimal {
        self.balances
            .get(account_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Value currently held by the contract.
    pub fn custody(&self) -> Decimal {
        self.custody
    }

    /// Sum of every account balance plus custody; `None` if it overflows.
    pub fn total_supply(&self) -> Option<Decimal> {
        self.balances
            .values()
            .try_fold(self.custody, |acc, balance| acc.checked_add(*balance))
    }
}

impl ValueTransfer for Vault {
    fn collect(&mut self, from: &AccountId, amount: Decimal) -> Result<(), TransferError> {
        check_amount(amount)?;

        let available = self.balance(from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: from.to_string(),
                required: amount,
                available,
            });
        }

        let new_custody = self.custody.checked_add(amount).ok_or(TransferError::Overflow)?;
        let new_balance = available - amount;

        self.balances.insert(*from, new_balance);
        self.custody = new_custody;

        debug!(account = %from, %amount, custody = %self.custody, "Value collected into custody");
        Ok(())
    }

    fn pay(&mut self, to: &AccountId, amount: Decimal) -> Result<(), TransferError> {
        check_amount(amount)?;

        if self.custody < amount {
            return Err(TransferError::InsufficientBalance {
                account: "custody".to_string(),
                required: amount,
                available: self.custody,
            });
        }

        let new_balance = self
            .balance(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.custody -= amount;
        self.balances.insert(*to, new_balance);

        debug!(account = %to, %amount, custody = %self.custody, "Value paid out of custody");
        Ok(())
    }
}

fn check_amount(amount: Decimal) -> Result<(), TransferError> {
    if amount < Decimal::ZERO {
        return Err(TransferError::InvalidAmount);
    }
    Ok(())
}
