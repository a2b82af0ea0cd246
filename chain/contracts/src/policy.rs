//! Deposit bounds policy
//!
//! Splits an attached value into fee and deposit and checks the deposit
//! against the configured bounds. Pure: reads the config, mutates nothing.

use rust_decimal::Decimal;

use crate::config::EscrowConfig;
use crate::errors::EscrowError;

/// Accepted split of an attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositSplit {
    pub fee: Decimal,
    pub deposit: Decimal,
}

/// Validate `attached` against the fee and deposit bounds in `config`.
///
/// Bounds are inclusive on both ends.
pub fn check_deposit(config: &EscrowConfig, attached: Decimal) -> Result<DepositSplit, EscrowError> {
    let fee = config.fee_amount;

    if attached < fee {
        return Err(EscrowError::InsufficientFunds {
            attached,
            required: config.min_payable(),
        });
    }

    let deposit = attached - fee;

    if deposit < config.min_deposit {
        return Err(EscrowError::InsufficientFunds {
            attached,
            required: config.min_payable(),
        });
    }

    if deposit > config.max_deposit {
        return Err(EscrowError::OversizeDeposit {
            deposit,
            max: config.max_deposit,
        });
    }

    Ok(DepositSplit { fee, deposit })
}
