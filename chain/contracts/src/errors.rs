//! Contract-specific error types
//!
//! Every rejection is terminal for the single operation that raised it and
//! leaves contract state untouched.

use rust_decimal::Decimal;
use thiserror::Error;
use types::ids::AccountId;

/// Escrow errors raised by `Bankshot` operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EscrowError {
    #[error("Unauthorized: caller {caller} is not the owner")]
    NotOwner { caller: AccountId },

    #[error("Submissions are locked")]
    SubmissionsClosed,

    #[error("Insufficient funds: attached {attached}, required at least {required}")]
    InsufficientFunds { attached: Decimal, required: Decimal },

    #[error("Oversize deposit: {deposit} exceeds maximum {max}")]
    OversizeDeposit { deposit: Decimal, max: Decimal },

    #[error("Submission not found: {submitter} #{index}")]
    NotFound { submitter: AccountId, index: usize },

    #[error("Submission already revealed: {submitter} #{index}")]
    AlreadyRevealed { submitter: AccountId, index: usize },

    #[error("Invalid reveal: payload does not match commitment")]
    InvalidReveal,

    #[error("Withdraw limit exceeded: requested {requested}, available {available}")]
    WithdrawLimitExceeded { requested: Decimal, available: Decimal },

    #[error("Amount must not be negative: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Arithmetic overflow in vig accounting")]
    Overflow,

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl EscrowError {
    /// Stable short reason string, suitable for matching in calling layers.
    pub fn code(&self) -> &'static str {
        match self {
            EscrowError::NotOwner { .. } => "ONLY_OWNER",
            EscrowError::SubmissionsClosed => "SUBS_LOCKED",
            EscrowError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            EscrowError::OversizeDeposit { .. } => "OVERSIZE_DEPOSIT",
            EscrowError::NotFound { .. } => "NOT_FOUND",
            EscrowError::AlreadyRevealed { .. } => "ALREADY_REVEALED",
            EscrowError::InvalidReveal => "INVALID_REVEAL",
            EscrowError::WithdrawLimitExceeded { .. } => "WITHDRAW_LIMIT",
            EscrowError::InvalidAmount { .. } => "INVALID_AMOUNT",
            EscrowError::Overflow => "OVERFLOW",
            EscrowError::Transfer(_) => "TRANSFER_FAILED",
        }
    }
}

/// Errors raised by the host ledger's value-transfer primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("Transfer amount must not be negative")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Errors raised while loading an `EscrowConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
