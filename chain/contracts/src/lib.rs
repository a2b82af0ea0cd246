//! Bankshot — commit-reveal escrow ledger
//!
//! Participants stake value against a hidden prediction (a commitment) and
//! later reveal the underlying text to reclaim their stake. The operator
//! collects a fixed vig per submission and may withdraw what has accrued.
//!
//! # Modules
//! - `errors`: Contract error taxonomy
//! - `events`: Publication / Revelation notifications and the sink hook
//! - `security`: Owner guard and one-way submission gate
//! - `config`: Fee and deposit bounds, loadable from JSON
//! - `digest`: Commitment digests
//! - `policy`: Deposit bounds policy
//! - `registry`: Append-only per-submitter commitment store
//! - `vig`: Fee accrual and withdrawal ceiling
//! - `vault`: Value-transfer primitive and in-memory host ledger
//! - `escrow`: The `Bankshot` contract
//! - `history`: Commit/reveal history rebuilt from events

pub mod config;
pub mod digest;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod history;
pub mod policy;
pub mod registry;
pub mod security;
pub mod vault;
pub mod vig;

pub use config::EscrowConfig;
pub use digest::{digest, CommitmentHash};
pub use errors::{EscrowError, TransferError};
pub use escrow::Bankshot;
pub use events::ContractEvent;
pub use vault::{ValueTransfer, Vault};

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
