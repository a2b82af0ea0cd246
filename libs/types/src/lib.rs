//! Types library for the Bankshot ledger
//!
//! Shared identity types used by the contract crate and any service that
//! observes its events.
//!
//! # Modules
//! - `ids`: Account identities (AccountId)

pub mod ids;
