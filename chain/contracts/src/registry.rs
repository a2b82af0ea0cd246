//! Commitment registry
//!
//! Per-submitter, append-only sequences of commitments and their locked
//! deposits. Entries are never removed or reordered, so an index handed out
//! in a publication event stays valid for the lifetime of the registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::AccountId;

use crate::digest::CommitmentHash;
use crate::errors::EscrowError;

/// A single commitment and its escrowed deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub commitment: CommitmentHash,
    pub locked_deposit: Decimal,
    pub revealed: bool,
}

/// Identity-indexed store of submissions.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<AccountId, Vec<Submission>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next submission from `submitter` will receive.
    pub fn next_index(&self, submitter: &AccountId) -> usize {
        self.entries.get(submitter).map_or(0, Vec::len)
    }

    /// Append a new unrevealed submission; returns its index.
    pub fn append(
        &mut self,
        submitter: AccountId,
        commitment: CommitmentHash,
        locked_deposit: Decimal,
    ) -> usize {
        let list = self.entries.entry(submitter).or_default();
        list.push(Submission {
            commitment,
            locked_deposit,
            revealed: false,
        });
        list.len() - 1
    }

    pub fn get(&self, submitter: &AccountId, index: usize) -> Option<&Submission> {
        self.entries.get(submitter).and_then(|list| list.get(index))
    }

    /// Look up an entry that is still open for reveal.
    pub fn get_unrevealed(
        &self,
        submitter: &AccountId,
        index: usize,
    ) -> Result<&Submission, EscrowError> {
        let submission = self.get(submitter, index).ok_or(EscrowError::NotFound {
            submitter: *submitter,
            index,
        })?;

        if submission.revealed {
            return Err(EscrowError::AlreadyRevealed {
                submitter: *submitter,
                index,
            });
        }
        Ok(submission)
    }

    /// Flip the terminal `revealed` flag. Callers check the entry first.
    pub(crate) fn mark_revealed(&mut self, submitter: &AccountId, index: usize) {
        if let Some(submission) = self
            .entries
            .get_mut(submitter)
            .and_then(|list| list.get_mut(index))
        {
            submission.revealed = true;
        }
    }

    /// Ordered `(commitment, locked_deposit)` pairs for `submitter`.
    pub fn list_for(&self, submitter: &AccountId) -> Vec<(CommitmentHash, Decimal)> {
        self.submissions_for(submitter)
            .iter()
            .map(|s| (s.commitment, s.locked_deposit))
            .collect()
    }

    /// Full submission records for `submitter`; empty if none.
    pub fn submissions_for(&self, submitter: &AccountId) -> &[Submission] {
        self.entries.get(submitter).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of deposits still held in escrow; `None` if it overflows.
    pub fn total_locked(&self) -> Option<Decimal> {
        self.entries
            .values()
            .flatten()
            .filter(|s| !s.revealed)
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.locked_deposit))
    }

    /// Number of submitters with at least one entry.
    pub fn submitter_count(&self) -> usize {
        self.entries.len()
    }
}
