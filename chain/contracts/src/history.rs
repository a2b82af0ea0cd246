//! Commit/reveal history rebuilt from the event stream
//!
//! Off-chain observers only see `Publication` and `Revelation` events. This
//! module folds such a stream back into per-submitter records and checks
//! that each revelation really opens the commitment it claims to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;
use types::ids::AccountId;

use crate::digest::CommitmentHash;
use crate::events::ContractEvent;

/// Inconsistencies found while replaying an event stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Publication out of order for {submitter}: expected index {expected}, got {actual}")]
    IndexGap {
        submitter: AccountId,
        expected: usize,
        actual: usize,
    },

    #[error("Revelation for unknown commitment {submitter} #{index}")]
    UnknownCommitment { submitter: AccountId, index: usize },

    #[error("Duplicate revelation for {submitter} #{index}")]
    DuplicateRevelation { submitter: AccountId, index: usize },

    #[error("Revealed payload does not match commitment {submitter} #{index}")]
    PayloadMismatch { submitter: AccountId, index: usize },
}

/// One observed commitment and, once revealed, its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commitment: CommitmentHash,
    #[serde(with = "hex::serde")]
    pub revealed_payload: Vec<u8>,
    pub revealed: bool,
}

/// Per-submitter commit/reveal history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitHistory {
    records: BTreeMap<AccountId, Vec<CommitRecord>>,
}

impl CommitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from a complete event stream.
    pub fn replay<'a>(
        events: impl IntoIterator<Item = &'a ContractEvent>,
    ) -> Result<Self, ReplayError> {
        let mut history = Self::new();
        for event in events {
            history.apply(event)?;
        }
        Ok(history)
    }

    /// Fold a single event into the history.
    pub fn apply(&mut self, event: &ContractEvent) -> Result<(), ReplayError> {
        match event {
            ContractEvent::Publication(p) => {
                let list = self.records.entry(p.submitter).or_default();
                if p.index != list.len() {
                    warn!(submitter = %p.submitter, expected = list.len(), actual = p.index, "Publication index gap");
                    return Err(ReplayError::IndexGap {
                        submitter: p.submitter,
                        expected: list.len(),
                        actual: p.index,
                    });
                }
                list.push(CommitRecord {
                    commitment: p.commitment,
                    revealed_payload: Vec::new(),
                    revealed: false,
                });
            }
            ContractEvent::Revelation(r) => {
                let record = self
                    .records
                    .get_mut(&r.submitter)
                    .and_then(|list| list.get_mut(r.index))
                    .ok_or(ReplayError::UnknownCommitment {
                        submitter: r.submitter,
                        index: r.index,
                    })?;

                if record.revealed {
                    return Err(ReplayError::DuplicateRevelation {
                        submitter: r.submitter,
                        index: r.index,
                    });
                }
                if !record.commitment.matches(&r.payload) {
                    return Err(ReplayError::PayloadMismatch {
                        submitter: r.submitter,
                        index: r.index,
                    });
                }

                record.revealed = true;
                record.revealed_payload = r.payload.clone();
            }
        }
        Ok(())
    }

    pub fn records_for(&self, submitter: &AccountId) -> &[CommitRecord] {
        self.records.get(submitter).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The revealed payload at `(submitter, index)`, if any.
    pub fn revealed_payload(&self, submitter: &AccountId, index: usize) -> Option<&[u8]> {
        self.records_for(submitter)
            .get(index)
            .filter(|r| r.revealed)
            .map(|r| r.revealed_payload.as_slice())
    }

    /// Commitments not yet revealed, across all submitters.
    pub fn pending(&self) -> impl Iterator<Item = (AccountId, usize, CommitmentHash)> + '_ {
        self.records.iter().flat_map(|(submitter, list)| {
            list.iter()
                .enumerate()
                .filter(|(_, r)| !r.revealed)
                .map(move |(i, r)| (*submitter, i, r.commitment))
        })
    }
}
