//! Contract events
//!
//! Immutable records emitted once per successful commit or reveal. Together
//! they carry enough to rebuild the full commit/reveal history without
//! reading the registry.

use serde::{Deserialize, Serialize};
use types::ids::AccountId;

use crate::digest::CommitmentHash;

/// A commitment was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub submitter: AccountId,
    pub index: usize,
    pub commitment: CommitmentHash,
}

/// A commitment was revealed and its deposit released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revelation {
    pub submitter: AccountId,
    pub index: usize,
    /// Raw revealed bytes, hex-encoded on the wire.
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

impl Revelation {
    /// The payload as UTF-8, if it is valid text.
    pub fn payload_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Publication(Publication),
    Revelation(Revelation),
}

impl ContractEvent {
    pub fn submitter(&self) -> AccountId {
        match self {
            ContractEvent::Publication(e) => e.submitter,
            ContractEvent::Revelation(e) => e.submitter,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ContractEvent::Publication(e) => e.index,
            ContractEvent::Revelation(e) => e.index,
        }
    }
}

/// Synchronous notification hook, invoked once per successful operation.
pub trait EventSink {
    fn publish(&mut self, event: &ContractEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&ContractEvent),
{
    fn publish(&mut self, event: &ContractEvent) {
        self(event)
    }
}
