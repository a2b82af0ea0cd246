//! Shared security primitives for the escrow contract
//!
//! Provides the single-owner access check and the one-way submission gate.

use types::ids::AccountId;

use crate::errors::EscrowError;

/// Single-owner access control.
///
/// The owner is fixed at construction; there is no transfer operation.
#[derive(Debug, Clone)]
pub struct OwnerGuard {
    owner: AccountId,
}

impl OwnerGuard {
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &AccountId) -> bool {
        *caller == self.owner
    }

    /// Pass-through check used by every privileged operation.
    pub fn authorize(&self, caller: &AccountId) -> Result<(), EscrowError> {
        if !self.is_owner(caller) {
            return Err(EscrowError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }
}

/// One-way lock on new submissions.
///
/// Once locked, the gate never reopens. Existing submissions stay revealable.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    locked: bool,
}

impl SubmissionGate {
    /// Create a new open gate.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Close the gate. Returns `true` if this call changed the state.
    pub fn lock(&mut self) -> bool {
        let was_open = !self.locked;
        self.locked = true;
        was_open
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Reject when locked.
    pub fn check_open(&self) -> Result<(), EscrowError> {
        if self.locked {
            return Err(EscrowError::SubmissionsClosed);
        }
        Ok(())
    }
}
