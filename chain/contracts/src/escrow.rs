//! Bankshot — the commit-reveal escrow contract
//!
//! Ties the registry, deposit policy, vig ledger, owner guard and submission
//! gate into the operations callers see.
//!
//! Every state-changing operation is a unit of work:
//! 1. Validate all preconditions against current state (no writes)
//! 2. Stage the resulting values (`*Plan`)
//! 3. Move value through the host ledger
//! 4. Commit the staged values, which cannot fail
//!
//! A failure in steps 1–3 returns before anything is written, so callers
//! observe either the full effect or none of it.

use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, info, warn};
use types::ids::AccountId;

use crate::config::EscrowConfig;
use crate::digest::CommitmentHash;
use crate::errors::EscrowError;
use crate::events::{ContractEvent, EventSink, Publication, Revelation};
use crate::policy::check_deposit;
use crate::registry::{Registry, Submission};
use crate::security::{OwnerGuard, SubmissionGate};
use crate::vault::ValueTransfer;
use crate::vig::VigLedger;

/// Staged effect of a submit.
struct SubmitPlan {
    index: usize,
    deposit: Decimal,
    total_accrued: Decimal,
}

/// Staged effect of a reveal.
struct RevealPlan {
    deposit: Decimal,
}

/// Staged effect of a vig withdrawal.
struct WithdrawPlan {
    total_withdrawn: Decimal,
}

/// Escrow contract state.
pub struct Bankshot {
    owner: OwnerGuard,
    config: EscrowConfig,
    gate: SubmissionGate,
    registry: Registry,
    vig: VigLedger,
    /// Emitted events log (append-only until drained)
    events: Vec<ContractEvent>,
    sink: Option<Box<dyn EventSink + Send>>,
}

impl fmt::Debug for Bankshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bankshot")
            .field("owner", &self.owner.owner())
            .field("config", &self.config)
            .field("locked", &self.gate.is_locked())
            .field("vig", &self.vig)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Bankshot {
    /// Create the contract. `owner` is fixed for its lifetime.
    pub fn new(owner: AccountId, config: EscrowConfig) -> Self {
        info!(
            %owner,
            fee_amount = %config.fee_amount,
            min_deposit = %config.min_deposit,
            max_deposit = %config.max_deposit,
            "Bankshot deployed"
        );
        if !config.bounds_consistent() {
            warn!(
                min_deposit = %config.min_deposit,
                max_deposit = %config.max_deposit,
                "Deposit bounds are inverted; every submission will be rejected"
            );
        }

        Self {
            owner: OwnerGuard::new(owner),
            config,
            gate: SubmissionGate::new(),
            registry: Registry::new(),
            vig: VigLedger::new(),
            events: Vec::new(),
            sink: None,
        }
    }

    /// Deploy with a fee and minimum deposit; the maximum takes its default.
    pub fn deploy(owner: AccountId, fee_amount: Decimal, min_deposit: Decimal) -> Self {
        Self::new(owner, EscrowConfig::with_fee_and_min(fee_amount, min_deposit))
    }

    /// Install a hook that sees every event as it is emitted.
    pub fn set_event_sink(&mut self, sink: impl EventSink + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    // ───────────────────────── Submit ─────────────────────────

    /// Publish a commitment, locking `attached - fee` as deposit.
    ///
    /// Emits `Publication` carrying the new per-submitter index.
    pub fn submit(
        &mut self,
        ledger: &mut impl ValueTransfer,
        caller: AccountId,
        commitment: CommitmentHash,
        attached: Decimal,
    ) -> Result<ContractEvent, EscrowError> {
        let plan = self
            .plan_submit(&caller, attached)
            .and_then(|plan| {
                ledger.collect(&caller, attached)?;
                Ok(plan)
            })
            .inspect_err(|e| reject("submit", &caller, e))?;

        let index = self.registry.append(caller, commitment, plan.deposit);
        debug_assert_eq!(index, plan.index);
        self.vig.commit_accrual(plan.total_accrued);

        info!(
            submitter = %caller,
            index,
            %commitment,
            deposit = %plan.deposit,
            "Commitment published"
        );

        Ok(self.emit(ContractEvent::Publication(Publication {
            submitter: caller,
            index,
            commitment,
        })))
    }

    fn plan_submit(&self, caller: &AccountId, attached: Decimal) -> Result<SubmitPlan, EscrowError> {
        self.gate.check_open()?;
        if attached < Decimal::ZERO {
            return Err(EscrowError::InvalidAmount { amount: attached });
        }
        let split = check_deposit(&self.config, attached)?;
        let total_accrued = self.vig.accrual_after(split.fee)?;

        Ok(SubmitPlan {
            index: self.registry.next_index(caller),
            deposit: split.deposit,
            total_accrued,
        })
    }

    // ───────────────────────── Reveal ─────────────────────────

    /// Reveal the payload behind `caller`'s submission at `index` and
    /// release its deposit back to `caller`.
    pub fn reveal(
        &mut self,
        ledger: &mut impl ValueTransfer,
        caller: AccountId,
        index: usize,
        payload: &[u8],
    ) -> Result<ContractEvent, EscrowError> {
        let plan = self
            .plan_reveal(&caller, index, payload)
            .and_then(|plan| {
                ledger.pay(&caller, plan.deposit)?;
                Ok(plan)
            })
            .inspect_err(|e| reject("reveal", &caller, e))?;

        self.registry.mark_revealed(&caller, index);

        info!(
            submitter = %caller,
            index,
            released = %plan.deposit,
            "Commitment revealed"
        );

        Ok(self.emit(ContractEvent::Revelation(Revelation {
            submitter: caller,
            index,
            payload: payload.to_vec(),
        })))
    }

    fn plan_reveal(
        &self,
        caller: &AccountId,
        index: usize,
        payload: &[u8],
    ) -> Result<RevealPlan, EscrowError> {
        let submission = self.registry.get_unrevealed(caller, index)?;
        if !submission.commitment.matches(payload) {
            return Err(EscrowError::InvalidReveal);
        }
        Ok(RevealPlan {
            deposit: submission.locked_deposit,
        })
    }

    // ───────────────────────── Owner Configuration ─────────────────────────

    /// Set the per-submission vig. Owner-only.
    pub fn set_fee_amount(&mut self, caller: AccountId, value: Decimal) -> Result<(), EscrowError> {
        self.write_config(caller, "fee_amount", value, |c| &mut c.fee_amount)
    }

    /// Set the minimum deposit. Owner-only; not checked against the maximum.
    pub fn set_min_deposit(&mut self, caller: AccountId, value: Decimal) -> Result<(), EscrowError> {
        self.write_config(caller, "min_deposit", value, |c| &mut c.min_deposit)
    }

    /// Set the maximum deposit. Owner-only; not checked against the minimum.
    pub fn set_max_deposit(&mut self, caller: AccountId, value: Decimal) -> Result<(), EscrowError> {
        self.write_config(caller, "max_deposit", value, |c| &mut c.max_deposit)
    }

    fn write_config(
        &mut self,
        caller: AccountId,
        field: &'static str,
        value: Decimal,
        select: impl FnOnce(&mut EscrowConfig) -> &mut Decimal,
    ) -> Result<(), EscrowError> {
        self.owner
            .authorize(&caller)
            .and_then(|()| {
                if value < Decimal::ZERO {
                    return Err(EscrowError::InvalidAmount { amount: value });
                }
                Ok(())
            })
            .inspect_err(|e| reject(field, &caller, e))?;

        let slot = select(&mut self.config);
        let previous = *slot;
        *slot = value;

        info!(field, %previous, %value, "Config updated");
        if !self.config.bounds_consistent() {
            warn!(
                min_deposit = %self.config.min_deposit,
                max_deposit = %self.config.max_deposit,
                "Deposit bounds are inverted; every submission will be rejected"
            );
        }
        Ok(())
    }

    // ───────────────────────── Submission Gate ─────────────────────────

    /// Permanently stop accepting new submissions. Owner-only.
    pub fn lock_submissions(&mut self, caller: AccountId) -> Result<(), EscrowError> {
        self.owner
            .authorize(&caller)
            .inspect_err(|e| reject("lock_submissions", &caller, e))?;

        if self.gate.lock() {
            info!("Submissions locked");
        }
        Ok(())
    }

    // ───────────────────────── Vig Withdrawal ─────────────────────────

    /// Pay `amount` of accrued vig to the owner. Owner-only.
    pub fn withdraw(
        &mut self,
        ledger: &mut impl ValueTransfer,
        caller: AccountId,
        amount: Decimal,
    ) -> Result<(), EscrowError> {
        let plan = self
            .plan_withdraw(&caller, amount)
            .and_then(|plan| {
                ledger.pay(&caller, amount)?;
                Ok(plan)
            })
            .inspect_err(|e| reject("withdraw", &caller, e))?;

        self.vig.commit_withdrawal(plan.total_withdrawn);

        info!(
            %amount,
            total_withdrawn = %self.vig.total_withdrawn(),
            available = %self.vig.available(),
            "Vig withdrawn"
        );
        Ok(())
    }

    fn plan_withdraw(&self, caller: &AccountId, amount: Decimal) -> Result<WithdrawPlan, EscrowError> {
        self.owner.authorize(caller)?;
        let total_withdrawn = self.vig.withdrawal_after(amount)?;
        Ok(WithdrawPlan { total_withdrawn })
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Ordered `(commitment, locked_deposit)` pairs for `submitter`.
    pub fn list_for(&self, submitter: &AccountId) -> Vec<(CommitmentHash, Decimal)> {
        debug!(%submitter, "Listing submissions");
        self.registry.list_for(submitter)
    }

    pub fn submission(&self, submitter: &AccountId, index: usize) -> Option<&Submission> {
        self.registry.get(submitter, index)
    }

    pub fn submission_count(&self, submitter: &AccountId) -> usize {
        self.registry.next_index(submitter)
    }

    pub fn is_revealed(&self, submitter: &AccountId, index: usize) -> bool {
        self.submission(submitter, index).is_some_and(|s| s.revealed)
    }

    /// Smallest value a submit must attach: fee plus minimum deposit.
    pub fn min_payable(&self) -> Decimal {
        self.config.min_payable()
    }

    pub fn owner(&self) -> AccountId {
        self.owner.owner()
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    pub fn fee_amount(&self) -> Decimal {
        self.config.fee_amount
    }

    pub fn min_deposit(&self) -> Decimal {
        self.config.min_deposit
    }

    pub fn max_deposit(&self) -> Decimal {
        self.config.max_deposit
    }

    pub fn submissions_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn total_accrued(&self) -> Decimal {
        self.vig.total_accrued()
    }

    pub fn total_withdrawn(&self) -> Decimal {
        self.vig.total_withdrawn()
    }

    /// Vig the owner may still withdraw.
    pub fn vig_available(&self) -> Decimal {
        self.vig.available()
    }

    /// Value the contract must hold: open deposits plus unwithdrawn vig.
    /// `None` if the total does not fit in a `Decimal`.
    pub fn expected_custody(&self) -> Option<Decimal> {
        self.registry
            .total_locked()?
            .checked_add(self.vig.available())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(&event);
        }
        self.events.push(event.clone());
        event
    }
}

fn reject(op: &'static str, caller: &AccountId, err: &EscrowError) {
    warn!(op, %caller, code = err.code(), error = %err, "Operation rejected");
}
