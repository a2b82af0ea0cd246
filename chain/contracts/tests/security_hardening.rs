//! Security Hardening Tests
//!
//! Adversarial testing of the escrow contract:
//! - Permission escalation
//! - Double reveal / replayed reveal
//! - Bounds probing
//! - Arithmetic overflow
//! - Atomicity of rejected operations
//! - Fuzz testing (proptest)

use bankshot::escrow::Bankshot;
use bankshot::{digest, EscrowConfig, EscrowError, Vault, CONTRACT_ABI_VERSION};
use rust_decimal::Decimal;
use types::ids::AccountId;

// ═══════════════════════════════════════════════════════════════════
// Permission Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_non_owner_cannot_configure() {
    let (mut contract, _vault, _owner) = setup();
    let eve = AccountId::new();

    for result in [
        contract.set_fee_amount(eve, Decimal::ZERO),
        contract.set_min_deposit(eve, Decimal::ZERO),
        contract.set_max_deposit(eve, Decimal::from(1_000)),
        contract.lock_submissions(eve),
    ] {
        assert_eq!(result, Err(EscrowError::NotOwner { caller: eve }));
    }
    assert_eq!(*contract.config(), config());
    assert!(!contract.submissions_locked());
}

#[test]
fn test_non_owner_cannot_withdraw() {
    let (mut contract, mut vault, _owner) = setup();
    let user = funded(&mut vault, 10);
    contract
        .submit(&mut vault, user, digest(b"x"), Decimal::new(7, 2))
        .unwrap();

    let result = contract.withdraw(&mut vault, user, Decimal::new(2, 2));
    assert_eq!(result, Err(EscrowError::NotOwner { caller: user }));
    assert_eq!(contract.vig_available(), Decimal::new(2, 2));
}

#[test]
fn test_submitter_cannot_reveal_for_someone_else() {
    let (mut contract, mut vault, _owner) = setup();
    let alice = funded(&mut vault, 10);
    let mallory = funded(&mut vault, 10);
    contract
        .submit(&mut vault, alice, digest(b"alice's secret"), Decimal::new(7, 2))
        .unwrap();
    contract
        .submit(&mut vault, mallory, digest(b"junk"), Decimal::new(7, 2))
        .unwrap();

    // Mallory knows Alice's payload but only owns index 0 of her own list.
    let result = contract.reveal(&mut vault, mallory, 0, b"alice's secret");
    assert_eq!(result, Err(EscrowError::InvalidReveal));
    assert!(!contract.is_revealed(&alice, 0));
}

// ═══════════════════════════════════════════════════════════════════
// Replay Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_repeated_reveal_pays_once() {
    let (mut contract, mut vault, _owner) = setup();
    let user = funded(&mut vault, 10);
    contract
        .submit(&mut vault, user, digest(b"p"), Decimal::new(50, 2))
        .unwrap();

    contract.reveal(&mut vault, user, 0, b"p").unwrap();
    let after_first = vault.balance(&user);
    for _ in 0..5 {
        assert!(matches!(
            contract.reveal(&mut vault, user, 0, b"p"),
            Err(EscrowError::AlreadyRevealed { .. })
        ));
    }
    assert_eq!(vault.balance(&user), after_first);
}

#[test]
fn test_same_commitment_twice_gets_two_indices() {
    let (mut contract, mut vault, _owner) = setup();
    let user = funded(&mut vault, 10);
    let h = digest(b"again");
    contract.submit(&mut vault, user, h, Decimal::new(7, 2)).unwrap();
    contract.submit(&mut vault, user, h, Decimal::new(7, 2)).unwrap();

    contract.reveal(&mut vault, user, 0, b"again").unwrap();
    assert!(!contract.is_revealed(&user, 1));
    contract.reveal(&mut vault, user, 1, b"again").unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Bounds Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_no_payment_rejected() {
    let (mut contract, mut vault, _owner) = setup();
    let user = funded(&mut vault, 10);
    let result = contract.submit(&mut vault, user, digest(b"x"), Decimal::ZERO);
    assert!(matches!(result, Err(EscrowError::InsufficientFunds { .. })));
    assert_eq!(result.unwrap_err().code(), "INSUFFICIENT_FUNDS");
}

#[test]
fn test_deposit_only_rejected() {
    let (mut contract, mut vault, _owner) = setup();
    let user = funded(&mut vault, 10);
    // Exactly the minimum deposit, nothing for the vig.
    let result = contract.submit(&mut vault, user, digest(b"x"), Decimal::new(5, 2));
    assert!(matches!(result, Err(EscrowError::InsufficientFunds { .. })));
}

#[test]
fn test_zero_fee_zero_min_accepts_fee_only_submission() {
    let owner = AccountId::new();
    let mut contract = Bankshot::new(owner, EscrowConfig::default());
    let mut vault = Vault::new();
    let user = AccountId::new();

    let event = contract
        .submit(&mut vault, user, digest(b"free"), Decimal::ZERO)
        .unwrap();
    assert_eq!(event.index(), 0);
    contract.reveal(&mut vault, user, 0, b"free").unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Overflow Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_vig_overflow_rejected_without_side_effects() {
    let owner = AccountId::new();
    let config = EscrowConfig {
        fee_amount: Decimal::MAX,
        min_deposit: Decimal::ZERO,
        max_deposit: Decimal::ONE,
    };
    let mut contract = Bankshot::new(owner, config);
    let mut vault = Vault::new();
    let user = AccountId::new();
    vault.fund(user, Decimal::MAX).unwrap();

    contract
        .submit(&mut vault, user, digest(b"a"), Decimal::MAX)
        .unwrap();

    let other = AccountId::new();
    vault.fund(other, Decimal::MAX).unwrap();
    let result = contract.submit(&mut vault, other, digest(b"b"), Decimal::MAX);
    assert_eq!(result, Err(EscrowError::Overflow));
    assert_eq!(vault.balance(&other), Decimal::MAX);
    assert_eq!(contract.submission_count(&other), 0);
    assert_eq!(contract.total_accrued(), Decimal::MAX);
}

#[test]
fn test_underpaying_huge_fee_rejected_cleanly() {
    let (mut contract, mut vault, owner) = setup();
    let user = funded(&mut vault, 10);
    contract.set_fee_amount(owner, Decimal::MAX).unwrap();
    contract.set_min_deposit(owner, Decimal::ONE).unwrap();
    assert_eq!(contract.min_payable(), Decimal::MAX);

    let result = contract.submit(&mut vault, user, digest(b"x"), Decimal::ZERO);
    assert_eq!(
        result,
        Err(EscrowError::InsufficientFunds {
            attached: Decimal::ZERO,
            required: Decimal::MAX,
        })
    );
    assert_eq!(contract.submission_count(&user), 0);
    assert_eq!(vault.balance(&user), Decimal::from(10));
}

#[test]
fn test_custody_totals_report_overflow() {
    let owner = AccountId::new();
    let config = EscrowConfig {
        fee_amount: Decimal::ZERO,
        min_deposit: Decimal::ZERO,
        max_deposit: Decimal::MAX,
    };
    let mut contract = Bankshot::new(owner, config);
    let mut vault = Vault::new();
    let alice = AccountId::new();
    let bob = AccountId::new();
    vault.fund(alice, Decimal::MAX).unwrap();
    contract.submit(&mut vault, alice, digest(b"a"), Decimal::MAX).unwrap();
    assert_eq!(contract.expected_custody(), Some(Decimal::MAX));

    // Custody is already full, so the host refuses the second deposit.
    vault.fund(bob, Decimal::MAX).unwrap();
    assert_eq!(vault.total_supply(), None);
    assert!(matches!(
        contract.submit(&mut vault, bob, digest(b"b"), Decimal::MAX),
        Err(EscrowError::Transfer(_))
    ));
    assert_eq!(contract.expected_custody(), Some(Decimal::MAX));
}

// ═══════════════════════════════════════════════════════════════════
// Atomicity Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_rejected_submit_leaves_no_trace() {
    let (mut contract, mut vault, owner) = setup();
    let user = funded(&mut vault, 10);
    contract.lock_submissions(owner).unwrap();

    let _ = contract.submit(&mut vault, user, digest(b"x"), Decimal::new(7, 2));
    assert_eq!(contract.submission_count(&user), 0);
    assert_eq!(contract.total_accrued(), Decimal::ZERO);
    assert_eq!(vault.balance(&user), Decimal::from(10));
    assert_eq!(vault.custody(), Decimal::ZERO);
    assert!(contract.events().is_empty());
}

#[test]
fn test_negative_withdraw_rejected() {
    let (mut contract, mut vault, owner) = setup();
    let result = contract.withdraw(&mut vault, owner, Decimal::from(-1));
    assert_eq!(result, Err(EscrowError::InvalidAmount { amount: Decimal::from(-1) }));
    assert_eq!(contract.total_withdrawn(), Decimal::ZERO);
}

// ═══════════════════════════════════════════════════════════════════
// ABI
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_contract_abi_version_frozen() {
    assert_eq!(CONTRACT_ABI_VERSION, "1.0.0");
}

// ═══════════════════════════════════════════════════════════════════
// Fuzz Tests (Proptest)
// ═══════════════════════════════════════════════════════════════════

mod fuzz {
    use super::*;
    use proptest::prelude::*;

    /// Attached values in hundredths, spanning below-min through oversize.
    fn attached_value() -> impl Strategy<Value = Decimal> {
        (0i64..=150).prop_map(|cents| Decimal::new(cents, 2))
    }

    #[derive(Debug, Clone)]
    enum Op {
        Submit { user: usize, value: Decimal, payload: u8 },
        Reveal { user: usize, index: usize, payload: u8 },
        Withdraw { amount: Decimal },
        SetFee { fee: Decimal },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, attached_value(), any::<u8>())
                .prop_map(|(user, value, payload)| Op::Submit { user, value, payload }),
            (0usize..3, 0usize..6, any::<u8>())
                .prop_map(|(user, index, payload)| Op::Reveal { user, index, payload }),
            (0i64..=10).prop_map(|c| Op::Withdraw { amount: Decimal::new(c, 2) }),
            (0i64..=5).prop_map(|c| Op::SetFee { fee: Decimal::new(c, 2) }),
        ]
    }

    proptest! {
        /// Invariant: indices are dense per submitter and rejected submits
        /// never grow the registry.
        #[test]
        fn fuzz_dense_indices(values in prop::collection::vec(attached_value(), 1..30)) {
            let (mut contract, mut vault, _owner) = setup();
            let user = funded(&mut vault, 1_000);

            for (i, value) in values.iter().enumerate() {
                let before = contract.submission_count(&user);
                let payload = i.to_le_bytes();
                match contract.submit(&mut vault, user, digest(&payload), *value) {
                    Ok(event) => {
                        prop_assert_eq!(event.index(), before);
                        prop_assert_eq!(contract.submission_count(&user), before + 1);
                    }
                    Err(_) => prop_assert_eq!(contract.submission_count(&user), before),
                }
            }
        }

        /// Invariant: a reveal with the wrong payload never closes an entry.
        #[test]
        fn fuzz_wrong_reveal_rejected(secret in any::<Vec<u8>>(), guess in any::<Vec<u8>>()) {
            prop_assume!(secret != guess);
            let (mut contract, mut vault, _owner) = setup();
            let user = funded(&mut vault, 10);
            contract.submit(&mut vault, user, digest(&secret), Decimal::new(7, 2)).unwrap();

            prop_assert_eq!(
                contract.reveal(&mut vault, user, 0, &guess),
                Err(EscrowError::InvalidReveal)
            );
            prop_assert!(!contract.is_revealed(&user, 0));
        }

        /// Invariant: after any operation sequence, withdrawn <= accrued,
        /// accrued equals the sum of fees at submit time, and custody
        /// equals open deposits plus unwithdrawn vig.
        #[test]
        fn fuzz_accounting_conservation(ops in prop::collection::vec(op(), 1..60)) {
            let (mut contract, mut vault, owner) = setup();
            let users: Vec<AccountId> = (0..3).map(|_| funded(&mut vault, 1_000)).collect();
            let supply = vault.total_supply();
            let mut expected_accrued = Decimal::ZERO;

            for op in ops {
                match op {
                    Op::Submit { user, value, payload } => {
                        let fee = contract.fee_amount();
                        if contract.submit(&mut vault, users[user], digest(&[payload]), value).is_ok() {
                            expected_accrued += fee;
                        }
                    }
                    Op::Reveal { user, index, payload } => {
                        let _ = contract.reveal(&mut vault, users[user], index, &[payload]);
                    }
                    Op::Withdraw { amount } => {
                        let _ = contract.withdraw(&mut vault, owner, amount);
                    }
                    Op::SetFee { fee } => {
                        contract.set_fee_amount(owner, fee).unwrap();
                    }
                }

                prop_assert!(contract.total_withdrawn() <= contract.total_accrued());
                prop_assert_eq!(contract.total_accrued(), expected_accrued);
                prop_assert_eq!(contract.expected_custody(), Some(vault.custody()));
                prop_assert_eq!(vault.total_supply(), supply);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn config() -> EscrowConfig {
    EscrowConfig {
        fee_amount: Decimal::new(2, 2),
        min_deposit: Decimal::new(5, 2),
        max_deposit: Decimal::ONE,
    }
}

fn setup() -> (Bankshot, Vault, AccountId) {
    let owner = AccountId::new();
    (Bankshot::new(owner, config()), Vault::new(), owner)
}

fn funded(vault: &mut Vault, amount: i64) -> AccountId {
    let acc = AccountId::new();
    vault.fund(acc, Decimal::from(amount)).unwrap();
    acc
}
