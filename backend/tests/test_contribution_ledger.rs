//! Contribution ledger tests
//!
//! Payment recording, partial-payment aggregation, authorization and
//! the order-independence of status derivation.

use chrono::NaiveDate;

use tontine_ledger_core_rs::{
    ContributionStatus, EngineConfig, EngineError, FixedClock, Frequency, GroupConfig, MemberRole,
    RotationMode, RotationParams, TontineEngine,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Engine with a weekly group of admin + bob + carol, tours generated.
/// Returns (engine, group_id, first_tour_id).
fn setup() -> (TontineEngine, String, String) {
    let mut engine = TontineEngine::new(
        EngineConfig { rng_seed: 12345 },
        Box::new(FixedClock::new(date(2026, 1, 1))),
    );
    let group_id = engine
        .create_group(
            GroupConfig {
                contribution_amount: 100_000,
                frequency: Frequency::Weekly,
                rotation_mode: RotationMode::Sequential,
                total_tours: 3,
                start_date: date(2026, 1, 1),
                grace_period_days: 0,
                late_penalty_rate: None,
            },
            "admin",
        )
        .unwrap();
    engine
        .add_member(&group_id, "admin", "bob", MemberRole::Member)
        .unwrap();
    engine
        .add_member(&group_id, "admin", "carol", MemberRole::Member)
        .unwrap();
    let generated = engine
        .generate_tours(&group_id, "admin", &RotationParams::default())
        .unwrap();
    let first_tour_id = generated.first_tour_id;
    (engine, group_id, first_tour_id)
}

fn contribution_of(engine: &TontineEngine, tour_id: &str, member: &str) -> String {
    engine
        .store()
        .contributions_for_tour(tour_id)
        .iter()
        .find(|c| c.member_id() == member)
        .map(|c| c.id().to_string())
        .expect("contribution should exist")
}

// ============================================================================
// Recording Payments
// ============================================================================

#[test]
fn test_full_payment_settles_contribution() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let outcome = engine.record_payment("bob", &cid, 100_000, None).unwrap();
    assert_eq!(outcome.contribution_status, ContributionStatus::Paid);
    assert_eq!(outcome.total_paid, 100_000);
    assert!(outcome.settled());
}

#[test]
fn test_partial_payments_accumulate() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let outcome = engine.record_payment("bob", &cid, 30_000, None).unwrap();
    assert_eq!(outcome.contribution_status, ContributionStatus::Partial);

    let outcome = engine.record_payment("bob", &cid, 30_000, None).unwrap();
    assert_eq!(outcome.contribution_status, ContributionStatus::Partial);
    assert_eq!(outcome.total_paid, 60_000);

    let outcome = engine.record_payment("bob", &cid, 40_000, None).unwrap();
    assert_eq!(outcome.contribution_status, ContributionStatus::Paid);
    assert_eq!(outcome.total_paid, 100_000);
}

#[test]
fn test_overpayment_still_settles() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let outcome = engine.record_payment("bob", &cid, 150_000, None).unwrap();
    assert_eq!(outcome.contribution_status, ContributionStatus::Paid);
    assert_eq!(outcome.total_paid, 150_000);
}

#[test]
fn test_aggregation_is_order_independent() {
    // Same payment amounts in two different orders settle identically
    let amounts_a = [50_000, 30_000, 20_000];
    let amounts_b = [20_000, 50_000, 30_000];

    for amounts in [amounts_a, amounts_b] {
        let (mut engine, _, tour_id) = setup();
        let cid = contribution_of(&engine, &tour_id, "bob");

        let mut last_status = ContributionStatus::Pending;
        for amount in amounts {
            last_status = engine
                .record_payment("bob", &cid, amount, None)
                .unwrap()
                .contribution_status;
        }
        assert_eq!(last_status, ContributionStatus::Paid);
        assert_eq!(engine.store().confirmed_total(&cid), 100_000);
    }
}

// ============================================================================
// Authorization & Conflicts
// ============================================================================

#[test]
fn test_cannot_pay_someone_elses_contribution() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let err = engine.record_payment("carol", &cid, 100_000, None).unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }));

    // Nothing was recorded
    assert_eq!(engine.store().confirmed_total(&cid), 0);
}

#[test]
fn test_paying_a_paid_contribution_is_conflict() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");
    engine.record_payment("bob", &cid, 100_000, None).unwrap();

    let err = engine.record_payment("bob", &cid, 1_000, None).unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));
}

#[test]
fn test_nonpositive_amount_is_bad_request() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let err = engine.record_payment("bob", &cid, 0, None).unwrap_err();
    assert!(matches!(err, EngineError::BadRequest { .. }));
    let err = engine.record_payment("bob", &cid, -5_000, None).unwrap_err();
    assert!(matches!(err, EngineError::BadRequest { .. }));
}

#[test]
fn test_unknown_contribution_is_not_found() {
    let (mut engine, _, _) = setup();
    let err = engine
        .record_payment("bob", "no-such-contribution", 100_000, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

// ============================================================================
// Dues Materialization
// ============================================================================

#[test]
fn test_every_member_gets_exactly_one_due() {
    let (engine, _, tour_id) = setup();
    let contributions = engine.store().contributions_for_tour(&tour_id);
    assert_eq!(contributions.len(), 3);

    let mut members: Vec<&str> = contributions.iter().map(|c| c.member_id()).collect();
    members.sort_unstable();
    assert_eq!(members, vec!["admin", "bob", "carol"]);
}

#[test]
fn test_external_ref_is_preserved() {
    let (mut engine, _, tour_id) = setup();
    let cid = contribution_of(&engine, &tour_id, "bob");

    let outcome = engine
        .record_payment("bob", &cid, 100_000, Some("MOMO-123".to_string()))
        .unwrap();
    let payment = engine.store().get_payment(&outcome.payment_id).unwrap();
    assert_eq!(payment.external_ref(), Some("MOMO-123"));
    assert!(payment.is_confirmed());
}
