//! Contribution and payment models
//!
//! A contribution is one member's due for one tour. Payments target a
//! contribution; several partial payments may accumulate against it,
//! and only CONFIRMED payments count toward settlement. The
//! contribution's status is always re-derived from the full confirmed
//! payment history rather than adjusted incrementally, so repeated
//! evaluation can never drift.
//!
//! CRITICAL: all money values are i64 (cents)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Settlement status of a contribution, derived from payment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionStatus {
    /// Nothing confirmed yet
    Pending,
    /// Some confirmed payments, below the total due
    Partial,
    /// Confirmed payments cover amount due plus penalties
    Paid,
}

/// One member's due amount for one tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    /// Unique contribution identifier (UUID)
    id: String,

    /// Owning tour
    tour_id: String,

    /// Member who owes this due
    member_id: String,

    /// Base due (the group's contribution amount at tour start)
    amount_due: i64,

    /// Accumulated late penalty; monotonic non-decreasing
    penalty_applied: i64,

    /// Derived settlement status
    status: ContributionStatus,

    /// Due date (the tour's end date)
    due_date: NaiveDate,
}

impl Contribution {
    /// Create a pending contribution with no penalty.
    pub fn new(tour_id: String, member_id: String, amount_due: i64, due_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tour_id,
            member_id,
            amount_due,
            penalty_applied: 0,
            status: ContributionStatus::Pending,
            due_date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn amount_due(&self) -> i64 {
        self.amount_due
    }

    pub fn penalty_applied(&self) -> i64 {
        self.penalty_applied
    }

    pub fn status(&self) -> ContributionStatus {
        self.status
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Base due plus accumulated penalty.
    pub fn total_due(&self) -> i64 {
        self.amount_due + self.penalty_applied
    }

    pub fn is_paid(&self) -> bool {
        self.status == ContributionStatus::Paid
    }

    /// Set the penalty recomputed by the sweep.
    ///
    /// The sweep recomputes from the fixed due-date baseline, so for a
    /// given day the value is stable under re-runs. `penalty_applied`
    /// is monotonic non-decreasing: a recomputation can never lower it.
    pub fn apply_penalty(&mut self, penalty: i64) {
        self.penalty_applied = self.penalty_applied.max(penalty);
    }

    /// Re-derive status from the confirmed total.
    ///
    /// Idempotent: feeding the same `total_paid` yields the same
    /// status, regardless of the order payments were recorded in.
    pub fn reconcile(&mut self, total_paid: i64) {
        self.status = if total_paid >= self.total_due() {
            ContributionStatus::Paid
        } else if total_paid > 0 {
            ContributionStatus::Partial
        } else {
            ContributionStatus::Pending
        };
    }
}

/// Gateway status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Awaiting gateway confirmation
    Pending,
    /// Confirmed; counts toward settlement
    Confirmed,
    /// Rejected by the gateway; never retried by the engine
    Failed,
}

/// A single (possibly partial) payment against a contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier (UUID)
    id: String,

    /// Target contribution
    contribution_id: String,

    /// Who actually paid (the member or an active proxy)
    payer_id: String,

    /// Paid amount (cents, > 0)
    amount: i64,

    /// Gateway status
    status: PaymentStatus,

    /// Reference assigned by the external payment provider
    external_ref: Option<String>,
}

impl Payment {
    /// Create a payment that is immediately confirmed.
    ///
    /// With no live gateway integration, payments confirm at recording
    /// time. A real deployment keeps them `Pending` until the provider
    /// callback arrives.
    pub fn new_confirmed(
        contribution_id: String,
        payer_id: String,
        amount: i64,
        external_ref: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            contribution_id,
            payer_id,
            amount,
            status: PaymentStatus::Confirmed,
            external_ref,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn contribution_id(&self) -> &str {
        &self.contribution_id
    }

    pub fn payer_id(&self) -> &str {
        &self.payer_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_contribution() -> Contribution {
        Contribution::new(
            "t1".to_string(),
            "alice".to_string(),
            100_000,
            NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
        )
    }

    #[test]
    fn test_new_contribution_is_pending_with_zero_penalty() {
        let c = make_contribution();
        assert_eq!(c.status(), ContributionStatus::Pending);
        assert_eq!(c.penalty_applied(), 0);
        assert_eq!(c.total_due(), 100_000);
    }

    #[test]
    fn test_reconcile_thresholds() {
        let mut c = make_contribution();

        c.reconcile(0);
        assert_eq!(c.status(), ContributionStatus::Pending);

        c.reconcile(40_000);
        assert_eq!(c.status(), ContributionStatus::Partial);

        c.reconcile(100_000);
        assert_eq!(c.status(), ContributionStatus::Paid);
    }

    #[test]
    fn test_penalty_raises_settlement_threshold() {
        let mut c = make_contribution();
        c.apply_penalty(5_000);
        assert_eq!(c.total_due(), 105_000);

        // Base amount alone no longer settles it
        c.reconcile(100_000);
        assert_eq!(c.status(), ContributionStatus::Partial);

        c.reconcile(105_000);
        assert_eq!(c.status(), ContributionStatus::Paid);
    }

    #[test]
    fn test_penalty_is_monotonic() {
        let mut c = make_contribution();
        c.apply_penalty(5_000);
        c.apply_penalty(3_000); // stale recomputation must not lower it
        assert_eq!(c.penalty_applied(), 5_000);

        c.apply_penalty(7_000);
        assert_eq!(c.penalty_applied(), 7_000);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut c = make_contribution();
        c.reconcile(60_000);
        c.reconcile(60_000);
        c.reconcile(60_000);
        assert_eq!(c.status(), ContributionStatus::Partial);
    }
}
