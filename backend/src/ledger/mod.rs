//! Contribution ledger
//!
//! Materializes per-member dues when a tour starts and reconciles
//! incoming payments against them. Settlement is always re-derived
//! from the full confirmed-payment history (never adjusted
//! incrementally), so recording the same payments in any order yields
//! the same final status.

use chrono::NaiveDate;

use crate::delegation;
use crate::error::EngineError;
use crate::models::contribution::{Contribution, ContributionStatus, Payment};
use crate::models::store::LedgerStore;

/// Result of recording one payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub payment_id: String,
    pub contribution_id: String,
    /// Member whose due was paid (not necessarily the payer)
    pub member_id: String,
    pub contribution_status: ContributionStatus,
    /// Sum of all confirmed payments after this one
    pub total_paid: i64,
    /// Amount due plus penalty at reconciliation time
    pub total_due: i64,
}

impl PaymentOutcome {
    /// True if this payment settled the contribution.
    pub fn settled(&self) -> bool {
        self.contribution_status == ContributionStatus::Paid
    }
}

/// Create one pending due per current member of the tour's group.
///
/// Dues carry the group's contribution amount and fall due on the
/// tour's end date. Idempotent per (tour, member): re-running for a
/// tour never duplicates an existing due.
///
/// # Errors
/// `NotFound` if the tour or its group is missing.
pub fn materialize_dues(
    store: &mut LedgerStore,
    tour_id: &str,
) -> Result<Vec<String>, EngineError> {
    let tour = store.get_tour(tour_id)?;
    let group_id = tour.group_id().to_string();
    let due_date = tour.end_date();
    let amount_due = store.get_group(&group_id)?.contribution_amount();

    let mut created = Vec::new();
    for member_id in store.member_ids(&group_id) {
        if store.has_contribution(tour_id, &member_id) {
            continue;
        }
        let contribution =
            Contribution::new(tour_id.to_string(), member_id, amount_due, due_date);
        created.push(contribution.id().to_string());
        store.insert_contribution(contribution);
    }
    Ok(created)
}

/// Record a payment against a contribution and reconcile its status.
///
/// The payer must be the contribution's member or hold an active
/// delegation from that member; the delegation only gates access, the
/// ledger performs the mutation. With no live gateway the payment is
/// confirmed immediately.
///
/// # Errors
/// - `NotFound` if the contribution (or its tour/group) is missing
/// - `Forbidden` if the payer is neither the member nor an active proxy
/// - `Conflict` if the contribution is already paid
/// - `BadRequest` if the amount is not positive
pub fn record_payment(
    store: &mut LedgerStore,
    today: NaiveDate,
    payer_id: &str,
    contribution_id: &str,
    amount: i64,
    external_ref: Option<String>,
) -> Result<PaymentOutcome, EngineError> {
    let contribution = store.get_contribution(contribution_id)?;
    let member_id = contribution.member_id().to_string();
    let tour_id = contribution.tour_id().to_string();

    if contribution.is_paid() {
        return Err(EngineError::conflict(format!(
            "contribution {} is already paid",
            contribution_id
        )));
    }
    if amount <= 0 {
        return Err(EngineError::bad_request("payment amount must be positive"));
    }

    if payer_id != member_id {
        let group_id = store.get_tour(&tour_id)?.group_id().to_string();
        if !delegation::is_active_proxy(store, &group_id, payer_id, &member_id, today) {
            return Err(EngineError::forbidden(format!(
                "{} may not pay the contribution of {}",
                payer_id, member_id
            )));
        }
    }

    let payment = Payment::new_confirmed(
        contribution_id.to_string(),
        payer_id.to_string(),
        amount,
        external_ref,
    );
    let payment_id = payment.id().to_string();
    store.insert_payment(payment);

    // Re-derive from the full history, not from this payment alone
    let total_paid = store.confirmed_total(contribution_id);
    let contribution = store.get_contribution_mut(contribution_id)?;
    contribution.reconcile(total_paid);
    let total_due = contribution.total_due();
    let status = contribution.status();

    Ok(PaymentOutcome {
        payment_id,
        contribution_id: contribution_id.to_string(),
        member_id,
        contribution_status: status,
        total_paid,
        total_due,
    })
}

/// Sum of confirmed payments across all of a tour's contributions.
pub fn total_collected(store: &LedgerStore, tour_id: &str) -> i64 {
    store
        .contributions_for_tour(tour_id)
        .iter()
        .map(|c| store.confirmed_total(c.id()))
        .sum()
}
