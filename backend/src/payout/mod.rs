//! Payout processor
//!
//! Issues the single disbursement of a tour's collected funds to its
//! pinned beneficiary. The engine's most important invariant lives on
//! this path: at most one payout per tour, ever. The existence check
//! here gives the caller a clean `Conflict`; the store's unique index
//! on `tour_id` backs it up so the check-then-act sequence cannot be
//! raced into a double disbursement.

use crate::error::EngineError;
use crate::ledger;
use crate::models::payout::Payout;
use crate::models::store::LedgerStore;
use crate::models::tour::TourStatus;

/// Result of a successful payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutOutcome {
    pub payout_id: String,
    pub tour_id: String,
    pub group_id: String,
    pub beneficiary_id: String,
    /// Sum of confirmed payments across the tour's contributions
    pub amount: i64,
}

/// Issue the payout for a tour. Admin-only.
///
/// Eligible tours are `InProgress` or `Completed`; on success the tour
/// is driven through `Completed` into `Closed`, so the forward-only
/// state machine holds whichever state it started from. The payout is
/// confirmed immediately (stubbed gateway).
///
/// # Errors
/// - `NotFound` if the tour is missing
/// - `Forbidden` if the caller is not an Admin of the tour's group
/// - `Conflict` if the tour is not eligible, or a payout already
///   exists for it
pub fn process_payout(
    store: &mut LedgerStore,
    tour_id: &str,
    person_id: &str,
) -> Result<PayoutOutcome, EngineError> {
    let tour = store.get_tour(tour_id)?;
    let group_id = tour.group_id().to_string();
    let beneficiary_id = tour.beneficiary_id().to_string();
    let status = tour.status();

    store.require_admin(&group_id, person_id)?;

    if !matches!(status, TourStatus::InProgress | TourStatus::Completed) {
        return Err(EngineError::conflict(format!(
            "tour {} not completed (status {:?})",
            tour_id, status
        )));
    }
    if store.payout_for_tour(tour_id).is_some() {
        return Err(EngineError::conflict(format!(
            "payout already processed for tour {}",
            tour_id
        )));
    }

    let amount = ledger::total_collected(store, tour_id);

    let payout = Payout::new_confirmed(tour_id.to_string(), beneficiary_id.clone(), amount);
    let payout_id = payout.id().to_string();
    store.insert_payout(payout)?;

    let tour = store.get_tour_mut(tour_id)?;
    if tour.is_in_progress() {
        tour.complete()?;
    }
    tour.close()?;

    Ok(PayoutOutcome {
        payout_id,
        tour_id: tour_id.to_string(),
        group_id,
        beneficiary_id,
        amount,
    })
}
