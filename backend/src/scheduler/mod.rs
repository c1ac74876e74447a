//! Tour scheduler
//!
//! Generates the fixed rotation of tours for a group and advances tour
//! status. Date windows are contiguous: each tour spans exactly one
//! period (7/14/30 days by frequency) and the next tour starts the day
//! after the previous one ends. Beneficiaries wrap around the member
//! roster when a group schedules more tours than it has members.

use crate::error::EngineError;
use crate::ledger;
use crate::models::store::LedgerStore;
use crate::models::tour::Tour;
use crate::rng::RngManager;
use crate::rotation::{self, RotationParams};

/// Result of generating a group's rotation.
#[derive(Debug, Clone)]
pub struct GeneratedTours {
    /// Tour IDs in index order
    pub tour_ids: Vec<String>,
    /// Planned beneficiary order (length = member count)
    pub beneficiary_order: Vec<String>,
    /// The first tour, already in progress
    pub first_tour_id: String,
    /// Dues materialized for the first tour
    pub first_tour_contribution_ids: Vec<String>,
}

/// Result of starting or completing a single tour.
#[derive(Debug, Clone)]
pub struct TourTransition {
    pub tour_id: String,
    pub group_id: String,
    pub index_in_group: u32,
    pub beneficiary_id: String,
    /// Dues materialized by a start transition (empty for complete)
    pub contribution_ids: Vec<String>,
}

/// Generate the full rotation for a group.
///
/// The caller must be an Admin. The first tour starts immediately and
/// its dues are materialized; the rest wait in `Pending`.
///
/// # Errors
/// - `NotFound` if the group is missing
/// - `Forbidden` if the caller is not an Admin
/// - `Conflict` if any tour already exists for the group
/// - `InvalidState` if the group has no members
/// - `BadRequest` for malformed custom orders
pub fn generate_tours(
    store: &mut LedgerStore,
    rng: &mut RngManager,
    group_id: &str,
    person_id: &str,
    params: &RotationParams,
) -> Result<GeneratedTours, EngineError> {
    let group = store.get_group(group_id)?;
    let rotation_mode = group.rotation_mode();
    let total_tours = group.total_tours();
    let period_days = group.frequency().period_days();
    let first_start = group.start_date();
    let contribution_amount = group.contribution_amount();

    store.require_admin(group_id, person_id)?;

    if store.group_has_tours(group_id) {
        return Err(EngineError::conflict(format!(
            "tours already generated for group {}",
            group_id
        )));
    }

    let members = store.member_ids(group_id);
    if members.is_empty() {
        return Err(EngineError::invalid_state(format!(
            "group {} has no members",
            group_id
        )));
    }

    let order = rotation::plan_rotation(&members, rotation_mode, params, rng)?;
    let expected_amount = contribution_amount * members.len() as i64;

    let mut tour_ids = Vec::with_capacity(total_tours as usize);
    let mut start_date = first_start;
    for i in 0..total_tours {
        let end_date = start_date + chrono::Duration::days(period_days - 1);
        let beneficiary = order[i as usize % order.len()].clone();
        let mut tour = Tour::new(
            group_id.to_string(),
            i + 1,
            beneficiary,
            start_date,
            end_date,
            expected_amount,
        );
        if i == 0 {
            tour.start()?;
        }
        tour_ids.push(tour.id().to_string());
        store.insert_tour(tour);
        start_date = end_date + chrono::Duration::days(1);
    }

    let first_tour_id = tour_ids[0].clone();
    let first_tour_contribution_ids = ledger::materialize_dues(store, &first_tour_id)?;

    Ok(GeneratedTours {
        tour_ids,
        beneficiary_order: order,
        first_tour_id,
        first_tour_contribution_ids,
    })
}

/// Start a pending tour and materialize its dues. Admin-only.
///
/// # Errors
/// `NotFound`, `Forbidden`, or `Conflict` if the tour is not `Pending`.
pub fn start_tour(
    store: &mut LedgerStore,
    tour_id: &str,
    person_id: &str,
) -> Result<TourTransition, EngineError> {
    let tour = store.get_tour(tour_id)?;
    let group_id = tour.group_id().to_string();
    store.require_admin(&group_id, person_id)?;

    let tour = store.get_tour_mut(tour_id)?;
    tour.start()?;
    let index_in_group = tour.index_in_group();
    let beneficiary_id = tour.beneficiary_id().to_string();

    let contribution_ids = ledger::materialize_dues(store, tour_id)?;

    Ok(TourTransition {
        tour_id: tour_id.to_string(),
        group_id,
        index_in_group,
        beneficiary_id,
        contribution_ids,
    })
}

/// Complete an in-progress tour. Admin-only.
///
/// Completion does not trigger a payout; that is a separate explicit
/// action.
///
/// # Errors
/// `NotFound`, `Forbidden`, or `Conflict` if the tour is not
/// `InProgress`.
pub fn complete_tour(
    store: &mut LedgerStore,
    tour_id: &str,
    person_id: &str,
) -> Result<TourTransition, EngineError> {
    let tour = store.get_tour(tour_id)?;
    let group_id = tour.group_id().to_string();
    store.require_admin(&group_id, person_id)?;

    let tour = store.get_tour_mut(tour_id)?;
    tour.complete()?;

    Ok(TourTransition {
        tour_id: tour_id.to_string(),
        group_id,
        index_in_group: tour.index_in_group(),
        beneficiary_id: tour.beneficiary_id().to_string(),
        contribution_ids: Vec::new(),
    })
}
