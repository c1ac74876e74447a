//! Delegation manager
//!
//! Grants and revokes time-bounded proxy rights between two members of
//! a group. Delegations gate who may act on a member's behalf (the
//! contribution ledger consults `is_active_proxy` before accepting a
//! proxy payment) but never mutate ledger state themselves.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::EngineError;
use crate::models::delegation::Delegation;
use crate::models::store::LedgerStore;

/// Create a proxy grant from `grantor_id` to `proxy_id`.
///
/// Overlapping active grants by the same grantor are rejected: a
/// grantor has at most one proxy for any given day. A grantor wanting
/// to switch proxies revokes the old grant first.
///
/// # Errors
/// - `NotFound` if the group is missing
/// - `BadRequest` if either party is not a member, the grantor names
///   themself, or `valid_to < valid_from`
/// - `Conflict` if an active grant by the grantor overlaps the window
pub fn create_delegation(
    store: &mut LedgerStore,
    group_id: &str,
    grantor_id: &str,
    proxy_id: &str,
    valid_from: NaiveDate,
    valid_to: NaiveDate,
) -> Result<String, EngineError> {
    store.get_group(group_id)?;

    if !store.is_member(group_id, grantor_id) {
        return Err(EngineError::bad_request(format!(
            "grantor {} is not a member of group {}",
            grantor_id, group_id
        )));
    }
    if !store.is_member(group_id, proxy_id) {
        return Err(EngineError::bad_request(format!(
            "proxy {} is not a member of group {}",
            proxy_id, group_id
        )));
    }
    if grantor_id == proxy_id {
        return Err(EngineError::bad_request(
            "grantor and proxy must be different members",
        ));
    }
    if valid_to < valid_from {
        return Err(EngineError::bad_request(format!(
            "delegation window end {} precedes start {}",
            valid_to, valid_from
        )));
    }

    let overlap = store
        .delegations_for_group(group_id)
        .iter()
        .any(|d| d.grantor_id() == grantor_id && d.is_active() && d.overlaps(valid_from, valid_to));
    if overlap {
        return Err(EngineError::conflict(format!(
            "{} already has an active delegation overlapping {} to {}",
            grantor_id, valid_from, valid_to
        )));
    }

    let delegation = Delegation::new(
        group_id.to_string(),
        grantor_id.to_string(),
        proxy_id.to_string(),
        valid_from,
        valid_to,
    );
    let delegation_id = delegation.id().to_string();
    store.insert_delegation(delegation);
    Ok(delegation_id)
}

/// Revoke a grant. Only the grantor may revoke.
///
/// # Errors
/// - `NotFound` if the delegation is missing
/// - `Forbidden` if the caller is not the grantor
/// - `Conflict` if the grant is already inactive
pub fn revoke_delegation(
    store: &mut LedgerStore,
    delegation_id: &str,
    person_id: &str,
) -> Result<(), EngineError> {
    let delegation = store.get_delegation_mut(delegation_id)?;
    if delegation.grantor_id() != person_id {
        return Err(EngineError::forbidden(format!(
            "only the grantor may revoke delegation {}",
            delegation_id
        )));
    }
    if !delegation.is_active() {
        return Err(EngineError::conflict(format!(
            "delegation {} is already inactive",
            delegation_id
        )));
    }
    delegation.deactivate();
    Ok(())
}

/// Delegations of a group whose window covers `today` and that are
/// still active.
pub fn active_delegations<'a>(
    store: &'a LedgerStore,
    group_id: &str,
    today: NaiveDate,
) -> Vec<&'a Delegation> {
    store
        .delegations_for_group(group_id)
        .into_iter()
        .filter(|d| d.covers(today))
        .collect()
}

/// True if `proxy_id` currently holds an active grant from
/// `grantor_id` in the group.
pub fn is_active_proxy(
    store: &LedgerStore,
    group_id: &str,
    proxy_id: &str,
    grantor_id: &str,
    today: NaiveDate,
) -> bool {
    store
        .delegations_for_group(group_id)
        .iter()
        .any(|d| d.grantor_id() == grantor_id && d.proxy_id() == proxy_id && d.covers(today))
}

/// Batch expiry: deactivate every active grant whose window has fully
/// passed. Idempotent; per-item failures are logged and skipped so one
/// bad record never aborts the sweep.
///
/// Returns the IDs of grants expired by this run.
pub fn expire_sweep(store: &mut LedgerStore, today: NaiveDate) -> Vec<String> {
    let mut expired = Vec::new();
    for delegation_id in store.all_delegation_ids() {
        let delegation = match store.get_delegation_mut(&delegation_id) {
            Ok(d) => d,
            Err(err) => {
                warn!(%delegation_id, %err, "skipping delegation during expiry sweep");
                continue;
            }
        };
        if delegation.is_active() && delegation.is_expired(today) {
            delegation.deactivate();
            expired.push(delegation_id);
        }
    }
    expired
}
