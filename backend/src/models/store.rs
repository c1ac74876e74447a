//! Ledger store
//!
//! Single source of truth for all ledger state. Components accept and
//! return IDs and resolve entities only transiently through this store,
//! so no persistent cross-references exist between entities (the
//! original system's cyclic object graph is flattened to ID lookups).
//!
//! # Critical Invariants
//!
//! 1. **Payout Uniqueness**: at most one payout per tour, enforced
//!    structurally by `insert_payout` (the analog of a database unique
//!    constraint on `tour_id`)
//! 2. **Membership Uniqueness**: one membership per (group, person)
//! 3. **Index Validity**: every ID held in a secondary index resolves
//!    in its primary map
//! 4. **No External Caching**: callers never hold ledger state across
//!    operations; every read goes through the store

use std::collections::HashMap;

use crate::error::EngineError;
use crate::models::contribution::{Contribution, Payment};
use crate::models::delegation::Delegation;
use crate::models::group::{GroupMembership, MemberRole, TontineGroup};
use crate::models::payout::Payout;
use crate::models::tour::Tour;

/// In-memory ledger state, indexed for the access paths the engine needs.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use tontine_ledger_core_rs::models::group::{Frequency, GroupConfig, MemberRole, RotationMode, TontineGroup};
/// use tontine_ledger_core_rs::models::store::LedgerStore;
///
/// let group = TontineGroup::new(
///     GroupConfig {
///         contribution_amount: 100_000,
///         frequency: Frequency::Weekly,
///         rotation_mode: RotationMode::Sequential,
///         total_tours: 4,
///         start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///         grace_period_days: 0,
///         late_penalty_rate: None,
///     },
///     "alice".to_string(),
/// ).unwrap();
/// let group_id = group.id().to_string();
///
/// let mut store = LedgerStore::new();
/// store.insert_group(group);
/// store.add_membership(&group_id, "alice", MemberRole::Admin).unwrap();
/// assert_eq!(store.member_count(&group_id), 1);
/// ```
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// All groups, indexed by group ID
    groups: HashMap<String, TontineGroup>,

    /// Memberships per group, kept in join order
    memberships: HashMap<String, Vec<GroupMembership>>,

    /// All tours, indexed by tour ID
    tours: HashMap<String, Tour>,

    /// Tour IDs per group, in index_in_group order
    tours_by_group: HashMap<String, Vec<String>>,

    /// All contributions, indexed by contribution ID
    contributions: HashMap<String, Contribution>,

    /// Contribution IDs per tour
    contributions_by_tour: HashMap<String, Vec<String>>,

    /// All payments, indexed by payment ID
    payments: HashMap<String, Payment>,

    /// Payment IDs per contribution
    payments_by_contribution: HashMap<String, Vec<String>>,

    /// All payouts, indexed by payout ID
    payouts: HashMap<String, Payout>,

    /// Unique index: tour ID -> payout ID
    payout_by_tour: HashMap<String, String>,

    /// All delegations, indexed by delegation ID
    delegations: HashMap<String, Delegation>,

    /// Monotonic counter assigning membership join order
    join_seq: u64,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Groups & memberships (the identity/membership lookup boundary)
    // ------------------------------------------------------------------

    pub fn insert_group(&mut self, group: TontineGroup) {
        self.memberships
            .entry(group.id().to_string())
            .or_default();
        self.groups.insert(group.id().to_string(), group);
    }

    pub fn get_group(&self, group_id: &str) -> Result<&TontineGroup, EngineError> {
        self.groups
            .get(group_id)
            .ok_or_else(|| EngineError::not_found("group", group_id))
    }

    /// Add a membership, assigning the next join-order sequence number.
    ///
    /// # Errors
    /// `NotFound` if the group does not exist, `Conflict` if the person
    /// is already a member.
    pub fn add_membership(
        &mut self,
        group_id: &str,
        person_id: &str,
        role: MemberRole,
    ) -> Result<(), EngineError> {
        self.get_group(group_id)?;
        let roster = self.memberships.entry(group_id.to_string()).or_default();
        if roster.iter().any(|m| m.person_id() == person_id) {
            return Err(EngineError::conflict(format!(
                "{} is already a member of group {}",
                person_id, group_id
            )));
        }
        self.join_seq += 1;
        roster.push(GroupMembership::new(
            group_id.to_string(),
            person_id.to_string(),
            role,
            self.join_seq,
        ));
        Ok(())
    }

    pub fn get_membership(&self, group_id: &str, person_id: &str) -> Option<&GroupMembership> {
        self.memberships
            .get(group_id)?
            .iter()
            .find(|m| m.person_id() == person_id)
    }

    /// Memberships in join order.
    pub fn list_members(&self, group_id: &str) -> Vec<&GroupMembership> {
        self.memberships
            .get(group_id)
            .map(|roster| roster.iter().collect())
            .unwrap_or_default()
    }

    /// Member person IDs in join order.
    pub fn member_ids(&self, group_id: &str) -> Vec<String> {
        self.list_members(group_id)
            .iter()
            .map(|m| m.person_id().to_string())
            .collect()
    }

    pub fn member_count(&self, group_id: &str) -> usize {
        self.memberships
            .get(group_id)
            .map(|roster| roster.len())
            .unwrap_or(0)
    }

    pub fn is_member(&self, group_id: &str, person_id: &str) -> bool {
        self.get_membership(group_id, person_id).is_some()
    }

    /// Authorize an admin-only operation.
    ///
    /// # Errors
    /// `Forbidden` if the person is not an Admin of the group (non-members
    /// included).
    pub fn require_admin(&self, group_id: &str, person_id: &str) -> Result<(), EngineError> {
        match self.get_membership(group_id, person_id) {
            Some(m) if m.is_admin() => Ok(()),
            _ => Err(EngineError::forbidden(format!(
                "{} is not an admin of group {}",
                person_id, group_id
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Tours
    // ------------------------------------------------------------------

    pub fn insert_tour(&mut self, tour: Tour) {
        self.tours_by_group
            .entry(tour.group_id().to_string())
            .or_default()
            .push(tour.id().to_string());
        self.tours.insert(tour.id().to_string(), tour);
    }

    pub fn get_tour(&self, tour_id: &str) -> Result<&Tour, EngineError> {
        self.tours
            .get(tour_id)
            .ok_or_else(|| EngineError::not_found("tour", tour_id))
    }

    pub fn get_tour_mut(&mut self, tour_id: &str) -> Result<&mut Tour, EngineError> {
        self.tours
            .get_mut(tour_id)
            .ok_or_else(|| EngineError::not_found("tour", tour_id))
    }

    /// Tours of a group in index_in_group order.
    pub fn tours_for_group(&self, group_id: &str) -> Vec<&Tour> {
        self.tours_by_group
            .get(group_id)
            .map(|ids| ids.iter().filter_map(|id| self.tours.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn group_has_tours(&self, group_id: &str) -> bool {
        self.tours_by_group
            .get(group_id)
            .map(|ids| !ids.is_empty())
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Contributions & payments
    // ------------------------------------------------------------------

    pub fn insert_contribution(&mut self, contribution: Contribution) {
        self.contributions_by_tour
            .entry(contribution.tour_id().to_string())
            .or_default()
            .push(contribution.id().to_string());
        self.contributions
            .insert(contribution.id().to_string(), contribution);
    }

    pub fn get_contribution(&self, contribution_id: &str) -> Result<&Contribution, EngineError> {
        self.contributions
            .get(contribution_id)
            .ok_or_else(|| EngineError::not_found("contribution", contribution_id))
    }

    pub fn get_contribution_mut(
        &mut self,
        contribution_id: &str,
    ) -> Result<&mut Contribution, EngineError> {
        self.contributions
            .get_mut(contribution_id)
            .ok_or_else(|| EngineError::not_found("contribution", contribution_id))
    }

    pub fn contributions_for_tour(&self, tour_id: &str) -> Vec<&Contribution> {
        self.contributions_by_tour
            .get(tour_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.contributions.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Contribution IDs of a tour, cloned so callers can mutate while
    /// iterating.
    pub fn contribution_ids_for_tour(&self, tour_id: &str) -> Vec<String> {
        self.contributions_by_tour
            .get(tour_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_contribution(&self, tour_id: &str, member_id: &str) -> bool {
        self.contributions_for_tour(tour_id)
            .iter()
            .any(|c| c.member_id() == member_id)
    }

    /// Every contribution ID in the store (batch sweep input).
    pub fn all_contribution_ids(&self) -> Vec<String> {
        self.contributions.keys().cloned().collect()
    }

    pub fn insert_payment(&mut self, payment: Payment) {
        self.payments_by_contribution
            .entry(payment.contribution_id().to_string())
            .or_default()
            .push(payment.id().to_string());
        self.payments.insert(payment.id().to_string(), payment);
    }

    pub fn get_payment(&self, payment_id: &str) -> Result<&Payment, EngineError> {
        self.payments
            .get(payment_id)
            .ok_or_else(|| EngineError::not_found("payment", payment_id))
    }

    pub fn payments_for_contribution(&self, contribution_id: &str) -> Vec<&Payment> {
        self.payments_by_contribution
            .get(contribution_id)
            .map(|ids| ids.iter().filter_map(|id| self.payments.get(id)).collect())
            .unwrap_or_default()
    }

    /// Sum of all CONFIRMED payments against a contribution.
    ///
    /// Always recomputed from the full payment history, never tracked
    /// incrementally, so repeated evaluation cannot drift.
    pub fn confirmed_total(&self, contribution_id: &str) -> i64 {
        self.payments_for_contribution(contribution_id)
            .iter()
            .filter(|p| p.is_confirmed())
            .map(|p| p.amount())
            .sum()
    }

    // ------------------------------------------------------------------
    // Payouts
    // ------------------------------------------------------------------

    /// Insert a payout, enforcing at-most-one-per-tour.
    ///
    /// # Errors
    /// `Conflict` if the tour already has a payout. This is the last
    /// line of defense against the check-then-act race: even a caller
    /// that skipped the existence check cannot create a second payout.
    pub fn insert_payout(&mut self, payout: Payout) -> Result<(), EngineError> {
        if self.payout_by_tour.contains_key(payout.tour_id()) {
            return Err(EngineError::conflict(format!(
                "payout already processed for tour {}",
                payout.tour_id()
            )));
        }
        self.payout_by_tour
            .insert(payout.tour_id().to_string(), payout.id().to_string());
        self.payouts.insert(payout.id().to_string(), payout);
        Ok(())
    }

    pub fn payout_for_tour(&self, tour_id: &str) -> Option<&Payout> {
        self.payout_by_tour
            .get(tour_id)
            .and_then(|id| self.payouts.get(id))
    }

    // ------------------------------------------------------------------
    // Delegations
    // ------------------------------------------------------------------

    pub fn insert_delegation(&mut self, delegation: Delegation) {
        self.delegations
            .insert(delegation.id().to_string(), delegation);
    }

    pub fn get_delegation(&self, delegation_id: &str) -> Result<&Delegation, EngineError> {
        self.delegations
            .get(delegation_id)
            .ok_or_else(|| EngineError::not_found("delegation", delegation_id))
    }

    pub fn get_delegation_mut(
        &mut self,
        delegation_id: &str,
    ) -> Result<&mut Delegation, EngineError> {
        self.delegations
            .get_mut(delegation_id)
            .ok_or_else(|| EngineError::not_found("delegation", delegation_id))
    }

    pub fn delegations_for_group(&self, group_id: &str) -> Vec<&Delegation> {
        self.delegations
            .values()
            .filter(|d| d.group_id() == group_id)
            .collect()
    }

    /// Every delegation ID in the store (expiry sweep input).
    pub fn all_delegation_ids(&self) -> Vec<String> {
        self.delegations.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::group::{Frequency, GroupConfig, RotationMode};
    use chrono::NaiveDate;

    fn make_group() -> TontineGroup {
        TontineGroup::new(
            GroupConfig {
                contribution_amount: 100_000,
                frequency: Frequency::Weekly,
                rotation_mode: RotationMode::Sequential,
                total_tours: 4,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                grace_period_days: 0,
                late_penalty_rate: None,
            },
            "alice".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_membership_preserves_join_order() {
        let group = make_group();
        let gid = group.id().to_string();
        let mut store = LedgerStore::new();
        store.insert_group(group);

        store.add_membership(&gid, "alice", MemberRole::Admin).unwrap();
        store.add_membership(&gid, "bob", MemberRole::Member).unwrap();
        store.add_membership(&gid, "carol", MemberRole::Member).unwrap();

        assert_eq!(store.member_ids(&gid), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_duplicate_membership_is_conflict() {
        let group = make_group();
        let gid = group.id().to_string();
        let mut store = LedgerStore::new();
        store.insert_group(group);

        store.add_membership(&gid, "alice", MemberRole::Admin).unwrap();
        let err = store
            .add_membership(&gid, "alice", MemberRole::Member)
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_require_admin() {
        let group = make_group();
        let gid = group.id().to_string();
        let mut store = LedgerStore::new();
        store.insert_group(group);
        store.add_membership(&gid, "alice", MemberRole::Admin).unwrap();
        store.add_membership(&gid, "bob", MemberRole::Member).unwrap();

        assert!(store.require_admin(&gid, "alice").is_ok());
        assert!(matches!(
            store.require_admin(&gid, "bob"),
            Err(EngineError::Forbidden { .. })
        ));
        assert!(matches!(
            store.require_admin(&gid, "mallory"),
            Err(EngineError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_payout_uniqueness_enforced_at_insert() {
        let mut store = LedgerStore::new();

        let first = Payout::new_confirmed("t1".to_string(), "alice".to_string(), 300_000);
        store.insert_payout(first).unwrap();

        let second = Payout::new_confirmed("t1".to_string(), "alice".to_string(), 300_000);
        let err = store.insert_payout(second).unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));

        // First payout is untouched
        assert_eq!(store.payout_for_tour("t1").unwrap().amount(), 300_000);
    }

    #[test]
    fn test_confirmed_total_sums_only_confirmed() {
        let mut store = LedgerStore::new();
        store.insert_payment(Payment::new_confirmed(
            "c1".to_string(),
            "alice".to_string(),
            40_000,
            None,
        ));
        store.insert_payment(Payment::new_confirmed(
            "c1".to_string(),
            "alice".to_string(),
            60_000,
            None,
        ));
        assert_eq!(store.confirmed_total("c1"), 100_000);
        assert_eq!(store.confirmed_total("c2"), 0);
    }
}
