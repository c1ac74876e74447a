//! Delegation model
//!
//! A time-bounded grant letting one member (the proxy) act on behalf
//! of another (the grantor) within a group. Delegations gate who may
//! pay a contribution for someone else; they never mutate ledger
//! state themselves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time-bounded proxy grant between two group members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delegation {
    /// Unique delegation identifier (UUID)
    id: String,

    /// Group the grant applies to
    group_id: String,

    /// Member delegating their rights
    grantor_id: String,

    /// Member allowed to act for the grantor
    proxy_id: String,

    /// First day of validity (inclusive)
    valid_from: NaiveDate,

    /// Last day of validity (inclusive); `valid_to >= valid_from`
    valid_to: NaiveDate,

    /// False once revoked or expired
    active: bool,
}

impl Delegation {
    /// Create an active delegation. Window validity is checked by the
    /// `DelegationManager` before construction.
    pub fn new(
        group_id: String,
        grantor_id: String,
        proxy_id: String,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_id,
            grantor_id,
            proxy_id,
            valid_from,
            valid_to,
            active: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn grantor_id(&self) -> &str {
        &self.grantor_id
    }

    pub fn proxy_id(&self) -> &str {
        &self.proxy_id
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_to(&self) -> NaiveDate {
        self.valid_to
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True if the grant is active and `today` falls inside the window.
    pub fn covers(&self, today: NaiveDate) -> bool {
        self.active && self.valid_from <= today && today <= self.valid_to
    }

    /// True if this grant's window intersects `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.valid_from <= to && from <= self.valid_to
    }

    /// True once the window lies entirely in the past.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.valid_to < today
    }

    /// Flip the grant inactive (revocation or expiry sweep).
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
