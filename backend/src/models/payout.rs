//! Payout model
//!
//! The disbursement of a tour's collected funds to its beneficiary.
//! The single most important invariant of the engine lives here:
//! at most one payout per tour, ever. The `LedgerStore` enforces it
//! structurally at insert (`insert_payout`); this type just carries
//! the record.

use serde::{Deserialize, Serialize};

/// Gateway status of a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutStatus {
    /// Awaiting gateway confirmation
    Pending,
    /// Disbursed
    Confirmed,
    /// Rejected by the gateway; never retried by the engine
    Failed,
}

/// Disbursement of a tour's collected funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    /// Unique payout identifier (UUID)
    id: String,

    /// Source tour; unique across all payouts
    tour_id: String,

    /// Receiving member (the tour's pinned beneficiary)
    beneficiary_id: String,

    /// Total collected for the tour (cents)
    amount: i64,

    /// Gateway status
    status: PayoutStatus,
}

impl Payout {
    /// Create a payout that is immediately confirmed (stubbed gateway).
    pub fn new_confirmed(tour_id: String, beneficiary_id: String, amount: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tour_id,
            beneficiary_id,
            amount,
            status: PayoutStatus::Confirmed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }

    pub fn beneficiary_id(&self) -> &str {
        &self.beneficiary_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn status(&self) -> PayoutStatus {
        self.status
    }
}
