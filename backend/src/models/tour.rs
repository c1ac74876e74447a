//! Tour model
//!
//! One cycle of the rotation: a date window with a designated
//! beneficiary. Tours are created once at generation time and mutate
//! only through the forward-only status machine:
//!
//! ```text
//! Pending -> InProgress -> Completed -> Closed
//! ```
//!
//! No transition skips a state and no backward transition is allowed.
//! `Closed` is reachable only via the payout success path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lifecycle status of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    /// Generated, not yet collecting
    Pending,
    /// Currently collecting contributions
    InProgress,
    /// Collection window finished, payout not yet issued
    Completed,
    /// Payout issued
    Closed,
}

/// One rotation cycle with a pinned beneficiary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// Unique tour identifier (UUID)
    id: String,

    /// Owning group
    group_id: String,

    /// 1-based position in the group's rotation, unique per group
    index_in_group: u32,

    /// Beneficiary pinned at generation time
    beneficiary_id: String,

    /// First day of the collection window
    start_date: NaiveDate,

    /// Last day of the collection window (also the dues' due date)
    end_date: NaiveDate,

    /// Current lifecycle status
    status: TourStatus,

    /// contribution_amount x member_count, frozen at generation time
    expected_amount: i64,
}

impl Tour {
    /// Create a new tour in `Pending` status.
    pub fn new(
        group_id: String,
        index_in_group: u32,
        beneficiary_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        expected_amount: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_id,
            index_in_group,
            beneficiary_id,
            start_date,
            end_date,
            status: TourStatus::Pending,
            expected_amount,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn index_in_group(&self) -> u32 {
        self.index_in_group
    }

    pub fn beneficiary_id(&self) -> &str {
        &self.beneficiary_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn status(&self) -> TourStatus {
        self.status
    }

    pub fn expected_amount(&self) -> i64 {
        self.expected_amount
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == TourStatus::InProgress
    }

    /// Pending -> InProgress.
    ///
    /// # Errors
    /// `Conflict` if the tour is not `Pending`.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.status {
            TourStatus::Pending => {
                self.status = TourStatus::InProgress;
                Ok(())
            }
            _ => Err(EngineError::conflict(format!(
                "tour {} is not pending (status {:?})",
                self.index_in_group, self.status
            ))),
        }
    }

    /// InProgress -> Completed.
    ///
    /// # Errors
    /// `Conflict` if the tour is not `InProgress`.
    pub fn complete(&mut self) -> Result<(), EngineError> {
        match self.status {
            TourStatus::InProgress => {
                self.status = TourStatus::Completed;
                Ok(())
            }
            _ => Err(EngineError::conflict(format!(
                "tour {} is not in progress (status {:?})",
                self.index_in_group, self.status
            ))),
        }
    }

    /// Completed -> Closed. Only the payout success path calls this.
    ///
    /// # Errors
    /// `Conflict` if the tour is not `Completed`.
    pub fn close(&mut self) -> Result<(), EngineError> {
        match self.status {
            TourStatus::Completed => {
                self.status = TourStatus::Closed;
                Ok(())
            }
            _ => Err(EngineError::conflict(format!(
                "tour {} is not completed (status {:?})",
                self.index_in_group, self.status
            ))),
        }
    }
}
