//! Tontine group and membership models
//!
//! A group fixes the financial parameters of a rotation: the per-member
//! per-period due, the period length, the beneficiary-ordering policy
//! and the penalty terms. Parameters are validated once at creation and
//! immutable afterward; tours generated from them freeze their own
//! copies of the derived amounts.
//!
//! CRITICAL: all money values are i64 (cents)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Contribution period length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    /// Days in one contribution period (7 / 14 / 30).
    pub fn period_days(&self) -> i64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 30,
        }
    }
}

/// Policy determining beneficiary ordering at tour generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationMode {
    /// Membership join order, unchanged
    Sequential,
    /// Uniformly-random permutation, drawn once at generation time
    Random,
    /// Sequential unless the caller opts into a random draw
    Shuffle,
    /// Caller-supplied explicit order
    Custom,
}

/// Role of a person inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Admin,
    Member,
    Treasurer,
}

/// Validated parameters for creating a group.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tontine_ledger_core_rs::models::group::{Frequency, GroupConfig, RotationMode};
///
/// let config = GroupConfig {
///     contribution_amount: 100_000, // $1,000.00 in cents
///     frequency: Frequency::Monthly,
///     rotation_mode: RotationMode::Sequential,
///     total_tours: 12,
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     grace_period_days: 5,
///     late_penalty_rate: Some(500), // $5.00 per day late
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Fixed per-member, per-period due (cents, > 0)
    pub contribution_amount: i64,

    /// Period length
    pub frequency: Frequency,

    /// Beneficiary-ordering policy
    pub rotation_mode: RotationMode,

    /// Number of tours to generate, bounded [2, 100]
    pub total_tours: u32,

    /// Start of the first tour window
    pub start_date: NaiveDate,

    /// Days after a due date during which no penalty accrues, bounded [0, 30]
    pub grace_period_days: u32,

    /// Cents charged per day late; None disables penalties
    pub late_penalty_rate: Option<i64>,
}

impl GroupConfig {
    /// Minimum and maximum tour counts.
    pub const TOTAL_TOURS_BOUNDS: (u32, u32) = (2, 100);

    /// Maximum grace period in days.
    pub const MAX_GRACE_PERIOD_DAYS: u32 = 30;

    /// Check all parameter bounds.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.contribution_amount <= 0 {
            return Err(EngineError::bad_request(
                "contribution amount must be positive",
            ));
        }
        let (min_tours, max_tours) = Self::TOTAL_TOURS_BOUNDS;
        if self.total_tours < min_tours || self.total_tours > max_tours {
            return Err(EngineError::bad_request(format!(
                "total tours must be within [{}, {}], got {}",
                min_tours, max_tours, self.total_tours
            )));
        }
        if self.grace_period_days > Self::MAX_GRACE_PERIOD_DAYS {
            return Err(EngineError::bad_request(format!(
                "grace period must be at most {} days, got {}",
                Self::MAX_GRACE_PERIOD_DAYS,
                self.grace_period_days
            )));
        }
        if let Some(rate) = self.late_penalty_rate {
            if rate <= 0 {
                return Err(EngineError::bad_request(
                    "late penalty rate must be positive when set",
                ));
            }
        }
        Ok(())
    }
}

/// A rotating-savings group.
///
/// Parameters are frozen at creation; the roster lives in
/// `GroupMembership` records and freezes once tours are generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TontineGroup {
    /// Unique group identifier (UUID)
    id: String,

    /// Fixed per-member, per-period due (cents)
    contribution_amount: i64,

    /// Period length
    frequency: Frequency,

    /// Beneficiary-ordering policy
    rotation_mode: RotationMode,

    /// Number of tours in the rotation
    total_tours: u32,

    /// Start of the first tour window
    start_date: NaiveDate,

    /// Penalty-free days after a due date
    grace_period_days: u32,

    /// Cents charged per day late; None disables penalties
    late_penalty_rate: Option<i64>,

    /// Person who created the group (its initial Admin)
    creator_id: String,
}

impl TontineGroup {
    /// Create a group from a validated config.
    ///
    /// # Errors
    /// `BadRequest` if any config bound is violated.
    pub fn new(config: GroupConfig, creator_id: String) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            contribution_amount: config.contribution_amount,
            frequency: config.frequency,
            rotation_mode: config.rotation_mode,
            total_tours: config.total_tours,
            start_date: config.start_date,
            grace_period_days: config.grace_period_days,
            late_penalty_rate: config.late_penalty_rate,
            creator_id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn contribution_amount(&self) -> i64 {
        self.contribution_amount
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation_mode
    }

    pub fn total_tours(&self) -> u32 {
        self.total_tours
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn grace_period_days(&self) -> u32 {
        self.grace_period_days
    }

    pub fn late_penalty_rate(&self) -> Option<i64> {
        self.late_penalty_rate
    }

    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }
}

/// Membership of one person in one group.
///
/// Keyed by (group, person); `joined_seq` preserves join order, which
/// is the input ordering for SEQUENTIAL rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembership {
    group_id: String,
    person_id: String,
    role: MemberRole,
    joined_seq: u64,
}

impl GroupMembership {
    pub fn new(group_id: String, person_id: String, role: MemberRole, joined_seq: u64) -> Self {
        Self {
            group_id,
            person_id,
            role,
            joined_seq,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn joined_seq(&self) -> u64 {
        self.joined_seq
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GroupConfig {
        GroupConfig {
            contribution_amount: 100_000,
            frequency: Frequency::Weekly,
            rotation_mode: RotationMode::Sequential,
            total_tours: 10,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            grace_period_days: 3,
            late_penalty_rate: None,
        }
    }

    #[test]
    fn test_period_days() {
        assert_eq!(Frequency::Weekly.period_days(), 7);
        assert_eq!(Frequency::Biweekly.period_days(), 14);
        assert_eq!(Frequency::Monthly.period_days(), 30);
    }

    #[test]
    fn test_rejects_nonpositive_amount() {
        let mut config = valid_config();
        config.contribution_amount = 0;
        assert!(matches!(
            config.validate(),
            Err(EngineError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_rejects_total_tours_out_of_bounds() {
        let mut config = valid_config();
        config.total_tours = 1;
        assert!(config.validate().is_err());
        config.total_tours = 101;
        assert!(config.validate().is_err());
        config.total_tours = 2;
        assert!(config.validate().is_ok());
        config.total_tours = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_excessive_grace_period() {
        let mut config = valid_config();
        config.grace_period_days = 31;
        assert!(config.validate().is_err());
        config.grace_period_days = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_penalty_rate() {
        let mut config = valid_config();
        config.late_penalty_rate = Some(0);
        assert!(config.validate().is_err());
        config.late_penalty_rate = Some(500);
        assert!(config.validate().is_ok());
    }
}
