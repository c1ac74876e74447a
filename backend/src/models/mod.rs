//! Domain models for the rotation & contribution ledger

pub mod contribution;
pub mod delegation;
pub mod group;
pub mod payout;
pub mod store;
pub mod tour;

// Re-exports
pub use contribution::{Contribution, ContributionStatus, Payment, PaymentStatus};
pub use delegation::Delegation;
pub use group::{Frequency, GroupConfig, GroupMembership, MemberRole, RotationMode, TontineGroup};
pub use payout::{Payout, PayoutStatus};
pub use store::LedgerStore;
pub use tour::{Tour, TourStatus};
