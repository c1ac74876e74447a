//! Tontine Ledger Core - Rotation & Contribution Engine
//!
//! Coordinates rotating-savings-group cycles: schedules member payout
//! turns, tracks per-member dues, reconciles partial payments, applies
//! late-payment penalties and disburses collected funds to each
//! cycle's beneficiary.
//!
//! # Architecture
//!
//! - **core**: injectable clock
//! - **models**: domain types (TontineGroup, Tour, Contribution,
//!   Payment, Payout, Delegation) and the LedgerStore
//! - **rotation**: beneficiary-ordering policy (pure)
//! - **scheduler**: tour generation and lifecycle
//! - **ledger**: dues materialization and payment reconciliation
//! - **penalty**: late-penalty batch sweep
//! - **payout**: one-shot disbursement per tour
//! - **delegation**: time-bounded proxy grants
//! - **events**: domain events and the audit boundary
//! - **engine**: the facade wiring everything together
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. At most one payout per tour, ever
//! 3. Contribution status is re-derived from full payment history,
//!    never adjusted incrementally
//! 4. All randomness is deterministic (seeded RNG); a RANDOM rotation
//!    is drawn once and pinned into the Tour records
//! 5. All "today" comparisons go through the injectable clock

// Module declarations
pub mod core;
pub mod delegation;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod models;
pub mod payout;
pub mod penalty;
pub mod rng;
pub mod rotation;
pub mod scheduler;

// Re-exports for convenience
pub use crate::core::clock::{Clock, FixedClock, SystemClock};
pub use engine::{EngineConfig, TontineEngine};
pub use error::EngineError;
pub use events::{AuditRecord, AuditSink, DomainEvent, EventLog, MemoryAuditSink};
pub use ledger::PaymentOutcome;
pub use models::{
    contribution::{Contribution, ContributionStatus, Payment, PaymentStatus},
    delegation::Delegation,
    group::{Frequency, GroupConfig, GroupMembership, MemberRole, RotationMode, TontineGroup},
    payout::{Payout, PayoutStatus},
    store::LedgerStore,
    tour::{Tour, TourStatus},
};
pub use payout::PayoutOutcome;
pub use penalty::{PenaltyAdjustment, SweepReport};
pub use rng::RngManager;
pub use rotation::{plan_rotation, RotationParams};
pub use scheduler::{GeneratedTours, TourTransition};
