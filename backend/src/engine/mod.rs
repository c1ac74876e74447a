//! Tontine engine facade
//!
//! Entry point tying all components together: it owns the ledger
//! store, the injectable clock, the deterministic RNG, the event log
//! and the audit sink, and exposes one method per ledger operation.
//!
//! Every mutating method takes `&mut self`, so each operation's
//! read-modify-write sequence runs to completion before the next one
//! starts, the in-process analog of the single atomic transaction the
//! deployment wraps around each call. Validation always precedes
//! mutation, so a failed operation leaves no partial state behind.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tontine_ledger_core_rs::core::clock::FixedClock;
//! use tontine_ledger_core_rs::engine::{EngineConfig, TontineEngine};
//! use tontine_ledger_core_rs::models::group::{Frequency, GroupConfig, MemberRole, RotationMode};
//! use tontine_ledger_core_rs::rotation::RotationParams;
//!
//! let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let mut engine = TontineEngine::new(
//!     EngineConfig { rng_seed: 12345 },
//!     Box::new(FixedClock::new(start)),
//! );
//!
//! let group_id = engine
//!     .create_group(
//!         GroupConfig {
//!             contribution_amount: 100_000,
//!             frequency: Frequency::Weekly,
//!             rotation_mode: RotationMode::Sequential,
//!             total_tours: 3,
//!             start_date: start,
//!             grace_period_days: 2,
//!             late_penalty_rate: None,
//!         },
//!         "alice",
//!     )
//!     .unwrap();
//! engine.add_member(&group_id, "alice", "bob", MemberRole::Member).unwrap();
//! engine.add_member(&group_id, "alice", "carol", MemberRole::Member).unwrap();
//!
//! let generated = engine
//!     .generate_tours(&group_id, "alice", &RotationParams::default())
//!     .unwrap();
//! assert_eq!(generated.tour_ids.len(), 3);
//! assert_eq!(generated.first_tour_contribution_ids.len(), 3);
//! ```

use chrono::NaiveDate;
use serde_json::json;
use tracing::info;

use crate::core::clock::Clock;
use crate::delegation;
use crate::error::EngineError;
use crate::events::{AuditRecord, AuditSink, DomainEvent, EventLog, MemoryAuditSink};
use crate::ledger::{self, PaymentOutcome};
use crate::models::delegation::Delegation;
use crate::models::group::{GroupConfig, MemberRole, TontineGroup};
use crate::models::store::LedgerStore;
use crate::payout::{self, PayoutOutcome};
use crate::penalty::{self, SweepReport};
use crate::rng::RngManager;
use crate::rotation::RotationParams;
use crate::scheduler::{self, GeneratedTours, TourTransition};

/// Actor recorded for time-driven batch operations.
const SYSTEM_ACTOR: &str = "system";

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for the deterministic RNG (RANDOM/SHUFFLE rotations)
    pub rng_seed: u64,
}

/// The rotation & contribution ledger engine.
pub struct TontineEngine {
    store: LedgerStore,
    clock: Box<dyn Clock>,
    rng: RngManager,
    events: EventLog,
    audit: Box<dyn AuditSink>,
}

impl TontineEngine {
    /// Create an engine with an in-memory audit sink.
    pub fn new(config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        Self::with_audit_sink(config, clock, Box::new(MemoryAuditSink::new()))
    }

    /// Create an engine with a caller-provided audit sink.
    pub fn with_audit_sink(
        config: EngineConfig,
        clock: Box<dyn Clock>,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            store: LedgerStore::new(),
            clock,
            rng: RngManager::new(config.rng_seed),
            events: EventLog::new(),
            audit,
        }
    }

    /// Replace the time source (tests move time this way).
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    /// Current date as seen by the engine.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Read access to all ledger state.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Domain events accumulated since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand accumulated events to the notification subsystem.
    pub fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.events.drain()
    }

    // ------------------------------------------------------------------
    // Group & membership surface
    // ------------------------------------------------------------------

    /// Create a group; the creator becomes its sole Admin.
    pub fn create_group(
        &mut self,
        config: GroupConfig,
        creator_id: &str,
    ) -> Result<String, EngineError> {
        let group = TontineGroup::new(config, creator_id.to_string())?;
        let group_id = group.id().to_string();
        self.store.insert_group(group);
        self.store
            .add_membership(&group_id, creator_id, MemberRole::Admin)?;

        info!(%group_id, %creator_id, "group created");
        self.events.append(DomainEvent::GroupCreated {
            group_id: group_id.clone(),
            creator_id: creator_id.to_string(),
        });
        self.audit.record(AuditRecord {
            actor_id: creator_id.to_string(),
            action: "create_group".to_string(),
            entity_type: "group".to_string(),
            entity_id: group_id.clone(),
            details: json!({}),
        });
        Ok(group_id)
    }

    /// Add a member to a group's roster. Admin-only.
    ///
    /// The roster freezes once tours are generated: expected amounts
    /// and materialized dues are pinned at generation time, so a
    /// mutable roster would silently break the collection-sum
    /// invariant.
    pub fn add_member(
        &mut self,
        group_id: &str,
        actor_id: &str,
        person_id: &str,
        role: MemberRole,
    ) -> Result<(), EngineError> {
        self.store.get_group(group_id)?;
        self.store.require_admin(group_id, actor_id)?;
        if self.store.group_has_tours(group_id) {
            return Err(EngineError::conflict(format!(
                "roster of group {} is frozen: tours already generated",
                group_id
            )));
        }
        self.store.add_membership(group_id, person_id, role)?;

        self.events.append(DomainEvent::MemberAdded {
            group_id: group_id.to_string(),
            person_id: person_id.to_string(),
        });
        self.audit.record(AuditRecord {
            actor_id: actor_id.to_string(),
            action: "add_member".to_string(),
            entity_type: "group".to_string(),
            entity_id: group_id.to_string(),
            details: json!({ "person_id": person_id, "role": format!("{:?}", role) }),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tour scheduling
    // ------------------------------------------------------------------

    /// Generate the full rotation for a group (admin action).
    pub fn generate_tours(
        &mut self,
        group_id: &str,
        person_id: &str,
        params: &RotationParams,
    ) -> Result<GeneratedTours, EngineError> {
        let generated =
            scheduler::generate_tours(&mut self.store, &mut self.rng, group_id, person_id, params)?;

        info!(
            %group_id,
            tours = generated.tour_ids.len(),
            "rotation generated"
        );
        self.events.append(DomainEvent::ToursGenerated {
            group_id: group_id.to_string(),
            tour_ids: generated.tour_ids.clone(),
        });
        self.events.append(DomainEvent::TourStarted {
            tour_id: generated.first_tour_id.clone(),
            group_id: group_id.to_string(),
            index_in_group: 1,
            beneficiary_id: generated.beneficiary_order[0].clone(),
        });
        self.audit.record(AuditRecord {
            actor_id: person_id.to_string(),
            action: "generate_tours".to_string(),
            entity_type: "group".to_string(),
            entity_id: group_id.to_string(),
            details: json!({
                "tour_count": generated.tour_ids.len(),
                "beneficiary_order": generated.beneficiary_order,
            }),
        });
        Ok(generated)
    }

    /// Start a pending tour (admin action).
    pub fn start_tour(
        &mut self,
        tour_id: &str,
        person_id: &str,
    ) -> Result<TourTransition, EngineError> {
        let transition = scheduler::start_tour(&mut self.store, tour_id, person_id)?;

        self.events.append(DomainEvent::TourStarted {
            tour_id: transition.tour_id.clone(),
            group_id: transition.group_id.clone(),
            index_in_group: transition.index_in_group,
            beneficiary_id: transition.beneficiary_id.clone(),
        });
        self.audit.record(AuditRecord {
            actor_id: person_id.to_string(),
            action: "start_tour".to_string(),
            entity_type: "tour".to_string(),
            entity_id: tour_id.to_string(),
            details: json!({ "contributions": transition.contribution_ids.len() }),
        });
        Ok(transition)
    }

    /// Complete an in-progress tour (admin action). Does not pay out.
    pub fn complete_tour(
        &mut self,
        tour_id: &str,
        person_id: &str,
    ) -> Result<TourTransition, EngineError> {
        let transition = scheduler::complete_tour(&mut self.store, tour_id, person_id)?;

        self.events.append(DomainEvent::TourCompleted {
            tour_id: transition.tour_id.clone(),
            group_id: transition.group_id.clone(),
        });
        self.audit.record(AuditRecord {
            actor_id: person_id.to_string(),
            action: "complete_tour".to_string(),
            entity_type: "tour".to_string(),
            entity_id: tour_id.to_string(),
            details: json!({}),
        });
        Ok(transition)
    }

    // ------------------------------------------------------------------
    // Payments
    // ------------------------------------------------------------------

    /// Record a payment against a contribution.
    ///
    /// The payer must be the contribution's member or an active proxy.
    pub fn record_payment(
        &mut self,
        payer_id: &str,
        contribution_id: &str,
        amount: i64,
        external_ref: Option<String>,
    ) -> Result<PaymentOutcome, EngineError> {
        let today = self.clock.today();
        let outcome = ledger::record_payment(
            &mut self.store,
            today,
            payer_id,
            contribution_id,
            amount,
            external_ref,
        )?;

        self.events.append(DomainEvent::PaymentReceived {
            payment_id: outcome.payment_id.clone(),
            contribution_id: outcome.contribution_id.clone(),
            payer_id: payer_id.to_string(),
            amount,
        });
        if outcome.settled() {
            self.events.append(DomainEvent::ContributionSettled {
                contribution_id: outcome.contribution_id.clone(),
                member_id: outcome.member_id.clone(),
                total_paid: outcome.total_paid,
            });
        }
        self.audit.record(AuditRecord {
            actor_id: payer_id.to_string(),
            action: "record_payment".to_string(),
            entity_type: "contribution".to_string(),
            entity_id: contribution_id.to_string(),
            details: json!({
                "payment_id": outcome.payment_id,
                "amount": amount,
                "total_paid": outcome.total_paid,
                "total_due": outcome.total_due,
                "status": format!("{:?}", outcome.contribution_status),
            }),
        });
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Batch sweeps
    // ------------------------------------------------------------------

    /// Run the late-penalty sweep as of the engine's clock.
    pub fn run_penalty_sweep(&mut self) -> SweepReport {
        let today = self.clock.today();
        let (report, adjustments) = penalty::run_sweep(&mut self.store, today);

        for adjustment in adjustments {
            self.events.append(DomainEvent::PenaltyApplied {
                contribution_id: adjustment.contribution_id.clone(),
                member_id: adjustment.member_id.clone(),
                days_late: adjustment.days_late,
                penalty_applied: adjustment.penalty_applied,
            });
            self.audit.record(AuditRecord {
                actor_id: SYSTEM_ACTOR.to_string(),
                action: "apply_penalty".to_string(),
                entity_type: "contribution".to_string(),
                entity_id: adjustment.contribution_id,
                details: json!({
                    "member_id": adjustment.member_id,
                    "days_late": adjustment.days_late,
                    "penalty_applied": adjustment.penalty_applied,
                }),
            });
        }
        report
    }

    // ------------------------------------------------------------------
    // Payouts
    // ------------------------------------------------------------------

    /// Issue the single payout for a tour (admin action).
    pub fn process_payout(
        &mut self,
        tour_id: &str,
        person_id: &str,
    ) -> Result<PayoutOutcome, EngineError> {
        let outcome = payout::process_payout(&mut self.store, tour_id, person_id)?;

        info!(
            %tour_id,
            beneficiary = %outcome.beneficiary_id,
            amount = outcome.amount,
            "payout issued"
        );
        self.events.append(DomainEvent::PayoutIssued {
            payout_id: outcome.payout_id.clone(),
            tour_id: outcome.tour_id.clone(),
            beneficiary_id: outcome.beneficiary_id.clone(),
            amount: outcome.amount,
        });
        self.audit.record(AuditRecord {
            actor_id: person_id.to_string(),
            action: "process_payout".to_string(),
            entity_type: "payout".to_string(),
            entity_id: outcome.payout_id.clone(),
            details: json!({
                "tour_id": outcome.tour_id,
                "beneficiary_id": outcome.beneficiary_id,
                "amount": outcome.amount,
            }),
        });
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Delegations
    // ------------------------------------------------------------------

    /// Grant time-bounded proxy rights between two members.
    pub fn create_delegation(
        &mut self,
        group_id: &str,
        grantor_id: &str,
        proxy_id: &str,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    ) -> Result<String, EngineError> {
        let delegation_id = delegation::create_delegation(
            &mut self.store,
            group_id,
            grantor_id,
            proxy_id,
            valid_from,
            valid_to,
        )?;

        self.events.append(DomainEvent::DelegationCreated {
            delegation_id: delegation_id.clone(),
            group_id: group_id.to_string(),
            grantor_id: grantor_id.to_string(),
            proxy_id: proxy_id.to_string(),
        });
        self.audit.record(AuditRecord {
            actor_id: grantor_id.to_string(),
            action: "create_delegation".to_string(),
            entity_type: "delegation".to_string(),
            entity_id: delegation_id.clone(),
            details: json!({
                "proxy_id": proxy_id,
                "valid_from": valid_from.to_string(),
                "valid_to": valid_to.to_string(),
            }),
        });
        Ok(delegation_id)
    }

    /// Revoke a delegation. Only the grantor may revoke.
    pub fn revoke_delegation(
        &mut self,
        delegation_id: &str,
        person_id: &str,
    ) -> Result<(), EngineError> {
        delegation::revoke_delegation(&mut self.store, delegation_id, person_id)?;

        self.events.append(DomainEvent::DelegationRevoked {
            delegation_id: delegation_id.to_string(),
        });
        self.audit.record(AuditRecord {
            actor_id: person_id.to_string(),
            action: "revoke_delegation".to_string(),
            entity_type: "delegation".to_string(),
            entity_id: delegation_id.to_string(),
            details: json!({}),
        });
        Ok(())
    }

    /// Delegations currently in force for a group.
    pub fn active_delegations(&self, group_id: &str) -> Vec<&Delegation> {
        delegation::active_delegations(&self.store, group_id, self.clock.today())
    }

    /// Run the delegation expiry sweep as of the engine's clock.
    pub fn expire_delegations(&mut self) -> usize {
        let today = self.clock.today();
        let expired = delegation::expire_sweep(&mut self.store, today);
        let count = expired.len();

        for delegation_id in expired {
            self.events.append(DomainEvent::DelegationExpired {
                delegation_id: delegation_id.clone(),
            });
            self.audit.record(AuditRecord {
                actor_id: SYSTEM_ACTOR.to_string(),
                action: "expire_delegation".to_string(),
                entity_type: "delegation".to_string(),
                entity_id: delegation_id,
                details: json!({}),
            });
        }
        count
    }
}
