//! Domain events and the audit boundary
//!
//! Every state-mutating operation appends a `DomainEvent` to the
//! engine's `EventLog` and fires an `AuditRecord` at the pluggable
//! `AuditSink`. The event log is the notification trigger: an external
//! subsystem drains it and decides how (push/SMS/email) to deliver;
//! the engine does not know or care. The audit sink is the hook for
//! external audit-log persistence.
//!
//! # Design Principles
//!
//! 1. **Money is i64**: all monetary values are integer cents
//! 2. **Self-contained**: events carry the IDs and amounts a consumer
//!    needs, no live references into the store
//! 3. **Append-only**: nothing ever rewrites history

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A state change worth notifying someone about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Group created with its initial admin
    GroupCreated {
        group_id: String,
        creator_id: String,
    },

    /// Person added to a group's roster
    MemberAdded {
        group_id: String,
        person_id: String,
    },

    /// Full rotation generated for a group
    ToursGenerated {
        group_id: String,
        tour_ids: Vec<String>,
    },

    /// Tour began collecting (dues materialized)
    TourStarted {
        tour_id: String,
        group_id: String,
        index_in_group: u32,
        beneficiary_id: String,
    },

    /// Tour's collection window closed
    TourCompleted { tour_id: String, group_id: String },

    /// Payment recorded and confirmed against a contribution
    PaymentReceived {
        payment_id: String,
        contribution_id: String,
        payer_id: String,
        amount: i64,
    },

    /// Confirmed payments now cover a contribution's total due
    ContributionSettled {
        contribution_id: String,
        member_id: String,
        total_paid: i64,
    },

    /// Penalty sweep adjusted a late contribution
    PenaltyApplied {
        contribution_id: String,
        member_id: String,
        days_late: i64,
        penalty_applied: i64,
    },

    /// Collected funds disbursed to a tour's beneficiary
    PayoutIssued {
        payout_id: String,
        tour_id: String,
        beneficiary_id: String,
        amount: i64,
    },

    /// Proxy grant created
    DelegationCreated {
        delegation_id: String,
        group_id: String,
        grantor_id: String,
        proxy_id: String,
    },

    /// Proxy grant revoked by its grantor
    DelegationRevoked { delegation_id: String },

    /// Proxy grant deactivated by the expiry sweep
    DelegationExpired { delegation_id: String },
}

/// Append-only log of domain events.
///
/// # Example
///
/// ```rust
/// use tontine_ledger_core_rs::events::{DomainEvent, EventLog};
///
/// let mut log = EventLog::new();
/// log.append(DomainEvent::DelegationRevoked {
///     delegation_id: "d1".to_string(),
/// });
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<DomainEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand the accumulated events to a consumer, leaving the log empty.
    pub fn drain(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }
}

/// One audit entry fired after a state-mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Who performed the action
    pub actor_id: String,

    /// Action name, e.g. "generate_tours", "record_payment"
    pub action: String,

    /// Kind of the primary entity touched
    pub entity_type: String,

    /// ID of the primary entity touched
    pub entity_id: String,

    /// Operation-specific details
    pub details: serde_json::Value,
}

/// Destination for audit records.
///
/// The engine fires a record after every state-mutating operation;
/// persistence is the implementor's concern.
pub trait AuditSink {
    fn record(&mut self, record: AuditRecord);
}

/// Audit sink retaining records in memory.
///
/// Clones share one buffer, so a test can keep a handle while the
/// engine owns the sink.
///
/// # Example
///
/// ```rust
/// use tontine_ledger_core_rs::events::{AuditRecord, AuditSink, MemoryAuditSink};
///
/// let mut sink = MemoryAuditSink::new();
/// let handle = sink.clone();
/// sink.record(AuditRecord {
///     actor_id: "alice".to_string(),
///     action: "create_group".to_string(),
///     entity_type: "group".to_string(),
///     entity_id: "g1".to_string(),
///     details: serde_json::json!({}),
/// });
/// assert_eq!(handle.records().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records fired so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&mut self, record: AuditRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_drain_empties() {
        let mut log = EventLog::new();
        log.append(DomainEvent::DelegationRevoked {
            delegation_id: "d1".to_string(),
        });
        log.append(DomainEvent::DelegationExpired {
            delegation_id: "d2".to_string(),
        });

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let mut sink = MemoryAuditSink::new();
        let handle = sink.clone();

        sink.record(AuditRecord {
            actor_id: "alice".to_string(),
            action: "record_payment".to_string(),
            entity_type: "payment".to_string(),
            entity_id: "p1".to_string(),
            details: serde_json::json!({ "amount": 100_000 }),
        });

        let records = handle.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, "record_payment");
    }
}
