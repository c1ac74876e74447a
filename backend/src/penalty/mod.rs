//! Penalty engine
//!
//! Time-driven batch sweep charging late penalties on unpaid
//! contributions. For each contribution past `due_date + grace`, the
//! penalty is recomputed from that fixed baseline as
//! `rate x days_late` and OVERWRITES the stored value, so re-running
//! the sweep on the same day yields the same amount instead of
//! compounding. Groups without a penalty rate are exempt.
//!
//! Per-item failures are logged and skipped; one bad record never
//! aborts the sweep. Safe to re-run with no distributed lock.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::store::LedgerStore;

/// One contribution adjusted by a sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyAdjustment {
    pub contribution_id: String,
    pub member_id: String,
    pub days_late: i64,
    /// Penalty on the contribution after this run
    pub penalty_applied: i64,
}

/// Summary of a sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Contributions examined
    pub examined: usize,
    /// Contributions penalized this run
    pub penalized: usize,
    /// Contributions skipped because a lookup failed
    pub skipped: usize,
}

/// Run the penalty sweep as of `today`.
///
/// Returns the run summary and the per-contribution adjustments (the
/// facade turns these into audit records and events).
pub fn run_sweep(store: &mut LedgerStore, today: NaiveDate) -> (SweepReport, Vec<PenaltyAdjustment>) {
    let mut report = SweepReport::default();
    let mut adjustments = Vec::new();

    for contribution_id in store.all_contribution_ids() {
        report.examined += 1;

        let contribution = match store.get_contribution(&contribution_id) {
            Ok(c) => c,
            Err(err) => {
                warn!(%contribution_id, %err, "skipping contribution during penalty sweep");
                report.skipped += 1;
                continue;
            }
        };
        if contribution.is_paid() {
            continue;
        }
        let due_date = contribution.due_date();
        let member_id = contribution.member_id().to_string();
        let tour_id = contribution.tour_id().to_string();

        let group_id = match store.get_tour(&tour_id) {
            Ok(tour) => tour.group_id().to_string(),
            Err(err) => {
                warn!(%contribution_id, %tour_id, %err, "orphan contribution, skipping");
                report.skipped += 1;
                continue;
            }
        };
        let (grace_days, rate) = match store.get_group(&group_id) {
            Ok(group) => (group.grace_period_days() as i64, group.late_penalty_rate()),
            Err(err) => {
                warn!(%contribution_id, %group_id, %err, "orphan tour, skipping");
                report.skipped += 1;
                continue;
            }
        };

        let Some(rate) = rate else {
            continue; // group does not charge penalties
        };

        let grace_end = due_date + chrono::Duration::days(grace_days);
        let days_late = (today - grace_end).num_days();
        if days_late <= 0 {
            continue;
        }

        let penalty = rate * days_late;
        let total_paid = store.confirmed_total(&contribution_id);
        if let Ok(contribution) = store.get_contribution_mut(&contribution_id) {
            contribution.apply_penalty(penalty);
            // A larger total due can demote nothing (paid ones were
            // skipped); reconcile keeps status consistent with history
            contribution.reconcile(total_paid);
            let penalty_applied = contribution.penalty_applied();
            debug!(%contribution_id, days_late, penalty_applied, "late penalty applied");
            adjustments.push(PenaltyAdjustment {
                contribution_id,
                member_id,
                days_late,
                penalty_applied,
            });
            report.penalized += 1;
        }
    }

    (report, adjustments)
}
