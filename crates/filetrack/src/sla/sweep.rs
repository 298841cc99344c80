//! The periodic SLA re-evaluation pass.
//!
//! One sweep walks a snapshot of all Pending files at an explicit `now`,
//! moves deadline-crossers to Overdue, latches near-deadline reminders, and
//! appends the matching ledger records. Every ledger write is gated on an
//! observable state change committed through `update_if_pending`, which makes
//! the pass idempotent: re-running with the same `now` writes nothing.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info_span, warn};

use crate::model::{Alert, Escalation, FileId, FileRecord, FileStatus};
use crate::store::{SlaStore, StoreError};

/// What the sweep decided for one file. Pure function of (file, now).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepAction {
    /// Deadline crossed: transition Pending -> Overdue, alert + escalate.
    MarkOverdue { deadline: DateTime<Utc> },

    /// Inside the final day before the deadline and not yet reminded.
    SendReminder { deadline: DateTime<Utc> },

    /// Nothing to do this pass.
    Untouched,

    /// Pending file without a deadline: invalid state, skip it rather than
    /// failing the batch.
    MissingDeadline,
}

/// Classifies a single file against the clock.
///
/// The overdue comparison is strictly `now > deadline` — a sweep landing
/// exactly on the deadline leaves the file Pending.
pub fn assess(file: &FileRecord, now: DateTime<Utc>) -> SweepAction {
    let Some(deadline) = file.sla_deadline else {
        return SweepAction::MissingDeadline;
    };

    if now > deadline {
        SweepAction::MarkOverdue { deadline }
    } else if deadline - now < Duration::days(1) && !file.reminder_sent {
        SweepAction::SendReminder { deadline }
    } else {
        SweepAction::Untouched
    }
}

/// Everything one sweep did, for callers and logs.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Number of Pending files in the snapshot.
    pub evaluated: usize,
    /// Files transitioned to Overdue this pass.
    pub overdue: Vec<FileId>,
    /// Files whose reminder latch was set this pass.
    pub reminded: Vec<FileId>,
    /// Files skipped because of a malformed deadline state.
    pub skipped: Vec<FileId>,
    pub alerts: Vec<Alert>,
    pub escalations: Vec<Escalation>,
}

pub struct SweepEngine {
    store: Arc<dyn SlaStore>,
}

impl SweepEngine {
    pub fn new(store: Arc<dyn SlaStore>) -> Self {
        Self { store }
    }

    /// Runs one sweep at the given time.
    ///
    /// `now` is an explicit input so the pass is a deterministic function of
    /// (file set, time); only the scheduler reads the wall clock. Ledger
    /// records are stamped with this same `now`.
    ///
    /// Storage errors abort the pass with `?`; nothing else does. A file that
    /// left Pending between snapshot and write is silently left alone.
    pub fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, StoreError> {
        let pending = self.store.pending_files()?;

        let _span = info_span!("sla.sweep", pending = pending.len()).entered();

        let mut report = SweepReport {
            evaluated: pending.len(),
            ..SweepReport::default()
        };

        for file in pending {
            match assess(&file, now) {
                SweepAction::MissingDeadline => {
                    warn!(
                        file_id = %file.id,
                        "pending file has no SLA deadline; skipping this sweep"
                    );
                    report.skipped.push(file.id);
                }
                SweepAction::MarkOverdue { deadline } => {
                    self.mark_overdue(file, deadline, now, &mut report)?;
                }
                SweepAction::SendReminder { deadline } => {
                    self.send_reminder(file, deadline, now, &mut report)?;
                }
                SweepAction::Untouched => {}
            }
        }

        debug!(
            overdue = report.overdue.len(),
            reminded = report.reminded.len(),
            skipped = report.skipped.len(),
            "sweep complete"
        );

        Ok(report)
    }

    fn mark_overdue(
        &self,
        mut file: FileRecord,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) -> Result<(), StoreError> {
        file.status = FileStatus::Overdue;
        file.escalation_level += 1;

        if !self.store.update_if_pending(&file)? {
            debug!(file_id = %file.id, "file completed mid-sweep; not marking overdue");
            return Ok(());
        }

        // Ledger writes happen only on the transition edge, just committed.
        let alert = Alert::deadline_missed(&file, deadline, now);
        self.store.append_alert(&alert)?;

        let escalation = Escalation::new(file.id, file.escalation_level, now);
        self.store.append_escalation(&escalation)?;

        report.overdue.push(file.id);
        report.alerts.push(alert);
        report.escalations.push(escalation);
        Ok(())
    }

    fn send_reminder(
        &self,
        mut file: FileRecord,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) -> Result<(), StoreError> {
        file.reminder_sent = true;

        if !self.store.update_if_pending(&file)? {
            debug!(file_id = %file.id, "file completed mid-sweep; not sending reminder");
            return Ok(());
        }

        let alert = Alert::near_deadline(&file, deadline, now);
        self.store.append_alert(&alert)?;

        report.reminded.push(file.id);
        report.alerts.push(alert);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::sla::deadline::deadline_for;
    use crate::store::{FileStore, InMemoryStore, LedgerStore};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn seeded(priority: Priority) -> (Arc<InMemoryStore>, SweepEngine, FileRecord) {
        let store = Arc::new(InMemoryStore::new());
        let mut file = FileRecord::new("doc.pdf", "A", priority, t0());
        file.sla_deadline = Some(deadline_for(priority, t0()));
        store.insert_file(&file).unwrap();
        let engine = SweepEngine::new(store.clone());
        (store, engine, file)
    }

    // ── assess ──

    #[test]
    fn test_assess_untouched_well_before_deadline() {
        let (_, _, file) = seeded(Priority::Medium);
        assert_eq!(assess(&file, t0()), SweepAction::Untouched);
        assert_eq!(
            assess(&file, t0() + Duration::days(3)),
            SweepAction::Untouched
        );
    }

    #[test]
    fn test_assess_reminder_inside_final_day() {
        let (_, _, file) = seeded(Priority::Medium);
        let now = t0() + Duration::days(4) + Duration::hours(1);
        assert!(matches!(
            assess(&file, now),
            SweepAction::SendReminder { .. }
        ));
    }

    #[test]
    fn test_assess_no_reminder_once_latched() {
        let (_, _, mut file) = seeded(Priority::Medium);
        file.reminder_sent = true;
        let now = t0() + Duration::days(4) + Duration::hours(1);
        assert_eq!(assess(&file, now), SweepAction::Untouched);
    }

    #[test]
    fn test_assess_exactly_at_deadline_is_not_overdue() {
        let (_, _, file) = seeded(Priority::Medium);
        let deadline = file.sla_deadline.unwrap();

        // At the deadline: not overdue (strict comparison), and inside the
        // reminder window.
        assert!(matches!(
            assess(&file, deadline),
            SweepAction::SendReminder { .. }
        ));

        // One second past: overdue.
        assert!(matches!(
            assess(&file, deadline + Duration::seconds(1)),
            SweepAction::MarkOverdue { .. }
        ));
    }

    #[test]
    fn test_assess_missing_deadline() {
        let mut file = FileRecord::new("bad.pdf", "A", Priority::Low, t0());
        file.sla_deadline = None;
        assert_eq!(assess(&file, t0()), SweepAction::MissingDeadline);
    }

    // ── run_sweep ──

    #[test]
    fn test_sweep_marks_overdue_with_alert_and_escalation() {
        let (store, engine, file) = seeded(Priority::Critical);
        let now = t0() + Duration::days(1) + Duration::hours(1);

        let report = engine.run_sweep(now).unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.overdue, vec![file.id]);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.escalations.len(), 1);
        assert_eq!(report.escalations[0].level, 1);

        let stored = store.file(file.id).unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Overdue);
        assert_eq!(stored.escalation_level, 1);
        assert!(stored.sla_deadline.is_some());

        assert!(report.alerts[0].message.contains("OVERDUE"));
    }

    #[test]
    fn test_sweep_sends_reminder_once() {
        let (store, engine, file) = seeded(Priority::Medium);
        let now = t0() + Duration::days(4) + Duration::hours(6);

        let report = engine.run_sweep(now).unwrap();
        assert_eq!(report.reminded, vec![file.id]);
        assert_eq!(report.alerts.len(), 1);
        assert!(report.escalations.is_empty());
        assert!(report.alerts[0].message.contains("nearing deadline"));

        let stored = store.file(file.id).unwrap().unwrap();
        assert!(stored.reminder_sent);
        assert_eq!(stored.status, FileStatus::Pending);

        // A later sweep, still before the deadline, stays quiet.
        let later = now + Duration::hours(3);
        let report = engine.run_sweep(later).unwrap();
        assert!(report.reminded.is_empty());
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let (store, engine, file) = seeded(Priority::Critical);
        let now = t0() + Duration::days(2);

        let first = engine.run_sweep(now).unwrap();
        assert_eq!(first.overdue.len(), 1);

        let second = engine.run_sweep(now).unwrap();
        assert!(second.overdue.is_empty());
        assert!(second.alerts.is_empty());
        assert!(second.escalations.is_empty());

        let stored = store.file(file.id).unwrap().unwrap();
        assert_eq!(stored.escalation_level, 1);
        assert_eq!(store.alerts_for_file(file.id).unwrap().len(), 1);
        assert_eq!(store.escalations_for_file(file.id).unwrap().len(), 1);
    }

    #[test]
    fn test_sweep_never_touches_completed_files() {
        let (store, engine, file) = seeded(Priority::Critical);
        store
            .complete_file(file.id, t0() + Duration::hours(2))
            .unwrap();

        let report = engine.run_sweep(t0() + Duration::days(3)).unwrap();
        assert_eq!(report.evaluated, 0);

        let stored = store.file(file.id).unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Completed);
        assert_eq!(stored.escalation_level, 0);
    }

    #[test]
    fn test_sweep_skips_malformed_deadline_without_blocking_batch() {
        let store = Arc::new(InMemoryStore::new());

        let mut broken = FileRecord::new("broken.pdf", "A", Priority::Medium, t0());
        broken.sla_deadline = None;
        store.insert_file(&broken).unwrap();

        let mut healthy = FileRecord::new("healthy.pdf", "B", Priority::Critical, t0());
        healthy.sla_deadline = Some(deadline_for(Priority::Critical, t0()));
        store.insert_file(&healthy).unwrap();

        let engine = SweepEngine::new(store.clone());
        let report = engine.run_sweep(t0() + Duration::days(2)).unwrap();

        assert_eq!(report.skipped, vec![broken.id]);
        assert_eq!(report.overdue, vec![healthy.id]);
    }

    #[test]
    fn test_escalation_count_matches_level() {
        let (store, engine, file) = seeded(Priority::High);

        for days in [1, 2, 4, 5, 6] {
            engine.run_sweep(t0() + Duration::days(days)).unwrap();
        }

        let stored = store.file(file.id).unwrap().unwrap();
        let escalations = store.escalations_for_file(file.id).unwrap();
        assert_eq!(escalations.len() as u32, stored.escalation_level);
        assert_eq!(stored.escalation_level, 1);
    }
}
