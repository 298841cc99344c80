//! Storage collaborator seams.
//!
//! The engine needs read-all/write-by-id access to file records and
//! append-only access to the alert/escalation ledger; it never requires
//! transactions beyond per-file atomicity. Persistence technology is the
//! host's concern — the in-memory implementation here is the default
//! collaborator and the one the test suite runs against.

pub mod memory;

pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Alert, Escalation, FileId, FileRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {0}")]
    FileNotFound(FileId),

    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

pub trait FileStore: Send + Sync {
    fn insert_file(&self, file: &FileRecord) -> Result<(), StoreError>;

    fn file(&self, id: FileId) -> Result<Option<FileRecord>, StoreError>;

    fn all_files(&self) -> Result<Vec<FileRecord>, StoreError>;

    /// Snapshot of every file currently in Pending status. One sweep works
    /// over one snapshot.
    fn pending_files(&self) -> Result<Vec<FileRecord>, StoreError>;

    /// Writes an updated record only if the stored copy is still Pending.
    /// Returns false (without writing) when the file moved on — this is the
    /// gate that lets a mid-sweep completion win over an Overdue transition.
    fn update_if_pending(&self, file: &FileRecord) -> Result<bool, StoreError>;

    /// The external mark-complete action: sets Completed, records the
    /// completion time, and clears the deadline so the file leaves SLA
    /// monitoring. Returns false if the file was already Completed.
    fn complete_file(&self, id: FileId, now: DateTime<Utc>) -> Result<bool, StoreError>;
}

pub trait LedgerStore: Send + Sync {
    fn append_alert(&self, alert: &Alert) -> Result<(), StoreError>;

    fn append_escalation(&self, escalation: &Escalation) -> Result<(), StoreError>;

    fn alerts_for_file(&self, id: FileId) -> Result<Vec<Alert>, StoreError>;

    fn escalations_for_file(&self, id: FileId) -> Result<Vec<Escalation>, StoreError>;

    fn unread_alerts(&self) -> Result<Vec<Alert>, StoreError>;

    /// Dashboard-side acknowledgement. Returns false for an unknown alert id.
    fn mark_alert_read(&self, alert_id: Uuid) -> Result<bool, StoreError>;
}

/// Everything the sweep engine needs from storage.
pub trait SlaStore: FileStore + LedgerStore {}

impl<T: FileStore + LedgerStore> SlaStore for T {}
