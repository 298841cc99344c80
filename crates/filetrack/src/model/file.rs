use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque identity of a tracked file, assigned at intake.
pub type FileId = Uuid;

/// Urgency level assigned at intake. Immutable for the lifetime of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Error returned when a classifier label does not name a known priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized priority label: '{0}'")]
pub struct InvalidPriorityLabel(pub String);

impl Priority {
    /// Parses a classifier-provided label, case-insensitively.
    ///
    /// Callers that must not fail (the metadata resolver) map the error to
    /// [`Priority::Medium`].
    pub fn from_label(label: &str) -> Result<Self, InvalidPriorityLabel> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(InvalidPriorityLabel(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a file.
///
/// `Pending -> Overdue` is driven by the sweep engine; `Completed` is terminal
/// and reachable from either of the other two via the external mark-complete
/// action. No transition ever runs backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Pending,
    Overdue,
    Completed,
}

impl FileStatus {
    /// A file still subject to SLA monitoring.
    pub fn is_open(&self) -> bool {
        matches!(self, FileStatus::Pending | FileStatus::Overdue)
    }
}

/// A tracked physical/scanned document moving through sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    /// Original filename of the uploaded document.
    pub filename: String,
    /// Organizational section the file belongs to. Informational only; never
    /// part of SLA math.
    pub section: String,
    pub priority: Priority,
    pub status: FileStatus,
    /// Anchor timestamp for all elapsed-time math.
    pub uploaded_at: DateTime<Utc>,
    /// Calendar date extracted from the document content, when one was found.
    pub document_date: Option<NaiveDate>,
    /// Absolute deadline while the file is Pending/Overdue; cleared on
    /// completion.
    pub sla_deadline: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Latched true the first time a near-deadline reminder fires.
    pub reminder_sent: bool,
    /// Count of overdue-threshold crossings. Only ever increments, and every
    /// increment has a matching Escalation record.
    pub escalation_level: u32,
}

impl FileRecord {
    /// Creates a fresh Pending record. The deadline is set by intake once the
    /// priority is final.
    pub fn new(filename: &str, section: &str, priority: Priority, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            section: section.to_string(),
            priority,
            status: FileStatus::Pending,
            uploaded_at,
            document_date: None,
            sla_deadline: None,
            completed_at: None,
            reminder_sent: false,
            escalation_level: 0,
        }
    }

    /// Marks the file Completed, recording the completion time and dropping
    /// the deadline so the file leaves SLA monitoring. Returns false if the
    /// file was already Completed (the transition happens at most once).
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == FileStatus::Completed {
            return false;
        }
        self.status = FileStatus::Completed;
        self.completed_at = Some(now);
        self.sla_deadline = None;
        true
    }
}
