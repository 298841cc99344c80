//! Append-only ledger record types.
//!
//! Alerts and escalations are immutable once created; the only mutation
//! anywhere is the dashboard consumer flipping an alert's read flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::{FileId, FileRecord};

/// A human-facing notification raised by the sweep engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub file_id: FileId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Mutated only by the dashboard consumer, never by the engine.
    pub is_read: bool,
}

impl Alert {
    pub fn new(file_id: FileId, message: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            message,
            created_at: now,
            is_read: false,
        }
    }

    /// Alert raised on the Pending -> Overdue transition edge.
    pub fn deadline_missed(file: &FileRecord, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::new(
            file.id,
            format!(
                "File {} is OVERDUE! Deadline was {}",
                file.filename,
                deadline.format("%Y-%m-%d %H:%M")
            ),
            now,
        )
    }

    /// Alert raised once when a file enters the final day before its deadline.
    pub fn near_deadline(file: &FileRecord, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::new(
            file.id,
            format!(
                "File {} is nearing deadline. Due: {}",
                file.filename,
                deadline.format("%Y-%m-%d %H:%M")
            ),
            now,
        )
    }
}

/// Permanent record of one overdue-threshold crossing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub id: Uuid,
    pub file_id: FileId,
    pub level: u32,
    pub triggered_at: DateTime<Utc>,
}

impl Escalation {
    pub fn new(file_id: FileId, level: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            level,
            triggered_at: now,
        }
    }
}
