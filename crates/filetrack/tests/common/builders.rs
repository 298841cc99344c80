//! Builders for test fixtures.

use chrono::{DateTime, TimeZone, Utc};

use filetrack::sla::deadline::deadline_for;
use filetrack::{FileRecord, Priority};

/// A fixed reference upload time; every scenario offsets from here.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A Pending file uploaded at `uploaded_at` with its deadline derived the
/// same way intake derives it.
pub fn pending_file(priority: Priority, uploaded_at: DateTime<Utc>) -> FileRecord {
    let mut file = FileRecord::new("document.pdf", "A", priority, uploaded_at);
    file.sla_deadline = Some(deadline_for(priority, uploaded_at));
    file
}

/// Same, with a caller-chosen filename and section.
pub fn named_pending_file(
    filename: &str,
    section: &str,
    priority: Priority,
    uploaded_at: DateTime<Utc>,
) -> FileRecord {
    let mut file = FileRecord::new(filename, section, priority, uploaded_at);
    file.sla_deadline = Some(deadline_for(priority, uploaded_at));
    file
}
