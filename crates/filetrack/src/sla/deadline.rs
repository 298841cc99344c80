//! Deadline calculation. Fixed policy, deterministic, side-effect free.

use chrono::{DateTime, Duration, Utc};

use crate::model::Priority;

/// SLA duration for a priority. Calendar days in UTC, no timezone-local
/// adjustment.
pub fn sla_duration(priority: Priority) -> Duration {
    match priority {
        Priority::Critical => Duration::days(1),
        Priority::High => Duration::days(3),
        Priority::Medium => Duration::days(5),
        Priority::Low => Duration::days(7),
    }
}

/// Absolute deadline for a file with the given priority, anchored at its
/// upload time.
pub fn deadline_for(priority: Priority, anchor: DateTime<Utc>) -> DateTime<Utc> {
    anchor + sla_duration(priority)
}
