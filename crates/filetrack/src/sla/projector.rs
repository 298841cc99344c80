//! Elapsed-percentage projection for dashboard consumers.

use chrono::{DateTime, Duration, Utc};

use crate::model::{FileRecord, FileStatus};

/// How far through its SLA window a Pending file is, rendered for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaProjection {
    /// 0..=100, rounded.
    pub percentage: u8,
    /// `"{days}d {hours}h"` with a day or more left, `"{hours}h"` under a
    /// day, or the literal `"Overdue"` past the deadline.
    pub time_left: String,
    /// Surfaced on the dashboard watchlist only past the halfway mark.
    pub alert_worthy: bool,
}

/// Projects one file against the clock.
///
/// Returns `None` when there is nothing meaningful to show: the file is not
/// Pending, it has no deadline, or the recorded window is zero/negative
/// (malformed deadline guard).
pub fn project(file: &FileRecord, now: DateTime<Utc>) -> Option<SlaProjection> {
    if file.status != FileStatus::Pending {
        return None;
    }
    let deadline = file.sla_deadline?;

    let total = (deadline - file.uploaded_at).num_seconds();
    if total <= 0 {
        return None;
    }

    let elapsed = (now - file.uploaded_at).num_seconds();
    let percentage = (elapsed as f64 / total as f64 * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8;

    let remaining = deadline - now;
    let time_left = if remaining < Duration::zero() {
        "Overdue".to_string()
    } else {
        let days = remaining.num_days();
        let hours = (remaining - Duration::days(days)).num_hours();
        if days > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}h", hours)
        }
    };

    Some(SlaProjection {
        percentage,
        time_left,
        alert_worthy: percentage > 50,
    })
}

/// Dashboard watchlist: every Pending file past the halfway mark, paired with
/// its projection.
pub fn watchlist<'a>(
    files: &'a [FileRecord],
    now: DateTime<Utc>,
) -> Vec<(&'a FileRecord, SlaProjection)> {
    files
        .iter()
        .filter_map(|file| {
            let projection = project(file, now)?;
            projection.alert_worthy.then_some((file, projection))
        })
        .collect()
}
