pub mod file;
pub mod ledger;

pub use file::{FileId, FileRecord, FileStatus, InvalidPriorityLabel, Priority};
pub use ledger::{Alert, Escalation};
