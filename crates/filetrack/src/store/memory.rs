use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{Alert, Escalation, FileId, FileRecord, FileStatus};
use crate::store::{FileStore, LedgerStore, StoreError};

#[derive(Default)]
struct Inner {
    files: HashMap<FileId, FileRecord>,
    alerts: Vec<Alert>,
    escalations: Vec<Escalation>,
}

/// Thread-safe in-memory store. Per-file atomicity comes from the single
/// mutex; that is all the engine's contract requires.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> Result<T, StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("mutex poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl FileStore for InMemoryStore {
    fn insert_file(&self, file: &FileRecord) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            inner.files.insert(file.id, file.clone());
        })
    }

    fn file(&self, id: FileId) -> Result<Option<FileRecord>, StoreError> {
        self.with_inner(|inner| inner.files.get(&id).cloned())
    }

    fn all_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        self.with_inner(|inner| inner.files.values().cloned().collect())
    }

    fn pending_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        self.with_inner(|inner| {
            inner
                .files
                .values()
                .filter(|f| f.status == FileStatus::Pending)
                .cloned()
                .collect()
        })
    }

    fn update_if_pending(&self, file: &FileRecord) -> Result<bool, StoreError> {
        self.with_inner(|inner| match inner.files.get_mut(&file.id) {
            Some(current) if current.status == FileStatus::Pending => {
                *current = file.clone();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(StoreError::FileNotFound(file.id)),
        })?
    }

    fn complete_file(&self, id: FileId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        self.with_inner(|inner| match inner.files.get_mut(&id) {
            Some(file) => Ok(file.mark_completed(now)),
            None => Err(StoreError::FileNotFound(id)),
        })?
    }
}

impl LedgerStore for InMemoryStore {
    fn append_alert(&self, alert: &Alert) -> Result<(), StoreError> {
        self.with_inner(|inner| inner.alerts.push(alert.clone()))
    }

    fn append_escalation(&self, escalation: &Escalation) -> Result<(), StoreError> {
        self.with_inner(|inner| inner.escalations.push(escalation.clone()))
    }

    fn alerts_for_file(&self, id: FileId) -> Result<Vec<Alert>, StoreError> {
        self.with_inner(|inner| {
            inner
                .alerts
                .iter()
                .filter(|a| a.file_id == id)
                .cloned()
                .collect()
        })
    }

    fn escalations_for_file(&self, id: FileId) -> Result<Vec<Escalation>, StoreError> {
        self.with_inner(|inner| {
            inner
                .escalations
                .iter()
                .filter(|e| e.file_id == id)
                .cloned()
                .collect()
        })
    }

    fn unread_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.with_inner(|inner| {
            inner
                .alerts
                .iter()
                .filter(|a| !a.is_read)
                .cloned()
                .collect()
        })
    }

    fn mark_alert_read(&self, alert_id: Uuid) -> Result<bool, StoreError> {
        self.with_inner(|inner| {
            match inner.alerts.iter_mut().find(|a| a.id == alert_id) {
                Some(alert) => {
                    alert.is_read = true;
                    true
                }
                None => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn pending_file() -> FileRecord {
        let mut file = FileRecord::new("doc.pdf", "A", Priority::Medium, t0());
        file.sla_deadline = Some(t0() + chrono::Duration::days(5));
        file
    }

    #[test]
    fn test_insert_and_fetch() {
        let store = InMemoryStore::new();
        let file = pending_file();
        store.insert_file(&file).unwrap();

        let fetched = store.file(file.id).unwrap().unwrap();
        assert_eq!(fetched.filename, "doc.pdf");
        assert_eq!(store.pending_files().unwrap().len(), 1);
    }

    #[test]
    fn test_update_if_pending_succeeds_for_pending() {
        let store = InMemoryStore::new();
        let mut file = pending_file();
        store.insert_file(&file).unwrap();

        file.status = FileStatus::Overdue;
        file.escalation_level = 1;
        assert!(store.update_if_pending(&file).unwrap());

        let stored = store.file(file.id).unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Overdue);
        assert_eq!(stored.escalation_level, 1);
    }

    #[test]
    fn test_update_if_pending_skips_completed() {
        let store = InMemoryStore::new();
        let mut file = pending_file();
        store.insert_file(&file).unwrap();

        // File completes between snapshot and write.
        store
            .complete_file(file.id, t0() + chrono::Duration::days(1))
            .unwrap();

        file.status = FileStatus::Overdue;
        assert!(!store.update_if_pending(&file).unwrap());

        // Completion was not resurrected to Overdue.
        let stored = store.file(file.id).unwrap().unwrap();
        assert_eq!(stored.status, FileStatus::Completed);
    }

    #[test]
    fn test_update_unknown_file_errors() {
        let store = InMemoryStore::new();
        let file = pending_file();
        let result = store.update_if_pending(&file);
        assert!(matches!(result, Err(StoreError::FileNotFound(_))));
    }

    #[test]
    fn test_complete_file_is_idempotent() {
        let store = InMemoryStore::new();
        let file = pending_file();
        store.insert_file(&file).unwrap();

        assert!(store.complete_file(file.id, t0()).unwrap());
        assert!(!store.complete_file(file.id, t0()).unwrap());

        let stored = store.file(file.id).unwrap().unwrap();
        assert!(stored.sla_deadline.is_none());
        assert_eq!(stored.completed_at, Some(t0()));
    }

    #[test]
    fn test_ledger_queries() {
        let store = InMemoryStore::new();
        let file = pending_file();
        store.insert_file(&file).unwrap();

        let alert = Alert::new(file.id, "msg".to_string(), t0());
        store.append_alert(&alert).unwrap();
        store
            .append_escalation(&Escalation::new(file.id, 1, t0()))
            .unwrap();

        assert_eq!(store.alerts_for_file(file.id).unwrap().len(), 1);
        assert_eq!(store.escalations_for_file(file.id).unwrap().len(), 1);
        assert_eq!(store.unread_alerts().unwrap().len(), 1);

        assert!(store.mark_alert_read(alert.id).unwrap());
        assert!(store.unread_alerts().unwrap().is_empty());
        assert!(!store.mark_alert_read(Uuid::new_v4()).unwrap());
    }
}
