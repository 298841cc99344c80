//! File intake: the upload-time SLA path.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::metadata::MetadataResolver;
use crate::model::FileRecord;
use crate::sla::deadline::deadline_for;
use crate::store::{SlaStore, StoreError};

pub struct IntakeService {
    resolver: MetadataResolver,
    store: Arc<dyn SlaStore>,
}

impl IntakeService {
    pub fn new(resolver: MetadataResolver, store: Arc<dyn SlaStore>) -> Self {
        Self { resolver, store }
    }

    /// Registers a newly arrived document: resolves (priority, document date),
    /// derives the SLA deadline from the upload time, and inserts the file in
    /// Pending status.
    ///
    /// `now` is the upload timestamp and the anchor for all later elapsed-time
    /// math. Metadata resolution cannot fail; only a storage problem errors.
    pub async fn register(
        &self,
        source_path: &Path,
        filename: &str,
        section: &str,
        now: DateTime<Utc>,
    ) -> Result<FileRecord, StoreError> {
        let metadata = self.resolver.resolve(source_path).await;

        let mut file = FileRecord::new(filename, section, metadata.priority, now);
        file.document_date = metadata.document_date;
        file.sla_deadline = Some(deadline_for(metadata.priority, now));

        self.store.insert_file(&file)?;

        info!(
            file_id = %file.id,
            priority = %file.priority,
            section = %file.section,
            "Registered file, SLA deadline {}",
            file.sla_deadline
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        );

        Ok(file)
    }
}
