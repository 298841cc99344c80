//! Metadata resolution at intake time.
//!
//! Combines the external classifier's verdict with the local text-extraction
//! fallback to produce a final (priority, document date) pair. This function
//! is total: whatever breaks — classifier down, label garbage, document
//! unreadable — the caller gets a usable result, with Medium priority and no
//! date as the floor.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::classifier::{Classifier, ClassifierOutcome};
use crate::dates::DateNormalizer;
use crate::model::Priority;
use crate::processor::ExtractorRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub priority: Priority,
    pub document_date: Option<NaiveDate>,
}

pub struct MetadataResolver {
    classifier: Option<Arc<dyn Classifier>>,
    extractors: ExtractorRegistry,
    normalizer: DateNormalizer,
}

impl MetadataResolver {
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self {
            classifier,
            extractors: ExtractorRegistry::new(),
            normalizer: DateNormalizer::new(),
        }
    }

    /// Resolves metadata for the document at `path`. Never fails.
    pub async fn resolve(&self, path: &Path) -> ResolvedMetadata {
        let mut priority = None;
        let mut document_date = None;

        if let Some(classifier) = &self.classifier {
            if let Some((label, date_string)) = self.ask_classifier(classifier.as_ref(), path).await
            {
                priority = label.and_then(|label| match Priority::from_label(&label) {
                    Ok(priority) => Some(priority),
                    Err(e) => {
                        warn!("Classifier priority ignored: {}", e);
                        None
                    }
                });

                document_date =
                    date_string.and_then(|raw| match self.normalizer.normalize(&raw) {
                        Ok(date) => Some(date),
                        Err(e) => {
                            warn!("Classifier date '{}' ignored: {}", raw, e);
                            None
                        }
                    });
            }
        } else {
            debug!("No classifier configured; using defaults and local fallback");
        }

        if document_date.is_none() {
            document_date = self.extract_date_locally(path);
        }

        ResolvedMetadata {
            priority: priority.unwrap_or(Priority::Medium),
            document_date,
        }
    }

    /// Runs the classifier, absorbing every failure mode into `None`.
    async fn ask_classifier(
        &self,
        classifier: &dyn Classifier,
        path: &Path,
    ) -> Option<(Option<String>, Option<String>)> {
        let document = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not read document for classification: {}", e);
                return None;
            }
        };

        let mime_type = mime_guess::from_path(path).first().map(|m| m.to_string());

        match classifier.classify(&document, mime_type.as_deref()).await {
            ClassifierOutcome::Classified(verdict) => {
                Some((verdict.priority, verdict.extracted_date))
            }
            ClassifierOutcome::Unavailable { reason } => {
                debug!("Classifier unavailable: {}", reason);
                None
            }
            ClassifierOutcome::Malformed { reason } => {
                warn!("Classifier returned malformed output: {}", reason);
                None
            }
        }
    }

    /// Fallback path: pull text out of the document and scan it for a date.
    fn extract_date_locally(&self, path: &Path) -> Option<NaiveDate> {
        let text = match self.extractors.extract(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("Local text extraction unavailable: {}", e);
                return None;
            }
        };

        match self.normalizer.normalize(&text) {
            Ok(date) => {
                debug!("Fallback date extraction found {}", date);
                Some(date)
            }
            Err(e) => {
                debug!("Fallback date extraction found nothing: {}", e);
                None
            }
        }
    }
}
