//! External document classification capability.
//!
//! The classifier is a remote service that reads a document and returns an
//! urgency label plus an optional document date. It may be unconfigured, time
//! out, or return garbage; every failure mode is surfaced as an inspectable
//! [`ClassifierOutcome`] variant rather than an error, because no classifier
//! problem is ever allowed to fail file intake.

pub mod http;

pub use http::HttpClassifier;

use async_trait::async_trait;
use serde::Deserialize;

/// Raw, unvalidated classifier output. Either field may be absent or
/// nonsense; the metadata resolver validates both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierVerdict {
    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub extracted_date: Option<String>,
}

/// Result of one classification attempt.
#[derive(Debug, Clone)]
pub enum ClassifierOutcome {
    /// The service answered with something parseable.
    Classified(ClassifierVerdict),

    /// No service configured, or it could not be reached in time.
    Unavailable { reason: String },

    /// The service answered, but the response could not be understood.
    Malformed { reason: String },
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies a document. Must be time-bounded by the implementation; a
    /// slow or dead service is reported as `Unavailable`, never awaited
    /// indefinitely.
    async fn classify(&self, document: &[u8], mime_type: Option<&str>) -> ClassifierOutcome;
}
