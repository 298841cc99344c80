pub mod classifier;
pub mod config;
pub mod dates;
pub mod error;
pub mod intake;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod processor;
pub mod sla;
pub mod store;

pub use classifier::{Classifier, ClassifierOutcome, ClassifierVerdict, HttpClassifier};
pub use config::{load_config, ClassifierConfig, Config, SweepConfig};
pub use dates::{DateNormalizer, DateParseError};
pub use error::{ConfigError, ExtractError, FiletrackError, Result};
pub use intake::IntakeService;
pub use metadata::{MetadataResolver, ResolvedMetadata};
pub use model::{Alert, Escalation, FileId, FileRecord, FileStatus, Priority};
pub use sla::{deadline_for, project, watchlist, SlaProjection, SweepEngine, SweepReport, SweepScheduler};
pub use store::{FileStore, InMemoryStore, LedgerStore, SlaStore, StoreError};
