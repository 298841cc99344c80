//! Test harness bundling an in-memory store with a sweep engine.

use std::sync::Arc;

use filetrack::{FileRecord, InMemoryStore, SweepEngine};

pub struct SweepHarness {
    pub store: Arc<InMemoryStore>,
    pub engine: SweepEngine,
}

impl SweepHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let engine = SweepEngine::new(store.clone());
        Self { store, engine }
    }

    /// Inserts a file and returns it for later assertions.
    pub fn seed(&self, file: FileRecord) -> FileRecord {
        use filetrack::FileStore;
        self.store.insert_file(&file).expect("insert seeded file");
        file
    }

    /// Fetches the current stored state of a file.
    pub fn stored(&self, file: &FileRecord) -> FileRecord {
        use filetrack::FileStore;
        self.store
            .file(file.id)
            .expect("store readable")
            .expect("file exists")
    }
}

impl Default for SweepHarness {
    fn default() -> Self {
        Self::new()
    }
}
