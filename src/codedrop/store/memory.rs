use super::{Mapping, MappingBackend};
use crate::error::{CodedropError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory persistence for testing.
/// Keeps the last saved snapshot; nothing reaches the disk.
#[derive(Default)]
pub struct InMemoryBackend {
    saved: Mutex<Option<Mapping>>,
    corrupt: AtomicBool,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `mapping`, as if saved by a previous run.
    pub fn with_mapping(mapping: Mapping) -> Self {
        let backend = Self::new();
        *backend.lock() = Some(mapping);
        backend
    }

    /// Make `load` fail the way an unparsable snapshot would.
    pub fn corrupt(self) -> Self {
        self.corrupt.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last successfully saved snapshot, if any.
    pub fn saved(&self) -> Option<Mapping> {
        self.lock().clone()
    }

    /// How many saves succeeded.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Mapping>> {
        self.saved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl MappingBackend for InMemoryBackend {
    fn load(&self) -> Result<Mapping> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(CodedropError::Persistence(
                "snapshot is not valid JSON".to_string(),
            ));
        }
        Ok(self.lock().clone().unwrap_or_default())
    }

    fn save(&self, mapping: &Mapping) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CodedropError::Persistence("disk full".to_string()));
        }
        *self.lock() = Some(mapping.clone());
        self.corrupt.store(false, Ordering::SeqCst);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        None
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Code;

    /// Mapping from hand-written `(code, stored name)` pairs.
    pub fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(code, name)| {
                let code: Code = code
                    .parse()
                    .unwrap_or_else(|_| panic!("fixture code {code:?} is not four digits"));
                (code, name.to_string())
            })
            .collect()
    }

    /// Backend holding `pairs` as if a previous run had saved them.
    pub fn backend_with(pairs: &[(&str, &str)]) -> InMemoryBackend {
        InMemoryBackend::with_mapping(mapping(pairs))
    }
}
