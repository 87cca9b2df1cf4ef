//! # Storage Layer
//!
//! Two things live here: the in-memory index that answers every lookup, and the
//! persistence abstraction that keeps a copy of that index on disk.
//!
//! ## MappingStore
//!
//! [`MappingStore`] maps share codes to stored file names. It is backed by a
//! `DashMap`, so request handlers on different threads can read and write it
//! through a shared reference without an outer lock. It also tracks codes that
//! are *reserved* by uploads still in flight (see [`crate::codes`]).
//!
//! ## MappingBackend
//!
//! Persistence is abstracted behind the [`MappingBackend`] trait:
//!
//! - [`fs::JsonFileBackend`]: production backend, a single JSON object written
//!   next to the uploads (`mappings.json` by default)
//! - [`memory::InMemoryBackend`]: keeps the last saved snapshot in memory, for
//!   tests that should not touch the mapping file
//!
//! A backend only ever sees full snapshots. There is no journal: every save
//! overwrites the previous one, and a lost or corrupt snapshot is repaired by
//! the startup reconciliation in [`crate::reconcile`].
//!
//! ## Storage Format
//!
//! ```text
//! file-storage/
//! ├── mappings.json       # {"0042": "0042.pdf", "7310": "7310.png"}
//! ├── config.json         # optional settings
//! ├── 0042.pdf            # uploaded files, named <code><extension>
//! └── 7310.png
//! ```

use crate::error::Result;
use crate::model::Code;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeMap;
use std::path::Path;

pub mod fs;
pub mod memory;

/// A point-in-time copy of the code index, ordered by code.
pub type Mapping = BTreeMap<Code, String>;

/// Abstract interface for persisting the code index.
pub trait MappingBackend {
    /// Load the last saved mapping.
    ///
    /// Returns an empty mapping when nothing was saved yet. An unreadable or
    /// unparsable snapshot is an error; callers fall back to rebuilding the
    /// index from the upload directory.
    fn load(&self) -> Result<Mapping>;

    /// Overwrite the saved mapping with `mapping`.
    fn save(&self, mapping: &Mapping) -> Result<()>;

    /// Where the snapshot lives, for backends that write a file.
    fn location(&self) -> Option<&Path>;
}

/// The authoritative in-memory index of share codes.
#[derive(Debug, Default)]
pub struct MappingStore {
    pub(crate) entries: DashMap<Code, String>,
    pub(crate) reserved: DashSet<Code>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &Code) -> Option<String> {
        self.entries.get(code).map(|entry| entry.value().clone())
    }

    /// Insert or replace the file name for `code`. Last writer wins.
    pub fn put(&self, code: Code, stored_name: String) -> Option<String> {
        self.entries.insert(code, stored_name)
    }

    pub fn remove(&self, code: &Code) -> Option<String> {
        self.entries.remove(code).map(|(_, name)| name)
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.entries.contains_key(code)
    }

    /// Number of live entries. Reserved codes are not counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry out of the map.
    pub fn entries(&self) -> Mapping {
        self.entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }
}

impl FromIterator<(Code, String)> for MappingStore {
    fn from_iter<I: IntoIterator<Item = (Code, String)>>(iter: I) -> Self {
        let store = MappingStore::new();
        for (code, name) in iter {
            store.put(code, name);
        }
        store
    }
}
