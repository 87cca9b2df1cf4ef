//! # Startup Reconciliation
//!
//! The mapping snapshot and the upload directory can disagree: the process may
//! have died between writing a file and saving the snapshot, a save may have
//! failed, or someone may have deleted files by hand. Reconciliation rebuilds
//! the in-memory index from both sources:
//!
//! 1. Load the snapshot. If it cannot be read, start from nothing.
//! 2. Keep snapshot entries whose file still exists; drop the rest. Entries
//!    naming the snapshot, the config file or a temp file are dropped too.
//! 3. List the upload directory (minus the snapshot file itself).
//! 4. Every file whose name starts with four digits is indexed under those
//!    digits, unless the code is already taken.
//! 5. Save the result, whether or not anything changed.
//!
//! The directory decides whether a file *exists*; the snapshot decides which
//! code a file has when both agree. When two files share a four-digit prefix,
//! whichever is already mapped keeps the code and the other is not recovered.

use crate::config::CONFIG_FILENAME;
use crate::model::Code;
use crate::store::{MappingBackend, MappingStore};
use crate::uploads::{is_plain_file_name, is_temp_name, UploadDir};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What reconciliation found and fixed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Entries read from the snapshot.
    pub loaded: usize,
    /// Snapshot entries dropped because their file is gone.
    pub pruned: usize,
    /// Files indexed from the directory scan.
    pub recovered: usize,
    /// Leftover temp files from interrupted uploads or saves that were deleted.
    pub swept_temp_files: usize,
    /// The snapshot existed but could not be read.
    pub mapping_unreadable: bool,
    /// The upload directory could not be listed, so nothing was recovered.
    pub scan_failed: bool,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.pruned == 0
            && self.recovered == 0
            && self.swept_temp_files == 0
            && !self.mapping_unreadable
            && !self.scan_failed
    }
}

/// A stored name that can belong to an upload: a bare file name that is not
/// the snapshot, the config file or a temp file.
fn is_upload_name(name: &str, snapshot: Option<&str>) -> bool {
    is_plain_file_name(name)
        && Some(name) != snapshot
        && name != CONFIG_FILENAME
        && !is_temp_name(name)
}

/// Populate `store` from `backend` and `uploads`, then save it back.
pub fn reconcile<B: MappingBackend + ?Sized>(
    store: &MappingStore,
    backend: &B,
    uploads: &UploadDir,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let persisted = match backend.load() {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!(error = %e, "could not read mapping snapshot, rebuilding from directory");
            report.mapping_unreadable = true;
            Default::default()
        }
    };
    report.loaded = persisted.len();

    let excluded = backend
        .location()
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str());

    for (code, stored_name) in persisted {
        if is_upload_name(&stored_name, excluded) && uploads.contains(&stored_name) {
            store.put(code, stored_name);
        } else {
            debug!(%code, file = %stored_name, "pruning mapping for missing file");
            report.pruned += 1;
        }
    }

    match uploads.scan(excluded) {
        Ok(scan) => {
            for name in scan.files {
                let Some(code) = Code::from_file_name(&name) else {
                    continue;
                };
                if store.contains(&code) {
                    continue;
                }
                info!(%code, file = %name, "recovered unmapped file");
                store.put(code, name);
                report.recovered += 1;
            }
            report.swept_temp_files = uploads.sweep(&scan.temp_files);
        }
        Err(e) => {
            warn!(
                error = %e,
                dir = %uploads.root().display(),
                "could not scan upload directory"
            );
            report.scan_failed = true;
        }
    }

    if let Err(e) = backend.save(&store.entries()) {
        warn!(error = %e, "could not save reconciled mapping");
    }

    info!(
        files = store.len(),
        pruned = report.pruned,
        recovered = report.recovered,
        "file mappings loaded"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs::{JsonFileBackend, DEFAULT_MAPPING_FILE};
    use crate::store::memory::fixtures::{backend_with, mapping};
    use crate::store::memory::InMemoryBackend;
    use crate::store::Mapping;
    use std::fs;
    use tempfile::tempdir;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn recovers_files_without_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1234.txt"), "hi").unwrap();
        let uploads = UploadDir::new(dir.path());
        let backend = InMemoryBackend::new();
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &uploads);

        assert_eq!(store.get(&code("1234")).as_deref(), Some("1234.txt"));
        assert_eq!(report.recovered, 1);
        assert_eq!(backend.saved().unwrap(), store.entries());
    }

    #[test]
    fn prunes_entries_whose_file_is_gone() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0001.txt"), "still here").unwrap();
        let backend = backend_with(&[("0001", "0001.txt"), ("0002", "0002.txt")]);
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(dir.path()));

        assert_eq!(report.loaded, 2);
        assert_eq!(report.pruned, 1);
        assert!(store.get(&code("0002")).is_none());
        assert!(!backend.saved().unwrap().contains_key(&code("0002")));
    }

    #[test]
    fn prunes_entries_pointing_outside_directory() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("uploads");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret"), "x").unwrap();
        let backend = backend_with(&[("0001", "../secret")]);
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(&inner));

        assert_eq!(report.pruned, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn prunes_entries_naming_bookkeeping_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join(".upload-7.tmp"), "half").unwrap();
        let backend = JsonFileBackend::in_dir(dir.path(), DEFAULT_MAPPING_FILE);
        backend
            .save(&mapping(&[
                ("1234", "config.json"),
                ("2345", DEFAULT_MAPPING_FILE),
                ("3456", ".upload-7.tmp"),
            ]))
            .unwrap();
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(dir.path()));

        assert_eq!(report.pruned, 3);
        assert!(store.is_empty());
        assert!(dir.path().join("config.json").exists());
        assert!(dir.path().join(DEFAULT_MAPPING_FILE).exists());
    }

    #[test]
    fn mapped_code_wins_over_scanned_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("5555.png"), "mapped").unwrap();
        fs::write(dir.path().join("5555.txt"), "orphan").unwrap();
        let backend = backend_with(&[("5555", "5555.png")]);
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(dir.path()));

        assert_eq!(store.get(&code("5555")).as_deref(), Some("5555.png"));
        assert_eq!(report.recovered, 0);
    }

    #[test]
    fn ignores_files_without_code_prefix() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("12.txt"), "x").unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        let store = MappingStore::new();

        reconcile(&store, &InMemoryBackend::new(), &UploadDir::new(dir.path()));

        assert!(store.is_empty());
    }

    #[test]
    fn unreadable_snapshot_falls_back_to_scan() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0420.bin"), [1u8, 2, 3]).unwrap();
        fs::write(dir.path().join(DEFAULT_MAPPING_FILE), "{\"0420\": ").unwrap();
        let backend = JsonFileBackend::in_dir(dir.path(), DEFAULT_MAPPING_FILE);
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(dir.path()));

        assert!(report.mapping_unreadable);
        assert_eq!(store.get(&code("0420")).as_deref(), Some("0420.bin"));
        // The snapshot was rewritten and is readable again
        assert_eq!(backend.load().unwrap(), store.entries());
    }

    #[test]
    fn snapshot_file_is_not_treated_as_upload() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::in_dir(dir.path(), "1999-mappings.json");
        backend.save(&Mapping::new()).unwrap();
        let store = MappingStore::new();

        reconcile(&store, &backend, &UploadDir::new(dir.path()));

        assert!(store.is_empty());
    }

    #[test]
    fn sweeps_interrupted_uploads() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".upload-1.tmp"), "half").unwrap();
        let store = MappingStore::new();

        let report = reconcile(&store, &InMemoryBackend::new(), &UploadDir::new(dir.path()));

        assert_eq!(report.swept_temp_files, 1);
        assert!(!dir.path().join(".upload-1.tmp").exists());
    }

    #[test]
    fn sweeps_interrupted_snapshot_saves() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".mappings-1.tmp"), "{\"12").unwrap();
        fs::write(dir.path().join(".mappings-2.tmp"), "").unwrap();
        let backend = JsonFileBackend::in_dir(dir.path(), DEFAULT_MAPPING_FILE);

        let report = reconcile(&MappingStore::new(), &backend, &UploadDir::new(dir.path()));

        assert_eq!(report.swept_temp_files, 2);
        let left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(left, vec![DEFAULT_MAPPING_FILE.to_string()]);
    }

    #[test]
    fn saves_even_when_nothing_changed() {
        let dir = tempdir().unwrap();
        let backend = InMemoryBackend::new();

        let report = reconcile(&MappingStore::new(), &backend, &UploadDir::new(dir.path()));

        assert!(report.is_clean());
        assert_eq!(backend.save_count(), 1);
        assert_eq!(backend.saved(), Some(Mapping::new()));
    }

    #[test]
    fn reconciling_twice_is_stable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0001.txt"), "a").unwrap();
        fs::write(dir.path().join("0002"), "b").unwrap();
        let persisted = mapping(&[("0001", "0001.txt"), ("0003", "0003.gone")]);
        let backend = JsonFileBackend::in_dir(dir.path(), DEFAULT_MAPPING_FILE);
        backend.save(&persisted).unwrap();
        let uploads = UploadDir::new(dir.path());

        let first = MappingStore::new();
        reconcile(&first, &backend, &uploads);
        let second = MappingStore::new();
        let report = reconcile(&second, &backend, &uploads);

        assert_eq!(first.entries(), second.entries());
        assert!(report.is_clean());
    }

    #[test]
    fn survives_unreadable_directory() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        fs::write(&not_a_dir, "x").unwrap();
        let backend = InMemoryBackend::new();
        let store = MappingStore::new();

        let report = reconcile(&store, &backend, &UploadDir::new(&not_a_dir));

        assert!(store.is_empty());
        assert_eq!(report.recovered, 0);
        assert!(report.scan_failed);
        assert!(!report.is_clean());
    }
}
