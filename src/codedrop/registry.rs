//! # File Registry
//!
//! [`FileRegistry`] ties the code index, its persistence backend and the
//! upload directory together. It is built once per process with
//! [`FileRegistry::open`], which runs startup reconciliation, and is then
//! shared by reference with whatever serves requests. All operations take
//! `&self`, so the registry can be used from many threads at once.
//!
//! ## Durability
//!
//! Every mutation saves the full index right away. A failed save is logged
//! and otherwise ignored: the upload or delete still succeeds for the caller
//! and the next successful save (or the next startup's reconciliation) brings
//! the snapshot back in line with the directory.

use crate::error::{CodedropError, Result};
use crate::model::{
    display_name, extension_of, format_size, Code, FileInfo, FileSummary, UploadReceipt,
};
use crate::reconcile::{reconcile, ReconcileReport};
use crate::store::{MappingBackend, MappingStore};
use crate::uploads::UploadDir;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Read;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// An open download: the file handle plus the name to present to the client.
#[derive(Debug)]
pub struct Download {
    pub code: Code,
    pub file: File,
    pub download_name: String,
    pub size_bytes: u64,
}

impl Download {
    /// Header value presenting the reconstructed name, not the stored one.
    pub fn content_disposition(&self) -> String {
        let escaped = self.download_name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("attachment; filename=\"{}\"", escaped)
    }
}

pub struct FileRegistry<B: MappingBackend> {
    store: MappingStore,
    uploads: UploadDir,
    backend: B,
    save_lock: Mutex<()>,
    report: ReconcileReport,
}

impl<B: MappingBackend> FileRegistry<B> {
    /// Build the registry and reconcile it against the upload directory.
    pub fn open(uploads: UploadDir, backend: B) -> Self {
        let store = MappingStore::new();
        let report = reconcile(&store, &backend, &uploads);
        Self {
            store,
            uploads,
            backend,
            save_lock: Mutex::new(()),
            report,
        }
    }

    /// What startup reconciliation found.
    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    pub fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Store `content` under a fresh code.
    ///
    /// The file is named `<code><extension of original_name>`. Nothing is
    /// indexed unless the whole content was written.
    pub fn upload<R: Read + ?Sized>(
        &self,
        original_name: &str,
        content: &mut R,
    ) -> Result<UploadReceipt> {
        if original_name.trim().is_empty() {
            return Err(CodedropError::EmptyInput);
        }

        let reservation = self.store.reserve()?;
        let code = reservation.code();
        let stored_name = format!("{}{}", code, extension_of(original_name));

        let bytes = self.uploads.write(&stored_name, content)?;
        reservation.commit(stored_name.clone());
        debug!(%code, file = %stored_name, bytes, "stored upload");
        self.persist();

        Ok(UploadReceipt {
            code,
            original_name: original_name.to_string(),
            stored_name,
        })
    }

    /// The stored file name for `code`.
    pub fn resolve(&self, code: &Code) -> Result<String> {
        self.store.get(code).ok_or(CodedropError::NotFound(*code))
    }

    /// Open the file behind `code` for reading.
    pub fn open_file(&self, code: &Code) -> Result<Download> {
        let stored_name = self.resolve(code)?;
        let not_found = |_| CodedropError::NotFound(*code);
        let meta = self.uploads.metadata(&stored_name).map_err(not_found)?;
        let file = self.uploads.open(&stored_name).map_err(not_found)?;
        Ok(Download {
            code: *code,
            file,
            download_name: display_name(&stored_name),
            size_bytes: meta.len(),
        })
    }

    pub fn info(&self, code: &Code) -> Result<FileInfo> {
        let stored_name = self.resolve(code)?;
        let meta = self
            .uploads
            .metadata(&stored_name)
            .map_err(|_| CodedropError::NotFound(*code))?;
        Ok(FileInfo {
            code: *code,
            display_name: display_name(&stored_name),
            human_size: format_size(meta.len()),
        })
    }

    /// Remove the file and its code. A file already missing from disk is fine.
    pub fn delete(&self, code: &Code) -> Result<()> {
        let stored_name = self.resolve(code)?;
        self.uploads.remove(&stored_name)?;
        self.store.remove(code);
        debug!(%code, file = %stored_name, "deleted upload");
        self.persist();
        Ok(())
    }

    /// Every stored file, most recently modified first.
    ///
    /// Files that vanished or cannot be read are left out but stay indexed.
    pub fn list(&self) -> Vec<FileSummary> {
        let mut files: Vec<FileSummary> = self
            .store
            .entries()
            .into_iter()
            .filter_map(|(code, stored_name)| match self.uploads.metadata(&stored_name) {
                Ok(meta) => {
                    let modified: DateTime<Utc> = meta
                        .modified()
                        .map(DateTime::from)
                        .unwrap_or_else(|_| Utc::now());
                    Some(FileSummary::new(code, &stored_name, meta.len(), modified))
                }
                Err(e) => {
                    debug!(%code, file = %stored_name, error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect();

        files.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.code.cmp(&b.code))
        });
        files
    }

    /// Save the current index. Called after each mutation and at shutdown.
    pub fn flush(&self) {
        self.persist();
    }

    fn persist(&self) {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.store.entries();
        if let Err(e) = self.backend.save(&snapshot) {
            warn!(error = %e, entries = snapshot.len(), "could not save file mappings");
        }
    }
}
