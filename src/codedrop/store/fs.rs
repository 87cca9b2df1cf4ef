use super::{Mapping, MappingBackend};
use crate::error::{CodedropError, Result};
use crate::model::Code;
use crate::uploads::{SNAPSHOT_TEMP_PREFIX, TEMP_SUFFIX};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_MAPPING_FILE: &str = "mappings.json";

/// Persists the code index as one JSON object of `code -> stored name`.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend writing `file_name` inside `dir`.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(persistence_io)?;
            }
        }
        Ok(())
    }
}

impl MappingBackend for JsonFileBackend {
    fn load(&self) -> Result<Mapping> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }
        let content = fs::read_to_string(&self.path).map_err(persistence_io)?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)?;

        let mut mapping = Mapping::new();
        for (key, stored_name) in raw {
            match key.parse::<Code>() {
                Ok(code) => {
                    mapping.insert(code, stored_name);
                }
                Err(_) => warn!(key = %key, "ignoring mapping entry with malformed code"),
            }
        }
        Ok(mapping)
    }

    fn save(&self, mapping: &Mapping) -> Result<()> {
        self.ensure_parent()?;
        let content = serde_json::to_string_pretty(mapping)?;

        // Write beside the target and rename, so readers never see half a file
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp_file = dir.join(format!(
            "{}{}{}",
            SNAPSHOT_TEMP_PREFIX,
            Uuid::new_v4(),
            TEMP_SUFFIX
        ));
        fs::write(&tmp_file, content).map_err(persistence_io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(persistence_io(e));
        }
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

fn persistence_io(err: std::io::Error) -> CodedropError {
    CodedropError::Persistence(err.to_string())
}
