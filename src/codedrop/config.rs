use crate::error::{CodedropError, Result};
use crate::model::Code;
use crate::store::fs::DEFAULT_MAPPING_FILE;
use crate::uploads::{is_plain_file_name, is_temp_name};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.json";

/// Configuration for codedrop, stored in `<upload dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CodedropConfig {
    /// Name of the mapping snapshot inside the upload directory
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,
}

fn default_mapping_file() -> String {
    DEFAULT_MAPPING_FILE.to_string()
}

impl Default for CodedropConfig {
    fn default() -> Self {
        Self {
            mapping_file: default_mapping_file(),
        }
    }
}

impl CodedropConfig {
    pub const KEYS: &'static [&'static str] = &["mapping-file"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| CodedropError::Config(format!("{}: {}", config_path.display(), e)))?;
        let config: CodedropConfig = serde_json::from_str(&content)
            .map_err(|e| CodedropError::Config(format!("{}: {}", config_path.display(), e)))?;
        validate_mapping_file(&config.mapping_file)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CodedropError::Config(e.to_string()))?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "mapping-file" => Ok(self.mapping_file.clone()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "mapping-file" => {
                validate_mapping_file(value)?;
                self.mapping_file = value.to_string();
                Ok(())
            }
            other => Err(unknown_key(other)),
        }
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

/// Check that `name` can hold the mapping snapshot without sharing a name
/// with an upload, the config file or a temp file in the upload directory.
pub fn validate_mapping_file(name: &str) -> Result<()> {
    let problem = if !is_plain_file_name(name) {
        "must be a bare file name inside the upload directory"
    } else if name == CONFIG_FILENAME {
        "is the config file"
    } else if Code::from_file_name(name).is_some() {
        "starts with four digits like an upload"
    } else if is_temp_name(name) {
        "is reserved for temp files"
    } else {
        return Ok(());
    };
    Err(CodedropError::Config(format!(
        "invalid mapping file name {:?}: {}",
        name, problem
    )))
}

fn unknown_key(key: &str) -> CodedropError {
    CodedropError::Config(format!(
        "unknown key {:?} (known keys: {})",
        key,
        CodedropConfig::KEYS.join(", ")
    ))
}
