//! # Command Layer
//!
//! One module per user-facing operation. Each `run` function takes the
//! registry (or paths, for config) plus plain Rust arguments and returns a
//! [`CmdResult`]: the structured data the operation produced plus the
//! messages a UI should show. Nothing here prints or exits.

use crate::config::CodedropConfig;
use crate::model::{FileInfo, FileSummary, UploadReceipt};
use crate::reconcile::ReconcileReport;
use std::path::PathBuf;

pub mod config;
pub mod delete;
pub mod doctor;
pub mod download;
pub mod info;
pub mod list;
pub mod upload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub receipt: Option<UploadReceipt>,
    pub info: Option<FileInfo>,
    pub listed_files: Vec<FileSummary>,
    pub saved_path: Option<PathBuf>,
    pub report: Option<ReconcileReport>,
    pub config: Option<CodedropConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_receipt(mut self, receipt: UploadReceipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn with_info(mut self, info: FileInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_listed_files(mut self, files: Vec<FileSummary>) -> Self {
        self.listed_files = files;
        self
    }

    pub fn with_saved_path(mut self, path: PathBuf) -> Self {
        self.saved_path = Some(path);
        self
    }

    pub fn with_report(mut self, report: ReconcileReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_config(mut self, config: CodedropConfig) -> Self {
        self.config = Some(config);
        self
    }
}
