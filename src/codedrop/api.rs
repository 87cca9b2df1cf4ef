//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every operation, whatever the UI is. It mirrors the
//! service's logical surface:
//!
//! | operation  | returns                                   |
//! |------------|-------------------------------------------|
//! | `upload`   | code and original name                    |
//! | `download` | the file, saved under its display name    |
//! | `info`     | display name, human size, code            |
//! | `list`     | file summaries, newest first              |
//! | `delete`   | success, or `NotFound`                    |
//!
//! plus `doctor` and `config` for maintenance.
//!
//! The facade parses raw code strings into [`Code`]s, dispatches to
//! `commands::*`, and returns `Result<CmdResult>`. It does no I/O of its own
//! and holds no business logic.
//!
//! `CodedropApi<B: MappingBackend>` is generic over persistence:
//! - Production: `CodedropApi<JsonFileBackend>`
//! - Testing: `CodedropApi<InMemoryBackend>`

use crate::commands;
use crate::error::Result;
use crate::model::Code;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The main API facade for codedrop operations.
pub struct CodedropApi<B: MappingBackend> {
    registry: FileRegistry<B>,
    home: PathBuf,
}

impl<B: MappingBackend> CodedropApi<B> {
    pub fn new(registry: FileRegistry<B>, home: PathBuf) -> Self {
        Self { registry, home }
    }

    pub fn upload<R: Read + ?Sized>(
        &self,
        original_name: &str,
        content: &mut R,
    ) -> Result<commands::CmdResult> {
        commands::upload::run(&self.registry, original_name, content)
    }

    pub fn download(
        &self,
        code: &str,
        dest: &Path,
        overwrite: bool,
    ) -> Result<commands::CmdResult> {
        let code = parse_code(code)?;
        commands::download::run(&self.registry, &code, dest, overwrite)
    }

    pub fn info(&self, code: &str) -> Result<commands::CmdResult> {
        let code = parse_code(code)?;
        commands::info::run(&self.registry, &code)
    }

    pub fn list(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.registry)
    }

    pub fn delete(&self, code: &str) -> Result<commands::CmdResult> {
        let code = parse_code(code)?;
        commands::delete::run(&self.registry, &code)
    }

    pub fn doctor(&self) -> Result<commands::CmdResult> {
        commands::doctor::run(&self.registry)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.home, action)
    }

    /// Directory holding uploads and configuration.
    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn registry(&self) -> &FileRegistry<B> {
        &self.registry
    }

    /// Final save of the index before the process exits.
    pub fn close(self) {
        self.registry.flush();
    }
}

fn parse_code(input: &str) -> Result<Code> {
    input.trim().parse()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
