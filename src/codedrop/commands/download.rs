use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{format_size, Code};
use crate::registry::FileRegistry;
use crate::store::MappingBackend;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Copy the file behind `code` to `dest`.
///
/// When `dest` is a directory the file is saved inside it under its display
/// name. An existing file is only replaced when `overwrite` is set.
pub fn run<B: MappingBackend>(
    registry: &FileRegistry<B>,
    code: &Code,
    dest: &Path,
    overwrite: bool,
) -> Result<CmdResult> {
    let mut download = registry.open_file(code)?;
    let target: PathBuf = if dest.is_dir() {
        dest.join(&download.download_name)
    } else {
        dest.to_path_buf()
    };

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut out = options.open(&target)?;
    let bytes = io::copy(&mut download.file, &mut out)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Saved {} ({}) to {}",
        download.download_name,
        format_size(bytes),
        target.display()
    )));
    Ok(result.with_saved_path(target))
}
