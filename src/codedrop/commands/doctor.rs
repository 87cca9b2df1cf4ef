use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;

/// Report what startup reconciliation found and fixed.
pub fn run<B: MappingBackend>(registry: &FileRegistry<B>) -> Result<CmdResult> {
    let report = registry.report().clone();
    let mut result = CmdResult::default();

    if report.is_clean() {
        result.add_message(CmdMessage::success(format!(
            "No inconsistencies found ({} file(s) indexed).",
            registry.len()
        )));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.mapping_unreadable {
            result.add_message(CmdMessage::info(
                "  - Mapping file was unreadable; index rebuilt from the upload directory.",
            ));
        }
        if report.pruned > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} code(s) whose file is missing from disk.",
                report.pruned
            )));
        }
        if report.recovered > 0 {
            result.add_message(CmdMessage::success(format!(
                "  - Recovered {} file(s) found on disk but missing from the index.",
                report.recovered
            )));
        }
        if report.swept_temp_files > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Cleaned up {} leftover temp file(s) from interrupted writes.",
                report.swept_temp_files
            )));
        }
        if report.scan_failed {
            result.add_message(CmdMessage::error(format!(
                "  - Upload directory {} could not be read; nothing was recovered.",
                registry.uploads().root().display()
            )));
        }
    }

    Ok(result.with_report(report))
}
