use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Code;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;

pub fn run<B: MappingBackend>(registry: &FileRegistry<B>, code: &Code) -> Result<CmdResult> {
    registry.delete(code)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "File deleted successfully ({})",
        code
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodedropError;
    use crate::store::memory::InMemoryBackend;
    use crate::uploads::UploadDir;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn deletes_and_reports() {
        let dir = tempdir().unwrap();
        let registry = FileRegistry::open(UploadDir::new(dir.path()), InMemoryBackend::new());
        let receipt = registry
            .upload("a.txt", &mut Cursor::new(b"a".to_vec()))
            .unwrap();

        let result = run(&registry, &receipt.code).unwrap();

        assert!(result.messages[0].content.starts_with("File deleted"));
        assert!(registry.is_empty());
    }

    #[test]
    fn second_delete_is_not_found() {
        let dir = tempdir().unwrap();
        let registry = FileRegistry::open(UploadDir::new(dir.path()), InMemoryBackend::new());
        let receipt = registry
            .upload("a.txt", &mut Cursor::new(b"a".to_vec()))
            .unwrap();

        run(&registry, &receipt.code).unwrap();
        assert!(matches!(
            run(&registry, &receipt.code),
            Err(CodedropError::NotFound(_))
        ));
    }
}
