use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Code;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;

pub fn run<B: MappingBackend>(registry: &FileRegistry<B>, code: &Code) -> Result<CmdResult> {
    let info = registry.info(code)?;
    Ok(CmdResult::default().with_info(info))
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
    fn reports_file_details() {
        let dir = tempdir().unwrap();
        let registry = FileRegistry::open(UploadDir::new(dir.path()), InMemoryBackend::new());
        let receipt = registry
            .upload("song.mp3", &mut Cursor::new(vec![0u8; 500]))
            .unwrap();

        let info = run(&registry, &receipt.code).unwrap().info.unwrap();

        assert_eq!(info.display_name, "file.mp3");
        assert_eq!(info.human_size, "500 B");
        assert_eq!(info.code, receipt.code);
    }

    #[test]
    fn unknown_code_is_not_found() {
        let dir = tempdir().unwrap();
        let registry = FileRegistry::open(UploadDir::new(dir.path()), InMemoryBackend::new());

        assert!(matches!(
            run(&registry, &"4242".parse().unwrap()),
            Err(CodedropError::NotFound(_))
        ));
    }
}
