use crate::commands::CmdResult;
use crate::error::Result;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;

pub fn run<B: MappingBackend>(registry: &FileRegistry<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_files(registry.list()))
}
