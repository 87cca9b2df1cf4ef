use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::registry::FileRegistry;
use crate::store::MappingBackend;
use std::io::Read;

pub fn run<B: MappingBackend, R: Read + ?Sized>(
    registry: &FileRegistry<B>,
    original_name: &str,
    content: &mut R,
) -> Result<CmdResult> {
    let receipt = registry.upload(original_name, content)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Uploaded: {}",
        receipt.original_name
    )));
    result.add_message(CmdMessage::info(format!("Share code: {}", receipt.code)));
    Ok(result.with_receipt(receipt))
}
