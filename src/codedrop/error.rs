use crate::model::Code;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodedropError {
    #[error("No file selected")]
    EmptyInput,

    #[error("File not found for code: {0}")]
    NotFound(Code),

    #[error("Invalid code: {0:?} (expected four digits)")]
    InvalidCode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("All {max} share codes are in use", max = crate::model::CODE_SPACE)]
    CodeSpaceExhausted,

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CodedropError {
    fn from(err: serde_json::Error) -> Self {
        CodedropError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodedropError>;
