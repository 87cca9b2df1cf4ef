use crate::error::CodedropError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of characters in a share code.
pub const CODE_LEN: usize = 4;

/// Number of distinct share codes (`0000` through `9999`).
pub const CODE_SPACE: usize = 10_000;

/// Stem used when a stored file had no base name, only an extension.
const FALLBACK_STEM: &str = "file";

/// A four-digit share code. Leading zeros are significant: `0042` and `42`
/// are different strings, and only the former is a valid code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(u16);

impl Code {
    /// Builds a code from its numeric value, `None` if it is 10,000 or more.
    pub fn new(value: u16) -> Option<Self> {
        if (value as usize) < CODE_SPACE {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Draws a code uniformly from the whole code space.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..CODE_SPACE as u16))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Extracts the code a stored file name starts with, if any.
    ///
    /// Anything may follow the four leading digits: `1234.txt`, `1234`,
    /// `1234-copy.png` all yield `1234`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let prefix = name.get(..CODE_LEN)?;
        prefix.parse().ok()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Code {
    type Err = CodedropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CODE_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodedropError::InvalidCode(s.to_string()));
        }
        s.parse::<u16>()
            .map(Self)
            .map_err(|_| CodedropError::InvalidCode(s.to_string()))
    }
}

impl TryFrom<String> for Code {
    type Error = CodedropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

/// Returns the extension of a client-supplied file name, leading dot included.
///
/// Only the last path component is considered, so a name such as
/// `photos.v2/cat` has no extension rather than `.v2/cat`.
pub fn extension_of(original_name: &str) -> &str {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    match base.rfind('.') {
        Some(pos) => &base[pos..],
        None => "",
    }
}

/// Reconstructs the user-facing name of a stored file by dropping its code.
///
/// The original base name is not kept on disk, so `0007.jpg` and
/// `4821.png` display as `file.jpg` and `file.png`.
pub fn display_name(stored_name: &str) -> String {
    let rest: String = stored_name.chars().skip(CODE_LEN).collect();
    if rest.is_empty() || rest.starts_with('.') {
        format!("{}{}", FALLBACK_STEM, rest)
    } else {
        rest
    }
}

/// Formats a byte count with 1024-based thresholds and one decimal place.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub code: Code,
    pub original_name: String,
    pub stored_name: String,
}

/// What the info page shows for a single code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub code: Code,
    pub display_name: String,
    pub human_size: String,
}

/// One row of the vault listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub code: Code,
    pub display_name: String,
    /// Lower-cased extension of the display name, empty if it has none.
    pub extension: String,
    pub human_size: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

impl FileSummary {
    pub fn new(
        code: Code,
        stored_name: &str,
        size_bytes: u64,
        last_modified: DateTime<Utc>,
    ) -> Self {
        let display_name = display_name(stored_name);
        let extension = match display_name.rfind('.') {
            Some(pos) => display_name[pos..].to_lowercase(),
            None => String::new(),
        };
        Self {
            code,
            display_name,
            extension,
            human_size: format_size(size_bytes),
            size_bytes,
            last_modified,
        }
    }
}
