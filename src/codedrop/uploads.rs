use crate::error::{CodedropError, Result};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TEMP_PREFIX: &str = ".upload-";
/// Prefix of the temp file a mapping snapshot is written to before the rename.
pub(crate) const SNAPSHOT_TEMP_PREFIX: &str = ".mappings-";
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// The directory uploaded files are stored in.
///
/// Every direct filesystem access to uploaded content goes through here. Names
/// passed in are bare file names; anything that could escape the directory is
/// refused.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

/// Result of listing the upload directory.
#[derive(Debug, Default)]
pub struct DirScan {
    /// Regular files, excluding the mapping snapshot and temp files.
    pub files: Vec<String>,
    /// Leftover temp files from uploads or snapshot saves that never finished.
    pub temp_files: Vec<String>,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    pub fn path_of(&self, stored_name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(stored_name) {
            return Err(CodedropError::Storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing non-local file name {:?}", stored_name),
            )));
        }
        Ok(self.root.join(stored_name))
    }

    /// Whether `stored_name` is a regular file in the directory.
    pub fn contains(&self, stored_name: &str) -> bool {
        self.path_of(stored_name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Stream `content` into `stored_name`, replacing any existing file.
    ///
    /// Data goes to a temp file first and is renamed into place only once fully
    /// written. Zero-byte content is rejected with `EmptyInput` and leaves
    /// nothing behind. Returns the number of bytes written.
    pub fn write<R: Read + ?Sized>(&self, stored_name: &str, content: &mut R) -> Result<u64> {
        let target = self.path_of(stored_name)?;
        self.ensure()?;

        let tmp_path = self
            .root
            .join(format!("{}{}{}", TEMP_PREFIX, Uuid::new_v4(), TEMP_SUFFIX));
        let written = copy_into(&tmp_path, content).and_then(|bytes| {
            if bytes == 0 {
                Err(CodedropError::EmptyInput)
            } else {
                fs::rename(&tmp_path, &target)?;
                Ok(bytes)
            }
        });

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    pub fn open(&self, stored_name: &str) -> io::Result<File> {
        let path = self.path_of(stored_name).map_err(into_io)?;
        File::open(path)
    }

    pub fn metadata(&self, stored_name: &str) -> io::Result<fs::Metadata> {
        let path = self.path_of(stored_name).map_err(into_io)?;
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
        }
        Ok(meta)
    }

    /// Delete `stored_name`. A file that is already gone is not an error.
    pub fn remove(&self, stored_name: &str) -> Result<()> {
        let path = self.path_of(stored_name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// List regular files, skipping `excluded` (the mapping snapshot).
    /// A missing directory scans as empty.
    pub fn scan(&self, excluded: Option<&str>) -> Result<DirScan> {
        let mut scan = DirScan::default();
        if !self.root.exists() {
            return Ok(scan);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if Some(name.as_str()) == excluded {
                continue;
            }
            if is_temp_name(&name) {
                scan.temp_files.push(name);
            } else {
                scan.files.push(name);
            }
        }

        scan.files.sort();
        scan.temp_files.sort();
        Ok(scan)
    }

    /// Remove leftover temp files, returning how many were deleted.
    pub fn sweep(&self, temp_files: &[String]) -> usize {
        temp_files
            .iter()
            .filter(|name| is_temp_name(name))
            .filter(|name| fs::remove_file(self.root.join(name.as_str())).is_ok())
            .count()
    }
}

fn copy_into<R: Read + ?Sized>(path: &Path, content: &mut R) -> Result<u64> {
    let mut file = File::create(path)?;
    let bytes = io::copy(content, &mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(bytes)
}

fn into_io(err: CodedropError) -> io::Error {
    match err {
        CodedropError::Storage(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

/// A bare name that resolves inside the directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Whether `name` is an upload or snapshot temp file.
pub fn is_temp_name(name: &str) -> bool {
    (name.starts_with(TEMP_PREFIX) || name.starts_with(SNAPSHOT_TEMP_PREFIX))
        && name.ends_with(TEMP_SUFFIX)
}
