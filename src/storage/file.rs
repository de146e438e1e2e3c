use super::{Storage, StorageError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage engine that keeps one file per key inside a directory.
///
/// Writes go to a temp file that is then renamed over the target, so a
/// reader never observes a half-written value.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        debug!(?dir, "FileStorage::open: called");
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a key. Anything outside `[A-Za-z0-9_-]` is hex-escaped
    /// so keys like `cities:state` map to valid, distinct file names.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&temp_path, value).map_err(io_err)?;
        fs::rename(&temp_path, &path).map_err(io_err)?;
        debug!(?path, bytes = value.len(), "FileStorage::set_item: written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
