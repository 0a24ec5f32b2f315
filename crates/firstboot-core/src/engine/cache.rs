//! Durable single-document config cache

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::{AcquireError, AcquireResult};
use crate::types::ConfigDocument;

/// Permissions of the cache file: owner read/write, group read
pub const CACHE_FILE_MODE: u32 = 0o640;

/// The cache file holding the last acquired config
///
/// Once written, the cache is authoritative: a readable cache file always
/// wins over the providers, and a corrupt one is reported rather than
/// silently replaced.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    path: PathBuf,
}

impl ConfigCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached document
    ///
    /// Returns `Ok(None)` when the file cannot be read at all, whether it is
    /// missing or inaccessible. A readable file that does not decode is an error.
    pub fn load(&self) -> AcquireResult<Option<ConfigDocument>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(None),
        };

        ConfigDocument::from_slice(&bytes)
            .map(Some)
            .map_err(|source| AcquireError::CacheParse {
                path: self.path.clone(),
                source,
            })
    }

    /// Write the document, creating the parent directory if needed
    pub fn store(&self, config: &ConfigDocument) -> AcquireResult<()> {
        let bytes = config.to_vec().map_err(AcquireError::CacheEncode)?;
        self.write(&bytes).map_err(|source| AcquireError::CacheWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(CACHE_FILE_MODE);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(bytes)?;

        // The open mode is filtered by the umask and ignored for existing files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(CACHE_FILE_MODE))?;
        }

        file.sync_all()
    }
}
