//! Filesystem helpers shared by generation and scaffolding.

use crate::error::{Error, Result};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Permission bits of files created by [`write_file`].
#[cfg(unix)]
pub const FILE_MODE: u32 = 0o600;

/// Creates `path` and any missing parents.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] if something other than a directory
/// already exists at `path`.
pub fn ensure_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Creating directory {}", path.display());
            fs::create_dir_all(path).map_err(|e| Error::io("create directory", path, e))
        }
        Err(e) => Err(Error::io("stat directory", path, e)),
    }
}

/// Writes `content` to `path`, replacing any existing file.
///
/// Parent directories are not created. On unix a new file is created with
/// [`FILE_MODE`]; an existing file keeps its permissions.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path).map_err(|e| Error::io("write", path, e))?;
    file.write_all(content).map_err(|e| Error::io("write", path, e))
}
