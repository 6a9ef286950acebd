//! Advisory locking and atomic replacement of the task store file.
//!
//! Writers hold an exclusive fs2 lock on `<store>.lock` for the whole
//! read-modify-write, then swap the new contents in with a rename so readers
//! never see a half-written array.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Sibling lock file for a store, e.g. `tasks.json.lock`.
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Exclusive hold on a store's lock file. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Lock the store at `store_path`, polling until `timeout_ms` elapses.
    pub fn acquire(store_path: &Path, timeout_ms: u64) -> Result<Self> {
        let path = lock_path_for(store_path);
        ensure_parent(&path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::trace!(path = %path.display(), "store locked");
                    return Ok(Self { file, path });
                }
                Err(err) if !is_contended(&err) => return Err(Error::Io(err)),
                Err(_) if Instant::now() >= deadline => return Err(Error::LockFailed(path)),
                Err(_) => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release store lock");
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn ensure_parent(path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Replace `path` with `data` via a temp file in the same directory.
///
/// Takes no lock of its own; store writes already hold a [`StoreLock`].
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = ensure_parent(path)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}
