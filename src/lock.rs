use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use fs4::FileExt;
use tracing::{debug, info};
use crate::error::{InstallRunError, Result};

/// Lock file kept inside each package install folder. Cleaning the folder leaves it alone.
pub const INSTALL_LOCK_FILENAME: &str = ".install-run.lock";

/// Exclusive advisory lock on one package install folder.
///
/// Serializes the clean/install/mark sequence between invocations that target the
/// same `name@version`. Released when dropped.
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
    file: File,
}

impl InstallLock {
    /// Blocks until the lock on `package_install_folder` is acquired. There is no timeout.
    pub fn acquire<P: AsRef<Path>>(package_install_folder: P) -> Result<InstallLock> {
        let path = package_install_folder.as_ref().join(INSTALL_LOCK_FILENAME);
        let lock_error = |source: std::io::Error| InstallRunError::Lock {
            path: path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(lock_error)?;

        if file.try_lock_exclusive().is_err() {
            info!(lock = %path.display(), "another install of this package is running, waiting");
            file.lock_exclusive().map_err(lock_error)?;
        }
        debug!(lock = %path.display(), "acquired install lock");
        Ok(InstallLock { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well.
        let _ = self.file.unlock();
        debug!(lock = %self.path.display(), "released install lock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let dir = tempdir().unwrap();
        let lock = InstallLock::acquire(dir.path()).unwrap();
        assert!(lock.path().exists());
        assert_eq!(lock.path(), dir.path().join(INSTALL_LOCK_FILENAME));
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = tempdir().unwrap();
        let lock = InstallLock::acquire(dir.path()).unwrap();

        let other = OpenOptions::new()
            .read(true)
            .write(true)
            .open(dir.path().join(INSTALL_LOCK_FILENAME))
            .unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(lock);
        assert!(other.try_lock_exclusive().is_ok());
        other.unlock().unwrap();
    }
}
