//! Prepares and removes the per-run cache directory.
//!
//! Plugins receive `HOLO_CACHE_DIR=<cache>/<id>` and expect the parent to
//! exist and to be empty at the start of a run. Leftovers from an aborted
//! run are removed before the directory is recreated.

use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::Config;

/// Permissions applied to freshly created cache directories.
const CACHE_DIR_MODE: u32 = 0o755;

/// Handle to a cache directory prepared for the current run.
#[derive(Debug)]
pub struct CacheDirectory {
    path: Utf8PathBuf,
}

impl CacheDirectory {
    /// Clears any stale cache left by a previous run and recreates it.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the stale cache cannot be inspected or
    /// removed, or when the fresh directory cannot be created.
    pub fn prepare(config: &Config) -> Result<Self, CacheError> {
        let path = config.cache_dir().to_owned();
        remove_existing(&path)?;
        DirBuilder::new()
            .recursive(true)
            .mode(CACHE_DIR_MODE)
            .create(&path)
            .map_err(|source| CacheError::Create {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Location of the prepared cache directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Removes the cache directory and everything plugins stored in it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Remove`] when the tree cannot be deleted.
    pub fn remove(self) -> Result<(), CacheError> {
        remove_existing(&self.path)
    }
}

fn remove_existing(path: &Utf8Path) -> Result<(), CacheError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(CacheError::Inspect {
                path: path.to_owned(),
                source,
            });
        }
    };
    let removal = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removal.map_err(|source| CacheError::Remove {
        path: path.to_owned(),
        source,
    })
}

/// Errors raised while managing the cache directory.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The existing cache entry could not be examined.
    #[error("cannot inspect {path}: {source}")]
    Inspect {
        /// Cache path that was examined.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A stale cache entry could not be removed.
    #[error("cannot remove {path}: {source}")]
    Remove {
        /// Cache path that was being removed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The cache directory could not be created.
    #[error("cannot create {path}: {source}")]
    Create {
        /// Cache path that was being created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
