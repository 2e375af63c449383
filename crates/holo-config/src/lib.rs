//! Shared configuration for the Holo plugin invocation layer.
//!
//! Plugins see every path relative to a root directory (normally `/`, but
//! test runs point it at a scratch tree through `HOLO_ROOT_DIR`) and a cache
//! directory that lives for the duration of one run. Both are resolved once
//! into a [`Config`] and passed explicitly to everything that derives plugin
//! paths, so no component reads them from the process environment behind the
//! caller's back.

mod cache;
mod defaults;
mod logging;
mod paths;

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub use cache::{CacheDirectory, CacheError};
pub use defaults::{
    CACHE_SUBDIR, DEFAULT_LOG_FILTER, DEFAULT_ROOT_DIR, ROOT_DIR_ENV, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use paths::clean_path;

/// Root and cache locations for one Holo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    root_dir: Utf8PathBuf,
    cache_dir: Utf8PathBuf,
}

impl Config {
    /// Builds a configuration anchored at `root`.
    ///
    /// The root is cleaned with [`clean_path`] and the cache directory is
    /// placed at `<root>/tmp/holo-cache`.
    #[must_use]
    pub fn with_root(root: impl AsRef<str>) -> Self {
        let root_dir = Utf8PathBuf::from(clean_path(root.as_ref()));
        let cache_dir = root_dir.join(CACHE_SUBDIR);
        Self {
            root_dir,
            cache_dir,
        }
    }

    /// Builds a configuration with explicit root and cache directories.
    #[must_use]
    pub fn with_directories(
        root_dir: impl Into<Utf8PathBuf>,
        cache_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Resolves the configuration from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonUtf8Root`] when `HOLO_ROOT_DIR` is not valid
    /// UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    ///
    /// An unset or empty `HOLO_ROOT_DIR` selects `/` as the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonUtf8Root`] when the root value is not valid
    /// UTF-8.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        lookup(ROOT_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map_or_else(
                || Ok(Self::default()),
                |raw| {
                    raw.into_string()
                        .map(Self::with_root)
                        .map_err(|value| ConfigError::NonUtf8Root { value })
                },
            )
    }

    /// Directory under which all plugin-visible paths are anchored.
    #[must_use]
    pub fn root_dir(&self) -> &Utf8Path {
        &self.root_dir
    }

    /// Directory in which plugins may keep per-run temporary data.
    #[must_use]
    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_root(DEFAULT_ROOT_DIR)
    }
}

/// Errors raised while resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `HOLO_ROOT_DIR` held bytes that are not valid UTF-8.
    #[error("HOLO_ROOT_DIR is not valid UTF-8: {value:?}")]
    NonUtf8Root {
        /// Raw value found in the environment.
        value: OsString,
    },
}
