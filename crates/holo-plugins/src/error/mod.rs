//! Domain errors raised by plugin operations.
//!
//! Setup failures (pipe creation, spawning), message channel failures, and
//! exit failures are distinct variants so callers can tell an invocation that
//! never ran from one that ran and failed. I/O errors are wrapped in `Arc` to
//! satisfy the `result_large_err` Clippy lint.

use std::process::ExitStatus;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Output stream of a plugin process forwarded to a caller sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// The plugin's standard output.
    Stdout,
    /// The plugin's standard error, after colourising.
    Stderr,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Errors arising from plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin reference could not be parsed.
    #[error("invalid plugin identifier '{line}': {message}")]
    InvalidIdentifier {
        /// Reference as written by the caller.
        line: String,
        /// Description of the problem.
        message: String,
    },

    /// The pipe backing the message channel could not be created.
    #[error("cannot create message channel for plugin '{id}': {source}")]
    Pipe {
        /// Plugin ID.
        id: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The plugin process could not be spawned.
    #[error("plugin '{id}' failed to start ({executable}): {source}")]
    SpawnFailed {
        /// Plugin ID.
        id: String,
        /// Executable that was launched.
        executable: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Reading the message channel failed; any bytes read so far are lost.
    #[error("cannot read message channel of plugin '{id}': {source}")]
    MessageChannel {
        /// Plugin ID.
        id: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Forwarding one of the plugin's output streams failed.
    #[error("cannot forward {stream} of plugin '{id}': {source}")]
    Stream {
        /// Plugin ID.
        id: String,
        /// Stream that failed.
        stream: StreamKind,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Waiting for the plugin process failed.
    #[error("cannot wait for plugin '{id}': {source}")]
    Wait {
        /// Plugin ID.
        id: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The plugin ran but did not exit successfully.
    #[error("plugin '{id}' failed: {status}")]
    Exited {
        /// Plugin ID.
        id: String,
        /// Exit status reported by the operating system.
        status: ExitStatus,
    },
}

impl PluginError {
    /// Returns the exit code when the error is an unsuccessful exit.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exited { status, .. } => status.code(),
            _ => None,
        }
    }
}
