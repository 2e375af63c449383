//! Invocation layer for Holo plugins.
//!
//! Holo delegates all real work to plugin executables that implement the
//! plugin interface (API version 3). This crate covers the caller's side of
//! that contract:
//!
//! - [`PluginDescriptor`] resolves a plugin's executable and its resource,
//!   cache and state directories from a [`holo_config::Config`].
//! - [`Invocation`] builds the child process: verbatim arguments, the
//!   `HOLO_*` environment, a null stdin, and optionally the message channel
//!   on file descriptor 3.
//! - [`ProcessExecutor`] runs the plugin, forwards stdout, highlights error
//!   and warning lines on stderr, and drains the message channel without
//!   deadlocking the child.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::io;
//!
//! use holo_config::Config;
//! use holo_plugins::{OutputStreams, PluginDescriptor, PluginExecutor, ProcessExecutor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let plugin = PluginDescriptor::new("files", &config);
//! let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
//! ProcessExecutor.run(
//!     &plugin,
//!     &["scan".into()],
//!     OutputStreams::new(&mut stdout, &mut stderr),
//! )?;
//! # Ok(()) }
//! ```

pub mod colorize;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod invocation;
pub mod process;
pub mod runner;

#[cfg(test)]
mod tests;

pub use self::descriptor::PluginDescriptor;
pub use self::environment::{API_VERSION, normalize_path, plugin_environment};
pub use self::error::{PluginError, StreamKind};
pub use self::invocation::{Invocation, MESSAGE_CHANNEL_FD};
pub use self::process::ProcessExecutor;
pub use self::runner::{ChannelOutput, OutputStreams, PluginExecutor};
