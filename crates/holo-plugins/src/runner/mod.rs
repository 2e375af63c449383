//! Running plugin commands.
//!
//! [`PluginExecutor`] is the seam between callers and plugin processes. The
//! production implementation is [`ProcessExecutor`](crate::process::ProcessExecutor);
//! orchestrators can substitute a test double that returns canned output
//! without spawning anything.

use std::borrow::Cow;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitStatus;

use crate::descriptor::PluginDescriptor;
use crate::error::PluginError;

/// Destinations for a plugin's stdout and (colourised) stderr.
pub struct OutputStreams<'a> {
    /// Receives the plugin's standard output unchanged.
    pub stdout: &'a mut (dyn Write + Send),
    /// Receives the plugin's standard error after highlighting.
    pub stderr: &'a mut (dyn Write + Send),
}

impl<'a> OutputStreams<'a> {
    /// Bundles the two sinks.
    #[must_use]
    pub const fn new(stdout: &'a mut (dyn Write + Send), stderr: &'a mut (dyn Write + Send)) -> Self {
        Self { stdout, stderr }
    }
}

impl std::fmt::Debug for OutputStreams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStreams").finish_non_exhaustive()
    }
}

/// Result of a plugin run that used the message channel.
///
/// The captured messages are kept even when the plugin failed, so partial
/// structured output is not lost.
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    id: String,
    messages: Vec<u8>,
    status: ExitStatus,
}

impl ChannelOutput {
    /// Assembles the outcome of a run of plugin `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, messages: Vec<u8>, status: ExitStatus) -> Self {
        Self {
            id: id.into(),
            messages,
            status,
        }
    }

    /// Bytes the plugin wrote to the message channel.
    #[must_use]
    pub fn messages(&self) -> &[u8] {
        &self.messages
    }

    /// The messages decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn messages_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.messages)
    }

    /// Exit status of the plugin process.
    #[must_use]
    pub const fn status(&self) -> ExitStatus {
        self.status
    }

    /// Exit outcome as a result.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Exited`] when the plugin did not exit with
    /// status 0.
    pub fn exit(&self) -> Result<(), PluginError> {
        if self.status.success() {
            Ok(())
        } else {
            Err(PluginError::Exited {
                id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// Splits into the captured messages and the exit outcome.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, Result<(), PluginError>) {
        let exit = self.exit();
        (self.messages, exit)
    }
}

/// Trait abstracting plugin process execution for testability.
pub trait PluginExecutor {
    /// Runs `plugin` with `args`, streaming its output into `streams`.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the plugin cannot be started, its output
    /// cannot be forwarded, or it exits unsuccessfully.
    fn run(
        &self,
        plugin: &PluginDescriptor,
        args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<(), PluginError>;

    /// Runs `plugin` with `args` and captures everything it writes to the
    /// message channel.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the channel cannot be set up, the plugin
    /// cannot be started, or the channel or output streams fail. An
    /// unsuccessful exit is not an error here; it is reported through
    /// [`ChannelOutput::exit`] next to the captured messages.
    fn run_with_messages(
        &self,
        plugin: &PluginDescriptor,
        args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<ChannelOutput, PluginError>;
}

#[cfg(test)]
mod tests;
