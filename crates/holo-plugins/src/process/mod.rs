//! Process-based plugin execution.
//!
//! [`ProcessExecutor`] implements [`PluginExecutor`] by spawning the plugin
//! as a child process. Two scoped threads forward the child's stdout and
//! colourised stderr to the caller's sinks while the calling thread drains
//! the message channel, so the child never stalls on a full pipe.
//!
//! # Message channel ordering
//!
//! The sequence in [`ProcessExecutor::run_with_messages`] is fixed:
//!
//! 1. create the pipe;
//! 2. spawn the child with the write end on descriptor 3;
//! 3. close the parent's write end;
//! 4. read the read end to end of stream;
//! 5. close the read end;
//! 6. wait for the child.
//!
//! Reading only reaches end of stream once every write end is closed. If the
//! parent still held its copy in step 4, the read would block forever even
//! after the plugin exits. Closing before step 2 would leave nothing for the
//! child to inherit.

use std::ffi::OsString;
use std::io::{self, PipeReader, Read, Write};
use std::os::fd::AsFd;
use std::process::{Child, ChildStderr, ChildStdout, ExitStatus};
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::colorize::colorize_stream;
use crate::descriptor::PluginDescriptor;
use crate::error::{PluginError, StreamKind};
use crate::invocation::Invocation;
use crate::runner::{ChannelOutput, OutputStreams, PluginExecutor};

/// Tracing target for plugin process operations.
const PROCESS_TARGET: &str = "holo_plugins::process";

/// Executes plugins by spawning child processes.
///
/// # Example
///
/// ```rust,no_run
/// use std::io;
///
/// use holo_config::Config;
/// use holo_plugins::{OutputStreams, PluginDescriptor, PluginExecutor, ProcessExecutor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let plugin = PluginDescriptor::new("files", &Config::from_env()?);
/// let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
/// let output = ProcessExecutor.run_with_messages(
///     &plugin,
///     &["apply".into(), "file:/etc/foo.conf".into()],
///     OutputStreams::new(&mut stdout, &mut stderr),
/// )?;
/// let (messages, exit) = output.into_parts();
/// # let _ = (messages, exit);
/// # Ok(()) }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl PluginExecutor for ProcessExecutor {
    fn run(
        &self,
        plugin: &PluginDescriptor,
        args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<(), PluginError> {
        let child = spawn(plugin, Invocation::new(plugin, args, None))?;
        let finished = supervise(plugin, child, streams, |_| Ok(Vec::new()))?;
        if finished.status.success() {
            Ok(())
        } else {
            Err(PluginError::Exited {
                id: plugin.id().to_owned(),
                status: finished.status,
            })
        }
    }

    fn run_with_messages(
        &self,
        plugin: &PluginDescriptor,
        args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<ChannelOutput, PluginError> {
        let (reader, writer) = io::pipe().map_err(|err| PluginError::Pipe {
            id: plugin.id().to_owned(),
            source: Arc::new(err),
        })?;
        let child = spawn(plugin, Invocation::new(plugin, args, Some(writer.as_fd())))?;
        // The read below only sees end of stream once this copy is gone.
        drop(writer);

        let finished = supervise(plugin, child, streams, |child| {
            drain_message_channel(plugin, reader).inspect_err(|_| terminate(child))
        })?;
        Ok(ChannelOutput::new(
            plugin.id(),
            finished.messages,
            finished.status,
        ))
    }
}

/// What a supervised child left behind.
struct Finished {
    messages: Vec<u8>,
    status: ExitStatus,
}

fn spawn(plugin: &PluginDescriptor, invocation: Invocation<'_>) -> Result<Child, PluginError> {
    let message_channel = invocation.has_message_channel();
    let child = invocation.spawn().map_err(|err| PluginError::SpawnFailed {
        id: plugin.id().to_owned(),
        executable: plugin.executable().to_owned(),
        source: Arc::new(err),
    })?;
    debug!(
        target: PROCESS_TARGET,
        plugin = plugin.id(),
        executable = %plugin.executable(),
        pid = child.id(),
        message_channel,
        "spawned plugin process"
    );
    Ok(child)
}

/// Forwards the child's output streams while `collect` runs on the calling
/// thread, then waits for the child.
fn supervise<F>(
    plugin: &PluginDescriptor,
    mut child: Child,
    streams: OutputStreams<'_>,
    collect: F,
) -> Result<Finished, PluginError>
where
    F: FnOnce(&mut Child) -> Result<Vec<u8>, PluginError>,
{
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let OutputStreams {
        stdout: stdout_sink,
        stderr: stderr_sink,
    } = streams;

    thread::scope(|scope| {
        let stdout_copy = scope.spawn(move || forward_stdout(stdout, stdout_sink));
        let stderr_copy = scope.spawn(move || forward_stderr(stderr, stderr_sink));

        let collected = collect(&mut child);
        let waited = child.wait();
        let stdout_result = join(stdout_copy);
        let stderr_result = join(stderr_copy);

        let messages = collected?;
        let status = waited.map_err(|err| PluginError::Wait {
            id: plugin.id().to_owned(),
            source: Arc::new(err),
        })?;
        debug!(
            target: PROCESS_TARGET,
            plugin = plugin.id(),
            %status,
            message_bytes = messages.len(),
            "plugin process exited"
        );
        stream_result(plugin, StreamKind::Stdout, stdout_result)?;
        stream_result(plugin, StreamKind::Stderr, stderr_result)?;
        Ok(Finished { messages, status })
    })
}

/// Reads the message channel to end of stream and closes it.
fn drain_message_channel(
    plugin: &PluginDescriptor,
    mut reader: PipeReader,
) -> Result<Vec<u8>, PluginError> {
    let mut messages = Vec::new();
    reader
        .read_to_end(&mut messages)
        .map_err(|err| PluginError::MessageChannel {
            id: plugin.id().to_owned(),
            source: Arc::new(err),
        })?;
    drop(reader);
    debug!(
        target: PROCESS_TARGET,
        plugin = plugin.id(),
        message_bytes = messages.len(),
        "drained message channel"
    );
    Ok(messages)
}

/// Stops a child whose message channel broke so the copy threads can finish.
fn terminate(child: &mut Child) {
    // The child may already have exited; the wait that follows reaps it.
    if let Err(err) = child.kill() {
        debug!(target: PROCESS_TARGET, error = %err, "plugin process already gone");
    }
}

fn forward_stdout(pipe: Option<ChildStdout>, sink: &mut (dyn Write + Send)) -> io::Result<()> {
    let Some(mut pipe) = pipe else {
        return Ok(());
    };
    let mut latched = LatchedSink::new(sink);
    io::copy(&mut pipe, &mut latched)?;
    latched.finish()
}

fn forward_stderr(pipe: Option<ChildStderr>, sink: &mut (dyn Write + Send)) -> io::Result<()> {
    let Some(pipe) = pipe else {
        return Ok(());
    };
    let mut latched = LatchedSink::new(sink);
    colorize_stream(pipe, &mut latched)?;
    latched.finish()
}

fn join(handle: thread::ScopedJoinHandle<'_, io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}

fn stream_result(
    plugin: &PluginDescriptor,
    stream: StreamKind,
    result: io::Result<()>,
) -> Result<(), PluginError> {
    result.map_err(|err| PluginError::Stream {
        id: plugin.id().to_owned(),
        stream,
        source: Arc::new(err),
    })
}

/// Sink wrapper that keeps accepting bytes after the inner writer fails.
///
/// The child must be able to finish writing even when the caller's sink is
/// broken; otherwise it blocks on a full pipe and never closes the message
/// channel. The first error is held and returned by [`LatchedSink::finish`].
struct LatchedSink<'a> {
    inner: &'a mut (dyn Write + Send),
    error: Option<io::Error>,
}

impl<'a> LatchedSink<'a> {
    const fn new(inner: &'a mut (dyn Write + Send)) -> Self {
        Self { inner, error: None }
    }

    fn finish(mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => self.inner.flush(),
        }
    }
}

impl Write for LatchedSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.error.is_none() {
            self.error = self.inner.write_all(buf).err();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.error.is_none() {
            self.error = self.inner.flush().err();
        }
        Ok(())
    }
}
