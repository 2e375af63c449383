//! Unit tests for run outcomes and the executor seam.

use std::ffi::OsString;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use holo_config::Config;
use rstest::{fixture, rstest};

use super::*;

/// Executor replaying a canned outcome instead of spawning processes.
struct ReplayExecutor {
    messages: &'static [u8],
    code: i32,
}

impl PluginExecutor for ReplayExecutor {
    fn run(
        &self,
        plugin: &PluginDescriptor,
        args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<(), PluginError> {
        self.run_with_messages(plugin, args, streams)?.exit()
    }

    fn run_with_messages(
        &self,
        plugin: &PluginDescriptor,
        _args: &[OsString],
        streams: OutputStreams<'_>,
    ) -> Result<ChannelOutput, PluginError> {
        streams
            .stdout
            .write_all(b"replayed\n")
            .map_err(|err| PluginError::Stream {
                id: plugin.id().to_owned(),
                stream: crate::error::StreamKind::Stdout,
                source: std::sync::Arc::new(err),
            })?;
        Ok(ChannelOutput::new(
            plugin.id(),
            self.messages.to_vec(),
            exit_status(self.code),
        ))
    }
}

fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

#[fixture]
fn plugin() -> PluginDescriptor {
    PluginDescriptor::new("files", &Config::default())
}

#[test]
fn successful_output_has_no_exit_error() {
    let output = ChannelOutput::new("files", b"ok\n".to_vec(), exit_status(0));
    assert!(output.exit().is_ok());
    assert_eq!(output.messages(), b"ok\n");
    assert_eq!(output.messages_lossy(), "ok\n");
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(127)]
fn failed_output_keeps_messages(#[case] code: i32) {
    let output = ChannelOutput::new("files", b"partial".to_vec(), exit_status(code));
    let (messages, exit) = output.into_parts();
    assert_eq!(messages, b"partial");
    let error = exit.expect_err("nonzero exit is a failure");
    assert_eq!(error.exit_code(), Some(code));
    assert!(error.to_string().contains("files"));
}

#[test]
fn lossy_messages_replace_invalid_bytes() {
    let output = ChannelOutput::new("files", vec![b'a', 0xff, b'b'], exit_status(0));
    assert_eq!(output.messages_lossy(), "a\u{fffd}b");
}

#[rstest]
fn executor_seam_accepts_test_doubles(plugin: PluginDescriptor) {
    let executor = ReplayExecutor {
        messages: b"requires --force to restore\n",
        code: 0,
    };
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let output = executor
        .run_with_messages(
            &plugin,
            &["apply".into()],
            OutputStreams::new(&mut stdout, &mut stderr),
        )
        .expect("replay succeeds");
    assert_eq!(output.messages_lossy(), "requires --force to restore\n");
    assert_eq!(stdout, b"replayed\n");
}

#[rstest]
fn executor_seam_propagates_exit_failures(plugin: PluginDescriptor) {
    let executor = ReplayExecutor {
        messages: b"",
        code: 4,
    };
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let error = executor
        .run(
            &plugin,
            &["scan".into()],
            OutputStreams::new(&mut stdout, &mut stderr),
        )
        .expect_err("exit status 4 is a failure");
    assert!(matches!(error, PluginError::Exited { .. }));
}
