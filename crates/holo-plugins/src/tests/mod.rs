//! Crate-level fixtures and behaviour tests.

use std::ffi::OsString;

use holo_config::Config;

use crate::descriptor::PluginDescriptor;


/// Root used by fake plugins; nothing is created below it.
pub(crate) const TEST_ROOT: &str = "/srv/holo-test";

/// Describes a fake plugin `id` whose executable is the system shell.
pub(crate) fn shell_plugin(id: &str) -> PluginDescriptor {
    PluginDescriptor::with_executable(id, "/bin/sh", &Config::with_root(TEST_ROOT))
}

/// Arguments making the shell run `script` as plugin `id`.
pub(crate) fn script_args(id: &str, script: &str) -> Vec<OsString> {
    vec![
        OsString::from("-c"),
        OsString::from(script),
        OsString::from(format!("holo-{id}")),
    ]
}

/// Writer whose every write fails, standing in for a closed terminal.
pub(crate) struct BrokenSink;

impl std::io::Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
