//! Command-line arguments for `holo-plugin`.

use std::ffi::OsString;

use clap::Parser;
use holo_config::{DEFAULT_LOG_FILTER, LogFormat};

/// Runs one command of a Holo plugin the way Holo itself would.
#[derive(Parser, Debug)]
#[command(name = "holo-plugin", version)]
pub(crate) struct Cli {
    /// Captures the message channel (file descriptor 3) and prints it after
    /// the plugin's own output.
    #[arg(long)]
    pub(crate) messages: bool,
    /// Creates a fresh cache directory before the run and removes it after.
    #[arg(long)]
    pub(crate) prepare_cache: bool,
    /// Log filter expression, e.g. `holo_plugins=debug`.
    #[arg(long, value_name = "FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub(crate) log_filter: String,
    /// Log output format.
    #[arg(long, value_name = "FORMAT", default_value_t = LogFormat::default())]
    pub(crate) log_format: LogFormat,
    /// Plugin ID, or `ID=EXECUTABLE` to run a binary that is not installed.
    #[arg(value_name = "PLUGIN")]
    pub(crate) plugin: String,
    /// Arguments passed to the plugin verbatim.
    #[arg(
        value_name = "ARG",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) arguments: Vec<OsString>,
}
