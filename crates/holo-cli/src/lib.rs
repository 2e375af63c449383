//! Command-line runner for single Holo plugin commands.
//!
//! `holo-plugin` runs one plugin command exactly as Holo would: same
//! executable lookup, same `HOLO_*` environment, same stderr highlighting,
//! and optionally the message channel on file descriptor 3. It is meant for
//! plugin authors testing a build before installing it:
//!
//! ```text
//! holo-plugin --messages files=./build/holo-files apply file:/etc/foo.conf
//! ```
//!
//! IO streams and the plugin executor are injectable so the runtime can be
//! exercised in tests without spawning processes.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use holo_config::{CacheDirectory, CacheError, Config, ConfigError};
use holo_plugins::{
    OutputStreams, PluginDescriptor, PluginError, PluginExecutor, ProcessExecutor,
};
use thiserror::Error;
use tracing::debug;

mod cli;
mod telemetry;

use cli::Cli;
use telemetry::TelemetryError;

/// Tracing target for CLI operations.
const CLI_TARGET: &str = "holo_cli";

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;
const USAGE: u8 = 2;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error("cannot write plugin messages: {0}")]
    Output(#[source] std::io::Error),
}

impl AppError {
    /// Exit code reported for this error: the plugin's own code when it
    /// exited unsuccessfully, 1 otherwise.
    fn exit_code(&self) -> u8 {
        match self {
            Self::Plugin(error) => error
                .exit_code()
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(FAILURE),
            _ => FAILURE,
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write + Send,
    E: Write + Send,
{
    ExitCode::from(run_with_executor(args, stdout, stderr, &ProcessExecutor))
}

/// Runs the CLI and returns the process exit status.
fn run_with_executor<I, W, E, X>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    executor: &X,
) -> u8
where
    I: IntoIterator<Item = OsString>,
    W: Write + Send,
    E: Write + Send,
    X: PluginExecutor,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let sink: &mut dyn Write = if error.use_stderr() { stderr } else { stdout };
            let _ = write!(sink, "{}", error.render());
            return if error.use_stderr() { USAGE } else { SUCCESS };
        }
    };

    match execute(&cli, stdout, stderr, executor) {
        Ok(()) => SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "holo-plugin: {error}");
            error.exit_code()
        }
    }
}

fn execute<W, E, X>(
    cli: &Cli,
    stdout: &mut W,
    stderr: &mut E,
    executor: &X,
) -> Result<(), AppError>
where
    W: Write + Send,
    E: Write + Send,
    X: PluginExecutor,
{
    telemetry::initialise(&cli.log_filter, cli.log_format)?;
    let config = Config::from_env()?;
    let plugin = PluginDescriptor::from_identifier_line(&cli.plugin, &config)?;
    debug!(
        target: CLI_TARGET,
        plugin = plugin.id(),
        root = %config.root_dir(),
        messages = cli.messages,
        "running plugin command"
    );

    let cache = if cli.prepare_cache {
        Some(CacheDirectory::prepare(&config)?)
    } else {
        None
    };
    let outcome = run_plugin(cli, &plugin, stdout, stderr, executor);
    let cleanup = cache.map_or(Ok(()), CacheDirectory::remove);
    outcome?;
    cleanup?;
    Ok(())
}

fn run_plugin<W, E, X>(
    cli: &Cli,
    plugin: &PluginDescriptor,
    stdout: &mut W,
    stderr: &mut E,
    executor: &X,
) -> Result<(), AppError>
where
    W: Write + Send,
    E: Write + Send,
    X: PluginExecutor,
{
    if !cli.messages {
        executor.run(plugin, &cli.arguments, OutputStreams::new(stdout, stderr))?;
        return Ok(());
    }

    let output =
        executor.run_with_messages(plugin, &cli.arguments, OutputStreams::new(stdout, stderr))?;
    let (messages, exit) = output.into_parts();
    stdout
        .write_all(&messages)
        .and_then(|()| stdout.flush())
        .map_err(AppError::Output)?;
    exit.map_err(AppError::from)
}
