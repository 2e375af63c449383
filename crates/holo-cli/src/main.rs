//! Entry point for `holo-plugin`.
//!
//! The binary delegates to [`holo_cli::run`], which parses arguments, sets
//! up logging and runs one plugin command.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    holo_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
