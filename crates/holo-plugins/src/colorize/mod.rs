//! Highlighting of plugin error and warning lines.
//!
//! Plugins report problems on stderr with a two-character marker:
//!
//! ```text
//! !! cannot open /etc/foo.conf   -> error, bold red
//! >> /etc/foo.conf has changed   -> warning, bold yellow
//! ```
//!
//! [`colorize_stream`] copies a stream line by line and wraps marked lines
//! in the matching escape sequence. Unmarked lines are copied byte for byte,
//! and every line is flushed as soon as it is complete.

use std::io::{self, BufRead, BufReader, Read, Write};

/// Marker opening an error line.
pub const ERROR_MARKER: &[u8] = b"!! ";
/// Marker opening a warning line.
pub const WARNING_MARKER: &[u8] = b">> ";

const ERROR_STYLE: &[u8] = b"\x1b[1;31m";
const WARNING_STYLE: &[u8] = b"\x1b[1;33m";
const RESET_STYLE: &[u8] = b"\x1b[0m";

/// Writes one line, highlighted if it carries a marker.
///
/// `line` may end in `\n`; the terminator stays outside the escape
/// sequence.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn colorize_line<W>(line: &[u8], out: &mut W) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let (body, terminator) = line
        .strip_suffix(b"\n")
        .map_or((line, &b""[..]), |body| (body, &b"\n"[..]));
    let style = if body.starts_with(ERROR_MARKER) {
        ERROR_STYLE
    } else if body.starts_with(WARNING_MARKER) {
        WARNING_STYLE
    } else {
        return out.write_all(line);
    };
    out.write_all(style)?;
    out.write_all(body)?;
    out.write_all(RESET_STYLE)?;
    out.write_all(terminator)
}

/// Copies `input` to `out` line by line, highlighting marked lines.
///
/// Returns once `input` reaches end of stream. A final line without a
/// terminator is still processed.
///
/// # Errors
///
/// Propagates read errors from `input` and write errors from `out`.
pub fn colorize_stream<R, W>(input: R, out: &mut W) -> io::Result<()>
where
    R: Read,
    W: Write + ?Sized,
{
    let mut reader = BufReader::new(input);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        colorize_line(&line, out)?;
        out.flush()?;
    }
}

#[cfg(test)]
mod tests;
