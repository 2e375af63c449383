//! Unit tests for stderr highlighting.

use rstest::rstest;

use super::*;

fn colorize(input: &str) -> String {
    let mut out = Vec::new();
    colorize_stream(input.as_bytes(), &mut out).expect("colorize in memory");
    String::from_utf8(out).expect("output stays UTF-8")
}

#[rstest]
#[case::error("!! error text\n", "\x1b[1;31m!! error text\x1b[0m\n")]
#[case::warning(">> warn text\n", "\x1b[1;33m>> warn text\x1b[0m\n")]
#[case::plain("plain text\n", "plain text\n")]
#[case::marker_not_at_start("note: !! not an error\n", "note: !! not an error\n")]
#[case::marker_without_space("!!error\n", "!!error\n")]
#[case::bare_marker("!! \n", "\x1b[1;31m!! \x1b[0m\n")]
#[case::unterminated_last_line("!! tail", "\x1b[1;31m!! tail\x1b[0m")]
#[case::empty("", "")]
fn highlights_single_lines(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(colorize(input), expected);
}

#[test]
fn preserves_line_order_and_count() {
    let input = "first\n!! second\n>> third\n\nfifth\n";
    let output = colorize(input);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "first",
            "\x1b[1;31m!! second\x1b[0m",
            "\x1b[1;33m>> third\x1b[0m",
            "",
            "fifth",
        ]
    );
}

#[test]
fn passes_invalid_utf8_through() {
    let input: &[u8] = b"\xff\xfe raw\n";
    let mut out = Vec::new();
    colorize_stream(input, &mut out).expect("colorize bytes");
    assert_eq!(out, input);
}

#[test]
fn carriage_returns_stay_inside_the_line() {
    assert_eq!(colorize("!! crlf\r\n"), "\x1b[1;31m!! crlf\r\x1b[0m\n");
}
