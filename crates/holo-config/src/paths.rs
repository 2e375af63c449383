//! Lexical cleanup for root directory values.

/// Removes duplicate and trailing slashes from `path`.
///
/// A lone `/` is preserved. No other rewriting happens: `.` and `..`
/// segments and symlinks are left alone.
///
/// ```text
/// "//srv//holo///" -> "/srv/holo"
/// "/"              -> "/"
/// ```
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut previous_was_slash = false;
    for ch in path.chars() {
        let is_slash = ch == '/';
        if !(is_slash && previous_was_slash) {
            cleaned.push(ch);
        }
        previous_was_slash = is_slash;
    }
    while cleaned.len() > 1 && cleaned.ends_with('/') {
        cleaned.pop();
    }
    cleaned
}
