// Licensed under the Apache-2.0 license

//! Free-text cleanup for descriptions and license blocks.
//!
//! SVD files wrap long text across indented lines. Generated comments want a
//! single line per paragraph, with explicit `\n` escapes marking real breaks.

/// Collapses every run of spaces, tabs and line breaks into one space and
/// trims both ends.
///
/// # Examples
/// ```
/// use mcu_registers_svd::text::collapse_whitespace;
/// assert_eq!(collapse_whitespace("  Power\n\t control  "), "Power control");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split([' ', '\t', '\n', '\r'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a text block for a multi-line comment.
///
/// Whitespace is collapsed as in [`collapse_whitespace`], then every literal
/// `\n ` (backslash, `n`, space) becomes a real newline followed by
/// `continuation`.
///
/// # Examples
/// ```
/// use mcu_registers_svd::text::normalize;
/// assert_eq!(normalize("Copyright\\n  All rights", "//  "), "Copyright\n//  All rights");
/// ```
pub fn normalize(text: &str, continuation: &str) -> String {
    collapse_whitespace(text).replace("\\n ", &format!("\n{continuation}"))
}
