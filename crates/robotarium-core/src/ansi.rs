//! ANSI escape code handling utilities
//!
//! `arduino-cli` colors parts of its compile and upload output (warnings,
//! memory usage summaries). Reporting sinks render plain text, so only SGR
//! color sequences (`ESC [ <n>;<n>... m`) are removed. Everything else,
//! including other escape sequences, is left exactly as the tool emitted it.

use regex::Regex;
use std::sync::LazyLock;

/// SGR (Select Graphic Rendition) sequences: `ESC [` one or more
/// `;`-separated decimal parameters, then `m`.
static SGR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[(?:[0-9]+;)*[0-9]+m").expect("SGR regex pattern is valid")
});

/// Strip ANSI color sequences from tool output.
///
/// # Examples
///
/// ```
/// use robotarium_core::strip_ansi_codes;
///
/// let input = "\x1b[33mwarning:\x1b[0m unused variable";
/// assert_eq!(strip_ansi_codes(input), "warning: unused variable");
/// ```
pub fn strip_ansi_codes(input: &str) -> String {
    SGR_PATTERN.replace_all(input, "").into_owned()
}
