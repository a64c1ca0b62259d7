//! Terminal color constants and utilities for CLI output.

use std::io::{self, Write};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";

/// Flush stdout so progress lines show up before a long-running step.
#[inline]
pub fn flush_stdout() {
    io::stdout().flush().ok();
}

/// Horizontal rule under section headers.
pub fn rule() -> String {
    "─".repeat(50)
}
