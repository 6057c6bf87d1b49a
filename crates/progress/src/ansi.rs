//! ANSI control sequences emitted by the renderer and the terminal sink

pub const BOLD: &str = "\x1b[1m";
pub const BLUE: &str = "\x1b[0;34m";
pub const RESET: &str = "\x1b[0;0m";

/// Erase the whole current line and return to column 0
pub const CLEAR_LINE: &str = "\x1b[2K\r";

pub const CURSOR_UP: &str = "\x1b[1A";

/// Wrap `text` in bold blue, resetting afterwards
#[must_use]
pub fn bold_blue(text: &str) -> String {
    format!("{BOLD}{BLUE}{text}{RESET}")
}
