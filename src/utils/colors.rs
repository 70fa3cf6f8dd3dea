/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Flex time color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_flex(minutes: i64) -> &'static str {
    if minutes > 0 {
        GREEN
    } else if minutes < 0 {
        RED
    } else {
        RESET
    }
}

/// Grey out empty values ("" or "--:--"), leave the rest untouched.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" || value.trim() == "00h 00m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Bookings that start work are green, the ones that stop it red.
pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if is_in {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{RED}{value}{RESET}")
    }
}
