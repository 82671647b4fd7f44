//! Linear terminal output for the non-interactive subcommands.
//!
//! Everything here writes plain lines to stdout; colour is handled by the
//! `colored` crate and can be forced on/off from the CLI.

mod formation;
mod table;

pub use formation::print_formation;
pub use table::{print_board, print_journey, print_locations, BoardOptions};

use chrono::{DateTime, Utc};
use chrono_tz::Europe::Berlin;
use colored::Colorize;

/// Format an optional instant as local HH:MM, blank when absent.
pub(crate) fn fmt_hm(t: Option<DateTime<Utc>>) -> String {
    match t {
        Some(t) => t.with_timezone(&Berlin).format("%H:%M").to_string(),
        None => "     ".to_string(),
    }
}

/// Fixed 4-character delay field.
///
/// Blank when zero; `+N` yellow for small delays, bold red from ten
/// minutes, green when early.
pub(crate) fn format_delay(delay: i64) -> String {
    if delay == 0 {
        return "    ".to_string();
    }
    if delay > 0 {
        let s = format!("{delay:+4}");
        if delay >= 10 {
            return s.red().bold().to_string();
        }
        return s.yellow().to_string();
    }
    format!("{delay:4}").green().to_string()
}

/// Cut a string to `width` characters, appending `~` when truncated.
/// Widths of three or fewer cut hard.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let len = s.chars().count();
    if len <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().take(width).collect();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('~');
    out
}
