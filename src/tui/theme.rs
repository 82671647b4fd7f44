//! Styles for the TUI, matching the colour scheme of the CLI output.

use ratatui::style::{Color, Modifier, Style};

/// Times and primary text.
pub fn time() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// Minor delays (1–9 minutes).
pub fn delay() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Major delays (ten minutes and up).
pub fn delay_high() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Early or on-time.
pub fn on_time() -> Style {
    Style::default().fg(Color::Green)
}

/// Line labels (ICE 1537, S 6).
pub fn line() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn platform() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn cancelled() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn header() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// Cursor row in a list.
pub fn selected() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// Full-width highlight of the train's current stop.
pub fn current_stop() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Full-width highlight of the user's scroll position in the journey list.
pub fn scroll_position() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Focused chip cursor in the filter bar (reverse video).
pub fn chip_cursor() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn status_bar() -> Style {
    Style::default().fg(Color::DarkGray).bg(Color::Black)
}

pub fn loading() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red)
}

/// Panel border, normal and focused.
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn border_focused() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Brand line at the top.
pub fn logo() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Route map: already-passed stops and connecting dots.
pub fn map_past() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Route map: the stop the train is currently at.
pub fn map_current() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Route map: stops still ahead.
pub fn map_future() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}
