//! Colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::config::ThemeName;
use crate::fields::Priority;

/// Brand accent used for highlights and the active context.
pub const ACCENT: Color = Color::Rgb(147, 51, 234);

/// Resolved palette for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: ThemeName,
    pub fg: Color,
    pub muted: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub row_highlight_bg: Color,
    pub row_highlight_fg: Color,
    pub done: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Theme {
                name,
                fg: Color::Black,
                muted: Color::DarkGray,
                header_bg: ACCENT,
                header_fg: Color::White,
                row_highlight_bg: Color::Rgb(233, 213, 255),
                row_highlight_fg: Color::Black,
                done: Color::DarkGray,
            },
            ThemeName::Dark => Theme {
                name,
                fg: Color::White,
                muted: Color::Gray,
                header_bg: ACCENT,
                header_fg: Color::White,
                row_highlight_bg: Color::Rgb(60, 30, 90),
                row_highlight_fg: Color::White,
                done: Color::DarkGray,
            },
        }
    }
}

/// Dot colour for a status group header. User-created statuses share the
/// default grey.
pub fn status_color(status: &str) -> Color {
    match status {
        "To Do" => Color::Gray,
        "In Progress" => Color::Blue,
        "Review" => Color::Magenta,
        "Complete" => Color::Green,
        "Blocked" => Color::Red,
        _ => Color::Gray,
    }
}

/// Flag colour for a priority badge.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Urgent => Color::Red,
        Priority::High => Color::Yellow,
        Priority::Normal => Color::Blue,
        Priority::Low => Color::Gray,
        Priority::Clear => Color::DarkGray,
    }
}
